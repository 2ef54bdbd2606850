//! Deviation values and population ranking.
//!
//! An agent is *within limit* on an indicator when its deviation is `≤ 0`.
//! The ranking value of an indicator is the share of agents within limit
//! among all agents with a value for it.

pub use lv_core::deviation;

/// Deviation at or below which an agent is "well within" the limit.
pub const WELL_WITHIN: f64 = -0.5;

/// Deviation at or below which an agent is "not grossly over" the limit.
pub const NOT_GROSSLY_OVER: f64 = 0.5;

/// Counts behind the ranking percentages of one indicator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RankingSummary {
    pub counted:          usize,
    pub within:           usize,
    pub well_within:      usize,
    pub not_grossly_over: usize,
}

impl RankingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarise a population of deviations.  Non-finite values are nulls.
    pub fn from_deviations<I: IntoIterator<Item = f64>>(devs: I) -> Self {
        let mut s = Self::new();
        for d in devs {
            s.record(d);
        }
        s
    }

    pub fn record(&mut self, dev: f64) {
        if !dev.is_finite() {
            return;
        }
        self.counted += 1;
        if dev <= 0.0 {
            self.within += 1;
        }
        if dev <= WELL_WITHIN {
            self.well_within += 1;
        }
        if dev <= NOT_GROSSLY_OVER {
            self.not_grossly_over += 1;
        }
    }

    fn pct(&self, n: usize) -> f64 {
        if self.counted == 0 {
            0.0
        } else {
            100.0 * n as f64 / self.counted as f64
        }
    }

    /// The ranking value: `100 × within / counted`, in `[0, 100]`.
    pub fn within_pct(&self) -> f64 {
        self.pct(self.within)
    }

    pub fn well_within_pct(&self) -> f64 {
        self.pct(self.well_within)
    }

    pub fn not_grossly_over_pct(&self) -> f64 {
        self.pct(self.not_grossly_over)
    }
}

/// Weakest-link combination of sub-indicator deviations: the maximum.
///
/// Non-finite entries are ignored; `None` if nothing remains.
pub fn composite<I: IntoIterator<Item = f64>>(subs: I) -> Option<f64> {
    subs.into_iter().filter(|d| d.is_finite()).reduce(f64::max)
}

/// Two-decimal percentage with a `%` sign, e.g. `"70.00%"`.
pub fn format_percent(pct: f64) -> String {
    format!("{pct:.2}%")
}
