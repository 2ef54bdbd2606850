//! Loss time: how much longer a leg took than its free-flow baseline.
//!
//! For each leg of a study-area agent:
//!
//! ```text
//! loss         = max(0, actual − baseline)
//! percent_loss = loss / baseline      (0 when baseline == 0)
//! ```
//!
//! A leg whose actual time beat the baseline is *clamped*: its loss is zero,
//! not negative.  Clamped legs always count toward per-agent totals;
//! [`ClampedLegPolicy`] decides whether they count toward per-mode
//! aggregates.

use std::collections::{BTreeMap, BTreeSet};

use lv_baseline::{Baseline, BaselineEstimator, BaselineRequest, BaselineSource, RoutingTally};
use lv_core::time::interval_label;
use lv_core::{AgentId, ClampedLegPolicy, Coord, CoreError, LiveabilityConfig, INACTIVE_MODE};
use lv_records::{LegRecord, StudyArea};

use crate::IndicatorResult;

// ── Per-leg ───────────────────────────────────────────────────────────────────

/// `(loss, percent_loss, clamped)` for one leg.
pub fn leg_loss(actual_secs: f64, baseline_secs: f64) -> (f64, f64, bool) {
    let raw = actual_secs - baseline_secs;
    let clamped = raw < 0.0;
    let loss = raw.max(0.0);
    let percent = if baseline_secs != 0.0 { loss / baseline_secs } else { 0.0 };
    (loss, percent, clamped)
}

/// Loss of one leg with the inputs it was computed from.
#[derive(Clone, Debug, PartialEq)]
pub struct LegLoss {
    pub agent:         AgentId,
    pub trip_id:       String,
    pub mode:          String,
    pub actual_secs:   f64,
    pub baseline_secs: f64,
    pub loss_secs:     f64,
    pub percent_loss:  f64,
    pub clamped:       bool,
    /// `None` when the mode had no baseline strategy.
    pub source:        Option<BaselineSource>,
    pub dep_time_secs: u64,
    pub start:         Coord,
    pub end:           Coord,
    pub start_link:    String,
    pub end_link:      String,
}

// ── Per-agent / per-mode ──────────────────────────────────────────────────────

/// Totals of one agent over all its legs.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AgentLoss {
    pub loss_secs:     f64,
    pub travel_secs:   f64,
    pub baseline_secs: f64,
    pub modes:         BTreeSet<String>,
}

impl AgentLoss {
    /// The record of a study-area agent that never travelled.
    pub fn inactive() -> Self {
        Self {
            modes: BTreeSet::from([INACTIVE_MODE.to_owned()]),
            ..Self::default()
        }
    }

    pub fn is_inactive(&self) -> bool {
        self.modes.len() == 1 && self.modes.contains(INACTIVE_MODE)
    }

    /// Relative loss over the whole day: `(travel − baseline) / baseline`,
    /// or 0 when the baseline is zero or exceeds the travel time.
    pub fn relative_loss(&self) -> f64 {
        if self.baseline_secs != 0.0 && self.travel_secs >= self.baseline_secs {
            (self.travel_secs - self.baseline_secs) / self.baseline_secs
        } else {
            0.0
        }
    }

    /// Modes joined for a single output cell, e.g. `"car|walk"`.
    pub fn modes_label(&self) -> String {
        self.modes.iter().map(String::as_str).collect::<Vec<_>>().join("|")
    }
}

/// Aggregate of one mode over all study-area legs.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ModeLoss {
    /// Summed loss scaled to full population (divided by the sample size).
    pub cumulative_loss_secs: f64,
    pub legs:                 u64,
    /// Clamped legs seen, whether or not the policy counted them.
    pub clamped_legs:         u64,
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Everything one pass of the loss calculator produces.
#[derive(Clone, Debug, Default)]
pub struct LossReport {
    pub legs:               Vec<LegLoss>,
    /// One entry per study-area agent, inactive agents included.
    pub per_agent:          BTreeMap<AgentId, AgentLoss>,
    pub per_mode:           BTreeMap<String, ModeLoss>,
    /// Summed loss per departure interval start (`"HH:MM"`).
    pub per_interval:       BTreeMap<String, f64>,
    /// Legs whose baseline was zero (percent loss reported as 0).
    pub zero_baseline_legs: u64,
    pub tally:              RoutingTally,
}

impl LossReport {
    pub fn total_loss_secs(&self) -> f64 {
        self.per_agent.values().map(|a| a.loss_secs).sum()
    }
}

// ── LossCalculator ────────────────────────────────────────────────────────────

/// Computes a [`LossReport`] from a leg export.
pub struct LossCalculator<'e, 'a> {
    estimator:     &'e BaselineEstimator<'a>,
    clamped:       ClampedLegPolicy,
    sample_size:   f64,
    interval_mins: u32,
}

impl<'e, 'a> LossCalculator<'e, 'a> {
    pub fn new(estimator: &'e BaselineEstimator<'a>, config: &LiveabilityConfig) -> IndicatorResult<Self> {
        if !(config.sample_size.is_finite() && config.sample_size > 0.0) {
            return Err(CoreError::Config(format!(
                "sample_size must be positive, got {}",
                config.sample_size
            ))
            .into());
        }
        Ok(Self {
            estimator,
            clamped:       config.clamped_legs,
            sample_size:   config.sample_size,
            interval_mins: config.departure_interval_mins,
        })
    }

    pub fn run(&self, legs: &[LegRecord], area: &StudyArea) -> LossReport {
        let in_area: Vec<&LegRecord> = legs.iter().filter(|l| area.contains(&l.agent)).collect();
        let requests: Vec<BaselineRequest<'_>> = in_area
            .iter()
            .map(|l| BaselineRequest {
                start:          l.start,
                end:            l.end,
                mode:           &l.mode,
                departure_secs: l.dep_time_secs,
                fallback_secs:  l.trav_time_secs as f64,
            })
            .collect();
        let (baselines, tally) = self.estimator.estimate_batch(&requests);

        let mut report = LossReport { tally, ..LossReport::default() };
        for (leg, baseline) in in_area.into_iter().zip(baselines) {
            self.accumulate(&mut report, leg, baseline);
        }

        let mut inactive = 0usize;
        for agent in area.agents() {
            if !report.per_agent.contains_key(agent) {
                report.per_agent.insert(agent.clone(), AgentLoss::inactive());
                inactive += 1;
            }
        }

        if report.zero_baseline_legs > 0 {
            log::info!("{} legs had a zero baseline; their percent loss is 0", report.zero_baseline_legs);
        }
        log::info!(
            "loss time: {} legs, {} agents ({} inactive)",
            report.legs.len(),
            report.per_agent.len(),
            inactive
        );
        report
    }

    fn accumulate(&self, report: &mut LossReport, leg: &LegRecord, baseline: Baseline) {
        let actual = leg.trav_time_secs as f64;
        let source = match baseline {
            Baseline::FreeFlow { source, .. } => Some(source),
            Baseline::Transit(t) if t.travel_secs.is_some() => Some(BaselineSource::Routed),
            Baseline::Transit(_) => Some(BaselineSource::Fallback),
            Baseline::Unsupported => None,
        };
        let baseline_secs = baseline.secs_or(actual);
        let (loss, percent, clamped) = leg_loss(actual, baseline_secs);
        if baseline_secs == 0.0 {
            report.zero_baseline_legs += 1;
        }

        let agent = report.per_agent.entry(leg.agent.clone()).or_default();
        agent.loss_secs     += loss;
        agent.travel_secs   += actual;
        agent.baseline_secs += baseline_secs;
        agent.modes.insert(leg.mode.clone());

        let mode = report.per_mode.entry(leg.mode.clone()).or_default();
        if clamped {
            mode.clamped_legs += 1;
        }
        if !clamped || self.clamped == ClampedLegPolicy::Include {
            mode.cumulative_loss_secs += loss / self.sample_size;
            mode.legs += 1;
        }

        *report
            .per_interval
            .entry(interval_label(leg.dep_time_secs, self.interval_mins))
            .or_insert(0.0) += loss;

        report.legs.push(LegLoss {
            agent: leg.agent.clone(),
            trip_id: leg.trip_id.clone(),
            mode: leg.mode.clone(),
            actual_secs: actual,
            baseline_secs,
            loss_secs: loss,
            percent_loss: percent,
            clamped,
            source,
            dep_time_secs: leg.dep_time_secs,
            start: leg.start,
            end: leg.end,
            start_link: leg.start_link.clone(),
            end_link: leg.end_link.clone(),
        });
    }
}
