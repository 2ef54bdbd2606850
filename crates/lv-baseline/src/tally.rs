//! Caller-owned routing diagnostics.

use std::collections::BTreeMap;

/// Per-mode counts of routing failures and unsupported modes.
///
/// Purely diagnostic; nothing reads it for control flow.  Each indicator
/// run owns one and reports it at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingTally {
    failed:  BTreeMap<String, u64>,
    unknown: BTreeMap<String, u64>,
}

impl RoutingTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// A network-routed leg found no usable path.
    pub fn record_failure(&mut self, mode: &str) {
        *self.failed.entry(mode.to_owned()).or_insert(0) += 1;
    }

    /// A leg used a mode without a baseline strategy.  Logged once per mode.
    pub fn record_unknown(&mut self, mode: &str) {
        let n = self.unknown.entry(mode.to_owned()).or_insert(0);
        if *n == 0 {
            log::warn!("no free-flow baseline for mode `{mode}`; its legs count as zero loss");
        }
        *n += 1;
    }

    pub fn failed_routings(&self, mode: &str) -> u64 {
        self.failed.get(mode).copied().unwrap_or(0)
    }

    pub fn unknown_legs(&self, mode: &str) -> u64 {
        self.unknown.get(mode).copied().unwrap_or(0)
    }

    pub fn total_failed(&self) -> u64 {
        self.failed.values().sum()
    }

    /// `(mode, failures)` in mode order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, u64)> {
        self.failed.iter().map(|(m, &n)| (m.as_str(), n))
    }

    pub fn unknown_modes(&self) -> impl Iterator<Item = (&str, u64)> {
        self.unknown.iter().map(|(m, &n)| (m.as_str(), n))
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: RoutingTally) {
        for (m, n) in other.failed {
            *self.failed.entry(m).or_insert(0) += n;
        }
        for (m, n) in other.unknown {
            *self.unknown.entry(m).or_insert(0) += n;
        }
    }

    /// One summary line per mode at `info`.
    pub fn log_summary(&self) {
        for (mode, n) in self.failures() {
            log::info!("failed routings for mode {mode}: {n}");
        }
        for (mode, n) in self.unknown_modes() {
            log::info!("legs with unsupported mode {mode}: {n}");
        }
    }
}
