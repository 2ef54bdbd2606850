//! Longest trip per agent.
//!
//! For every (agent, main mode) the longest trip is kept.  The agent's
//! indicator is then the mode whose longest trip deviates most from that
//! mode's own limit, so a 40-minute car trip (limit 30) outranks a 55-minute
//! pt trip (limit 60).  Modes without a limit deviate by
//! [`UNBOUNDED_DEVIATION`] and only win when nothing else is bounded.

use std::collections::BTreeMap;

use lv_core::{AgentId, Limit, TripDurationLimits, INACTIVE_MODE, UNBOUNDED_DEVIATION};
use lv_records::{StudyArea, TripRecord};

/// The longest trip of one agent with one mode.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModeLongest {
    pub duration_secs: u64,
    pub dep_time_secs: u64,
    pub deviation:     f64,
}

/// The winning longest trip of one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentLongestTrip {
    /// Winning main mode, or `"inactive"`.
    pub mode:          String,
    pub duration_secs: u64,
    /// `None` for inactive agents.
    pub dep_time_secs: Option<u64>,
    pub limit:         Limit,
    pub deviation:     f64,
    pub by_mode:       BTreeMap<String, ModeLongest>,
}

impl AgentLongestTrip {
    pub fn inactive() -> Self {
        Self {
            mode:          INACTIVE_MODE.to_owned(),
            duration_secs: 0,
            dep_time_secs: None,
            limit:         Limit::Unbounded,
            deviation:     UNBOUNDED_DEVIATION,
            by_mode:       BTreeMap::new(),
        }
    }

    pub fn is_inactive(&self) -> bool {
        self.dep_time_secs.is_none()
    }
}

/// Longest trip per study-area agent.  Every study-area agent gets an entry.
///
/// Ties keep the earlier trip for equal durations and the alphabetically
/// first mode for equal deviations.
pub fn longest_trips(
    trips:  &[TripRecord],
    area:   &StudyArea,
    limits: &TripDurationLimits,
) -> BTreeMap<AgentId, AgentLongestTrip> {
    // (agent, mode) → (duration, dep_time)
    let mut longest: BTreeMap<&AgentId, BTreeMap<&str, (u64, u64)>> = BTreeMap::new();
    for t in trips.iter().filter(|t| area.contains(&t.agent)) {
        longest
            .entry(&t.agent)
            .or_default()
            .entry(t.main_mode.as_str())
            .and_modify(|cur| {
                if t.trav_time_secs > cur.0 {
                    *cur = (t.trav_time_secs, t.dep_time_secs);
                }
            })
            .or_insert((t.trav_time_secs, t.dep_time_secs));
    }

    let mut out = BTreeMap::new();
    for (agent, modes) in longest {
        let mut by_mode = BTreeMap::new();
        let mut winner: Option<(&str, u64, u64, Limit, f64)> = None;

        for (mode, (dur, dep)) in modes {
            let limit = limits.for_label(mode);
            let dev = limit.deviation(dur as f64);
            by_mode.insert(mode.to_owned(), ModeLongest { duration_secs: dur, dep_time_secs: dep, deviation: dev });
            if winner.is_none_or(|w| dev > w.4) {
                winner = Some((mode, dur, dep, limit, dev));
            }
        }

        if let Some((mode, dur, dep, limit, dev)) = winner {
            out.insert(
                agent.clone(),
                AgentLongestTrip {
                    mode: mode.to_owned(),
                    duration_secs: dur,
                    dep_time_secs: Some(dep),
                    limit,
                    deviation: dev,
                    by_mode,
                },
            );
        }
    }

    for agent in area.agents() {
        if !out.contains_key(agent) {
            out.insert(agent.clone(), AgentLongestTrip::inactive());
        }
    }
    out
}
