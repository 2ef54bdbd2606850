//! Public-transport quality: pt/car travel-time ratio and walk access.
//!
//! **Ratio.**  For each trip longer than the minimum straight-line distance,
//! compare the pt travel time with the car free-flow time:
//!
//! | Main mode | pt time                 | car time                   |
//! |-----------|-------------------------|----------------------------|
//! | `car`     | transit collaborator    | observed                   |
//! | `pt`      | observed                | free-flow network baseline |
//! | other     | transit collaborator    | free-flow network baseline |
//!
//! Shorter trips are not compared and count as within limit.
//!
//! **Walk access.**  For each pt trip, the longest walk leg against the
//! walk-access limit.
//!
//! Per agent, the worst (largest) trip deviation of each sub-indicator is
//! kept; the pt-quality composite is their maximum.

use std::collections::BTreeMap;

use lv_baseline::{BaselineEstimator, RoutingTally};
use lv_core::{deviation, AgentId, LiveabilityConfig, TransportMode, UNBOUNDED_DEVIATION};
use lv_records::{StudyArea, TripRecord, WalkAccessIndex};

use crate::ranking::{composite, RankingSummary};

/// Ratio comparison of one trip.
#[derive(Clone, Debug, PartialEq)]
pub struct PtCarComparison {
    pub agent:                AgentId,
    pub trip_id:              String,
    pub main_mode:            String,
    pub euclidean_distance_m: f64,
    pub pt_secs:              Option<f64>,
    pub car_secs:             Option<f64>,
    pub ratio:                Option<f64>,
    pub deviation:            Option<f64>,
    /// `true` for short trips even though no ratio was computed.
    pub short:                bool,
}

/// Walk-access measurement of one pt trip.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkAccess {
    pub agent:          AgentId,
    pub trip_id:        String,
    pub longest_walk_m: f64,
    pub deviation:      f64,
}

#[derive(Clone, Debug, Default)]
pub struct PtQualityReport {
    pub comparisons:  Vec<PtCarComparison>,
    pub walk_access:  Vec<WalkAccess>,
    /// Worst ratio deviation per agent.
    pub ratio_worst:  BTreeMap<AgentId, f64>,
    /// Worst walk-access deviation per agent.
    pub walk_worst:   BTreeMap<AgentId, f64>,
    /// Trip-level ratio ranking; short trips count as within limit.
    pub trip_ranking: RankingSummary,
    /// Trips where pt or car time could not be determined.
    pub unresolved:   usize,
    pub tally:        RoutingTally,
}

impl PtQualityReport {
    /// Per-agent composite over whichever sub-indicators the agent has.
    pub fn composite_per_agent(&self) -> BTreeMap<AgentId, f64> {
        let mut out = BTreeMap::new();
        let agents = self.ratio_worst.keys().chain(self.walk_worst.keys());
        for agent in agents {
            if out.contains_key(agent) {
                continue;
            }
            let subs = [self.ratio_worst.get(agent), self.walk_worst.get(agent)];
            if let Some(c) = composite(subs.into_iter().flatten().copied()) {
                out.insert(agent.clone(), c);
            }
        }
        out
    }
}

/// Computes a [`PtQualityReport`] from the trip export.
pub struct PtQualityCalculator<'e, 'a> {
    estimator:       &'e BaselineEstimator<'a>,
    ratio_limit:     f64,
    walk_limit_m:    f64,
    min_euclidean_m: f64,
}

impl<'e, 'a> PtQualityCalculator<'e, 'a> {
    pub fn new(estimator: &'e BaselineEstimator<'a>, config: &LiveabilityConfig) -> Self {
        Self {
            estimator,
            ratio_limit:     config.limits.pt_car_ratio,
            walk_limit_m:    config.limits.walk_access_m,
            min_euclidean_m: config.pt_min_euclidean_m,
        }
    }

    pub fn run(&self, trips: &[TripRecord], walks: &WalkAccessIndex, area: &StudyArea) -> PtQualityReport {
        let mut report = PtQualityReport::default();

        for trip in trips.iter().filter(|t| area.contains(&t.agent)) {
            self.compare(&mut report, trip);
            if trip.transport_mode() == Some(TransportMode::Pt) {
                self.walk_access(&mut report, trip, walks);
            }
        }

        if report.unresolved > 0 {
            log::info!("{} trips had no pt or car time and were not compared", report.unresolved);
        }
        log::info!(
            "pt quality: {} trips compared, {} agents with a ratio, {} with walk access",
            report.comparisons.len(),
            report.ratio_worst.len(),
            report.walk_worst.len()
        );
        report
    }

    fn compare(&self, report: &mut PtQualityReport, trip: &TripRecord) {
        let mut cmp = PtCarComparison {
            agent:                trip.agent.clone(),
            trip_id:              trip.trip_id.clone(),
            main_mode:            trip.main_mode.clone(),
            euclidean_distance_m: trip.euclidean_distance_m,
            pt_secs:              None,
            car_secs:             None,
            ratio:                None,
            deviation:            None,
            short:                trip.euclidean_distance_m <= self.min_euclidean_m,
        };

        if cmp.short {
            report.trip_ranking.record(UNBOUNDED_DEVIATION);
            report.comparisons.push(cmp);
            return;
        }

        let observed = trip.trav_time_secs as f64;
        let (pt, car) = match trip.transport_mode() {
            Some(TransportMode::Car) => (self.pt_secs(trip), Some(observed)),
            Some(TransportMode::Pt)  => (Some(observed), self.car_secs(trip, &mut report.tally)),
            _ => (self.pt_secs(trip), self.car_secs(trip, &mut report.tally)),
        };
        cmp.pt_secs  = pt;
        cmp.car_secs = car;

        match (pt, car) {
            (Some(pt), Some(car)) if car > 0.0 => {
                let ratio = pt / car;
                let dev = deviation(ratio, self.ratio_limit);
                cmp.ratio     = Some(ratio);
                cmp.deviation = Some(dev);
                report.trip_ranking.record(dev);
                report
                    .ratio_worst
                    .entry(trip.agent.clone())
                    .and_modify(|w| *w = w.max(dev))
                    .or_insert(dev);
            }
            _ => report.unresolved += 1,
        }
        report.comparisons.push(cmp);
    }

    fn pt_secs(&self, trip: &TripRecord) -> Option<f64> {
        self.estimator
            .transit_estimate(trip.start, trip.end, trip.dep_time_secs)
            .travel_secs
    }

    fn car_secs(&self, trip: &TripRecord, tally: &mut RoutingTally) -> Option<f64> {
        let secs = self.estimator.network_secs(trip.start, trip.end, TransportMode::Car);
        if secs.is_none() {
            tally.record_failure(TransportMode::Car.as_str());
        }
        secs
    }

    fn walk_access(&self, report: &mut PtQualityReport, trip: &TripRecord, walks: &WalkAccessIndex) {
        let longest = walks.longest_walk_m(&trip.trip_id).or_else(|| {
            self.estimator
                .transit_estimate(trip.start, trip.end, trip.dep_time_secs)
                .longest_walk_m
        });
        let Some(longest) = longest else { return };

        let dev = deviation(longest, self.walk_limit_m);
        report
            .walk_worst
            .entry(trip.agent.clone())
            .and_modify(|w| *w = w.max(dev))
            .or_insert(dev);
        report.walk_access.push(WalkAccess {
            agent:          trip.agent.clone(),
            trip_id:        trip.trip_id.clone(),
            longest_walk_m: longest,
            deviation:      dev,
        });
    }
}
