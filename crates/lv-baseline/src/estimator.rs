//! The baseline estimator.

use lv_core::{BaselineConfig, Coord, CoreError, PtPolicy, TransportMode};
use lv_network::{free_flow_cost, DijkstraRouter, RoadNetwork, Router};

use crate::strategy::ModeStrategy;
use crate::tally::RoutingTally;
use crate::transit::{NoTransit, TransitRouter};
use crate::BaselineResult;

// ── Request / result ──────────────────────────────────────────────────────────

/// One point-to-point movement to estimate.
#[derive(Copy, Clone, Debug)]
pub struct BaselineRequest<'r> {
    pub start:          Coord,
    pub end:            Coord,
    /// Raw export mode label.
    pub mode:           &'r str,
    pub departure_secs: u64,
    /// Observed travel time; used as baseline when routing fails.
    pub fallback_secs:  f64,
}

/// Where a free-flow value came from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BaselineSource {
    /// Beeline distance and average speed.
    Analytic,
    /// Free-flow shortest path.
    Routed,
    /// Routing failed; the observed time stands in.
    Fallback,
    /// The mode's policy uses the observed time as baseline.
    PassThrough,
}

impl BaselineSource {
    pub fn as_str(self) -> &'static str {
        match self {
            BaselineSource::Analytic    => "analytic",
            BaselineSource::Routed      => "routed",
            BaselineSource::Fallback    => "fallback",
            BaselineSource::PassThrough => "observed",
        }
    }
}

/// Result of a routed transit query.  Both fields are `None` when there is
/// no connection.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct TransitEstimate {
    pub travel_secs:    Option<f64>,
    pub longest_walk_m: Option<f64>,
}

/// Outcome of [`BaselineEstimator::estimate`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Baseline {
    FreeFlow { secs: f64, source: BaselineSource },
    Transit(TransitEstimate),
    /// No strategy for the mode.  Callers treat the leg as zero loss.
    Unsupported,
}

impl Baseline {
    /// Baseline seconds, if any.
    pub fn secs(&self) -> Option<f64> {
        match *self {
            Baseline::FreeFlow { secs, .. } => Some(secs),
            Baseline::Transit(t) => t.travel_secs,
            Baseline::Unsupported => None,
        }
    }

    /// Baseline seconds, falling back to `observed` where none exists, so
    /// the resulting loss is zero.
    pub fn secs_or(&self, observed: f64) -> f64 {
        self.secs().unwrap_or(observed)
    }
}

// ── BaselineEstimator ─────────────────────────────────────────────────────────

/// Mode-dispatching free-flow estimator.
///
/// Borrows the network and routing collaborators read-only; one estimator
/// can be shared by every indicator module of a run.
pub struct BaselineEstimator<'a> {
    network: &'a RoadNetwork,
    router:  &'a dyn Router,
    transit: &'a dyn TransitRouter,
    config:  BaselineConfig,
}

impl<'a> BaselineEstimator<'a> {
    /// Estimator using [`DijkstraRouter`] and [`NoTransit`].
    pub fn new(network: &'a RoadNetwork, config: BaselineConfig) -> BaselineResult<Self> {
        for (name, v) in [
            ("walk_beeline_factor", config.walk_beeline_factor),
            ("bike_beeline_factor", config.bike_beeline_factor),
            ("walk_speed_mps", config.walk_speed_mps),
            ("bike_speed_mps", config.bike_speed_mps),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(CoreError::Config(format!("baseline `{name}` must be positive, got {v}")).into());
            }
        }
        Ok(Self { network, router: &DijkstraRouter, transit: &NoTransit, config })
    }

    pub fn with_router(mut self, router: &'a dyn Router) -> Self {
        self.router = router;
        self
    }

    pub fn with_transit(mut self, transit: &'a dyn TransitRouter) -> Self {
        self.transit = transit;
        self
    }

    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    pub fn network(&self) -> &RoadNetwork {
        self.network
    }

    /// Free-flow baseline for one movement.
    ///
    /// Never fails: routing problems fall back to `fallback_secs` and are
    /// counted in `tally`.
    pub fn estimate(&self, req: &BaselineRequest<'_>, tally: &mut RoutingTally) -> Baseline {
        match ModeStrategy::for_label(req.mode) {
            ModeStrategy::Walk => Baseline::FreeFlow {
                secs:   self.teleported_secs(req.start, req.end, TransportMode::Walk),
                source: BaselineSource::Analytic,
            },
            ModeStrategy::Bike => Baseline::FreeFlow {
                secs:   self.teleported_secs(req.start, req.end, TransportMode::Bike),
                source: BaselineSource::Analytic,
            },
            ModeStrategy::Network(mode) => match self.network_secs(req.start, req.end, mode) {
                Some(secs) => Baseline::FreeFlow { secs, source: BaselineSource::Routed },
                None => {
                    tally.record_failure(req.mode);
                    log::debug!(
                        "no {mode} path from {} to {}; using observed {} s",
                        req.start,
                        req.end,
                        req.fallback_secs
                    );
                    Baseline::FreeFlow { secs: req.fallback_secs, source: BaselineSource::Fallback }
                }
            },
            ModeStrategy::Pt => match self.config.pt_policy {
                PtPolicy::PassThrough => Baseline::FreeFlow {
                    secs:   req.fallback_secs,
                    source: BaselineSource::PassThrough,
                },
                PtPolicy::Routed => {
                    Baseline::Transit(self.transit_estimate(req.start, req.end, req.departure_secs))
                }
            },
            ModeStrategy::Unknown => {
                tally.record_unknown(req.mode);
                Baseline::Unsupported
            }
        }
    }

    /// Beeline travel time for a teleported mode.
    pub fn teleported_secs(&self, start: Coord, end: Coord, mode: TransportMode) -> f64 {
        let (factor, speed) = match mode {
            TransportMode::Bike => (self.config.bike_beeline_factor, self.config.bike_speed_mps),
            _ => (self.config.walk_beeline_factor, self.config.walk_speed_mps),
        };
        start.euclidean_m(end) * factor / speed
    }

    /// Free-flow shortest-path time for `mode` between the nodes nearest to
    /// `start` and `end`.
    ///
    /// `None` when either point cannot be snapped, no path exists, or both
    /// points snap to the same node (no link is traversed, so there is no
    /// free-flow time to compare against).
    pub fn network_secs(&self, start: Coord, end: Coord, mode: TransportMode) -> Option<f64> {
        let from = self.network.nearest_node(start)?;
        let to   = self.network.nearest_node(end)?;
        let cost = free_flow_cost(mode);
        match self.router.shortest_path(self.network, from, to, &cost) {
            Ok(route) if !route.is_trivial() => Some(route.total_cost),
            Ok(_) | Err(_) => None,
        }
    }

    /// Ask the transit collaborator for an itinerary.
    pub fn transit_estimate(&self, start: Coord, end: Coord, departure_secs: u64) -> TransitEstimate {
        match self.transit.route(start, end, departure_secs) {
            Some(it) => TransitEstimate {
                travel_secs:    Some(it.total_secs()),
                longest_walk_m: it.longest_walk_m(),
            },
            None => TransitEstimate::default(),
        }
    }

    /// Estimate a batch of movements.  Results are in request order.
    #[cfg(not(feature = "parallel"))]
    pub fn estimate_batch(&self, requests: &[BaselineRequest<'_>]) -> (Vec<Baseline>, RoutingTally) {
        let mut tally = RoutingTally::new();
        let out = requests.iter().map(|r| self.estimate(r, &mut tally)).collect();
        (out, tally)
    }

    /// Estimate a batch of movements on Rayon's pool.  Results are in
    /// request order and identical to the sequential version.
    #[cfg(feature = "parallel")]
    pub fn estimate_batch(&self, requests: &[BaselineRequest<'_>]) -> (Vec<Baseline>, RoutingTally) {
        use rayon::prelude::*;

        requests
            .par_iter()
            .fold(
                || (Vec::new(), RoutingTally::new()),
                |(mut out, mut tally), r| {
                    out.push(self.estimate(r, &mut tally));
                    (out, tally)
                },
            )
            .reduce(
                || (Vec::new(), RoutingTally::new()),
                |(mut a, mut ta), (b, tb)| {
                    a.extend(b);
                    ta.merge(tb);
                    (a, ta)
                },
            )
    }
}
