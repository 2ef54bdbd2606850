//! Run configuration.
//!
//! Every field defaults to the constant the indicator programs have always
//! used, so an empty JSON object (`{}`) is a valid configuration.  With the
//! `serde` feature enabled each section accepts partial input: missing keys
//! fall back to their defaults.
//!
//! ```json
//! {
//!   "baseline": { "pt_policy": "routed" },
//!   "limits":   { "trip_duration": { "car": 2400 } },
//!   "clamped_legs": "exclude"
//! }
//! ```

use crate::{CoreError, CoreResult, Limit, TransportMode};

// ── Policies ──────────────────────────────────────────────────────────────────

/// How public-transport baselines are produced.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PtPolicy {
    /// The observed travel time is its own baseline (zero loss).
    #[default]
    PassThrough,
    /// Ask the transit-routing collaborator for an itinerary.
    Routed,
}

/// Whether legs whose loss was clamped to zero still count toward per-mode
/// aggregates (cumulative loss and leg counts).
///
/// A clamped leg is one where the simulated time beat the free-flow
/// baseline.  Per-agent totals always include such legs with zero loss.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClampedLegPolicy {
    #[default]
    Include,
    Exclude,
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// Parameters of the free-flow baseline estimator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaselineConfig {
    /// Detour factor applied to the straight-line distance for walking.
    pub walk_beeline_factor: f64,
    pub bike_beeline_factor: f64,
    /// Average walking speed in m/s.
    pub walk_speed_mps:      f64,
    /// Average cycling speed in m/s.
    pub bike_speed_mps:      f64,
    pub pt_policy:           PtPolicy,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            walk_beeline_factor: 1.3,
            bike_beeline_factor: 1.3,
            walk_speed_mps:      1.23,
            bike_speed_mps:      3.138_888_9,
            pt_policy:           PtPolicy::PassThrough,
        }
    }
}

/// Longest-trip limits in seconds, per mode.  `None` = no limit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TripDurationLimits {
    pub walk:    Option<f64>,
    pub bike:    Option<f64>,
    pub car:     Option<f64>,
    pub ride:    Option<f64>,
    pub freight: Option<f64>,
    pub truck:   Option<f64>,
    pub pt:      Option<f64>,
}

impl Default for TripDurationLimits {
    fn default() -> Self {
        Self {
            walk:    None,
            bike:    None,
            car:     Some(30.0 * 60.0),
            ride:    Some(60.0 * 60.0),
            freight: None,
            truck:   None,
            pt:      Some(60.0 * 60.0),
        }
    }
}

impl TripDurationLimits {
    pub fn for_mode(&self, mode: TransportMode) -> Limit {
        let v = match mode {
            TransportMode::Walk    => self.walk,
            TransportMode::Bike    => self.bike,
            TransportMode::Car     => self.car,
            TransportMode::Ride    => self.ride,
            TransportMode::Freight => self.freight,
            TransportMode::Truck   => self.truck,
            TransportMode::Pt      => self.pt,
        };
        Limit::from_option(v)
    }

    /// Limit for a raw export label; unrecognised labels are unbounded.
    pub fn for_label(&self, label: &str) -> Limit {
        TransportMode::from_label(label).map_or(Limit::Unbounded, |m| self.for_mode(m))
    }
}

/// Indicator limits.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LimitsConfig {
    pub trip_duration:         TripDurationLimits,
    /// Relative loss limit of the traffic-quality composite.
    pub relative_loss_traffic: f64,
    /// Relative loss limit of the standalone loss-time indicator.
    pub relative_loss_time:    f64,
    /// Longest tolerated walk to or from public transport, metres.
    pub walk_access_m:         f64,
    /// Tolerated ratio of pt travel time to car free-flow time.
    pub pt_car_ratio:          f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            trip_duration:         TripDurationLimits::default(),
            relative_loss_traffic: 0.2,
            relative_loss_time:    0.15,
            walk_access_m:         500.0,
            pt_car_ratio:          2.0,
        }
    }
}

// ── LiveabilityConfig ─────────────────────────────────────────────────────────

/// Top-level configuration of one indicator run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LiveabilityConfig {
    pub baseline:                BaselineConfig,
    pub limits:                  LimitsConfig,
    /// Fraction of the population the simulation ran with.  Per-mode
    /// cumulative loss is divided by it to scale back to full population.
    pub sample_size:             f64,
    pub clamped_legs:            ClampedLegPolicy,
    /// Trips at most this long (straight line, metres) are skipped by the
    /// pt/car comparison and count as within limit.
    pub pt_min_euclidean_m:      f64,
    /// Width of departure-time histogram buckets.
    pub departure_interval_mins: u32,
    /// Field delimiter of the simulation's CSV exports.
    pub csv_delimiter:           char,
    /// Coordinate reference system written into per-agent map files.
    pub map_crs:                 String,
}

impl Default for LiveabilityConfig {
    fn default() -> Self {
        Self {
            baseline:                BaselineConfig::default(),
            limits:                  LimitsConfig::default(),
            sample_size:             0.1,
            clamped_legs:            ClampedLegPolicy::Include,
            pt_min_euclidean_m:      300.0,
            departure_interval_mins: 15,
            csv_delimiter:           ';',
            map_crs:                 "EPSG:25832".to_owned(),
        }
    }
}

impl LiveabilityConfig {
    /// Reject values that would make a computation meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        fn positive(name: &str, v: f64) -> CoreResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("`{name}` must be positive, got {v}")))
            }
        }

        let b = &self.baseline;
        positive("baseline.walk_beeline_factor", b.walk_beeline_factor)?;
        positive("baseline.bike_beeline_factor", b.bike_beeline_factor)?;
        positive("baseline.walk_speed_mps", b.walk_speed_mps)?;
        positive("baseline.bike_speed_mps", b.bike_speed_mps)?;

        let l = &self.limits;
        positive("limits.relative_loss_traffic", l.relative_loss_traffic)?;
        positive("limits.relative_loss_time", l.relative_loss_time)?;
        positive("limits.walk_access_m", l.walk_access_m)?;
        positive("limits.pt_car_ratio", l.pt_car_ratio)?;

        positive("sample_size", self.sample_size)?;
        if self.pt_min_euclidean_m < 0.0 || !self.pt_min_euclidean_m.is_finite() {
            return Err(CoreError::Config("`pt_min_euclidean_m` must be non-negative".into()));
        }
        if self.departure_interval_mins == 0 || 24 * 60 % self.departure_interval_mins != 0 {
            return Err(CoreError::Config(format!(
                "`departure_interval_mins` must divide a day, got {}",
                self.departure_interval_mins
            )));
        }
        self.delimiter_byte()?;
        Ok(())
    }

    /// The CSV delimiter as the single byte the `csv` crate expects.
    pub fn delimiter_byte(&self) -> CoreResult<u8> {
        u8::try_from(self.csv_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                CoreError::Config(format!("csv delimiter `{}` is not ASCII", self.csv_delimiter))
            })
    }
}
