//! Policy limits and the deviation-from-limit measure.

use crate::{CoreError, CoreResult};

/// Deviation value assigned when no limit applies.
///
/// It equals the deviation of a zero measurement against any limit, so an
/// unbounded indicator always counts as within limit and loses every
/// max-deviation comparison against a bounded one.
pub const UNBOUNDED_DEVIATION: f64 = -1.0;

/// Normalised signed distance of `measured` from `limit`.
///
/// Zero at the limit, negative inside it, positive beyond it.  `limit` must
/// be positive; [`Limit::bounded`] enforces that for configured limits.
#[inline]
pub fn deviation(measured: f64, limit: f64) -> f64 {
    (measured - limit) / limit
}

/// A policy threshold for one indicator (and possibly one mode).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Limit {
    Bounded(f64),
    /// No limit is defined, e.g. trip duration for walking.
    Unbounded,
}

impl Limit {
    /// A positive, finite limit.
    pub fn bounded(value: f64) -> CoreResult<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Limit::Bounded(value))
        } else {
            Err(CoreError::Config(format!("limit must be positive and finite, got {value}")))
        }
    }

    /// `None` means unbounded.  Non-positive values are treated as unbounded.
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => Limit::Bounded(v),
            _ => Limit::Unbounded,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Limit::Bounded(v) => Some(v),
            Limit::Unbounded  => None,
        }
    }

    /// Deviation of `measured` from this limit.
    pub fn deviation(self, measured: f64) -> f64 {
        match self {
            Limit::Bounded(l) => deviation(measured, l),
            Limit::Unbounded  => UNBOUNDED_DEVIATION,
        }
    }
}
