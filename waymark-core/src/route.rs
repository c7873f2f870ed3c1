//! Routes returned by a [`RoutingAdapter`](crate::RoutingAdapter).

use std::fmt;
use std::ops::Range;

use geo::LineString;

use crate::numeric::round_to;

/// A single turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    /// Human-readable instruction, e.g. `Turn left onto Oxford Street`.
    pub instruction: String,
    /// Step length in metres.
    pub distance_m: f64,
    /// Step duration in seconds.
    pub duration_s: f64,
    /// Optional step geometry.
    pub geometry: Option<LineString<f64>>,
}

/// The portion of a route between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    /// Indices into [`RouteResult::steps`] covered by this leg.
    pub steps: Range<usize>,
    /// Leg length in metres.
    pub distance_m: f64,
    /// Leg duration in seconds.
    pub duration_s: f64,
}

/// A computed route through an ordered waypoint sequence.
///
/// Legs partition the step list into contiguous ranges, one per consecutive
/// waypoint pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Full path geometry.
    pub geometry: LineString<f64>,
    /// Ordered steps across all legs.
    pub steps: Vec<RouteStep>,
    /// One leg per consecutive waypoint pair.
    pub legs: Vec<RouteLeg>,
    /// Total length in metres.
    pub total_distance_m: f64,
    /// Total duration in seconds.
    pub total_duration_s: f64,
}

impl RouteResult {
    /// Display values for the totals.
    #[must_use]
    pub fn summary(&self) -> RouteSummary {
        RouteSummary::new(self.total_distance_m, self.total_duration_s)
    }

    /// Index of the leg containing step `index`.
    ///
    /// # Examples
    /// ```
    /// use geo::LineString;
    /// use waymark_core::{RouteLeg, RouteResult};
    ///
    /// let route = RouteResult {
    ///     geometry: LineString::new(vec![]),
    ///     steps: Vec::new(),
    ///     legs: vec![
    ///         RouteLeg { steps: 0..3, distance_m: 10.0, duration_s: 5.0 },
    ///         RouteLeg { steps: 3..5, distance_m: 10.0, duration_s: 5.0 },
    ///     ],
    ///     total_distance_m: 20.0,
    ///     total_duration_s: 10.0,
    /// };
    /// assert_eq!(route.leg_for_step(3), Some(1));
    /// assert_eq!(route.leg_for_step(5), None);
    /// ```
    #[must_use]
    pub fn leg_for_step(&self, index: usize) -> Option<usize> {
        self.legs.iter().position(|leg| leg.steps.contains(&index))
    }
}

/// Rounded totals shown alongside a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    /// Distance in kilometres, two decimals.
    pub distance_km: f64,
    /// Duration in minutes, one decimal.
    pub duration_min: f64,
}

impl RouteSummary {
    /// Convert metres and seconds into display units.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "unit conversion divides by fixed factors"
    )]
    pub fn new(distance_m: f64, duration_s: f64) -> Self {
        Self {
            distance_km: round_to(distance_m / 1000.0, 2),
            duration_min: round_to(duration_s / 60.0, 1),
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km, {:.1} min", self.distance_km, self.duration_min)
    }
}
