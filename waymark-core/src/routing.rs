//! The routing backend port.
//!
//! A [`RoutingAdapter`] turns an ordered waypoint sequence into a
//! [`RouteResult`]. The engine behind it is a black box; the trip state only
//! decides whether a settled result is still current.

use async_trait::async_trait;
use thiserror::Error;

use crate::{Coordinate, RouteResult, TransportError};

/// Errors from [`RoutingAdapter::route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Fewer than two waypoints were supplied.
    #[error("routing needs at least two waypoints, got {count}")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        count: usize,
    },
    /// The request could not be exchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The engine reported an error code.
    #[error("routing service returned {code}: {message}")]
    Service {
        /// Engine status code.
        code: String,
        /// Engine message.
        message: String,
    },
    /// The engine found no route between the waypoints.
    #[error("no route found between the waypoints")]
    NoRoute,
    /// The engine response was structurally invalid.
    #[error("invalid routing response: {message}")]
    Parse {
        /// Description of the problem.
        message: String,
    },
}

/// Compute a route through ordered waypoints.
///
/// # Examples
/// ```
/// use waymark_core::test_support::StubRoutingAdapter;
/// use waymark_core::{Coordinate, RoutingAdapter};
///
/// # tokio::runtime::Builder::new_current_thread().build()?.block_on(async {
/// let adapter = StubRoutingAdapter::straight_lines();
/// let waypoints = [
///     Coordinate::new(51.5074, -0.1278)?,
///     Coordinate::new(51.5113, -0.1502)?,
/// ];
/// let route = adapter.route(&waypoints).await?;
/// assert_eq!(route.legs.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[async_trait(?Send)]
pub trait RoutingAdapter {
    /// Route through `waypoints` in order.
    ///
    /// # Errors
    /// Returns [`RoutingError`] when the route cannot be computed.
    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RoutingError>;
}
