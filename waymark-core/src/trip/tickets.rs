//! Handles issued when an asynchronous request starts.
//!
//! A ticket remembers the token or revision that was current at issue time.
//! Settling a ticket whose token has since been superseded is a no-op.

use crate::{Coordinate, RecommendationQuery};

/// Issued by [`TripState::begin_recommendations`](super::TripState::begin_recommendations).
#[derive(Debug)]
pub struct RecommendationTicket {
    pub(super) token: u64,
    pub(super) query: RecommendationQuery,
}

impl RecommendationTicket {
    /// Issue-order token.
    #[must_use]
    pub const fn token(&self) -> u64 {
        self.token
    }

    /// Query to send to the gateway.
    #[must_use]
    pub const fn query(&self) -> &RecommendationQuery {
        &self.query
    }
}

/// Issued by [`TripState::begin_route`](super::TripState::begin_route).
#[derive(Debug)]
pub struct RouteTicket {
    pub(super) revision: u64,
    pub(super) token: u64,
    pub(super) waypoints: Vec<Coordinate>,
}

impl RouteTicket {
    /// Waypoint revision the request was built from.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Waypoint sequence to route.
    #[must_use]
    pub const fn waypoints(&self) -> &[Coordinate] {
        self.waypoints.as_slice()
    }
}

/// Issued by [`TripState::begin_profile`](super::TripState::begin_profile).
#[derive(Debug)]
pub struct ProfileTicket {
    pub(super) token: u64,
    pub(super) user_id: String,
}

impl ProfileTicket {
    /// Issue-order token.
    #[must_use]
    pub const fn token(&self) -> u64 {
        self.token
    }

    /// User whose profile is requested.
    #[must_use]
    pub const fn user_id(&self) -> &str {
        self.user_id.as_str()
    }
}
