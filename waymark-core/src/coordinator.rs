//! Async composition of [`TripState`] with its remote ports.

use std::cell::{Ref, RefCell, RefMut};

use crate::{KeyValueStore, ProfileSource, RecommendationGateway, RoutingAdapter, TripState};

/// Drives the request flows of a [`TripState`].
///
/// The state sits in a [`RefCell`]; no borrow is held across an `.await`, so
/// several flows may be polled concurrently on one task (for example with
/// `tokio::join!`). Outcomes settle in issue order: a response to a
/// superseded request is discarded.
#[derive(Debug)]
pub struct TripCoordinator<S, G, R, P> {
    state: RefCell<TripState<S>>,
    gateway: G,
    router: R,
    profiles: P,
}

impl<S, G, R, P> TripCoordinator<S, G, R, P>
where
    S: KeyValueStore,
    G: RecommendationGateway,
    R: RoutingAdapter,
    P: ProfileSource,
{
    /// Compose a coordinator from its parts.
    #[must_use]
    pub const fn new(state: TripState<S>, gateway: G, router: R, profiles: P) -> Self {
        Self {
            state: RefCell::new(state),
            gateway,
            router,
            profiles,
        }
    }

    /// Borrow the state for reading.
    ///
    /// # Panics
    /// Panics if the state is currently borrowed mutably.
    #[must_use]
    pub fn state(&self) -> Ref<'_, TripState<S>> {
        self.state.borrow()
    }

    /// Borrow the state for synchronous mutation.
    ///
    /// # Panics
    /// Panics if the state is currently borrowed.
    #[must_use]
    pub fn state_mut(&self) -> RefMut<'_, TripState<S>> {
        self.state.borrow_mut()
    }

    /// The recommendation gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The routing adapter.
    #[must_use]
    pub const fn router(&self) -> &R {
        &self.router
    }

    /// The profile source.
    #[must_use]
    pub const fn profiles(&self) -> &P {
        &self.profiles
    }

    /// Fetch recommendations for the current trip.
    ///
    /// Failures leave an empty set behind; nothing is returned to the
    /// caller.
    pub async fn fetch_recommended_pois(&self, user_id: Option<&str>) {
        let ticket = self.state.borrow_mut().begin_recommendations(user_id);
        let outcome = self.gateway.recommend(ticket.query()).await;
        self.state
            .borrow_mut()
            .settle_recommendations(&ticket, outcome);
    }

    /// Route the current waypoint sequence.
    pub async fn refresh_route(&self) {
        let ticket = self.state.borrow_mut().begin_route();
        let outcome = self.router.route(ticket.waypoints()).await;
        self.state.borrow_mut().settle_route(&ticket, outcome);
    }

    /// Load the interest profile of `user_id`, or clear it when absent.
    pub async fn load_user_profile(&self, user_id: Option<&str>) {
        let Some(ticket) = self.state.borrow_mut().begin_profile(user_id) else {
            return;
        };
        let outcome = self.profiles.fetch_profile(ticket.user_id()).await;
        self.state.borrow_mut().settle_profile(&ticket, outcome);
    }

    /// Take the state back out of the coordinator.
    #[must_use]
    pub fn into_state(self) -> TripState<S> {
        self.state.into_inner()
    }
}
