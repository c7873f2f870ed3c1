//! The trip state machine.
//!
//! [`TripState`] owns the route endpoints, the ordered via-point list, the
//! cached route, the latest recommendations, the interest weight and the
//! step selection. Every mutation goes through its methods; none of them
//! returns an error. Invalid input is logged and ignored, failed requests
//! fall back to empty results and storage writes are best effort.
//!
//! Requests are split into a synchronous `begin_*` call, which records the
//! request and returns a ticket, and a synchronous `settle_*` call, which
//! applies the outcome only if the ticket is still current. The async glue
//! lives in [`TripCoordinator`](crate::TripCoordinator).
//!
//! # Examples
//! ```
//! use waymark_core::test_support::MemoryKeyValueStore;
//! use waymark_core::{TripState, ViaPoint, ViaPointKey};
//!
//! let mut trip = TripState::new(MemoryKeyValueStore::default());
//! assert!(trip.add_via_point(ViaPoint::new(51.509, -0.14).with_id("p1")));
//! assert_eq!(trip.build_waypoints().len(), 3);
//!
//! assert!(trip.remove_via_point(&ViaPointKey::id("p1")));
//! assert_eq!(trip.build_waypoints().len(), 2);
//! ```

mod defaults;
mod tickets;


use log::{debug, warn};

pub use defaults::{FocusRequest, TripDefaults};
pub use tickets::{ProfileTicket, RecommendationTicket, RouteTicket};

use crate::persist::{INTEREST_WEIGHT_KEY, PersistentList, PersistentWeight, VIA_POINTS_KEY};
use crate::{
    Coordinate, GatewayError, InterestWeight, KeyValueStore, ProfileError, RecommendationQuery,
    RecommendationSet, RecommendedPoi, RouteResult, RouteSummary, RoutingError, SelectionState,
    UserInterestProfile, ViaPoint, ViaPointKey, ViewId,
};

const VIA_POINTS: PersistentList<ViaPoint> = PersistentList::new(VIA_POINTS_KEY);
const INTEREST_WEIGHT: PersistentWeight = PersistentWeight::new(INTEREST_WEIGHT_KEY);

/// Mutable planning state for one trip.
#[derive(Debug)]
pub struct TripState<S> {
    store: S,
    start: Coordinate,
    end: Coordinate,
    via_points: Vec<ViaPoint>,
    interest_weight: InterestWeight,
    waypoint_revision: u64,
    route: Option<RouteResult>,
    route_error: Option<String>,
    route_token: u64,
    is_routing: bool,
    recommendations: RecommendationSet,
    recommendation_token: u64,
    is_loading: bool,
    user_profile: Option<UserInterestProfile>,
    profile_token: u64,
    selection: SelectionState,
    fit_route_nonce: u64,
    focus: Option<FocusRequest>,
}

impl<S: KeyValueStore> TripState<S> {
    /// Load a trip from `store` using [`TripDefaults::LONDON`] endpoints.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_defaults(store, TripDefaults::default())
    }

    /// Load a trip from `store` with explicit initial endpoints.
    ///
    /// Persisted via points with invalid coordinates are dropped.
    #[must_use]
    pub fn with_defaults(store: S, defaults: TripDefaults) -> Self {
        let via_points = VIA_POINTS
            .load(&store)
            .into_iter()
            .filter(|point| match point.coordinate() {
                Ok(_) => true,
                Err(err) => {
                    warn!("dropping stored via point: {err}");
                    false
                }
            })
            .collect();
        let interest_weight = INTEREST_WEIGHT.load(&store);
        Self {
            store,
            start: defaults.start,
            end: defaults.end,
            via_points,
            interest_weight,
            waypoint_revision: 0,
            route: None,
            route_error: None,
            route_token: 0,
            is_routing: false,
            recommendations: RecommendationSet::default(),
            recommendation_token: 0,
            is_loading: false,
            user_profile: None,
            profile_token: 0,
            selection: SelectionState::default(),
            fit_route_nonce: 0,
            focus: None,
        }
    }

    /// Backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Route start.
    #[must_use]
    pub const fn start(&self) -> Coordinate {
        self.start
    }

    /// Route end.
    #[must_use]
    pub const fn end(&self) -> Coordinate {
        self.end
    }

    /// Via points in visiting order.
    #[must_use]
    pub const fn via_points(&self) -> &[ViaPoint] {
        self.via_points.as_slice()
    }

    /// Current interest weight.
    #[must_use]
    pub const fn interest_weight(&self) -> InterestWeight {
        self.interest_weight
    }

    /// Counter bumped on every change to the waypoint sequence.
    #[must_use]
    pub const fn waypoint_revision(&self) -> u64 {
        self.waypoint_revision
    }

    /// Route for the current waypoints, once computed.
    #[must_use]
    pub const fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    /// Display totals of the current route.
    #[must_use]
    pub fn route_summary(&self) -> Option<RouteSummary> {
        self.route.as_ref().map(RouteResult::summary)
    }

    /// Message from the last failed route request for these waypoints.
    #[must_use]
    pub fn route_error(&self) -> Option<&str> {
        self.route_error.as_deref()
    }

    /// Whether a route request for the current waypoints is in flight.
    #[must_use]
    pub const fn is_routing(&self) -> bool {
        self.is_routing
    }

    /// Latest settled recommendations.
    #[must_use]
    pub const fn recommendations(&self) -> &RecommendationSet {
        &self.recommendations
    }

    /// Whether the latest recommendation request is still in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Interest profile of the current user, when loaded.
    #[must_use]
    pub const fn user_profile(&self) -> Option<&UserInterestProfile> {
        self.user_profile.as_ref()
    }

    /// Step hover and pin state.
    #[must_use]
    pub const fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Counter bumped by [`Self::request_fit_route`].
    #[must_use]
    pub const fn fit_route_nonce(&self) -> u64 {
        self.fit_route_nonce
    }

    /// Latest focus request.
    #[must_use]
    pub const fn focus(&self) -> Option<FocusRequest> {
        self.focus
    }

    /// Replace the route start. Returns `false` for an invalid coordinate.
    pub fn set_start(&mut self, lat: f64, lng: f64) -> bool {
        match Coordinate::new(lat, lng) {
            Ok(start) => {
                self.start = start;
                self.waypoints_changed();
                true
            }
            Err(err) => {
                warn!("ignoring route start: {err}");
                false
            }
        }
    }

    /// Replace the route end. Returns `false` for an invalid coordinate.
    pub fn set_end(&mut self, lat: f64, lng: f64) -> bool {
        match Coordinate::new(lat, lng) {
            Ok(end) => {
                self.end = end;
                self.waypoints_changed();
                true
            }
            Err(err) => {
                warn!("ignoring route end: {err}");
                false
            }
        }
    }

    /// Append a via point unless an identical one is already present.
    ///
    /// Returns whether the list changed.
    pub fn add_via_point(&mut self, point: ViaPoint) -> bool {
        if let Err(err) = point.coordinate() {
            warn!("ignoring via point: {err}");
            return false;
        }
        if self
            .via_points
            .iter()
            .any(|existing| existing.is_same_point(&point))
        {
            debug!("via point already present");
            return false;
        }
        self.via_points.push(point);
        self.persist_via_points();
        self.waypoints_changed();
        true
    }

    /// Add a recommended point of interest as a via point.
    pub fn accept_recommendation(&mut self, poi: &RecommendedPoi) -> bool {
        self.add_via_point(poi.to_via_point())
    }

    /// Remove every via point selected by `key`.
    ///
    /// Returns whether the list changed.
    pub fn remove_via_point(&mut self, key: &ViaPointKey) -> bool {
        let before = self.via_points.len();
        self.via_points.retain(|point| !point.matches(key));
        if self.via_points.len() == before {
            return false;
        }
        self.persist_via_points();
        self.waypoints_changed();
        true
    }

    /// Remove all via points. Returns whether the list changed.
    pub fn clear_via_points(&mut self) -> bool {
        if self.via_points.is_empty() {
            return false;
        }
        self.via_points.clear();
        self.persist_via_points();
        self.waypoints_changed();
        true
    }

    /// The waypoint sequence `[start, via…, end]`.
    #[must_use]
    pub fn build_waypoints(&self) -> Vec<Coordinate> {
        std::iter::once(self.start)
            .chain(
                self.via_points
                    .iter()
                    .filter_map(|point| point.coordinate().ok()),
            )
            .chain(std::iter::once(self.end))
            .collect()
    }

    /// Store a new interest weight.
    ///
    /// Non-finite input is ignored and returns `false`. Values on the
    /// legacy percentage scale are rescaled.
    pub fn set_interest_weight(&mut self, raw: f64) -> bool {
        let Some(weight) = InterestWeight::new(raw) else {
            warn!("ignoring non-finite interest weight {raw}");
            return false;
        };
        self.interest_weight = weight;
        if !INTEREST_WEIGHT.save(&self.store, weight) {
            debug!("interest weight {weight} kept in memory only");
        }
        true
    }

    /// Hover step `index` on behalf of `source`.
    pub const fn set_hovered_step(&mut self, index: usize, source: ViewId) {
        self.selection.set_hovered(index, source);
    }

    /// Clear the hover if `source` set it.
    pub fn clear_hovered_step(&mut self, source: ViewId) {
        self.selection.clear_hovered(source);
    }

    /// Pin step `index` on behalf of `source`.
    pub const fn set_pinned_step(&mut self, index: usize, source: ViewId) {
        self.selection.set_pinned(index, source);
    }

    /// Clear the pin if `source` set it.
    pub fn clear_pinned_step(&mut self, source: ViewId) {
        self.selection.clear_pinned(source);
    }

    /// Toggle the pin on step `index`.
    pub fn toggle_pinned_step(&mut self, index: usize, source: ViewId) {
        self.selection.toggle_pinned(index, source);
    }

    /// Ask observers to fit the whole route into view.
    ///
    /// Returns the new nonce.
    pub const fn request_fit_route(&mut self) -> u64 {
        self.fit_route_nonce = self.fit_route_nonce.wrapping_add(1);
        self.fit_route_nonce
    }

    /// Ask observers to centre on a point.
    ///
    /// Returns `false` for an invalid coordinate.
    pub fn request_focus_point(&mut self, lat: f64, lng: f64, zoom: u8) -> bool {
        let point = match Coordinate::new(lat, lng) {
            Ok(point) => point,
            Err(err) => {
                warn!("ignoring focus request: {err}");
                return false;
            }
        };
        let nonce = self.focus.map_or(1, |focus| focus.nonce.wrapping_add(1));
        self.focus = Some(FocusRequest { point, zoom, nonce });
        true
    }

    /// Start a recommendation request and mark the state as loading.
    ///
    /// Any earlier request still in flight becomes stale.
    pub fn begin_recommendations(&mut self, user_id: Option<&str>) -> RecommendationTicket {
        self.recommendation_token = self.recommendation_token.wrapping_add(1);
        self.is_loading = true;
        RecommendationTicket {
            token: self.recommendation_token,
            query: RecommendationQuery {
                start: self.start,
                end: self.end,
                via: self
                    .via_points
                    .iter()
                    .filter_map(|point| point.coordinate().ok())
                    .collect(),
                user_id: user_id.filter(|id| !id.trim().is_empty()).map(str::to_owned),
                interest_weight: self.interest_weight,
            },
        }
    }

    /// Apply the outcome of a recommendation request.
    ///
    /// Failures store an empty set. Returns `false` when the ticket was
    /// superseded, in which case nothing changes.
    pub fn settle_recommendations(
        &mut self,
        ticket: &RecommendationTicket,
        outcome: Result<RecommendationSet, GatewayError>,
    ) -> bool {
        if ticket.token != self.recommendation_token {
            debug!(
                "discarding recommendations for request {} (latest is {})",
                ticket.token, self.recommendation_token
            );
            return false;
        }
        self.is_loading = false;
        self.recommendations = outcome.unwrap_or_else(|err| {
            warn!("recommendation request failed: {err}");
            RecommendationSet::default()
        });
        true
    }

    /// Start a route request for the current waypoints.
    pub fn begin_route(&mut self) -> RouteTicket {
        self.route_token = self.route_token.wrapping_add(1);
        self.is_routing = true;
        RouteTicket {
            revision: self.waypoint_revision,
            token: self.route_token,
            waypoints: self.build_waypoints(),
        }
    }

    /// Apply the outcome of a route request.
    ///
    /// A result for an older waypoint revision, or from a superseded
    /// request, is discarded and returns `false`. A failure clears the
    /// cached route and records the error message.
    pub fn settle_route(
        &mut self,
        ticket: &RouteTicket,
        outcome: Result<RouteResult, RoutingError>,
    ) -> bool {
        if ticket.revision != self.waypoint_revision || ticket.token != self.route_token {
            debug!(
                "discarding route for revision {} (current is {})",
                ticket.revision, self.waypoint_revision
            );
            return false;
        }
        self.is_routing = false;
        self.selection.reset();
        match outcome {
            Ok(route) => {
                self.route = Some(route);
                self.route_error = None;
            }
            Err(err) => {
                warn!("route request failed: {err}");
                self.route = None;
                self.route_error = Some(err.to_string());
            }
        }
        true
    }

    /// Start loading the interest profile of `user_id`.
    ///
    /// Without a user the profile is cleared and no request is needed.
    pub fn begin_profile(&mut self, user_id: Option<&str>) -> Option<ProfileTicket> {
        self.profile_token = self.profile_token.wrapping_add(1);
        let Some(id) = user_id.filter(|id| !id.trim().is_empty()) else {
            self.user_profile = None;
            return None;
        };
        Some(ProfileTicket {
            token: self.profile_token,
            user_id: id.to_owned(),
        })
    }

    /// Apply the outcome of a profile request.
    ///
    /// Failures clear the profile. Returns `false` for a superseded ticket.
    pub fn settle_profile(
        &mut self,
        ticket: &ProfileTicket,
        outcome: Result<Option<UserInterestProfile>, ProfileError>,
    ) -> bool {
        if ticket.token != self.profile_token {
            debug!("discarding profile for user {}", ticket.user_id);
            return false;
        }
        self.user_profile = outcome.unwrap_or_else(|err| {
            warn!("profile request for user {} failed: {err}", ticket.user_id);
            None
        });
        true
    }

    fn persist_via_points(&self) {
        if !VIA_POINTS.save(&self.store, &self.via_points) {
            debug!("{} via points kept in memory only", self.via_points.len());
        }
    }

    fn waypoints_changed(&mut self) {
        self.waypoint_revision = self.waypoint_revision.wrapping_add(1);
        self.route = None;
        self.route_error = None;
        self.is_routing = false;
        self.selection.reset();
    }
}
