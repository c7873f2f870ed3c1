//! Core trip-planning model for Waymark.
//!
//! The crate holds the domain types (coordinates, via points, routes and
//! recommendations), the [`TripState`] state machine, the crop-region URL
//! codec and the ports through which the state talks to the outside world:
//! [`KeyValueStore`] for durable settings, [`RoutingAdapter`] for the routing
//! engine, [`RecommendationGateway`] for point-of-interest suggestions and
//! [`ProfileSource`] for the user's interest profile. Network and filesystem
//! adapters live in `waymark-data`.
//!
//! Libraries log through the `log` facade; binaries choose the logger.

#![forbid(unsafe_code)]

pub mod coordinate;
pub mod coordinator;
pub mod crop;
pub mod gateway;
pub mod interest;
mod numeric;
pub mod persist;
pub mod profile;
pub mod recommendation;
pub mod route;
pub mod routing;
pub mod selection;
pub mod storage;
#[doc(hidden)]
pub mod test_support;
pub mod transport;
pub mod trip;
pub mod via_point;

pub use coordinate::{Coordinate, CoordinateError};
pub use coordinator::TripCoordinator;
pub use crop::{CROP_KEY, CropCodec, CropRect, CroppedUrl, MIN_CROP_EXTENT};
pub use gateway::{GatewayError, RecommendationGateway, RecommendationQuery};
pub use interest::InterestWeight;
pub use persist::{INTEREST_WEIGHT_KEY, PersistentList, PersistentWeight, VIA_POINTS_KEY};
pub use profile::{ProfileError, ProfileSource, UserInterestProfile};
pub use recommendation::{RecommendationProfile, RecommendationSet, RecommendedPoi};
pub use route::{RouteLeg, RouteResult, RouteStep, RouteSummary};
pub use routing::{RoutingAdapter, RoutingError};
pub use selection::{SelectionState, StepSelection, ViewId};
pub use storage::{KeyValueStore, StorageError};
pub use transport::TransportError;
pub use trip::{
    FocusRequest, ProfileTicket, RecommendationTicket, RouteTicket, TripDefaults, TripState,
};
pub use via_point::{ViaPoint, ViaPointKey};
