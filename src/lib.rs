//! Facade crate for Waymark trip planning.
//!
//! This crate re-exports the core domain types and exposes the HTTP and file
//! adapters behind the `http` feature flag.

#![forbid(unsafe_code)]

pub use waymark_core::{
    CROP_KEY, Coordinate, CoordinateError, CropCodec, CropRect, CroppedUrl, FocusRequest,
    GatewayError, INTEREST_WEIGHT_KEY, InterestWeight, KeyValueStore, MIN_CROP_EXTENT,
    PersistentList, PersistentWeight, ProfileError, ProfileSource, ProfileTicket,
    RecommendationGateway, RecommendationProfile, RecommendationQuery, RecommendationSet,
    RecommendationTicket, RecommendedPoi, RouteLeg, RouteResult, RouteStep, RouteSummary,
    RouteTicket, RoutingAdapter, RoutingError, SelectionState, StepSelection, StorageError,
    TransportError, TripCoordinator, TripDefaults, TripState, UserInterestProfile,
    VIA_POINTS_KEY, ViaPoint, ViaPointKey, ViewId,
};

#[cfg(feature = "http")]
pub use waymark_data::{
    FileKeyValueStore, GeocodeError, HttpConfig, HttpGeocoder, HttpProfileSource,
    HttpRecommendationGateway, OsrmRoutingAdapter,
};
