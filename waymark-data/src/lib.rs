//! Network and filesystem adapters for Waymark.
//!
//! Responsibilities:
//! - Implement the `waymark-core` ports over HTTP: recommendations, the
//!   user interest profile and OSRM routing.
//! - Resolve addresses through a Nominatim geocoder.
//! - Persist settings in a JSON file through `waymark-fs`.
//!
//! Boundaries:
//! - Do not encode trip rules (they live in `waymark-core`).
//! - Unexpected response shapes degrade to empty results where the port
//!   allows; transport failures are classified into
//!   [`waymark_core::TransportError`].

#![forbid(unsafe_code)]

mod client;
mod endpoints;
pub mod geocode;
mod profile;
mod recommend;
pub mod routing;
mod store;

pub use client::{DEFAULT_USER_AGENT, HttpConfig, ProviderBuildError};
pub use endpoints::{ApiEndpoints, DEFAULT_API_BASE};
pub use geocode::{DEFAULT_GEOCODER_BASE, GeocodeError, HttpGeocoder};
pub use profile::HttpProfileSource;
pub use recommend::HttpRecommendationGateway;
pub use routing::{DEFAULT_OSRM_BASE, DEFAULT_OSRM_PROFILE, OsrmRoutingAdapter};
pub use store::FileKeyValueStore;
