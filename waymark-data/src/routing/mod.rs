//! HTTP routing adapter for OSRM route services.
//!
//! This module provides [`OsrmRoutingAdapter`], an implementation of
//! [`waymark_core::RoutingAdapter`] that asks an OSRM Route API for the path
//! through an ordered waypoint sequence.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use waymark_core::{Coordinate, RoutingAdapter};
//! use waymark_data::HttpConfig;
//! use waymark_data::routing::OsrmRoutingAdapter;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let adapter = OsrmRoutingAdapter::new(config)?.with_profile("foot");
//!
//! let waypoints = [
//!     Coordinate::new(51.5074, -0.1278)?,
//!     Coordinate::new(51.5113, -0.1502)?,
//! ];
//! let route = adapter.route(&waypoints).await?;
//! println!("{}", route.summary());
//! # Ok(())
//! # }
//! ```

mod adapter;
mod instructions;
mod osrm;

pub use adapter::{DEFAULT_OSRM_BASE, DEFAULT_OSRM_PROFILE, OsrmRoutingAdapter};
