//! OSRM API response types for the Route service.
//!
//! Only the fields the adapter reads are modelled; everything else in the
//! response is ignored.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// A single route candidate.
#[derive(Debug, Deserialize)]
pub struct Route {
    /// Length in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Full path, present with `overview=full&geometries=geojson`.
    pub geometry: Option<LineGeometry>,
    /// One leg per consecutive waypoint pair.
    #[serde(default)]
    pub legs: Vec<Leg>,
}

/// A GeoJSON `LineString` of `[lon, lat]` positions.
#[derive(Debug, Deserialize)]
pub struct LineGeometry {
    /// Positions in path order.
    pub coordinates: Vec<[f64; 2]>,
}

/// Part of a route between two waypoints.
#[derive(Debug, Deserialize)]
pub struct Leg {
    /// Length in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Turn-by-turn steps, present with `steps=true`.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A turn-by-turn step.
#[derive(Debug, Deserialize)]
pub struct Step {
    /// Length in metres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Name of the way travelled along, possibly empty.
    #[serde(default)]
    pub name: String,
    /// Step path.
    pub geometry: Option<LineGeometry>,
    /// The manoeuvre at the start of the step.
    pub maneuver: Maneuver,
}

/// Manoeuvre description used to phrase instructions.
#[derive(Debug, Deserialize)]
pub struct Maneuver {
    /// Manoeuvre type, e.g. `depart`, `turn`, `roundabout`, `arrive`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Direction modifier, e.g. `left` or `slight right`.
    pub modifier: Option<String>,
    /// Exit number for roundabouts and rotaries.
    pub exit: Option<u32>,
}
