//! Initial endpoints and map focus requests.

use serde::Serialize;

use crate::Coordinate;

/// Start and end used when a trip is first created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripDefaults {
    /// Initial route start.
    pub start: Coordinate,
    /// Initial route end.
    pub end: Coordinate,
}

impl TripDefaults {
    /// Two points in central London.
    pub const LONDON: Self = Self {
        start: Coordinate::from_trusted(51.5074, -0.1278),
        end: Coordinate::from_trusted(51.5113, -0.1502),
    };
}

impl Default for TripDefaults {
    fn default() -> Self {
        Self::LONDON
    }
}

/// The latest request to centre the map on a point.
///
/// The nonce grows with every request so repeated requests for the same
/// target remain distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FocusRequest {
    /// Point to centre on.
    pub point: Coordinate,
    /// Requested zoom level.
    pub zoom: u8,
    /// Request counter.
    pub nonce: u64,
}
