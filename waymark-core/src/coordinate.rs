//! Validated WGS84 coordinates.
//!
//! Coordinates are stored as latitude/longitude pairs. Conversions into
//! [`geo::Coord`] follow the workspace convention of `x = longitude` and
//! `y = latitude`.

use geo::Coord;
use serde::Serialize;
use thiserror::Error;

use crate::numeric::round_to;

/// Decimal places used when formatting coordinates for service requests.
const PARAM_DECIMALS: i32 = 6;

/// A finite latitude/longitude pair inside the WGS84 ranges.
///
/// # Examples
/// ```
/// use waymark_core::Coordinate;
///
/// let london = Coordinate::new(51.5074, -0.1278)?;
/// assert_eq!(london.lat(), 51.5074);
/// assert_eq!(london.lng_lat_param(), "-0.1278,51.5074");
/// # Ok::<(), waymark_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude or longitude was NaN or infinite.
    #[error("coordinate components must be finite, got ({lat}, {lng})")]
    NonFinite {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lng: f64,
    },
    /// Latitude fell outside `-90.0..=90.0`.
    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),
    /// Longitude fell outside `-180.0..=180.0`.
    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),
}

impl Coordinate {
    /// Validate and construct a coordinate.
    ///
    /// # Errors
    /// Returns [`CoordinateError`] for non-finite or out-of-range components.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NonFinite { lat, lng });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Construct a coordinate known to be valid at compile time.
    pub(crate) const fn from_trusted(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }

    /// Format as the `lng,lat` pair expected by the backend services,
    /// rounded to six decimal places.
    #[must_use]
    pub fn lng_lat_param(self) -> String {
        format!(
            "{},{}",
            round_to(self.lng, PARAM_DECIMALS),
            round_to(self.lat, PARAM_DECIMALS)
        )
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.lng,
            y: value.lat,
        }
    }
}

impl TryFrom<Coord<f64>> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(value.y, value.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(51.5074, -0.1278)]
    fn accepts_in_range_values(#[case] lat: f64, #[case] lng: f64) {
        let coordinate = Coordinate::new(lat, lng).expect("valid coordinate");
        assert_eq!((coordinate.lat(), coordinate.lng()), (lat, lng));
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn rejects_non_finite_values(#[case] lat: f64, #[case] lng: f64) {
        let err = Coordinate::new(lat, lng).expect_err("non-finite input");
        assert!(matches!(err, CoordinateError::NonFinite { .. }));
    }

    #[rstest]
    fn rejects_out_of_range_latitude() {
        let err = Coordinate::new(90.5, 0.0).expect_err("latitude too large");
        assert_eq!(err, CoordinateError::LatitudeOutOfRange(90.5));
    }

    #[rstest]
    fn rejects_out_of_range_longitude() {
        let err = Coordinate::new(0.0, -180.1).expect_err("longitude too small");
        assert_eq!(err, CoordinateError::LongitudeOutOfRange(-180.1));
    }

    #[rstest]
    fn formats_rounded_lng_lat_pair() {
        let coordinate = Coordinate::new(51.507_412_345, -0.127_849_999).expect("valid");
        assert_eq!(coordinate.lng_lat_param(), "-0.12785,51.507412");
    }

    #[rstest]
    fn converts_to_geo_coord_with_lng_as_x() {
        let coord: Coord<f64> = Coordinate::new(10.0, 20.0).expect("valid").into();
        assert_eq!(coord, Coord { x: 20.0, y: 10.0 });
    }
}
