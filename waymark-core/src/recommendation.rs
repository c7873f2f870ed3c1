//! Ranked point-of-interest recommendations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::via_point::deserialize_optional_id;
use crate::{Coordinate, CoordinateError, ViaPoint};

/// A candidate stop suggested by the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedPoi {
    /// Catalogue identifier, when supplied.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_id"
    )]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    #[serde(alias = "lon")]
    pub lng: f64,
    /// Ranking score, higher is better.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Remaining service-provided fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecommendedPoi {
    /// Validate the position.
    ///
    /// # Errors
    /// Returns [`CoordinateError`] when the position is not a valid
    /// coordinate.
    pub fn coordinate(&self) -> Result<Coordinate, CoordinateError> {
        Coordinate::new(self.lat, self.lng)
    }

    /// Convert into a via point, carrying identity and display metadata.
    #[must_use]
    pub fn to_via_point(&self) -> ViaPoint {
        let mut point = ViaPoint::new(self.lat, self.lng);
        point.id.clone_from(&self.id);
        point.name.clone_from(&self.name);
        point.category.clone_from(&self.category);
        point.extra.clone_from(&self.extra);
        if let Some(score) = self.score {
            point.extra.insert("score".to_owned(), Value::from(score));
        }
        point
    }
}

/// Free-form explanation of how the service scored the candidates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationProfile(pub Map<String, Value>);

/// The outcome of one recommendation fetch.
///
/// A set is replaced wholesale by the next settled fetch. An empty list is
/// a valid result.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RecommendationSet {
    /// Candidates in service ranking order.
    pub pois: Vec<RecommendedPoi>,
    /// Scoring explanation, when the service supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<RecommendationProfile>,
}

impl RecommendationSet {
    /// Number of candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pois.len()
    }

    /// Whether the set holds no candidates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}
