//! User-chosen intermediate stops and their identity rule.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Coordinate, CoordinateError};

/// An intermediate stop visited between the route start and end.
///
/// Via points are ordered; the list position decides the visiting order.
/// Besides the position they carry an optional stable identifier and
/// free-form display metadata, which is persisted verbatim.
///
/// # Examples
/// ```
/// use waymark_core::ViaPoint;
///
/// let museum = ViaPoint::new(51.5194, -0.1270)
///     .with_id("p1")
///     .with_name("British Museum");
/// assert_eq!(museum.id.as_deref(), Some("p1"));
/// assert!(museum.is_same_point(&ViaPoint::new(0.0, 0.0).with_id("p1")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViaPoint {
    /// Stable identifier, when the point came from a catalogue.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_id"
    )]
    pub id: Option<String>,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    #[serde(alias = "lon")]
    pub lng: f64,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display category, e.g. `museum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Any further metadata supplied by the caller.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViaPoint {
    /// Construct an anonymous via point at the given position.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            id: None,
            lat,
            lng,
            name: None,
            category: None,
            extra: Map::new(),
        }
    }

    /// Attach a stable identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a display category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Validate the position.
    ///
    /// # Errors
    /// Returns [`CoordinateError`] when the stored position is not a valid
    /// coordinate.
    pub fn coordinate(&self) -> Result<Coordinate, CoordinateError> {
        Coordinate::new(self.lat, self.lng)
    }

    /// Whether `key` selects this via point.
    ///
    /// Matching non-empty identifiers select the point. A key carrying a
    /// position also selects it when the positions match exactly, whatever
    /// the identifiers say.
    #[must_use]
    #[expect(
        clippy::float_cmp,
        reason = "identity compares stored positions bit-for-bit"
    )]
    pub fn matches(&self, key: &ViaPointKey) -> bool {
        let same_id = matches!(
            (stable_id(self.id.as_deref()), stable_id(key.id.as_deref())),
            (Some(own), Some(wanted)) if own == wanted
        );
        same_id
            || key
                .position
                .is_some_and(|(lat, lng)| self.lat == lat && self.lng == lng)
    }

    /// Whether `other` denotes the same stop under the identity rule.
    #[must_use]
    pub fn is_same_point(&self, other: &Self) -> bool {
        self.matches(&ViaPointKey::from(other))
    }
}

fn stable_id(id: Option<&str>) -> Option<&str> {
    id.filter(|value| !value.is_empty())
}

/// Selects via points for removal without requiring a full record.
///
/// # Examples
/// ```
/// use waymark_core::{ViaPoint, ViaPointKey};
///
/// let point = ViaPoint::new(51.509, -0.14).with_id("p1");
/// assert!(point.matches(&ViaPointKey::id("p1")));
/// assert!(point.matches(&ViaPointKey::position(51.509, -0.14).with_id("p2")));
/// assert!(!point.matches(&ViaPointKey::position(51.5, -0.14).with_id("p2")));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViaPointKey {
    id: Option<String>,
    position: Option<(f64, f64)>,
}

impl ViaPointKey {
    /// Select by identifier.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            position: None,
        }
    }

    /// Select by exact position.
    #[must_use]
    pub const fn position(lat: f64, lng: f64) -> Self {
        Self {
            id: None,
            position: Some((lat, lng)),
        }
    }

    /// Add an identifier to a positional key.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<&ViaPoint> for ViaPointKey {
    fn from(value: &ViaPoint) -> Self {
        Self {
            id: value.id.clone(),
            position: Some((value.lat, value.lng)),
        }
    }
}

/// Accept identifiers encoded as JSON strings or numbers.
pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}
