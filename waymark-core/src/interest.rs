//! The user's interest weight.

use serde::{Deserialize, Serialize};

use crate::numeric::clamp_unit;

/// How strongly recommendations lean towards the user's interests.
///
/// Always inside `0.0..=1.0`. Inputs on the legacy `0..=100` scale are
/// recognised by any finite value above one.
///
/// # Examples
/// ```
/// use waymark_core::InterestWeight;
///
/// assert_eq!(InterestWeight::new(150.0).map(InterestWeight::get), Some(1.0));
/// assert_eq!(InterestWeight::new(35.0).map(InterestWeight::get), Some(0.35));
/// assert_eq!(InterestWeight::new(-5.0).map(InterestWeight::get), Some(0.0));
/// assert!(InterestWeight::new(f64::NAN).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestWeight(f64);

impl InterestWeight {
    /// Weight used when nothing has been stored.
    pub const DEFAULT: Self = Self(0.5);

    /// Normalise a raw weight. Returns `None` for non-finite input.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "legacy percentages are rescaled to the unit interval"
    )]
    pub const fn new(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        let scaled = if raw > 1.0 { raw / 100.0 } else { raw };
        Some(Self(clamp_unit(scaled)))
    }

    /// Parse a stored or user-supplied weight.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<f64>().ok().and_then(Self::new)
    }

    /// The weight as a plain float.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for InterestWeight {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for InterestWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
