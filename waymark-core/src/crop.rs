//! Crop rectangles carried in a URL fragment.
//!
//! The fragment is treated as `application/x-www-form-urlencoded` pairs.
//! The crop lives under one key as `x,y,w,h`, each a fraction of the image
//! size rounded to six decimals. Unrelated fragment pairs are preserved in
//! order; the crop pair is always written last.
//!
//! # Examples
//! ```
//! use waymark_core::{CropCodec, CropRect};
//!
//! let codec = CropCodec::default();
//! let url = codec.encode(
//!     "https://img.example/a.jpg#lang=en",
//!     Some(&CropRect::new(0.1, 0.2, 0.5, 0.25)),
//! );
//! assert_eq!(url, "https://img.example/a.jpg#lang=en&jp_crop=0.1%2C0.2%2C0.5%2C0.25");
//!
//! let decoded = codec.decode(&url);
//! assert_eq!(decoded.base_url, "https://img.example/a.jpg");
//! assert_eq!(decoded.crop, Some(CropRect::new(0.1, 0.2, 0.5, 0.25)));
//!
//! assert_eq!(codec.encode(&url, None), "https://img.example/a.jpg#lang=en");
//! ```

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::numeric::{clamp_unit, round_to};

/// Fragment key holding the crop.
pub const CROP_KEY: &str = "jp_crop";

/// Smallest width or height written by the encoder.
pub const MIN_CROP_EXTENT: f64 = 1e-6;

const CROP_DECIMALS: i32 = 6;

/// A crop region in unit coordinates relative to the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl CropRect {
    /// Construct a rectangle without normalising it.
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The rectangle as the encoder writes it: components clamped into
    /// `0..=1`, extents at least [`MIN_CROP_EXTENT`], six decimals.
    #[must_use]
    pub fn normalised(&self) -> Self {
        let round = |value: f64| round_to(value, CROP_DECIMALS);
        Self {
            x: round(clamp_unit(self.x)),
            y: round(clamp_unit(self.y)),
            w: round(clamp_unit(self.w).max(MIN_CROP_EXTENT)),
            h: round(clamp_unit(self.h).max(MIN_CROP_EXTENT)),
        }
    }

    fn to_param(self) -> String {
        format!("{},{},{},{}", self.x, self.y, self.w, self.h)
    }

    fn from_param(value: &str) -> Option<Self> {
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
            .collect::<Option<Vec<_>>>()?;
        let [x, y, w, h] = <[f64; 4]>::try_from(parts).ok()?.map(clamp_unit);
        (w > 0.0 && h > 0.0).then_some(Self { x, y, w, h })
    }
}

/// A URL split into its crop-free form and the decoded crop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CroppedUrl {
    /// Everything before the first `#`.
    pub base_url: String,
    /// Crop carried in the fragment, when present and well formed.
    pub crop: Option<CropRect>,
}

/// Reads and writes the crop pair of a URL fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropCodec {
    key: &'static str,
}

impl Default for CropCodec {
    fn default() -> Self {
        Self { key: CROP_KEY }
    }
}

impl CropCodec {
    /// Use `key` instead of [`CROP_KEY`].
    #[must_use]
    pub const fn with_key(key: &'static str) -> Self {
        Self { key }
    }

    /// Fragment key used by this codec.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Split `raw` and decode its crop.
    ///
    /// Malformed crops decode as absent; this never fails.
    #[must_use]
    pub fn decode(&self, raw: &str) -> CroppedUrl {
        let trimmed = raw.trim();
        let Some((base_url, fragment)) = trimmed.split_once('#') else {
            return CroppedUrl {
                base_url: trimmed.to_owned(),
                crop: None,
            };
        };
        let crop = form_urlencoded::parse(fragment.as_bytes())
            .find(|(name, _)| name == self.key)
            .and_then(|(_, value)| CropRect::from_param(&value));
        CroppedUrl {
            base_url: base_url.to_owned(),
            crop,
        }
    }

    /// Rewrite the crop pair of `raw`.
    ///
    /// `None` removes the pair. An empty fragment is dropped together with
    /// its `#`. Empty input yields an empty string.
    #[must_use]
    pub fn encode(&self, raw: &str, crop: Option<&CropRect>) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        let (base_url, fragment) = trimmed.split_once('#').unwrap_or((trimmed, ""));

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in form_urlencoded::parse(fragment.as_bytes()) {
            if name != self.key {
                serializer.append_pair(&name, &value);
            }
        }
        if let Some(crop) = crop {
            serializer.append_pair(self.key, &crop.normalised().to_param());
        }
        let encoded = serializer.finish();

        if encoded.is_empty() {
            base_url.to_owned()
        } else {
            format!("{base_url}#{encoded}")
        }
    }
}
