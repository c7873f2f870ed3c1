//! Backend API endpoint configuration.

use crate::client::normalise_base;

/// API base used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:3001/api";

/// Resolved URLs of the backend API.
///
/// The base is normalised once: surrounding whitespace and trailing slashes
/// are dropped, and an empty value falls back to [`DEFAULT_API_BASE`].
///
/// # Examples
/// ```
/// use waymark_data::ApiEndpoints;
///
/// let endpoints = ApiEndpoints::new("https://trips.example/api/");
/// assert_eq!(endpoints.route_recommend(), "https://trips.example/api/route/recommend");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: String,
}

impl ApiEndpoints {
    /// Resolve endpoints below `base`.
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: normalise_base(base, DEFAULT_API_BASE),
        }
    }

    /// The normalised API base.
    #[must_use]
    pub const fn base(&self) -> &str {
        self.base.as_str()
    }

    /// Recommendation service endpoint.
    #[must_use]
    pub fn route_recommend(&self) -> String {
        format!("{}/route/recommend", self.base)
    }

    /// Interest profile endpoint.
    #[must_use]
    pub fn recommendation_profile(&self) -> String {
        format!("{}/recommendation/profile", self.base)
    }
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}
