//! The user interest profile and the port that fetches it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::TransportError;

/// Free-form summary of a user's interests as reported by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserInterestProfile(pub Map<String, Value>);

impl UserInterestProfile {
    /// Look up one profile entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Errors from [`ProfileSource::fetch_profile`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The request could not be exchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The service answered but did not report success.
    #[error("profile service rejected the request: {message}")]
    Rejected {
        /// Service message, when any.
        message: String,
    },
    /// The configured endpoint is not a usable URL.
    #[error("invalid profile endpoint {url}: {message}")]
    InvalidEndpoint {
        /// Offending URL.
        url: String,
        /// Parser message.
        message: String,
    },
}

/// Fetch the interest profile of a user.
#[async_trait(?Send)]
pub trait ProfileSource {
    /// Fetch the profile for `user_id`.
    ///
    /// `Ok(None)` means the service succeeded without a profile.
    ///
    /// # Errors
    /// Returns [`ProfileError`] when the request fails or is rejected.
    async fn fetch_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<UserInterestProfile>, ProfileError>;
}
