//! HTTP client for the user interest profile service.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;
use waymark_core::{ProfileError, ProfileSource, UserInterestProfile};

use crate::client::{HttpConfig, JsonClient, ProviderBuildError, parse_base};
use crate::endpoints::ApiEndpoints;

/// Envelope returned by `GET <api>/recommendation/profile`.
#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    profile: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl ProfileEnvelope {
    /// Interpret the envelope. The profile is read from `profile`, then
    /// `data`; a successful answer without an object yields `None`.
    fn into_profile(self) -> Result<Option<UserInterestProfile>, ProfileError> {
        if !self.success {
            return Err(ProfileError::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| "service did not report success".to_owned()),
            });
        }
        let object = [self.profile, self.data]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            });
        Ok(object.map(UserInterestProfile))
    }
}

/// [`ProfileSource`] backed by `GET <api>/recommendation/profile?user_id=<id>`.
#[derive(Debug, Clone)]
pub struct HttpProfileSource {
    client: JsonClient,
    endpoints: ApiEndpoints,
}

impl HttpProfileSource {
    /// Create a source whose `base_url` is the API base.
    ///
    /// # Errors
    /// Returns [`ProviderBuildError`] when the client cannot be built or the
    /// base is not an absolute URL.
    pub fn new(config: HttpConfig) -> Result<Self, ProviderBuildError> {
        let endpoints = ApiEndpoints::new(&config.base_url);
        parse_base(endpoints.base())?;
        Ok(Self {
            client: JsonClient::new(&config)?,
            endpoints,
        })
    }

    fn request_url(&self, user_id: &str) -> Result<Url, ProfileError> {
        let endpoint = self.endpoints.recommendation_profile();
        Url::parse_with_params(&endpoint, [("user_id", user_id)]).map_err(|err| {
            ProfileError::InvalidEndpoint {
                url: endpoint,
                message: err.to_string(),
            }
        })
    }
}

#[async_trait(?Send)]
impl ProfileSource for HttpProfileSource {
    async fn fetch_profile(
        &self,
        user_id: &str,
    ) -> Result<Option<UserInterestProfile>, ProfileError> {
        let url = self.request_url(user_id)?;
        let envelope: ProfileEnvelope = self.client.get_json(&url).await?;
        envelope.into_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn envelope(body: Value) -> ProfileEnvelope {
        serde_json::from_value(body).expect("decode envelope")
    }

    #[rstest]
    #[case::profile_field(json!({ "success": true, "profile": { "art": 0.8 } }))]
    #[case::data_field(json!({ "success": true, "data": { "art": 0.8 } }))]
    #[case::null_profile_uses_data(json!({ "success": true, "profile": null, "data": { "art": 0.8 } }))]
    fn successful_envelopes_yield_the_profile(#[case] body: Value) {
        let profile = envelope(body)
            .into_profile()
            .expect("accepted")
            .expect("profile present");
        assert_eq!(profile.get("art"), Some(&json!(0.8)));
    }

    #[rstest]
    fn success_without_an_object_is_absent() {
        let outcome = envelope(json!({ "success": true, "profile": [1, 2] })).into_profile();
        assert_eq!(outcome, Ok(None));
    }

    #[rstest]
    #[case::explicit_failure(json!({ "success": false, "message": "no such user" }), "no such user")]
    #[case::missing_flag(json!({ "profile": { "art": 0.8 } }), "service did not report success")]
    fn unsuccessful_envelopes_are_rejected(#[case] body: Value, #[case] message: &str) {
        let err = envelope(body).into_profile().expect_err("rejected");
        assert_eq!(
            err,
            ProfileError::Rejected {
                message: message.to_owned()
            }
        );
    }

    #[rstest]
    fn request_url_carries_the_user() {
        let source = HttpProfileSource::new(HttpConfig::new("http://api.example/api"))
            .expect("source should build");
        let url = source.request_url("user&1").expect("valid url");
        assert_eq!(
            url.as_str(),
            "http://api.example/api/recommendation/profile?user_id=user%261"
        );
    }
}
