//! HTTP client for the recommendation service.
//!
//! # Example
//!
//! ```no_run
//! use waymark_core::{Coordinate, InterestWeight, RecommendationGateway, RecommendationQuery};
//! use waymark_data::{HttpConfig, HttpRecommendationGateway};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpRecommendationGateway::new(HttpConfig::new("http://localhost:3001/api"))?;
//! let query = RecommendationQuery {
//!     start: Coordinate::new(51.5074, -0.1278)?,
//!     end: Coordinate::new(51.5113, -0.1502)?,
//!     via: Vec::new(),
//!     user_id: None,
//!     interest_weight: InterestWeight::DEFAULT,
//! };
//! let set = gateway.recommend(&query).await?;
//! println!("{} candidates", set.len());
//! # Ok(())
//! # }
//! ```

mod dto;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;
use waymark_core::{GatewayError, RecommendationGateway, RecommendationQuery, RecommendationSet};

use crate::client::{HttpConfig, JsonClient, ProviderBuildError, parse_base};
use crate::endpoints::ApiEndpoints;

/// [`RecommendationGateway`] backed by `GET <api>/route/recommend`.
#[derive(Debug, Clone)]
pub struct HttpRecommendationGateway {
    client: JsonClient,
    endpoints: ApiEndpoints,
}

impl HttpRecommendationGateway {
    /// Create a gateway whose `base_url` is the API base.
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

    /// Build the request URL for `query`.
    fn request_url(&self, query: &RecommendationQuery) -> Result<Url, GatewayError> {
        let endpoint = self.endpoints.route_recommend();
        Url::parse_with_params(&endpoint, query.query_pairs()).map_err(|err| {
            GatewayError::InvalidEndpoint {
                url: endpoint,
                message: err.to_string(),
            }
        })
    }
}

#[async_trait(?Send)]
impl RecommendationGateway for HttpRecommendationGateway {
    async fn recommend(
        &self,
        query: &RecommendationQuery,
    ) -> Result<RecommendationSet, GatewayError> {
        let url = self.request_url(query)?;
        let body: Value = self.client.get_json(&url).await?;
        Ok(dto::decode_recommendations(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use waymark_core::{Coordinate, InterestWeight};

    #[fixture]
    fn query() -> RecommendationQuery {
        RecommendationQuery {
            start: Coordinate::new(51.5074, -0.1278).expect("valid start"),
            end: Coordinate::new(51.5113, -0.1502).expect("valid end"),
            via: vec![Coordinate::new(51.509, -0.14).expect("valid via")],
            user_id: Some("u 1".to_owned()),
            interest_weight: InterestWeight::DEFAULT,
        }
    }

    #[rstest]
    fn request_url_encodes_every_pair(query: RecommendationQuery) {
        let gateway = HttpRecommendationGateway::new(HttpConfig::new("http://api.example/api/"))
            .expect("gateway should build");

        let url = gateway.request_url(&query).expect("valid url");

        assert_eq!(
            url.as_str(),
            "http://api.example/api/route/recommend?start=-0.1278%2C51.5074\
             &end=-0.1502%2C51.5113&via=-0.14%2C51.509&user_id=u+1&interest_weight=0.5"
        );
    }

    #[rstest]
    fn rejects_relative_bases() {
        let err = HttpRecommendationGateway::new(HttpConfig::new("/api"))
            .expect_err("relative base");
        assert!(matches!(err, ProviderBuildError::BaseUrl { .. }));
    }
}
