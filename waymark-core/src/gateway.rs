//! The recommendation service port.

use async_trait::async_trait;
use thiserror::Error;

use crate::{Coordinate, InterestWeight, RecommendationSet, TransportError};

/// Errors from [`RecommendationGateway::recommend`].
///
/// Unexpected response shapes are not errors: gateways map them to an empty
/// [`RecommendationSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request could not be exchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The configured endpoint is not a usable URL.
    #[error("invalid recommendation endpoint {url}: {message}")]
    InvalidEndpoint {
        /// Offending URL.
        url: String,
        /// Parser message.
        message: String,
    },
}

/// Parameters of one recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    /// Route start.
    pub start: Coordinate,
    /// Route end.
    pub end: Coordinate,
    /// Current via points in visiting order.
    pub via: Vec<Coordinate>,
    /// Signed-in user, when any.
    pub user_id: Option<String>,
    /// Interest weight, always sent.
    pub interest_weight: InterestWeight,
}

impl RecommendationQuery {
    /// Encode the query as ordered name/value pairs.
    ///
    /// Coordinates are `lng,lat` rounded to six decimals. `via` is omitted
    /// when there are no via points and `user_id` when there is no user.
    ///
    /// # Examples
    /// ```
    /// use waymark_core::{Coordinate, InterestWeight, RecommendationQuery};
    ///
    /// let query = RecommendationQuery {
    ///     start: Coordinate::new(51.5074, -0.1278)?,
    ///     end: Coordinate::new(51.5113, -0.1502)?,
    ///     via: Vec::new(),
    ///     user_id: None,
    ///     interest_weight: InterestWeight::DEFAULT,
    /// };
    /// let names: Vec<_> = query.query_pairs().into_iter().map(|(name, _)| name).collect();
    /// assert_eq!(names, ["start", "end", "interest_weight"]);
    /// # Ok::<(), waymark_core::CoordinateError>(())
    /// ```
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("start", self.start.lng_lat_param()),
            ("end", self.end.lng_lat_param()),
        ];
        if !self.via.is_empty() {
            let via = self
                .via
                .iter()
                .map(|point| point.lng_lat_param())
                .collect::<Vec<_>>()
                .join(";");
            pairs.push(("via", via));
        }
        if let Some(user_id) = self.user_id.as_deref().filter(|id| !id.trim().is_empty()) {
            pairs.push(("user_id", user_id.to_owned()));
        }
        pairs.push(("interest_weight", self.interest_weight.to_string()));
        pairs
    }
}

/// Fetch ranked points of interest for a planned trip.
#[async_trait(?Send)]
pub trait RecommendationGateway {
    /// Issue one request for `query`.
    ///
    /// # Errors
    /// Returns [`GatewayError`] when the request cannot be exchanged.
    async fn recommend(
        &self,
        query: &RecommendationQuery,
    ) -> Result<RecommendationSet, GatewayError>;
}
