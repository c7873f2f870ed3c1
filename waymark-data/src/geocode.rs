//! Address lookup against a Nominatim search service.

use serde::Deserialize;
use thiserror::Error;
use url::Url;
use waymark_core::{Coordinate, CoordinateError, TransportError};

use crate::client::{HttpConfig, JsonClient, ProviderBuildError, normalise_base, parse_base};

/// Public Nominatim instance used when none is configured.
pub const DEFAULT_GEOCODER_BASE: &str = "https://nominatim.openstreetmap.org";

/// Errors from [`HttpGeocoder::geocode`].
#[derive(Debug, Error, PartialEq)]
pub enum GeocodeError {
    /// The address was blank.
    #[error("address is empty")]
    EmptyAddress,
    /// The service returned no hits.
    #[error("no location found for {address:?}")]
    NotFound {
        /// The address searched for.
        address: String,
    },
    /// The first hit did not carry a usable position.
    #[error("geocoder returned an invalid position for {address:?}")]
    InvalidPosition {
        /// The address searched for.
        address: String,
        /// Why the position was rejected.
        #[source]
        source: CoordinateError,
    },
    /// The request could not be exchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The search URL could not be built.
    #[error("invalid geocoder endpoint {url}: {message}")]
    InvalidEndpoint {
        /// Offending URL.
        url: String,
        /// Parser message.
        message: String,
    },
}

/// One search hit. Nominatim encodes positions as decimal strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Geocoder backed by `GET <base>/search?format=json&q=<address>`.
///
/// The first hit wins.
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: JsonClient,
    base_url: String,
}

impl HttpGeocoder {
    /// Create a geocoder for the service at `config.base_url`.
    ///
    /// # Errors
    /// Returns [`ProviderBuildError`] when the client cannot be built or the
    /// base is not an absolute URL.
    pub fn new(config: HttpConfig) -> Result<Self, ProviderBuildError> {
        let base_url = normalise_base(&config.base_url, DEFAULT_GEOCODER_BASE);
        parse_base(&base_url)?;
        Ok(Self {
            client: JsonClient::new(&config)?,
            base_url,
        })
    }

    /// Resolve `address` to a coordinate.
    ///
    /// # Errors
    /// Returns [`GeocodeError`] when the address is blank, nothing matches,
    /// the hit is unusable or the request fails.
    pub async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        let url = self.search_url(query)?;
        let hits: Vec<SearchHit> = self.client.get_json(&url).await?;
        first_hit(query, &hits)
    }

    fn search_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let endpoint = format!("{}/search", self.base_url);
        Url::parse_with_params(&endpoint, [("format", "json"), ("q", address)]).map_err(|err| {
            GeocodeError::InvalidEndpoint {
                url: endpoint,
                message: err.to_string(),
            }
        })
    }
}

fn first_hit(address: &str, hits: &[SearchHit]) -> Result<Coordinate, GeocodeError> {
    let hit = hits.first().ok_or_else(|| GeocodeError::NotFound {
        address: address.to_owned(),
    })?;
    // Unparseable text becomes NaN so the coordinate check reports it.
    let lat = hit.lat.trim().parse().unwrap_or(f64::NAN);
    let lng = hit.lon.trim().parse().unwrap_or(f64::NAN);
    Coordinate::new(lat, lng).map_err(|source| GeocodeError::InvalidPosition {
        address: address.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn hit(lat: &str, lon: &str) -> SearchHit {
        SearchHit {
            lat: lat.to_owned(),
            lon: lon.to_owned(),
        }
    }

    #[rstest]
    fn first_hit_wins() {
        let coordinate = first_hit(
            "Trafalgar Square",
            &[hit("51.5080", "-0.1281"), hit("0", "0")],
        )
        .expect("found");
        assert_eq!(coordinate, Coordinate::new(51.508, -0.1281).expect("valid"));
    }

    #[rstest]
    fn no_hits_is_not_found() {
        assert_eq!(
            first_hit("Atlantis", &[]),
            Err(GeocodeError::NotFound {
                address: "Atlantis".to_owned()
            })
        );
    }

    #[rstest]
    #[case("north", "0")]
    #[case("95", "0")]
    fn unusable_hits_are_rejected(#[case] lat: &str, #[case] lon: &str) {
        let err = first_hit("Somewhere", &[hit(lat, lon)]).expect_err("invalid");
        assert!(matches!(err, GeocodeError::InvalidPosition { .. }));
    }

    #[rstest]
    fn search_url_encodes_the_address() {
        let geocoder = HttpGeocoder::new(HttpConfig::new("https://geo.example/"))
            .expect("geocoder should build");
        let url = geocoder.search_url("10 Downing St, London").expect("url");
        assert_eq!(
            url.as_str(),
            "https://geo.example/search?format=json&q=10+Downing+St%2C+London"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn blank_addresses_are_rejected_without_a_request() {
        let geocoder = HttpGeocoder::new(HttpConfig::new(DEFAULT_GEOCODER_BASE))
            .expect("geocoder should build");
        assert_eq!(
            geocoder.geocode("   ").await,
            Err(GeocodeError::EmptyAddress)
        );
    }
}
