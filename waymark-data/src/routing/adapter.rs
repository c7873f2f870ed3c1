//! `RoutingAdapter` using OSRM's Route API.

use async_trait::async_trait;
use geo::{Coord, LineString};
use url::Url;
use waymark_core::{Coordinate, RouteLeg, RouteResult, RouteStep, RoutingAdapter, RoutingError};

use super::instructions::instruction_text;
use super::osrm::{LineGeometry, RouteResponse};
use crate::client::{HttpConfig, JsonClient, ProviderBuildError, normalise_base, parse_base};

/// OSRM base used when none is configured.
pub const DEFAULT_OSRM_BASE: &str = "http://localhost:5000";

/// Routing profile used when none is configured.
pub const DEFAULT_OSRM_PROFILE: &str = "driving";

/// HTTP routing adapter for an OSRM route service.
///
/// Each call issues one `GET <base>/route/v1/<profile>/<lng,lat;...>` with
/// full GeoJSON geometry and steps, and maps the best route onto a
/// [`RouteResult`]. Steps of each leg are appended in order, so leg `i`
/// covers a contiguous range of the step list.
#[derive(Debug, Clone)]
pub struct OsrmRoutingAdapter {
    client: JsonClient,
    base_url: String,
    profile: String,
}

impl OsrmRoutingAdapter {
    /// Create an adapter for the OSRM service at `config.base_url`.
    ///
    /// # Errors
    /// Returns [`ProviderBuildError`] when the client cannot be built or the
    /// base is not an absolute URL.
    pub fn new(config: HttpConfig) -> Result<Self, ProviderBuildError> {
        let base_url = normalise_base(&config.base_url, DEFAULT_OSRM_BASE);
        parse_base(&base_url)?;
        Ok(Self {
            client: JsonClient::new(&config)?,
            base_url,
            profile: DEFAULT_OSRM_PROFILE.to_owned(),
        })
    }

    /// Route with `profile` (for example `foot` or `bike`) instead of the
    /// default.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        let requested = profile.into();
        if !requested.trim().is_empty() {
            self.profile = requested.trim().to_owned();
        }
        self
    }

    /// Build the OSRM Route API URL for `waypoints`.
    fn route_url(&self, waypoints: &[Coordinate]) -> Result<Url, RoutingError> {
        let coords = waypoints
            .iter()
            .map(|point| point.lng_lat_param())
            .collect::<Vec<_>>()
            .join(";");
        let raw = format!("{}/route/v1/{}/{}", self.base_url, self.profile, coords);
        let mut url = Url::parse(&raw).map_err(|err| RoutingError::Parse {
            message: format!("cannot build route URL {raw}: {err}"),
        })?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson")
            .append_pair("steps", "true");
        Ok(url)
    }
}

#[async_trait(?Send)]
impl RoutingAdapter for OsrmRoutingAdapter {
    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        let url = self.route_url(waypoints)?;
        let response: RouteResponse = self.client.get_json(&url).await?;
        convert_response(response, waypoints.len())
    }
}

/// Convert an OSRM response for `waypoint_count` waypoints to a route.
pub(crate) fn convert_response(
    response: RouteResponse,
    waypoint_count: usize,
) -> Result<RouteResult, RoutingError> {
    if !response.is_ok() {
        if response.code == "NoRoute" {
            return Err(RoutingError::NoRoute);
        }
        return Err(RoutingError::Service {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoutingError::NoRoute)?;
    let geometry = route
        .geometry
        .as_ref()
        .map(line_string)
        .ok_or_else(|| RoutingError::Parse {
            message: "OSRM route missing geometry".to_owned(),
        })?;
    let expected_legs = waypoint_count.saturating_sub(1);
    if route.legs.len() != expected_legs {
        return Err(RoutingError::Parse {
            message: format!(
                "expected {expected_legs} legs for {waypoint_count} waypoints, got {}",
                route.legs.len()
            ),
        });
    }

    let mut steps = Vec::new();
    let mut legs = Vec::with_capacity(route.legs.len());
    for leg in route.legs {
        let first = steps.len();
        steps.extend(leg.steps.into_iter().map(|step| RouteStep {
            instruction: instruction_text(&step.maneuver, &step.name),
            distance_m: step.distance,
            duration_s: step.duration,
            geometry: step.geometry.as_ref().map(line_string),
        }));
        legs.push(RouteLeg {
            steps: first..steps.len(),
            distance_m: leg.distance,
            duration_s: leg.duration,
        });
    }

    Ok(RouteResult {
        geometry,
        steps,
        legs,
        total_distance_m: route.distance,
        total_duration_s: route.duration,
    })
}

fn line_string(geometry: &LineGeometry) -> LineString<f64> {
    geometry
        .coordinates
        .iter()
        .map(|&[x, y]| Coord { x, y })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn waypoints() -> Vec<Coordinate> {
        vec![
            Coordinate::new(51.5074, -0.1278).expect("valid start"),
            Coordinate::new(51.509, -0.14).expect("valid via"),
            Coordinate::new(51.5113, -0.1502).expect("valid end"),
        ]
    }

    fn adapter(base: &str) -> OsrmRoutingAdapter {
        OsrmRoutingAdapter::new(HttpConfig::new(base)).expect("adapter should build")
    }

    fn two_leg_response() -> RouteResponse {
        serde_json::from_value(serde_json::json!({
            "code": "Ok",
            "routes": [{
                "distance": 2100.0,
                "duration": 420.0,
                "geometry": { "coordinates": [[-0.1278, 51.5074], [-0.14, 51.509], [-0.1502, 51.5113]] },
                "legs": [
                    {
                        "distance": 1000.0,
                        "duration": 200.0,
                        "steps": [
                            { "distance": 600.0, "duration": 120.0, "name": "Strand", "maneuver": { "type": "depart", "modifier": "left" } },
                            { "distance": 400.0, "duration": 80.0, "name": "", "maneuver": { "type": "arrive" } }
                        ]
                    },
                    {
                        "distance": 1100.0,
                        "duration": 220.0,
                        "steps": [
                            { "distance": 1100.0, "duration": 220.0, "name": "Pall Mall", "maneuver": { "type": "turn", "modifier": "right" },
                              "geometry": { "coordinates": [[-0.14, 51.509], [-0.1502, 51.5113]] } }
                        ]
                    }
                ]
            }]
        }))
        .expect("decode response")
    }

    #[rstest]
    fn route_url_formats_coordinates(waypoints: Vec<Coordinate>) {
        let url = adapter("http://osrm.example.com")
            .route_url(&waypoints)
            .expect("valid url");

        assert_eq!(
            url.as_str(),
            "http://osrm.example.com/route/v1/driving/-0.1278,51.5074;-0.14,51.509;-0.1502,51.5113\
             ?overview=full&geometries=geojson&steps=true"
        );
    }

    #[rstest]
    fn route_url_strips_trailing_slash_and_uses_profile(waypoints: Vec<Coordinate>) {
        let url = adapter("http://osrm.example.com/")
            .with_profile("foot")
            .route_url(&waypoints)
            .expect("valid url");

        assert!(url.as_str().starts_with("http://osrm.example.com/route/v1/foot/"));
        assert!(!url.as_str().contains("//route"));
    }

    #[rstest]
    fn blank_profile_keeps_default() {
        let routed = adapter("http://osrm.example.com").with_profile("  ");
        assert_eq!(routed.profile, DEFAULT_OSRM_PROFILE);
    }

    #[rstest]
    fn convert_response_partitions_steps_by_leg() {
        let route = convert_response(two_leg_response(), 3).expect("should convert");

        assert_eq!(route.steps.len(), 3);
        assert_eq!(route.legs[0].steps, 0..2);
        assert_eq!(route.legs[1].steps, 2..3);
        assert_eq!(route.leg_for_step(2), Some(1));
        assert_eq!(route.steps[0].instruction, "Head left on Strand");
        assert_eq!(route.steps[2].instruction, "Turn right onto Pall Mall");
        assert!(route.steps[2].geometry.is_some());
        assert_eq!(route.geometry.0.len(), 3);
        assert_eq!(route.summary().to_string(), "2.10 km, 7.0 min");
    }

    #[rstest]
    fn convert_response_rejects_leg_mismatch() {
        let err = convert_response(two_leg_response(), 2).expect_err("should fail");
        assert!(matches!(err, RoutingError::Parse { .. }));
    }

    #[rstest]
    #[case::no_route("NoRoute", None, RoutingError::NoRoute)]
    #[case::service(
        "NoSegment",
        Some("Could not find a matching segment"),
        RoutingError::Service {
            code: "NoSegment".to_owned(),
            message: "Could not find a matching segment".to_owned(),
        }
    )]
    fn convert_response_maps_error_codes(
        #[case] code: &str,
        #[case] message: Option<&str>,
        #[case] expected: RoutingError,
    ) {
        let response = RouteResponse {
            code: code.to_owned(),
            message: message.map(str::to_owned),
            routes: Vec::new(),
        };
        assert_eq!(convert_response(response, 2), Err(expected));
    }

    #[rstest]
    fn convert_response_without_routes_is_no_route() {
        let response = RouteResponse {
            code: "Ok".to_owned(),
            message: None,
            routes: Vec::new(),
        };
        assert_eq!(convert_response(response, 2), Err(RoutingError::NoRoute));
    }

    #[rstest]
    #[tokio::test]
    async fn too_few_waypoints_fail_without_a_request() {
        let start = Coordinate::new(51.5074, -0.1278).expect("valid start");
        let err = adapter("http://127.0.0.1:9")
            .route(&[start])
            .await
            .expect_err("should fail");
        assert_eq!(err, RoutingError::TooFewWaypoints { count: 1 });
    }
}
