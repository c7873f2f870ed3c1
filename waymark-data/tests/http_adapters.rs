//! Adapters exercised against a local one-shot HTTP server.

mod support;

use std::time::Duration;

use rstest::rstest;
use serde_json::json;
use support::{closed_base_url, serve_once};
use tokio::net::TcpListener;
use waymark_core::{
    Coordinate, GatewayError, InterestWeight, ProfileSource, RecommendationGateway,
    RecommendationQuery, RoutingAdapter, TransportError,
};
use waymark_data::{
    GeocodeError, HttpConfig, HttpGeocoder, HttpProfileSource, HttpRecommendationGateway,
    OsrmRoutingAdapter,
};

fn london_query() -> RecommendationQuery {
    RecommendationQuery {
        start: Coordinate::new(51.5074, -0.1278).expect("valid start"),
        end: Coordinate::new(51.5113, -0.1502).expect("valid end"),
        via: Vec::new(),
        user_id: Some("u1".to_owned()),
        interest_weight: InterestWeight::DEFAULT,
    }
}

#[rstest]
#[tokio::test]
async fn recommendations_are_fetched_and_decoded() {
    let body = json!({
        "recommended_pois": [
            { "id": 11, "name": "Somerset House", "category": "culture", "lat": 51.5111, "lng": -0.1171, "score": 0.93 },
            { "id": 12, "name": "Broken" }
        ],
        "profile": { "culture": 0.8 }
    });
    let (base, request) = serve_once(200, &body.to_string()).await;
    let gateway = HttpRecommendationGateway::new(HttpConfig::new(format!("{base}/api/")))
        .expect("gateway should build");

    let set = gateway
        .recommend(&london_query())
        .await
        .expect("request succeeds");

    assert_eq!(set.len(), 1);
    assert_eq!(set.pois[0].id.as_deref(), Some("11"));
    assert!(set.profile.is_some());
    let line = request.await.expect("server task");
    assert_eq!(
        line,
        "GET /api/route/recommend?start=-0.1278%2C51.5074&end=-0.1502%2C51.5113\
         &user_id=u1&interest_weight=0.5 HTTP/1.1"
    );
}

#[rstest]
#[tokio::test]
async fn recommendation_status_errors_are_classified() {
    let (base, request) = serve_once(500, "{}").await;
    let gateway =
        HttpRecommendationGateway::new(HttpConfig::new(base)).expect("gateway should build");

    let err = gateway
        .recommend(&london_query())
        .await
        .expect_err("server error");

    assert!(matches!(
        err,
        GatewayError::Transport(TransportError::Http { status: 500, .. })
    ));
    request.await.expect("server task");
}

#[rstest]
#[tokio::test]
async fn unreachable_services_are_network_errors() {
    let gateway = HttpRecommendationGateway::new(HttpConfig::new(closed_base_url().await))
        .expect("gateway should build");

    let err = gateway
        .recommend(&london_query())
        .await
        .expect_err("nothing listening");

    assert!(matches!(
        err,
        GatewayError::Transport(TransportError::Network { .. })
    ));
}

#[rstest]
#[tokio::test]
async fn silent_services_time_out() {
    // Connections queue in the backlog but are never answered.
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind silent listener");
    let base = format!("http://{}", listener.local_addr().expect("address"));
    let gateway = HttpRecommendationGateway::new(
        HttpConfig::new(base).with_timeout(Duration::from_millis(200)),
    )
    .expect("gateway should build");

    let err = gateway
        .recommend(&london_query())
        .await
        .expect_err("no answer");

    assert!(matches!(
        err,
        GatewayError::Transport(TransportError::Timeout { timeout_secs: 0, .. })
    ));
    drop(listener);
}

#[rstest]
#[tokio::test]
async fn profiles_are_fetched_for_the_user() {
    let body = json!({ "success": true, "data": { "food": 0.4 } });
    let (base, request) = serve_once(200, &body.to_string()).await;
    let source = HttpProfileSource::new(HttpConfig::new(base)).expect("source should build");

    let profile = source
        .fetch_profile("u42")
        .await
        .expect("request succeeds")
        .expect("profile present");

    assert_eq!(profile.get("food"), Some(&json!(0.4)));
    assert_eq!(
        request.await.expect("server task"),
        "GET /recommendation/profile?user_id=u42 HTTP/1.1"
    );
}

#[rstest]
#[tokio::test]
async fn osrm_routes_are_requested_and_converted() {
    let body = json!({
        "code": "Ok",
        "routes": [{
            "distance": 1800.0,
            "duration": 360.0,
            "geometry": { "type": "LineString", "coordinates": [[-0.1278, 51.5074], [-0.1502, 51.5113]] },
            "legs": [{
                "distance": 1800.0,
                "duration": 360.0,
                "steps": [
                    { "distance": 1800.0, "duration": 360.0, "name": "Pall Mall", "maneuver": { "type": "depart", "modifier": "west" } },
                    { "distance": 0.0, "duration": 0.0, "name": "", "maneuver": { "type": "arrive" } }
                ]
            }]
        }]
    });
    let (base, request) = serve_once(200, &body.to_string()).await;
    let adapter = OsrmRoutingAdapter::new(HttpConfig::new(base))
        .expect("adapter should build")
        .with_profile("foot");
    let waypoints = [
        Coordinate::new(51.5074, -0.1278).expect("valid start"),
        Coordinate::new(51.5113, -0.1502).expect("valid end"),
    ];

    let route = adapter.route(&waypoints).await.expect("route found");

    assert_eq!(route.legs.len(), 1);
    assert_eq!(route.steps[0].instruction, "Head west on Pall Mall");
    assert_eq!(route.summary().to_string(), "1.80 km, 6.0 min");
    assert_eq!(
        request.await.expect("server task"),
        "GET /route/v1/foot/-0.1278,51.5074;-0.1502,51.5113\
         ?overview=full&geometries=geojson&steps=true HTTP/1.1"
    );
}

#[rstest]
#[tokio::test]
async fn geocoder_takes_the_first_hit() {
    let body = json!([
        { "lat": "51.5007", "lon": "-0.1246", "display_name": "Big Ben" },
        { "lat": "0", "lon": "0" }
    ]);
    let (base, request) = serve_once(200, &body.to_string()).await;
    let geocoder = HttpGeocoder::new(HttpConfig::new(base)).expect("geocoder should build");

    let coordinate = geocoder.geocode("Big Ben").await.expect("found");

    assert_eq!(
        coordinate,
        Coordinate::new(51.5007, -0.1246).expect("valid")
    );
    assert_eq!(
        request.await.expect("server task"),
        "GET /search?format=json&q=Big+Ben HTTP/1.1"
    );
}

#[rstest]
#[tokio::test]
async fn geocoder_reports_missing_addresses() {
    let (base, request) = serve_once(200, "[]").await;
    let geocoder = HttpGeocoder::new(HttpConfig::new(base)).expect("geocoder should build");

    assert_eq!(
        geocoder.geocode("Atlantis").await,
        Err(GeocodeError::NotFound {
            address: "Atlantis".to_owned()
        })
    );
    request.await.expect("server task");
}
