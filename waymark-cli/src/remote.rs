//! Commands that talk to the recommendation service, the routing engine or
//! the geocoder.
//!
//! Each command resolves its configuration, builds the HTTP adapter and
//! drives it on a current-thread Tokio runtime. The drivers are generic over
//! the `waymark-core` ports so tests can substitute stubs.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{
    Coordinate, KeyValueStore, ProfileSource, RecommendationGateway, RouteResult, RoutingAdapter,
    TripDefaults, TripState, UserInterestProfile,
};
use waymark_data::{
    DEFAULT_API_BASE, DEFAULT_GEOCODER_BASE, DEFAULT_OSRM_BASE, DEFAULT_OSRM_PROFILE,
    FileKeyValueStore, HttpConfig, HttpGeocoder, HttpProfileSource, HttpRecommendationGateway,
    OsrmRoutingAdapter,
};

use crate::{
    ARG_API_BASE, ARG_END, ARG_GEOCODER_BASE, ARG_OSRM_BASE, ARG_OSRM_PROFILE, ARG_START,
    ARG_STORE_PATH, ARG_USER_ID, CliError, parse_coordinate, store_path_or_default, write_json,
};

const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_ADDRESS: &str = "address";
pub(crate) const ENV_PROFILE_USER_ID: &str = "WAYMARK_CMDS_PROFILE_USER_ID";
pub(crate) const ENV_GEOCODE_ADDRESS: &str = "WAYMARK_CMDS_GEOCODE_ADDRESS";

/// Route endpoints shared by `recommend` and `route`.
fn trip_defaults(start: Option<&str>, end: Option<&str>) -> Result<TripDefaults, CliError> {
    let fallback = TripDefaults::default();
    Ok(TripDefaults {
        start: start.map_or(Ok(fallback.start), |raw| parse_coordinate(ARG_START, raw))?,
        end: end.map_or(Ok(fallback.end), |raw| parse_coordinate(ARG_END, raw))?,
    })
}

fn http_config(base_url: &str, timeout: Option<Duration>) -> HttpConfig {
    let config = HttpConfig::new(base_url);
    match timeout {
        Some(limit) => config.with_timeout(limit),
        None => config,
    }
}

fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    debug!("starting current-thread runtime");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(future))
}

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "recommend",
    about = "Fetch recommended stops for the current trip",
    long_about = "Ask the recommendation service for stops along the trip \
                  stored at --store-path. Endpoints and the user can come \
                  from CLI flags, configuration files, or environment \
                  variables."
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct RecommendArgs {
    /// Base URL of the recommendation service.
    #[arg(long = ARG_API_BASE, value_name = "url")]
    #[serde(default)]
    pub(crate) api_base: Option<String>,
    /// JSON file holding the trip settings.
    #[arg(long = ARG_STORE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) store_path: Option<Utf8PathBuf>,
    /// User whose interests personalise the results.
    #[arg(long = ARG_USER_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// Route start as `lat,lng`.
    #[arg(long = ARG_START, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Route end as `lat,lng`.
    #[arg(long = ARG_END, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) end: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecommendConfig {
    pub(crate) api_base: String,
    pub(crate) store_path: Utf8PathBuf,
    pub(crate) user_id: Option<String>,
    pub(crate) endpoints: TripDefaults,
    pub(crate) timeout: Option<Duration>,
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            endpoints: trip_defaults(args.start.as_deref(), args.end.as_deref())?,
            api_base: args.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_owned()),
            store_path: store_path_or_default(args.store_path),
            user_id: args.user_id.filter(|id| !id.trim().is_empty()),
            timeout: args.timeout_secs.map(Duration::from_secs),
        })
    }
}

pub(crate) fn run_recommend(config: RecommendConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let gateway = HttpRecommendationGateway::new(http_config(&config.api_base, config.timeout))
        .map_err(|source| CliError::ProviderBuild {
            service: "recommendation",
            source,
        })?;
    let mut trip = TripState::with_defaults(
        FileKeyValueStore::new(config.store_path),
        config.endpoints,
    );
    block_on(fetch_recommendations(
        &mut trip,
        &gateway,
        config.user_id.as_deref(),
    ))??;
    write_json(writer, trip.recommendations())
}

/// Request recommendations for `trip` and settle them into its state.
pub(crate) async fn fetch_recommendations<S, G>(
    trip: &mut TripState<S>,
    gateway: &G,
    user_id: Option<&str>,
) -> Result<(), CliError>
where
    S: KeyValueStore,
    G: RecommendationGateway,
{
    let ticket = trip.begin_recommendations(user_id);
    let set = gateway
        .recommend(ticket.query())
        .await
        .map_err(CliError::Recommendation)?;
    trip.settle_recommendations(&ticket, Ok(set));
    Ok(())
}

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "route",
    about = "Route the trip through its via points",
    long_about = "Route from --start through the stored via points to --end \
                  with an OSRM server."
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct RouteArgs {
    /// Base URL of the OSRM server.
    #[arg(long = ARG_OSRM_BASE, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base: Option<String>,
    /// OSRM profile, for example `driving` or `foot`.
    #[arg(long = ARG_OSRM_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// JSON file holding the trip settings.
    #[arg(long = ARG_STORE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) store_path: Option<Utf8PathBuf>,
    /// Route start as `lat,lng`.
    #[arg(long = ARG_START, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Route end as `lat,lng`.
    #[arg(long = ARG_END, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) end: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    pub(crate) osrm_base: String,
    pub(crate) osrm_profile: String,
    pub(crate) store_path: Utf8PathBuf,
    pub(crate) endpoints: TripDefaults,
    pub(crate) timeout: Option<Duration>,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            endpoints: trip_defaults(args.start.as_deref(), args.end.as_deref())?,
            osrm_base: args.osrm_base.unwrap_or_else(|| DEFAULT_OSRM_BASE.to_owned()),
            osrm_profile: args
                .osrm_profile
                .unwrap_or_else(|| DEFAULT_OSRM_PROFILE.to_owned()),
            store_path: store_path_or_default(args.store_path),
            timeout: args.timeout_secs.map(Duration::from_secs),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StepReport<'a> {
    instruction: &'a str,
    distance_m: f64,
    duration_s: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct LegReport<'a> {
    distance_m: f64,
    duration_s: f64,
    steps: Vec<StepReport<'a>>,
}

/// Serialisable view of a [`RouteResult`] with steps grouped by leg.
#[derive(Debug, Serialize)]
pub(crate) struct RouteReport<'a> {
    pub(crate) summary: String,
    distance_m: f64,
    duration_s: f64,
    waypoints: Vec<Coordinate>,
    pub(crate) legs: Vec<LegReport<'a>>,
    geometry: Vec<[f64; 2]>,
}

impl<'a> RouteReport<'a> {
    pub(crate) fn new(route: &'a RouteResult, waypoints: Vec<Coordinate>) -> Self {
        let legs = route
            .legs
            .iter()
            .map(|leg| LegReport {
                distance_m: leg.distance_m,
                duration_s: leg.duration_s,
                steps: route
                    .steps
                    .get(leg.steps.clone())
                    .unwrap_or_default()
                    .iter()
                    .map(|step| StepReport {
                        instruction: &step.instruction,
                        distance_m: step.distance_m,
                        duration_s: step.duration_s,
                    })
                    .collect(),
            })
            .collect();
        Self {
            summary: route.summary().to_string(),
            distance_m: route.total_distance_m,
            duration_s: route.total_duration_s,
            waypoints,
            legs,
            geometry: route.geometry.coords().map(|c| [c.x, c.y]).collect(),
        }
    }
}

pub(crate) fn run_route(config: RouteConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let router = OsrmRoutingAdapter::new(http_config(&config.osrm_base, config.timeout))
        .map_err(|source| CliError::ProviderBuild {
            service: "routing",
            source,
        })?
        .with_profile(config.osrm_profile);
    let mut trip = TripState::with_defaults(
        FileKeyValueStore::new(config.store_path),
        config.endpoints,
    );
    block_on(refresh_route(&mut trip, &router))?;
    let route = settled_route(&trip)?;
    write_json(writer, &RouteReport::new(route, trip.build_waypoints()))
}

/// Route the waypoints of `trip` and settle the outcome into its state.
pub(crate) async fn refresh_route<S, R>(trip: &mut TripState<S>, router: &R)
where
    S: KeyValueStore,
    R: RoutingAdapter,
{
    let ticket = trip.begin_route();
    let outcome = router.route(ticket.waypoints()).await;
    trip.settle_route(&ticket, outcome);
}

/// The route held by `trip`, or the recorded failure.
pub(crate) fn settled_route<S: KeyValueStore>(trip: &TripState<S>) -> Result<&RouteResult, CliError> {
    if let Some(message) = trip.route_error() {
        return Err(CliError::Routing {
            message: message.to_owned(),
        });
    }
    trip.route().ok_or_else(|| CliError::Routing {
        message: "no route was produced".to_owned(),
    })
}

/// CLI arguments for the `profile` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "profile", about = "Fetch a user's interest profile")]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct ProfileArgs {
    /// Base URL of the recommendation service.
    #[arg(long = ARG_API_BASE, value_name = "url")]
    #[serde(default)]
    pub(crate) api_base: Option<String>,
    /// User whose profile to fetch.
    #[arg(long = ARG_USER_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ProfileArgs {
    pub(crate) fn into_config(self) -> Result<ProfileConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ProfileConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProfileConfig {
    pub(crate) api_base: String,
    pub(crate) user_id: String,
    pub(crate) timeout: Option<Duration>,
}

impl TryFrom<ProfileArgs> for ProfileConfig {
    type Error = CliError;

    fn try_from(args: ProfileArgs) -> Result<Self, Self::Error> {
        let user_id = args
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_USER_ID,
                env: ENV_PROFILE_USER_ID,
            })?;
        Ok(Self {
            api_base: args.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_owned()),
            user_id,
            timeout: args.timeout_secs.map(Duration::from_secs),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileReport<'a> {
    user_id: &'a str,
    profile: Option<UserInterestProfile>,
}

pub(crate) fn run_profile(config: ProfileConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let source = HttpProfileSource::new(http_config(&config.api_base, config.timeout)).map_err(
        |source| CliError::ProviderBuild {
            service: "profile",
            source,
        },
    )?;
    let report = block_on(fetch_profile(&source, &config.user_id))??;
    write_json(writer, &report)
}

pub(crate) async fn fetch_profile<'a, P: ProfileSource>(
    source: &P,
    user_id: &'a str,
) -> Result<ProfileReport<'a>, CliError> {
    let profile = source.fetch_profile(user_id).await?;
    Ok(ProfileReport { user_id, profile })
}

/// CLI arguments for the `geocode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "geocode", about = "Resolve an address to a coordinate")]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct GeocodeArgs {
    /// Free-form address.
    #[arg(value_name = "address")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Base URL of the Nominatim-compatible geocoder.
    #[arg(long = ARG_GEOCODER_BASE, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_base: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl GeocodeArgs {
    pub(crate) fn into_config(self) -> Result<GeocodeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GeocodeConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocodeConfig {
    pub(crate) address: String,
    pub(crate) geocoder_base: String,
    pub(crate) timeout: Option<Duration>,
}

impl TryFrom<GeocodeArgs> for GeocodeConfig {
    type Error = CliError;

    fn try_from(args: GeocodeArgs) -> Result<Self, Self::Error> {
        let address = args.address.ok_or(CliError::MissingArgument {
            field: ARG_ADDRESS,
            env: ENV_GEOCODE_ADDRESS,
        })?;
        Ok(Self {
            address,
            geocoder_base: args
                .geocoder_base
                .unwrap_or_else(|| DEFAULT_GEOCODER_BASE.to_owned()),
            timeout: args.timeout_secs.map(Duration::from_secs),
        })
    }
}

pub(crate) fn run_geocode(config: GeocodeConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let geocoder = HttpGeocoder::new(http_config(&config.geocoder_base, config.timeout)).map_err(
        |source| CliError::ProviderBuild {
            service: "geocoder",
            source,
        },
    )?;
    let coordinate = block_on(geocoder.geocode(&config.address))??;
    write_json(writer, &coordinate)
}
