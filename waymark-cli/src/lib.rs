//! Command-line interface for Waymark trip planning.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::{io::Write, sync::Arc};
use thiserror::Error;
use waymark_core::{Coordinate, GatewayError, ProfileError};
use waymark_data::{GeocodeError, ProviderBuildError};

mod crop;
mod remote;
mod trip;

use crop::CropArgs;
use remote::{GeocodeArgs, ProfileArgs, RecommendArgs, RouteArgs};
use trip::{ViaArgs, WeightArgs};

const ARG_STORE_PATH: &str = "store-path";
const ARG_API_BASE: &str = "api-base";
const ARG_OSRM_BASE: &str = "osrm-base";
const ARG_OSRM_PROFILE: &str = "osrm-profile";
const ARG_GEOCODER_BASE: &str = "geocoder-base";
const ARG_USER_ID: &str = "user-id";
const ARG_START: &str = "start";
const ARG_END: &str = "end";

/// Store file used when no `--store-path` is configured.
pub const DEFAULT_STORE_PATH: &str = "waymark-store.json";

/// Run the Waymark CLI with the current process arguments and environment.
///
/// Command output is written to standard output as pretty-printed JSON.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    execute(cli.command, &mut stdout)
}

fn execute(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Crop(args) => crop::run_crop(args, writer),
        Command::Via(args) => trip::run_via(args.into_config()?, writer),
        Command::Weight(args) => trip::run_weight(args.into_config()?, writer),
        Command::Recommend(args) => remote::run_recommend(args.into_config()?, writer),
        Command::Route(args) => remote::run_route(args.into_config()?, writer),
        Command::Profile(args) => remote::run_profile(args.into_config()?, writer),
        Command::Geocode(args) => remote::run_geocode(args.into_config()?, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Plan walking and driving trips with recommended stops",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read or write the crop carried in an image URL fragment.
    Crop(CropArgs),
    /// Edit the persisted via points.
    Via(ViaArgs),
    /// Show or change the persisted interest weight.
    Weight(WeightArgs),
    /// Fetch recommended stops for the current trip.
    Recommend(RecommendArgs),
    /// Route the trip through its via points.
    Route(RouteArgs),
    /// Fetch a user's interest profile.
    Profile(ProfileArgs),
    /// Resolve an address to a coordinate.
    Geocode(GeocodeArgs),
}

/// Parse a `lat,lng` pair as typed on the command line.
fn parse_coordinate(field: &'static str, raw: &str) -> Result<Coordinate, CliError> {
    let invalid = |message: String| CliError::InvalidCoordinate {
        field,
        value: raw.to_owned(),
        message,
    };
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| invalid("expected lat,lng".to_owned()))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|err| invalid(err.to_string()))
    };
    Coordinate::new(parse(lat)?, parse(lng)?).map_err(|err| invalid(err.to_string()))
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let encoded = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(encoded.as_bytes())
        .and_then(|()| writer.write_all(b"\n"))
        .map_err(CliError::WriteOutput)
}

fn store_path_or_default(path: Option<Utf8PathBuf>) -> Utf8PathBuf {
    path.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_STORE_PATH))
}

/// Errors emitted by the Waymark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A position option could not be read as a coordinate.
    #[error("invalid {field} {value:?}: {message}")]
    InvalidCoordinate {
        field: &'static str,
        value: String,
        message: String,
    },
    /// The interest weight was not a finite number.
    #[error("interest weight must be a finite number, got {value}")]
    InvalidWeight { value: f64 },
    /// A service client could not be constructed.
    #[error("failed to configure the {service} client")]
    ProviderBuild {
        service: &'static str,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not start.
    #[error("failed to start the async runtime")]
    Runtime(#[source] std::io::Error),
    /// The recommendation service failed.
    #[error("recommendation request failed: {0}")]
    Recommendation(#[source] GatewayError),
    /// The routing engine failed.
    #[error("route request failed: {message}")]
    Routing { message: String },
    /// The profile service failed.
    #[error("profile request failed: {0}")]
    Profile(#[from] ProfileError),
    /// The geocoder failed.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    /// Output could not be encoded.
    #[error("failed to encode output")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Output could not be written.
    #[error("failed to write output")]
    WriteOutput(#[source] std::io::Error),
}

#[cfg(test)]
mod tests;
