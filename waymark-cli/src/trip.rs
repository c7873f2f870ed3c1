//! `waymark via` and `waymark weight`: edits to the persisted trip settings.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use waymark_core::{Coordinate, InterestWeight, TripState, ViaPoint, ViaPointKey};
use waymark_data::FileKeyValueStore;

use crate::{ARG_STORE_PATH, CliError, store_path_or_default, write_json};

pub(crate) const ARG_ACTION: &str = "action";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LNG: &str = "lng";
pub(crate) const ARG_ID: &str = "id";
pub(crate) const ARG_WEIGHT_VALUE: &str = "value";
pub(crate) const ENV_VIA_ACTION: &str = "WAYMARK_CMDS_VIA_ACTION";
pub(crate) const ENV_VIA_LAT: &str = "WAYMARK_CMDS_VIA_LAT";
pub(crate) const ENV_VIA_LNG: &str = "WAYMARK_CMDS_VIA_LNG";
pub(crate) const ENV_WEIGHT_ACTION: &str = "WAYMARK_CMDS_WEIGHT_ACTION";
pub(crate) const ENV_WEIGHT_VALUE: &str = "WAYMARK_CMDS_WEIGHT_VALUE";

/// What `waymark via` should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ViaAction {
    /// Append a via point unless the same point is already present.
    Add,
    /// Remove via points by identifier or exact position.
    Remove,
    /// Print the via points.
    List,
    /// Remove every via point.
    Clear,
}

/// CLI arguments for the `via` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "via",
    about = "Edit the persisted via points",
    long_about = "Add, remove, list or clear the stops visited between the \
                  route start and end. The store path can come from CLI \
                  flags, configuration files, or environment variables."
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct ViaArgs {
    /// Operation to perform.
    #[arg(value_enum, required = true)]
    #[serde(default)]
    pub(crate) action: Option<ViaAction>,
    /// JSON file holding the trip settings.
    #[arg(long = ARG_STORE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) store_path: Option<Utf8PathBuf>,
    /// Latitude of the point to add or remove.
    #[arg(long = ARG_LAT, allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the point to add or remove.
    #[arg(long = ARG_LNG, allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Stable identifier of the point.
    #[arg(long = ARG_ID)]
    #[serde(default)]
    pub(crate) id: Option<String>,
    /// Display name for an added point.
    #[arg(long)]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Display category for an added point.
    #[arg(long)]
    #[serde(default)]
    pub(crate) category: Option<String>,
}

impl ViaArgs {
    pub(crate) fn into_config(self) -> Result<ViaConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ViaConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViaOperation {
    Add(ViaPoint),
    Remove(ViaPointKey),
    List,
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ViaConfig {
    pub(crate) store_path: Utf8PathBuf,
    pub(crate) operation: ViaOperation,
}

impl TryFrom<ViaArgs> for ViaConfig {
    type Error = CliError;

    fn try_from(args: ViaArgs) -> Result<Self, Self::Error> {
        let action = args.action.ok_or(CliError::MissingArgument {
            field: ARG_ACTION,
            env: ENV_VIA_ACTION,
        })?;
        let operation = match action {
            ViaAction::Add => {
                let position = required_position(args.lat, args.lng)?;
                let mut point = ViaPoint::new(position.lat(), position.lng());
                point.id = args.id;
                point.name = args.name;
                point.category = args.category;
                ViaOperation::Add(point)
            }
            ViaAction::Remove => match (args.id, args.lat, args.lng) {
                (Some(id), None, None) => ViaOperation::Remove(ViaPointKey::id(id)),
                (id, lat, lng) => {
                    let position = required_position(lat, lng)?;
                    let key = ViaPointKey::position(position.lat(), position.lng());
                    ViaOperation::Remove(match id {
                        Some(value) => key.with_id(value),
                        None => key,
                    })
                }
            },
            ViaAction::List => ViaOperation::List,
            ViaAction::Clear => ViaOperation::Clear,
        };
        Ok(Self {
            store_path: store_path_or_default(args.store_path),
            operation,
        })
    }
}

fn required_position(lat: Option<f64>, lng: Option<f64>) -> Result<Coordinate, CliError> {
    let lat_value = lat.ok_or(CliError::MissingArgument {
        field: ARG_LAT,
        env: ENV_VIA_LAT,
    })?;
    let lng_value = lng.ok_or(CliError::MissingArgument {
        field: ARG_LNG,
        env: ENV_VIA_LNG,
    })?;
    Coordinate::new(lat_value, lng_value).map_err(|err| CliError::InvalidCoordinate {
        field: "via point",
        value: format!("{lat_value},{lng_value}"),
        message: err.to_string(),
    })
}

#[derive(Debug, Serialize)]
struct ViaReport<'a> {
    changed: bool,
    via_points: &'a [ViaPoint],
}

pub(crate) fn run_via(config: ViaConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    debug!("opening trip store {}", config.store_path);
    let mut trip = TripState::new(FileKeyValueStore::new(config.store_path));
    let changed = match config.operation {
        ViaOperation::Add(point) => trip.add_via_point(point),
        ViaOperation::Remove(key) => trip.remove_via_point(&key),
        ViaOperation::List => false,
        ViaOperation::Clear => trip.clear_via_points(),
    };
    write_json(
        writer,
        &ViaReport {
            changed,
            via_points: trip.via_points(),
        },
    )
}

/// What `waymark weight` should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WeightAction {
    /// Print the stored weight.
    Show,
    /// Store a new weight.
    Set,
}

/// CLI arguments for the `weight` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "weight",
    about = "Show or change the persisted interest weight",
    long_about = "The interest weight balances route length against \
                  interesting stops. Values above 1 are read as \
                  percentages."
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct WeightArgs {
    /// Operation to perform.
    #[arg(value_enum, required = true)]
    #[serde(default)]
    pub(crate) action: Option<WeightAction>,
    /// New weight for `set`.
    #[arg(allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) value: Option<f64>,
    /// JSON file holding the trip settings.
    #[arg(long = ARG_STORE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) store_path: Option<Utf8PathBuf>,
}

impl WeightArgs {
    pub(crate) fn into_config(self) -> Result<WeightConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        WeightConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WeightConfig {
    pub(crate) store_path: Utf8PathBuf,
    /// Weight to store; `None` only reads.
    pub(crate) new_value: Option<InterestWeight>,
}

impl TryFrom<WeightArgs> for WeightConfig {
    type Error = CliError;

    fn try_from(args: WeightArgs) -> Result<Self, Self::Error> {
        let action = args.action.ok_or(CliError::MissingArgument {
            field: ARG_ACTION,
            env: ENV_WEIGHT_ACTION,
        })?;
        let new_value = match action {
            WeightAction::Show => None,
            WeightAction::Set => {
                let raw = args.value.ok_or(CliError::MissingArgument {
                    field: ARG_WEIGHT_VALUE,
                    env: ENV_WEIGHT_VALUE,
                })?;
                Some(InterestWeight::new(raw).ok_or(CliError::InvalidWeight { value: raw })?)
            }
        };
        Ok(Self {
            store_path: store_path_or_default(args.store_path),
            new_value,
        })
    }
}

#[derive(Debug, Serialize)]
struct WeightReport {
    interest_weight: InterestWeight,
}

pub(crate) fn run_weight(config: WeightConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let mut trip = TripState::new(FileKeyValueStore::new(config.store_path));
    if let Some(weight) = config.new_value {
        trip.set_interest_weight(weight.get());
    }
    write_json(
        writer,
        &WeightReport {
            interest_weight: trip.interest_weight(),
        },
    )
}
