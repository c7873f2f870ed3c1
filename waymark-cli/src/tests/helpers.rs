//! Test helpers for temporary stores, captured output and layered overrides.

use super::*;
use camino::Utf8PathBuf;
use serde_json::Value;
use tempfile::TempDir;

use crate::trip::{ViaArgs, ViaConfig};

/// A temporary directory holding the trip store files.
pub(super) struct StoreDir {
    dir: TempDir,
}

impl StoreDir {
    pub(super) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join(name)).expect("utf-8 temp path")
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) store_path: Option<Utf8PathBuf>,
}

/// Parse `args` as a full command line.
pub(super) fn parse_command<I, T>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
        .map(|cli| cli.command)
        .map_err(CliError::ArgumentParsing)
}

/// Run `action` against an in-memory writer and decode what it printed.
pub(super) fn capture_json(
    action: impl FnOnce(&mut dyn Write) -> Result<(), CliError>,
) -> Result<Value, CliError> {
    let mut buffer = Vec::new();
    action(&mut buffer)?;
    Ok(serde_json::from_slice(&buffer).expect("command printed JSON"))
}

/// Apply config-file and environment layers beneath the CLI values, the
/// way configuration merging does, without touching the real environment.
pub(super) fn merge_layers(
    mut cli_args: ViaArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<ViaConfig, CliError> {
    merge_field(
        &mut cli_args.store_path,
        extract_field(&env_layer, |layer| &layer.store_path),
        extract_field(&file_layer, |layer| &layer.store_path),
    );
    ViaConfig::try_from(cli_args)
}

fn merge_field<T: Clone>(target: &mut Option<T>, env_value: Option<T>, file_value: Option<T>) {
    if target.is_none()
        && let Some(value) = env_value.or(file_value)
    {
        *target = Some(value);
    }
}

fn extract_field<T: Clone>(
    layer: &Option<LayerOverrides>,
    accessor: fn(&LayerOverrides) -> &Option<T>,
) -> Option<T> {
    layer.as_ref().and_then(|entry| accessor(entry).clone())
}
