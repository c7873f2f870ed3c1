//! `waymark crop`: image URL fragment editing.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;
use waymark_core::{CropCodec, CropRect};

use crate::{CliError, write_json};

/// CLI arguments for the `crop` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct CropArgs {
    #[command(subcommand)]
    pub(crate) action: CropAction,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum CropAction {
    /// Write a crop into the URL fragment, replacing any earlier one.
    Encode {
        /// Image URL, with or without a fragment.
        url: String,
        /// Left edge in unit coordinates.
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        /// Top edge in unit coordinates.
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        /// Width in unit coordinates.
        #[arg(long, allow_negative_numbers = true)]
        w: f64,
        /// Height in unit coordinates.
        #[arg(long, allow_negative_numbers = true)]
        h: f64,
    },
    /// Split a URL into its base and decoded crop.
    Decode {
        /// Image URL, with or without a fragment.
        url: String,
    },
    /// Remove the crop from the URL fragment.
    Clear {
        /// Image URL, with or without a fragment.
        url: String,
    },
}

#[derive(Debug, Serialize)]
struct RewrittenUrl {
    url: String,
}

pub(crate) fn run_crop(args: CropArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let codec = CropCodec::default();
    match args.action {
        CropAction::Encode { url, x, y, w, h } => {
            let crop = CropRect::new(x, y, w, h);
            write_json(
                writer,
                &RewrittenUrl {
                    url: codec.encode(&url, Some(&crop)),
                },
            )
        }
        CropAction::Decode { url } => write_json(writer, &codec.decode(&url)),
        CropAction::Clear { url } => write_json(
            writer,
            &RewrittenUrl {
                url: codec.encode(&url, None),
            },
        ),
    }
}
