// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Draw the sky dome at one instant.


use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use super::common::{display_warnings, InfoPrinter, RenderArgs, SkyArgs, Warn, ARG_FILE_HELP};
use crate::{
    constellations::ConstellationNames, params::SnapshotParams, render::RenderSettings,
    time::parse_instant, SkydomeError,
};

const DEFAULT_STARS_ONLY_FILE: &str = "stars_only_dark.png";
const DEFAULT_CONSTELLATIONS_FILE: &str = "with_constellations_dark.png";
const DEFAULT_FIGURE_SIZE_IN: f64 = 12.0;
const DEFAULT_DPI: u32 = 300;

lazy_static::lazy_static! {
    static ref OVERLAY_HELP: String =
        format!("Which images to draw. Valid values: {}. Default: {}", Overlay::iter().join(", "), Overlay::default());

    static ref STARS_ONLY_FILE_HELP: String =
        format!("The file name of the image without constellations. Default: {DEFAULT_STARS_ONLY_FILE}");

    static ref CONSTELLATIONS_FILE_HELP: String =
        format!("The file name of the image with constellation lines and names. Default: {DEFAULT_CONSTELLATIONS_FILE}");
}

/// Which images a snapshot makes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(super) enum Overlay {
    /// Only stars.
    Stars,

    /// Stars with constellation lines and names.
    Constellations,

    #[default]
    Both,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SnapshotCliArgs {
    /// When to draw the sky, e.g. "2024-06-04 22:00". This is local time
    /// (see --utc-offset) unless it's RFC 3339, e.g.
    /// "2024-06-04T22:00:00Z".
    #[clap(short, long, help_heading = "TIME")]
    pub(super) time: Option<String>,

    /// How many hours local time is ahead of UTC, e.g. 2 for CEST. Default: 0
    #[clap(long, allow_hyphen_values = true, help_heading = "TIME")]
    pub(super) utc_offset: Option<f64>,

    #[clap(long, help = OVERLAY_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) overlay: Option<String>,

    /// The directory the images are written to. Default: the current
    /// directory
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output_dir: Option<PathBuf>,

    #[clap(long, parse(from_os_str), help = STARS_ONLY_FILE_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) stars_only_file: Option<PathBuf>,

    #[clap(long, parse(from_os_str), help = CONSTELLATIONS_FILE_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) constellations_file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SnapshotArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "sky")]
    #[serde(default)]
    pub(super) sky_args: SkyArgs,

    #[clap(flatten)]
    #[serde(rename = "drawing")]
    #[serde(default)]
    pub(super) render_args: RenderArgs,

    #[clap(flatten)]
    #[serde(rename = "snapshot")]
    #[serde(default)]
    pub(super) snapshot_args: SnapshotCliArgs,
}

impl SnapshotArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<SnapshotArgs, SkydomeError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Ensure all of the file args are accounted for by pattern
            // matching.
            let SnapshotArgs {
                args_file: _,
                sky_args,
                render_args,
                snapshot_args,
            } = unpack_arg_file!(arg_file);

            Ok(SnapshotArgs {
                args_file: None,
                sky_args: cli_args.sky_args.merge(sky_args),
                render_args: cli_args.render_args.merge(render_args),
                snapshot_args: cli_args.snapshot_args.merge(snapshot_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<SnapshotParams, SkydomeError> {
        debug!("{:#?}", self);

        // Expose all the struct fields to ensure they're all used.
        let SnapshotArgs {
            args_file: _,
            sky_args,
            render_args,
            snapshot_args:
                SnapshotCliArgs {
                    time,
                    utc_offset,
                    overlay,
                    output_dir,
                    stars_only_file,
                    constellations_file,
                },
        } = self;

        let time = time.ok_or(SnapshotArgsError::NoTime)?;
        let utc_offset = utc_offset.unwrap_or(0.0);
        let epoch = parse_instant(&time, utc_offset)?;
        let mut printer = InfoPrinter::new("Time".into());
        printer.push_line(format!("{time} (UTC{utc_offset:+})").into());
        printer.push_line(format!("{epoch}").into());
        printer.display();

        let overlay = match overlay {
            Some(s) => {
                Overlay::from_str(&s.to_lowercase()).map_err(|_| SnapshotArgsError::BadOverlay(s))?
            }
            None => Overlay::default(),
        };
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
        let stars_only_file = match overlay {
            Overlay::Stars | Overlay::Both => Some(
                output_dir.join(stars_only_file.unwrap_or_else(|| DEFAULT_STARS_ONLY_FILE.into())),
            ),
            Overlay::Constellations => {
                if stars_only_file.is_some() {
                    "--stars-only-file has no effect with --overlay constellations".warn();
                }
                None
            }
        };
        let constellations_file = match overlay {
            Overlay::Constellations | Overlay::Both => Some(output_dir.join(
                constellations_file.unwrap_or_else(|| DEFAULT_CONSTELLATIONS_FILE.into()),
            )),
            Overlay::Stars => {
                if constellations_file.is_some() {
                    "--constellations-file has no effect with --overlay stars".warn();
                }
                None
            }
        };

        let sky = sky_args.parse(constellations_file.is_some(), ConstellationNames::Latin)?;
        let render_settings = render_args.parse(RenderSettings {
            figure_size_in: DEFAULT_FIGURE_SIZE_IN,
            dpi: DEFAULT_DPI,
            degree_labels: true,
            ..Default::default()
        })?;

        let mut printer = InfoPrinter::new("Output files".into());
        for file in stars_only_file.iter().chain(constellations_file.iter()) {
            printer.push_line(file.display().to_string().into());
        }
        printer.display();

        display_warnings();

        Ok(SnapshotParams {
            sky,
            epoch,
            render_settings,
            stars_only_file,
            constellations_file,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), SkydomeError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

impl SnapshotCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            time: self.time.or(other.time),
            utc_offset: self.utc_offset.or(other.utc_offset),
            overlay: self.overlay.or(other.overlay),
            output_dir: self.output_dir.or(other.output_dir),
            stars_only_file: self.stars_only_file.or(other.stars_only_file),
            constellations_file: self.constellations_file.or(other.constellations_file),
        }
    }
}

#[derive(Error, Debug)]
pub(super) enum SnapshotArgsError {
    #[error("No time was given; use e.g. --time \"2024-06-04 22:00\"")]
    NoTime,

    #[error("Unrecognised overlay '{0}'; expected one of: stars, constellations, both")]
    BadOverlay(String),
}
