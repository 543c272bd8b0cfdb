// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arguments controlling how the sky is drawn.

use std::str::FromStr;

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{InfoPrinter, Warn, ORIENTATION_HELP};
use crate::{
    render::{parse_hex_colour, to_hex, Orientation, Palette, RenderSettings},
    SkydomeError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RenderArgs {
    /// The width and height of the image [inches]. Default: 12 for snapshots,
    /// 8 for animations
    #[clap(long, help_heading = "DRAWING")]
    pub(crate) figure_size: Option<f64>,

    /// Pixels per inch. Default: 300 for snapshots, 150 for animations
    #[clap(long, help_heading = "DRAWING")]
    pub(crate) dpi: Option<u32>,

    /// The font family used for all text. Default: sans-serif
    #[clap(long, help_heading = "DRAWING")]
    pub(crate) font: Option<String>,

    #[clap(long, help = ORIENTATION_HELP.as_str(), help_heading = "DRAWING")]
    pub(crate) orientation: Option<String>,

    /// Label every 10° of azimuth around the dome. This is the default for
    /// snapshots.
    #[clap(long, help_heading = "DRAWING")]
    #[serde(default)]
    pub(crate) degree_labels: bool,

    /// Don't label every 10° of azimuth. This is the default for animations.
    #[clap(long, conflicts_with("degree-labels"), help_heading = "DRAWING")]
    #[serde(default)]
    pub(crate) no_degree_labels: bool,

    /// The marker area of a magnitude 0 star [points²]. Default: 100
    #[clap(long, help_heading = "DRAWING")]
    pub(crate) marker_size: Option<f64>,

    /// The width of the horizon ring [points]. Default: 2
    #[clap(long, help_heading = "DRAWING")]
    pub(crate) border_width: Option<f64>,

    /// Outside the dome. Default: #0b0c1a
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) background_colour: Option<String>,

    /// Inside the dome. Default: #121630
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) dome_colour: Option<String>,

    /// The horizon ring. Default: #445577
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) border_colour: Option<String>,

    /// Stars dimmer than magnitude 2. Default: #aabbff
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) star_colour: Option<String>,

    /// Stars of magnitude 2 and brighter. Default: #ffffff
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) bright_star_colour: Option<String>,

    /// Default: #8899cc
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) constellation_line_colour: Option<String>,

    /// Default: #ccddee
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) constellation_text_colour: Option<String>,

    /// The N, E, S and W labels. Default: #ddeeff
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) direction_text_colour: Option<String>,

    /// Default: #aabbcc
    #[clap(long, help_heading = "COLOURS")]
    pub(crate) degree_text_colour: Option<String>,
}

impl RenderArgs {
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            figure_size: self.figure_size.or(other.figure_size),
            dpi: self.dpi.or(other.dpi),
            font: self.font.or(other.font),
            orientation: self.orientation.or(other.orientation),
            degree_labels: self.degree_labels || other.degree_labels,
            no_degree_labels: self.no_degree_labels || other.no_degree_labels,
            marker_size: self.marker_size.or(other.marker_size),
            border_width: self.border_width.or(other.border_width),
            background_colour: self.background_colour.or(other.background_colour),
            dome_colour: self.dome_colour.or(other.dome_colour),
            border_colour: self.border_colour.or(other.border_colour),
            star_colour: self.star_colour.or(other.star_colour),
            bright_star_colour: self.bright_star_colour.or(other.bright_star_colour),
            constellation_line_colour: self
                .constellation_line_colour
                .or(other.constellation_line_colour),
            constellation_text_colour: self
                .constellation_text_colour
                .or(other.constellation_text_colour),
            direction_text_colour: self.direction_text_colour.or(other.direction_text_colour),
            degree_text_colour: self.degree_text_colour.or(other.degree_text_colour),
        }
    }

    /// Apply the user's choices on top of a subcommand's defaults.
    pub(crate) fn parse(self, defaults: RenderSettings) -> Result<RenderSettings, SkydomeError> {
        let Self {
            figure_size,
            dpi,
            font,
            orientation,
            degree_labels,
            no_degree_labels,
            marker_size,
            border_width,
            background_colour,
            dome_colour,
            border_colour,
            star_colour,
            bright_star_colour,
            constellation_line_colour,
            constellation_text_colour,
            direction_text_colour,
            degree_text_colour,
        } = self;

        if degree_labels && no_degree_labels {
            return Err(RenderArgsError::DegreeLabelsConflict.into());
        }
        let orientation = match orientation {
            Some(s) => Orientation::from_str(&s.to_lowercase())
                .map_err(|_| RenderArgsError::BadOrientation(s))?,
            None => defaults.orientation,
        };

        let colour = |name: &'static str, value: Option<String>, default| match value {
            Some(v) => parse_hex_colour(name, &v),
            None => Ok(default),
        };
        let d = defaults.palette;
        let palette = Palette {
            background: colour("background", background_colour, d.background)?,
            dome: colour("dome", dome_colour, d.dome)?,
            border: colour("border", border_colour, d.border)?,
            star: colour("star", star_colour, d.star)?,
            bright_star: colour("bright star", bright_star_colour, d.bright_star)?,
            constellation_line: colour(
                "constellation line",
                constellation_line_colour,
                d.constellation_line,
            )?,
            constellation_text: colour(
                "constellation text",
                constellation_text_colour,
                d.constellation_text,
            )?,
            direction_text: colour("direction text", direction_text_colour, d.direction_text)?,
            degree_text: colour("degree text", degree_text_colour, d.degree_text)?,
        };

        let border_width_pt = border_width.unwrap_or(defaults.border_width_pt);
        if !(border_width_pt.is_finite() && border_width_pt >= 0.0) {
            return Err(RenderArgsError::BadBorderWidth(border_width_pt).into());
        }
        let base_marker_size = marker_size.unwrap_or(defaults.base_marker_size);
        if !(base_marker_size.is_finite() && base_marker_size > 0.0) {
            return Err(RenderArgsError::BadMarkerSize(base_marker_size).into());
        }

        let settings = RenderSettings {
            figure_size_in: figure_size.unwrap_or(defaults.figure_size_in),
            dpi: dpi.unwrap_or(defaults.dpi),
            font: font.unwrap_or(defaults.font),
            orientation,
            palette,
            border_width_pt,
            degree_labels: if degree_labels {
                true
            } else if no_degree_labels {
                false
            } else {
                defaults.degree_labels
            },
            base_marker_size,
            ..defaults
        };
        settings.validate()?;
        let size = settings.image_size()?;

        if orientation == Orientation::Sky {
            "East is drawn on the left (\"sky\" orientation)".warn();
        }

        let mut printer = InfoPrinter::new("Drawing".into());
        printer.push_line(
            format!(
                "{size} x {size} px ({} in at {} DPI)",
                settings.figure_size_in, settings.dpi
            )
            .into(),
        );
        printer.push_line(format!("Font: {}", settings.font).into());
        printer.push_line(format!("Orientation: {orientation}").into());
        printer.push_block(vec![
            format!(
                "Background {}, dome {}, border {}",
                to_hex(palette.background),
                to_hex(palette.dome),
                to_hex(palette.border)
            )
            .into(),
            format!(
                "Stars {}, bright stars {}",
                to_hex(palette.star),
                to_hex(palette.bright_star)
            )
            .into(),
        ]);
        if !settings.degree_labels {
            printer.push_line("No degree labels".into());
        }
        printer.display();

        Ok(settings)
    }
}

#[derive(Error, Debug)]
pub(crate) enum RenderArgsError {
    #[error("Unrecognised orientation '{0}'; expected one of: compass, sky")]
    BadOrientation(String),

    #[error("The horizon ring width must be a non-negative number of points, but got {0}")]
    BadBorderWidth(f64),

    #[error("The star marker size must be a positive number, but got {0}")]
    BadMarkerSize(f64),

    #[error("Degree labels can't be both on and off")]
    DegreeLabelsConflict,
}
