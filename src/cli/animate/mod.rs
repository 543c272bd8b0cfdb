// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Animate the sky dome over a span of time.


use std::path::PathBuf;

use clap::Parser;
use hifitime::Duration;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{display_warnings, InfoPrinter, RenderArgs, SkyArgs, Warn, ARG_FILE_HELP};
use crate::{
    constellations::ConstellationNames,
    params::AnimateParams,
    render::RenderSettings,
    sequence::{FailurePolicy, FrameSchedule},
    time::parse_instant,
    unit_parsing::parse_duration,
    SkydomeError,
};

const DEFAULT_STEP: &str = "10min";
const DEFAULT_NUM_FRAMES: usize = 144;
const DEFAULT_FRAME_DURATION: &str = "0.2s";
const DEFAULT_ANIMATION_NAME: &str = "night_sky_animation.gif";
const DEFAULT_OUTPUT_DIR: &str = "gif";
const DEFAULT_FIGURE_SIZE_IN: f64 = 8.0;
const DEFAULT_DPI: u32 = 150;

lazy_static::lazy_static! {
    static ref STEP_HELP: String =
        format!("The time between frames. Supports units, e.g. 30s, 10min, 1h; a bare number is seconds. Default: {DEFAULT_STEP}");

    static ref NUM_FRAMES_HELP: String =
        format!("How many frames to draw. Default: {DEFAULT_NUM_FRAMES}");

    static ref FRAME_DURATION_HELP: String =
        format!("How long each frame is shown in the animation. Supports units, e.g. 200ms. Default: {DEFAULT_FRAME_DURATION}");

    static ref ANIMATION_NAME_HELP: String =
        format!("The file name of the GIF, relative to the output directory. Default: {DEFAULT_ANIMATION_NAME}");

    static ref OUTPUT_DIR_HELP: String =
        format!("The directory the frames and the animation are written to. Default: {DEFAULT_OUTPUT_DIR}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct AnimateCliArgs {
    /// When the first frame is drawn, e.g. "2024-06-04 22:00". This is local
    /// time (see --utc-offset) unless it's RFC 3339, e.g.
    /// "2024-06-04T22:00:00Z".
    #[clap(short, long, help_heading = "TIME")]
    pub(super) start: Option<String>,

    /// How many hours local time is ahead of UTC, e.g. 2 for CEST. Default: 0
    #[clap(long, allow_hyphen_values = true, help_heading = "TIME")]
    pub(super) utc_offset: Option<f64>,

    #[clap(long, help = STEP_HELP.as_str(), help_heading = "TIME")]
    pub(super) step: Option<String>,

    #[clap(short, long, help = NUM_FRAMES_HELP.as_str(), help_heading = "TIME")]
    pub(super) num_frames: Option<usize>,

    #[clap(long, help = FRAME_DURATION_HELP.as_str(), help_heading = "ANIMATION")]
    pub(super) frame_duration: Option<String>,

    /// Stop at the first frame that fails to draw. By default, failed frames
    /// are left out of the animation and reported at the end.
    #[clap(long, help_heading = "ANIMATION")]
    #[serde(default)]
    pub(super) fail_fast: bool,

    /// Only draw stars.
    #[clap(long, help_heading = "ANIMATION")]
    #[serde(default)]
    pub(super) no_constellations: bool,

    #[clap(long, parse(from_os_str), help = ANIMATION_NAME_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) animation_name: Option<PathBuf>,

    #[clap(short, long, parse(from_os_str), help = OUTPUT_DIR_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct AnimateArgs {
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
    #[serde(rename = "animate")]
    #[serde(default)]
    pub(super) animate_args: AnimateCliArgs,
}

impl AnimateArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<AnimateArgs, SkydomeError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let AnimateArgs {
                args_file: _,
                sky_args,
                render_args,
                animate_args,
            } = unpack_arg_file!(arg_file);

            Ok(AnimateArgs {
                args_file: None,
                sky_args: cli_args.sky_args.merge(sky_args),
                render_args: cli_args.render_args.merge(render_args),
                animate_args: cli_args.animate_args.merge(animate_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<AnimateParams, SkydomeError> {
        debug!("{:#?}", self);

        let AnimateArgs {
            args_file: _,
            sky_args,
            render_args,
            animate_args:
                AnimateCliArgs {
                    start,
                    utc_offset,
                    step,
                    num_frames,
                    frame_duration,
                    fail_fast,
                    no_constellations,
                    animation_name,
                    output_dir,
                },
        } = self;

        let start_str = start.ok_or(AnimateArgsError::NoStart)?;
        let utc_offset = utc_offset.unwrap_or(0.0);
        let start = parse_instant(&start_str, utc_offset)?;
        let step_str = step.as_deref().unwrap_or(DEFAULT_STEP);
        let step = parse_positive_duration(step_str)
            .ok_or_else(|| AnimateArgsError::BadStep(step_str.to_string()))?;
        let num_frames = num_frames.unwrap_or(DEFAULT_NUM_FRAMES);
        let schedule = FrameSchedule::new(start, step, num_frames)?;

        let frame_duration_str = frame_duration.as_deref().unwrap_or(DEFAULT_FRAME_DURATION);
        let frame_duration = parse_positive_duration(frame_duration_str)
            .filter(|d| d.to_seconds() >= 1e-3)
            .ok_or_else(|| AnimateArgsError::BadFrameDuration(frame_duration_str.to_string()))?;

        let mut printer = InfoPrinter::new("Time".into());
        printer.push_block(vec![
            format!("First frame: {start_str} (UTC{utc_offset:+})").into(),
            format!("             {start}").into(),
        ]);
        printer.push_line(format!("Last frame:  {}", schedule.end()).into());
        printer.push_line(format!("{num_frames} frames, {step} apart").into());
        printer.display();

        let failure_policy = if fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Skip
        };
        let sky = sky_args.parse(!no_constellations, ConstellationNames::Common)?;
        let mut render_settings = render_args.parse(RenderSettings {
            figure_size_in: DEFAULT_FIGURE_SIZE_IN,
            dpi: DEFAULT_DPI,
            degree_labels: false,
            ..Default::default()
        })?;
        if no_constellations {
            render_settings.constellation_lines = false;
            render_settings.constellation_labels = false;
        }

        let frame_dir = output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let animation_file =
            frame_dir.join(animation_name.unwrap_or_else(|| DEFAULT_ANIMATION_NAME.into()));
        if animation_file.extension().and_then(|e| e.to_str()) != Some("gif") {
            format!(
                "{} doesn't end in .gif, but a GIF will be written",
                animation_file.display()
            )
            .warn();
        }

        let mut printer = InfoPrinter::new("Animation".into());
        printer.push_line(format!("Frames: {}", frame_dir.display()).into());
        printer.push_line(
            format!(
                "{} ({} per frame, looping)",
                animation_file.display(),
                frame_duration
            )
            .into(),
        );
        printer.push_line(
            match failure_policy {
                FailurePolicy::Skip => "Frames that fail are skipped",
                FailurePolicy::Abort => "Stopping at the first frame that fails",
            }
            .into(),
        );
        printer.display();

        display_warnings();

        Ok(AnimateParams {
            sky,
            schedule,
            render_settings,
            with_constellations: !no_constellations,
            frame_dir,
            animation_file,
            frame_duration,
            failure_policy,
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

        let outcome = params.run()?;
        if !outcome.skipped.is_empty() {
            info!(
                "{} frames in the animation; {} skipped",
                outcome.num_frames,
                outcome.skipped.len()
            );
        }
        Ok(())
    }
}

/// A duration with an optional unit, which must be positive.
fn parse_positive_duration(s: &str) -> Option<Duration> {
    let (value, unit) = parse_duration(s).ok()?;
    let duration = unit.to_duration(value);
    (value.is_finite() && duration > Duration::from_seconds(0.0)).then_some(duration)
}

impl AnimateCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.or(other.start),
            utc_offset: self.utc_offset.or(other.utc_offset),
            step: self.step.or(other.step),
            num_frames: self.num_frames.or(other.num_frames),
            frame_duration: self.frame_duration.or(other.frame_duration),
            fail_fast: self.fail_fast || other.fail_fast,
            no_constellations: self.no_constellations || other.no_constellations,
            animation_name: self.animation_name.or(other.animation_name),
            output_dir: self.output_dir.or(other.output_dir),
        }
    }
}

#[derive(Error, Debug)]
pub(super) enum AnimateArgsError {
    #[error("No start time was given; use e.g. --start \"2024-06-04 22:00\"")]
    NoStart,

    #[error("Couldn't parse '{0}' as a positive time step; expected e.g. 10min")]
    BadStep(String),

    #[error("Couldn't parse '{0}' as a frame duration of at least 1 ms; expected e.g. 200ms")]
    BadFrameDuration(String),
}
