// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render the sky over a span of time and join the frames into an animation.

use std::path::PathBuf;

use hifitime::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use thiserror::Error;

use super::{SkyParams, SkyRenderer};
use crate::{
    render::RenderSettings,
    sequence::{run_sequence, write_gif, FailurePolicy, FrameSchedule, SequenceError},
    PROGRESS_BARS,
};

/// Parameters needed to make an animation of the sky.
pub(crate) struct AnimateParams {
    pub(crate) sky: SkyParams,

    /// When each frame is drawn.
    pub(crate) schedule: FrameSchedule,

    pub(crate) render_settings: RenderSettings,

    /// Draw constellation lines and names on every frame?
    pub(crate) with_constellations: bool,

    /// Where the frame images go.
    pub(crate) frame_dir: PathBuf,

    /// The GIF file.
    pub(crate) animation_file: PathBuf,

    /// How long each frame is shown for.
    pub(crate) frame_duration: Duration,

    pub(crate) failure_policy: FailurePolicy,
}

/// What came out of a run.
#[derive(Debug)]
pub(crate) struct AnimateOutcome {
    pub(crate) num_frames: usize,
    pub(crate) skipped: Vec<usize>,
}

impl AnimateParams {
    pub(crate) fn run(&self) -> Result<AnimateOutcome, AnimateError> {
        let AnimateParams {
            sky,
            schedule,
            render_settings,
            with_constellations,
            frame_dir,
            animation_file,
            frame_duration,
            failure_policy,
        } = self;

        let renderer = SkyRenderer {
            sky,
            settings: render_settings,
            with_constellations: *with_constellations,
        };

        let draw_target = if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        };
        let progress = ProgressBar::with_draw_target(Some(schedule.num_frames as _), draw_target)
            .with_style(
                ProgressStyle::default_bar()
                    .template("{msg:17}: [{wide_bar:.blue}] {pos:3}/{len:3} frames ({elapsed_precise}<{eta_precise})").unwrap()
                    .progress_chars("=> "),
            )
            .with_position(0)
            .with_message("Rendering frames");

        let outcome = run_sequence(schedule, frame_dir, &renderer, *failure_policy, &progress)?;
        write_gif(&outcome.frame_paths(), animation_file, *frame_duration)?;
        info!(
            "Animation {} has {} frames at {} each",
            animation_file.display(),
            outcome.frames.len(),
            frame_duration
        );

        Ok(AnimateOutcome {
            num_frames: outcome.frames.len(),
            skipped: outcome.skipped.iter().map(|s| s.index).collect(),
        })
    }
}

#[derive(Error, Debug)]
pub(crate) enum AnimateError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}
