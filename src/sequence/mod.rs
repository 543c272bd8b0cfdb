// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rendering a sequence of frames at regularly-spaced instants, and joining
//! them into an animation.
//!
//! Frames are rendered in parallel, but the results are always kept in
//! schedule order.

#[cfg(test)]
mod tests;

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use hifitime::{Duration, Epoch};
use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, Frame,
};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use rayon::prelude::*;
use thiserror::Error;
use vec1::Vec1;

use crate::{
    constellations::ConstellationError,
    render::RenderError,
    time::{frame_timestamps, TimeError},
};

/// GIF colour quantisation speed; 1 is slowest and best, 30 is fastest.
const GIF_QUANTISATION_SPEED: i32 = 10;

/// When to render frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSchedule {
    pub start: Epoch,
    pub step: Duration,
    pub num_frames: usize,
}

impl FrameSchedule {
    pub fn new(start: Epoch, step: Duration, num_frames: usize) -> Result<Self, SequenceError> {
        let schedule = FrameSchedule {
            start,
            step,
            num_frames,
        };
        // Validates the step and the number of frames.
        schedule.timestamps()?;
        Ok(schedule)
    }

    /// `start + i * step` for each frame `i`.
    pub fn timestamps(&self) -> Result<Vec1<Epoch>, TimeError> {
        frame_timestamps(self.start, self.step, self.num_frames)
    }

    pub fn end(&self) -> Epoch {
        self.start + self.step * self.num_frames.saturating_sub(1) as i64
    }
}

/// The path of a frame file. Indices are zero-padded to at least 3 digits,
/// or enough digits for the biggest index.
pub fn frame_filename(dir: &Path, index: usize, num_frames: usize) -> PathBuf {
    let width = num_frames.saturating_sub(1).to_string().len().max(3);
    dir.join(format!("frame_{index:0width$}.png"))
}

/// Why a single frame failed.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error(transparent)]
    Constellations(#[from] ConstellationError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Something that can draw the sky at an instant into a file.
pub trait FrameRenderer: Sync {
    fn render_frame(&self, epoch: Epoch, path: &Path) -> Result<(), FrameError>;
}

/// What to do when a frame fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave the frame out of the animation and carry on.
    #[default]
    Skip,

    /// Give up on the whole sequence.
    Abort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub index: usize,
    pub epoch: Epoch,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFrame {
    pub index: usize,
    pub epoch: Epoch,
    pub reason: String,
}

/// The frames that rendered and the frames that didn't, both in schedule
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOutcome {
    pub frames: Vec1<RenderedFrame>,
    pub skipped: Vec<SkippedFrame>,
}

impl SequenceOutcome {
    pub fn frame_paths(&self) -> Vec<&Path> {
        self.frames.iter().map(|f| f.path.as_path()).collect()
    }
}

/// Render every frame of a schedule into `output_dir`, which is created if
/// necessary.
pub fn run_sequence(
    schedule: &FrameSchedule,
    output_dir: &Path,
    renderer: &dyn FrameRenderer,
    policy: FailurePolicy,
    progress: &ProgressBar,
) -> Result<SequenceOutcome, SequenceError> {
    let timestamps = schedule.timestamps()?;
    std::fs::create_dir_all(output_dir)?;
    debug!(
        "Rendering {} frames from {} to {} into {}",
        schedule.num_frames,
        schedule.start,
        schedule.end(),
        output_dir.display()
    );

    let render = |(index, &epoch): (usize, &Epoch)| {
        let path = frame_filename(output_dir, index, schedule.num_frames);
        let result = renderer.render_frame(epoch, &path);
        progress.inc(1);
        (index, epoch, path, result)
    };

    type FrameResult = (usize, Epoch, PathBuf, Result<(), FrameError>);
    let results: Result<Vec<FrameResult>, SequenceError> = match policy {
        FailurePolicy::Skip => Ok(timestamps
            .as_slice()
            .par_iter()
            .enumerate()
            .map(render)
            .collect()),
        FailurePolicy::Abort => timestamps
            .as_slice()
            .par_iter()
            .enumerate()
            .map(render)
            .map(|(index, epoch, path, result)| match result {
                Ok(()) => Ok((index, epoch, path, Ok(()))),
                Err(source) => Err(SequenceError::Frame {
                    index,
                    epoch,
                    source,
                }),
            })
            .collect(),
    };
    // Finish the bar before any error goes up.
    let results = match results {
        Ok(r) => {
            progress.abandon_with_message("Finished rendering frames");
            r
        }
        Err(e) => {
            progress.abandon_with_message("Rendering stopped");
            return Err(e);
        }
    };

    let mut frames = vec![];
    let mut skipped = vec![];
    for (index, epoch, path, result) in results {
        match result {
            Ok(()) => frames.push(RenderedFrame { index, epoch, path }),
            Err(e) => {
                warn!("Frame {index} ({epoch}) failed and was skipped: {e}");
                skipped.push(SkippedFrame {
                    index,
                    epoch,
                    reason: e.to_string(),
                });
            }
        }
    }

    if !skipped.is_empty() {
        let indices: Vec<String> = skipped.iter().map(|s| s.index.to_string()).collect();
        warn!(
            "{} of {} frames were skipped: {}",
            skipped.len(),
            schedule.num_frames,
            indices.join(", ")
        );
    }
    let frames = Vec1::try_from_vec(frames).map_err(|_| SequenceError::NoFrames {
        num_skipped: skipped.len(),
    })?;
    Ok(SequenceOutcome { frames, skipped })
}

/// Join image files into a GIF that loops forever, showing each frame for
/// `frame_duration`.
pub fn write_gif<P: AsRef<Path>>(
    frames: &[P],
    output: &Path,
    frame_duration: Duration,
) -> Result<(), SequenceError> {
    let ms = frame_duration.to_seconds() * 1000.0;
    if !(ms.is_finite() && ms >= 1.0) || ms > u32::MAX as f64 {
        return Err(SequenceError::BadFrameDuration(frame_duration));
    }
    let delay = Delay::from_numer_denom_ms(ms.round() as u32, 1);

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut encoder =
        GifEncoder::new_with_speed(BufWriter::new(File::create(output)?), GIF_QUANTISATION_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;
    for path in frames {
        let image = image::open(path.as_ref())?.into_rgba8();
        encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
    }
    // The GIF trailer is written when the encoder is dropped.
    drop(encoder);

    info!("Wrote {} frames to {}", frames.len(), output.display());
    Ok(())
}

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("Frame {index} ({epoch}) failed: {source}")]
    Frame {
        index: usize,
        epoch: Epoch,
        source: FrameError,
    },

    #[error("No frames were rendered ({num_skipped} failed)")]
    NoFrames { num_skipped: usize },

    #[error("The frame duration must be at least 1 ms, but got {0}")]
    BadFrameDuration(Duration),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error("Couldn't make the animation: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
