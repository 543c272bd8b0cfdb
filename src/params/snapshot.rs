// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render the sky at one instant.

use std::path::PathBuf;

use hifitime::Epoch;
use log::info;
use thiserror::Error;

use super::SkyParams;
use crate::{
    constellations::ConstellationError,
    render::{render_png, RenderError, RenderSettings},
};

/// Parameters needed to draw still images of the sky.
pub(crate) struct SnapshotParams {
    pub(crate) sky: SkyParams,

    /// When the sky is drawn.
    pub(crate) epoch: Epoch,

    pub(crate) render_settings: RenderSettings,

    /// Where to write an image of only the stars, if at all.
    pub(crate) stars_only_file: Option<PathBuf>,

    /// Where to write an image with constellation lines and names, if at all.
    pub(crate) constellations_file: Option<PathBuf>,
}

impl SnapshotParams {
    pub(crate) fn run(&self) -> Result<Vec<PathBuf>, SnapshotError> {
        let SnapshotParams {
            sky,
            epoch,
            render_settings,
            stars_only_file,
            constellations_file,
        } = self;

        let outputs = [(stars_only_file, false), (constellations_file, true)];
        let mut written = vec![];
        for (file, with_constellations) in outputs {
            let Some(file) = file else { continue };
            if let Some(parent) = file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let scene = sky.scene(*epoch, with_constellations)?;
            render_png(&scene, render_settings, file)?;
            info!(
                "Wrote {} ({} stars{})",
                file.display(),
                scene.stars.len(),
                if with_constellations {
                    format!(
                        ", {} constellation segments, {} labels",
                        scene.segments.len(),
                        scene.labels.len()
                    )
                } else {
                    String::new()
                }
            );
            written.push(file.clone());
        }

        Ok(written)
    }
}

#[derive(Error, Debug)]
pub(crate) enum SnapshotError {
    #[error(transparent)]
    Constellations(#[from] ConstellationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
