// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for skydome subcommands.
//!
//! These are validated versions of the CLI arguments; anything here can be
//! run without any further checks on the inputs.

mod animate;
mod snapshot;

pub(crate) use animate::{AnimateError, AnimateParams};
pub(crate) use snapshot::{SnapshotError, SnapshotParams};

use std::path::Path;

use hifitime::Epoch;

use crate::{
    catalog::CatalogStar,
    constellations::{ConstellationCache, ConstellationError},
    observer::Observer,
    projection::{project_scene, ProjectionSettings, SkyScene},
    provider::CelestialProvider,
    render::{render_png, RenderSettings},
    sequence::{FrameError, FrameRenderer},
};

/// Everything needed to work out what the sky looks like at any instant.
pub(crate) struct SkyParams {
    pub(crate) observer: Observer,

    /// The catalogue, read once.
    pub(crate) stars: Vec<CatalogStar>,

    pub(crate) provider: Box<dyn CelestialProvider>,

    /// Constellation geometry, if any output needs it. It must be fetched
    /// before any frames are rendered in parallel.
    pub(crate) constellations: Option<ConstellationCache>,

    pub(crate) projection: ProjectionSettings,
}

impl SkyParams {
    /// Project the sky at `epoch`. Constellations are only included if asked
    /// for and available.
    pub(crate) fn scene(
        &self,
        epoch: Epoch,
        with_constellations: bool,
    ) -> Result<SkyScene, ConstellationError> {
        let constellations = if with_constellations {
            self.constellations.as_ref()
        } else {
            None
        };
        project_scene(
            &*self.provider,
            epoch,
            &self.observer,
            &self.stars,
            constellations,
            &self.projection,
        )
    }
}

/// Draws the sky into PNG files.
pub(crate) struct SkyRenderer<'a> {
    pub(crate) sky: &'a SkyParams,
    pub(crate) settings: &'a RenderSettings,
    pub(crate) with_constellations: bool,
}

impl FrameRenderer for SkyRenderer<'_> {
    fn render_frame(&self, epoch: Epoch, path: &Path) -> Result<(), FrameError> {
        let scene = self.sky.scene(epoch, self.with_constellations)?;
        render_png(&scene, self.settings, path)?;
        Ok(())
    }
}
