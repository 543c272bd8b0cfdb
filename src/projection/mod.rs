// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning sky positions into polar sky-dome coordinates.
//!
//! The dome's radial coordinate is the zenith distance (90° - altitude), so
//! the zenith is at the centre and the horizon is at the rim. The angular
//! coordinate is the azimuth. Anything at or below the horizon has no
//! projection at all.

#[cfg(test)]
mod tests;

use hifitime::Epoch;
use log::trace;
use marlu::RADec;

use crate::{
    catalog::CatalogStar,
    constants::{
        DEFAULT_LABEL_OFFSET_DEG, DEFAULT_MAGNITUDE_LIMIT, DOME_RADIUS_DEG, HORIZON_ALTITUDE_DEG,
    },
    constellations::{ConstellationCache, ConstellationError},
    observer::Observer,
    provider::{AltAz, CelestialProvider, SkyView},
};

/// A position on the sky dome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Zenith distance \[degrees\].
    pub radius_deg: f64,

    /// Azimuth \[radians\].
    pub theta_rad: f64,

    /// Only stars have a magnitude.
    pub magnitude: Option<f64>,
}

/// A constellation name and where to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedLabel {
    pub text: String,
    pub point: ProjectedPoint,
}

/// How the projector filters things.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    /// Stars dimmer than this are left out.
    pub magnitude_limit: f64,

    /// How far labels are pulled towards the zenith from their anchors
    /// \[degrees\].
    pub label_offset_deg: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        ProjectionSettings {
            magnitude_limit: DEFAULT_MAGNITUDE_LIMIT,
            label_offset_deg: DEFAULT_LABEL_OFFSET_DEG,
        }
    }
}

/// Everything that can be drawn for one instant.
#[derive(Debug, Clone)]
pub struct SkyScene {
    pub epoch: Epoch,
    pub stars: Vec<ProjectedPoint>,
    pub segments: Vec<(ProjectedPoint, ProjectedPoint)>,
    pub labels: Vec<ProjectedLabel>,

    /// Were constellations requested for this scene? If so, empty `segments`
    /// and `labels` mean nothing was above the horizon.
    pub has_constellations: bool,
}

/// The dome radius for an altitude. `None` at or below the horizon.
pub fn zenith_distance(alt_deg: f64) -> Option<f64> {
    // NaN altitudes fail this comparison too.
    if alt_deg > HORIZON_ALTITUDE_DEG {
        Some(DOME_RADIUS_DEG - alt_deg)
    } else {
        None
    }
}

fn project_altaz(altaz: AltAz, magnitude: Option<f64>) -> Option<ProjectedPoint> {
    zenith_distance(altaz.alt_deg).map(|radius_deg| ProjectedPoint {
        radius_deg,
        theta_rad: altaz.az_deg.to_radians(),
        magnitude,
    })
}

/// Project a catalogue star, if it's above the horizon and bright enough.
pub fn project_star(
    view: &dyn SkyView,
    star: &CatalogStar,
    magnitude_limit: f64,
) -> Option<ProjectedPoint> {
    if star.magnitude > magnitude_limit {
        return None;
    }
    project_altaz(view.star(star), Some(star.magnitude))
}

/// Project a fixed RA/Dec, if it's above the horizon.
pub fn project_point(view: &dyn SkyView, radec: RADec) -> Option<ProjectedPoint> {
    project_altaz(view.point(radec), None)
}

/// Project both ends of a line. If either end is below the horizon, the line
/// is dropped.
pub fn project_segment(
    view: &dyn SkyView,
    start: RADec,
    end: RADec,
) -> Option<(ProjectedPoint, ProjectedPoint)> {
    let start = project_point(view, start)?;
    let end = project_point(view, end)?;
    Some((start, end))
}

/// Project a label anchor, then pull it `offset_deg` towards the zenith. The
/// radius never goes below 0.
pub fn project_label(view: &dyn SkyView, anchor: RADec, offset_deg: f64) -> Option<ProjectedPoint> {
    project_point(view, anchor).map(|mut p| {
        p.radius_deg = (p.radius_deg - offset_deg).max(0.0);
        p
    })
}

/// Project all stars (and, if given, constellations) for one instant.
pub fn project_scene(
    provider: &dyn CelestialProvider,
    epoch: Epoch,
    observer: &Observer,
    stars: &[CatalogStar],
    constellations: Option<&ConstellationCache>,
    settings: &ProjectionSettings,
) -> Result<SkyScene, ConstellationError> {
    let view = provider.observe_at(epoch, observer);
    let view: &dyn SkyView = &*view;

    let projected_stars: Vec<ProjectedPoint> = stars
        .iter()
        .filter_map(|s| project_star(view, s, settings.magnitude_limit))
        .collect();

    let (segments, labels) = match constellations {
        Some(cache) => {
            let segments = cache
                .segments()?
                .iter()
                .filter_map(|s| project_segment(view, s.start, s.end))
                .collect();
            let labels = cache
                .labels()?
                .iter()
                .filter_map(|l| {
                    project_label(view, l.anchor, settings.label_offset_deg).map(|point| {
                        ProjectedLabel {
                            text: cache.translate(&l.code).to_string(),
                            point,
                        }
                    })
                })
                .collect();
            (segments, labels)
        }
        None => (vec![], vec![]),
    };

    trace!(
        "{epoch}: {} stars, {} segments and {} labels visible",
        projected_stars.len(),
        segments.len(),
        labels.len()
    );
    Ok(SkyScene {
        epoch,
        stars: projected_stars,
        segments,
        labels,
        has_constellations: constellations.is_some(),
    })
}
