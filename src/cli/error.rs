// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all skydome-related errors. This should be the *only* error
//! enum that is publicly visible.

use thiserror::Error;

use super::{
    animate::AnimateArgsError,
    common::{RenderArgsError, SkyArgsError},
    snapshot::SnapshotArgsError,
};
use crate::{
    catalog::{CatalogError, HIPPARCOS_URL},
    constellations::{ConstellationError, CONSTELLATION_LINES_URL},
    fetch::FetchError,
    observer::ObserverError,
    params::{AnimateError, SnapshotError},
    provider::ProviderError,
    render::RenderError,
    sequence::SequenceError,
    time::TimeError,
};

/// The *only* publicly visible error from skydome. Each category carries a
/// hint on what to do about it, unless it's "generic".
#[derive(Error, Debug)]
pub enum SkydomeError {
    /// An error related to the star catalogue.
    #[error("{0}\n\nThe Hipparcos main catalogue is available from {HIPPARCOS_URL}; a local copy can be given with --catalog")]
    Catalogue(String),

    /// An error related to constellation lines or names.
    #[error("{0}\n\nConstellation data is read from d3-celestial, e.g. {CONSTELLATION_LINES_URL}; --offline reads it from the data directory instead")]
    Constellations(String),

    /// An error related to the observer, time or Earth orientation.
    #[error("{0}\n\nLatitudes and longitudes are signed degrees or have a hemisphere, e.g. \"53.8000 N\"; times look like \"2024-06-04 22:00\"")]
    Ephemeris(String),

    /// An error related to drawing.
    #[error("{0}\n\nColours are hex, e.g. \"#0b0c1a\"; text needs the --font family to be installed")]
    Render(String),

    /// An error related to making an animation.
    #[error("{0}\n\nBy default, frames that fail are skipped; --fail-fast stops at the first one")]
    Animation(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files are TOML or JSON, e.g. as written by --save-toml")]
    ArgFile(String),

    /// A generic error that can't be clarified further with documentation.
    #[error("{0}")]
    Generic(String),
}

impl From<CatalogError> for SkydomeError {
    fn from(e: CatalogError) -> Self {
        let s = e.to_string();
        match e {
            CatalogError::IO(_) => Self::Generic(s),
            _ => Self::Catalogue(s),
        }
    }
}

impl From<FetchError> for SkydomeError {
    fn from(e: FetchError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<ConstellationError> for SkydomeError {
    fn from(e: ConstellationError) -> Self {
        let s = e.to_string();
        match e {
            ConstellationError::IO(_) => Self::Generic(s),
            _ => Self::Constellations(s),
        }
    }
}

impl From<ObserverError> for SkydomeError {
    fn from(e: ObserverError) -> Self {
        Self::Ephemeris(e.to_string())
    }
}

impl From<TimeError> for SkydomeError {
    fn from(e: TimeError) -> Self {
        Self::Ephemeris(e.to_string())
    }
}

impl From<ProviderError> for SkydomeError {
    fn from(e: ProviderError) -> Self {
        Self::Ephemeris(e.to_string())
    }
}

impl From<RenderError> for SkydomeError {
    fn from(e: RenderError) -> Self {
        let s = e.to_string();
        match e {
            RenderError::IO(_) => Self::Generic(s),
            _ => Self::Render(s),
        }
    }
}

impl From<SequenceError> for SkydomeError {
    fn from(e: SequenceError) -> Self {
        let s = e.to_string();
        match e {
            SequenceError::Time(_) => Self::Ephemeris(s),
            SequenceError::IO(_) => Self::Generic(s),
            SequenceError::Frame { .. }
            | SequenceError::NoFrames { .. }
            | SequenceError::BadFrameDuration(_)
            | SequenceError::Image(_) => Self::Animation(s),
        }
    }
}

impl From<SnapshotError> for SkydomeError {
    fn from(e: SnapshotError) -> Self {
        match e {
            SnapshotError::Constellations(e) => Self::from(e),
            SnapshotError::Render(e) => Self::from(e),
            SnapshotError::IO(e) => Self::from(e),
        }
    }
}

impl From<AnimateError> for SkydomeError {
    fn from(e: AnimateError) -> Self {
        match e {
            AnimateError::Sequence(e) => Self::from(e),
        }
    }
}

impl From<SkyArgsError> for SkydomeError {
    fn from(e: SkyArgsError) -> Self {
        let s = e.to_string();
        match e {
            SkyArgsError::OfflineWithoutCatalogue(_) => Self::Catalogue(s),
            SkyArgsError::BadMagnitudeLimit(_)
            | SkyArgsError::BadLabelOffset(_)
            | SkyArgsError::BadFetchTimeout(_)
            | SkyArgsError::BadConstellationNames(_) => Self::Generic(s),
        }
    }
}

impl From<RenderArgsError> for SkydomeError {
    fn from(e: RenderArgsError) -> Self {
        Self::Render(e.to_string())
    }
}

impl From<SnapshotArgsError> for SkydomeError {
    fn from(e: SnapshotArgsError) -> Self {
        let s = e.to_string();
        match e {
            SnapshotArgsError::NoTime => Self::Ephemeris(s),
            SnapshotArgsError::BadOverlay(_) => Self::Generic(s),
        }
    }
}

impl From<AnimateArgsError> for SkydomeError {
    fn from(e: AnimateArgsError) -> Self {
        let s = e.to_string();
        match e {
            AnimateArgsError::NoStart => Self::Ephemeris(s),
            AnimateArgsError::BadStep(_) | AnimateArgsError::BadFrameDuration(_) => {
                Self::Animation(s)
            }
        }
    }
}

impl From<std::io::Error> for SkydomeError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
