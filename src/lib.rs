// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Render star maps of the visible sky dome for an observer, either for a single
instant or as an animated sequence of frames.
 */

pub mod catalog;
mod cli;
pub mod constants;
pub mod constellations;
pub mod fetch;
pub mod observer;
mod params;
pub mod projection;
pub mod provider;
pub mod render;
pub mod sequence;
pub mod time;
pub(crate) mod unit_parsing;

// Re-exports.
pub use catalog::CatalogStar;
pub use cli::{Skydome, SkydomeError};
pub use constellations::{ConstellationCache, ConstellationLabel, ConstellationSegment};
pub use observer::Observer;
pub use projection::{ProjectedPoint, SkyScene};
pub use provider::{CelestialProvider, ErfaProvider, IdentityProvider, SkyView};

use crossbeam_utils::atomic::AtomicCell;

/// Should progress bars be drawn? This is set by the CLI.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
