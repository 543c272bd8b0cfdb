// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All angular constants are in degrees unless the name says otherwise. All
constants *must* be double precision.
 */

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Points at or below this altitude are not drawn \[degrees\].
pub const HORIZON_ALTITUDE_DEG: f64 = 0.0;

/// The polar radius of the dome boundary ring (i.e. the horizon) \[degrees of
/// zenith distance\].
pub const DOME_RADIUS_DEG: f64 = 90.0;

/// The polar radius at which cardinal and degree labels are placed.
pub const DOME_LABEL_RADIUS_DEG: f64 = 92.0;

/// The outer radial limit of the plot. Anything between the dome boundary and
/// this limit is room for labels.
pub const DOME_OUTER_LIMIT_DEG: f64 = 94.0;

/// Constellation labels are pulled this far toward the zenith from their
/// anchor \[degrees\].
pub const DEFAULT_LABEL_OFFSET_DEG: f64 = 3.0;

/// Stars at least this bright (i.e. a magnitude at or below this value) are
/// drawn in the "bright" colour with a reduced marker size.
pub const BRIGHT_STAR_MAGNITUDE: f64 = 2.0;

/// The marker-size multiplier applied to bright stars.
pub const BRIGHT_STAR_SIZE_FACTOR: f64 = 0.3;

/// The marker area \[points^2\] of a magnitude-0 star.
pub const DEFAULT_BASE_MARKER_SIZE: f64 = 100.0;

/// Stars dimmer than this magnitude are not drawn.
pub const DEFAULT_MAGNITUDE_LIMIT: f64 = 10.0;

/// Default observer position (Olsztyn, Poland).
pub const DEFAULT_LATITUDE: &str = "53.8000 N";
pub const DEFAULT_LONGITUDE: &str = "20.5099 E";

/// The Julian date of the Hipparcos catalogue epoch (J1991.25).
pub const HIPPARCOS_EPOCH_JD: f64 = 2448349.0625;

/// Days per Julian year.
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Milliarcseconds per degree.
pub const MAS_PER_DEG: f64 = 3.6e6;

/// The ratio of a sidereal day to a solar day is 1/this.
pub const SIDEREAL_RATE: f64 = 1.002_737_909_350_795;

/// DUT1 (UT1 - UTC) is kept within this bound by leap seconds \[seconds\].
pub const MAX_ABS_DUT1_SECONDS: f64 = 0.9;

/// Typographic points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;
