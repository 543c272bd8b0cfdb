// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The geographic position of whoever is looking up at the sky.

use marlu::LatLngHeight;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unit_parsing::{parse_angle, AngleAxis, UnitParseError};

/// An observer on the Earth's surface. This doesn't change over a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// Geodetic latitude \[degrees\]. North is positive.
    pub latitude_deg: f64,

    /// Longitude \[degrees\]. East is positive.
    pub longitude_deg: f64,

    /// Height above the ellipsoid \[metres\].
    pub height_m: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_m: f64) -> Result<Self, ObserverError> {
        if !latitude_deg.is_finite() || latitude_deg.abs() > 90.0 {
            return Err(ObserverError::LatitudeOutOfRange(latitude_deg));
        }
        if !longitude_deg.is_finite() || longitude_deg.abs() > 180.0 {
            return Err(ObserverError::LongitudeOutOfRange(longitude_deg));
        }
        if !height_m.is_finite() {
            return Err(ObserverError::BadHeight(height_m));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            height_m,
        })
    }

    /// Make an [`Observer`] from user-supplied strings, e.g. "53.8000 N" and
    /// "20.5099 E", or signed degrees.
    pub fn from_strs(latitude: &str, longitude: &str, height_m: f64) -> Result<Self, ObserverError> {
        let latitude_deg = parse_angle(latitude, AngleAxis::Latitude)?;
        let longitude_deg = parse_angle(longitude, AngleAxis::Longitude)?;
        Self::new(latitude_deg, longitude_deg, height_m)
    }

    pub fn to_lat_lng_height(self) -> LatLngHeight {
        LatLngHeight {
            longitude_rad: self.longitude_deg.to_radians(),
            latitude_rad: self.latitude_deg.to_radians(),
            height_metres: self.height_m,
        }
    }
}

impl std::fmt::Display for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.latitude_deg < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude_deg < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.4}° {ns}, {:.4}° {ew}, {:.1}m",
            self.latitude_deg.abs(),
            self.longitude_deg.abs(),
            self.height_m
        )
    }
}

#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("Latitude {0}° is not within -90° to 90°")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0}° is not within -180° to 180°")]
    LongitudeOutOfRange(f64),

    #[error("Observer height {0} is not a finite number of metres")]
    BadHeight(f64),

    #[error(transparent)]
    Parse(#[from] UnitParseError),
}
