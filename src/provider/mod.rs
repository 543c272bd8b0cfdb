// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where things are in an observer's sky.
//!
//! A [`CelestialProvider`] does whatever per-instant work is needed (Earth
//! orientation, precession) once, and hands back a [`SkyView`] that answers
//! position queries for that instant.


use hifitime::{Duration, Epoch};
use log::debug;
use marlu::{precession::precess_time, RADec};
use thiserror::Error;

use crate::{
    catalog::CatalogStar,
    constants::{
        DAYS_PER_JULIAN_YEAR, HIPPARCOS_EPOCH_JD, MAS_PER_DEG, MAX_ABS_DUT1_SECONDS, SIDEREAL_RATE,
    },
    observer::Observer,
};

/// An apparent horizontal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltAz {
    /// Altitude above the horizon \[degrees\].
    pub alt_deg: f64,

    /// Azimuth, north through east, in 0..360 \[degrees\].
    pub az_deg: f64,
}

/// Positions in the sky of one observer at one instant.
pub trait SkyView {
    /// The apparent position of a catalogue star.
    fn star(&self, star: &CatalogStar) -> AltAz;

    /// The apparent position of a fixed J2000 RA/Dec.
    fn point(&self, radec: RADec) -> AltAz;
}

pub trait CelestialProvider: Sync {
    fn observe_at(&self, epoch: Epoch, observer: &Observer) -> Box<dyn SkyView + '_>;
}

/// Positions from ERFA via `marlu`. Rather than precessing every star to the
/// instant, the observer's LMST and latitude are precessed back to J2000 once
/// per instant.
#[derive(Debug, Clone, Copy)]
pub struct ErfaProvider {
    /// UT1 - UTC.
    dut1: Duration,

    /// Use the J1991.25 catalogue proper motions.
    apply_proper_motion: bool,
}

impl ErfaProvider {
    /// Set up Earth-orientation parameters. Only DUT1 (UT1 - UTC) is needed;
    /// it must be within the ±0.9 s that leap seconds guarantee.
    pub fn load_ephemeris(dut1: Duration) -> Result<ErfaProvider, ProviderError> {
        let dut1_s = dut1.to_seconds();
        if dut1_s.is_nan() || dut1_s.abs() >= MAX_ABS_DUT1_SECONDS {
            return Err(ProviderError::BadDut1(dut1_s));
        }
        debug!("Using DUT1 = {dut1_s} s");
        Ok(ErfaProvider {
            dut1,
            apply_proper_motion: true,
        })
    }

    pub fn without_proper_motion(mut self) -> ErfaProvider {
        self.apply_proper_motion = false;
        self
    }
}

struct ErfaView {
    lmst_j2000_rad: f64,
    latitude_j2000_rad: f64,

    /// Julian years since the catalogue epoch, if proper motion is applied.
    pm_years: Option<f64>,
}

impl ErfaView {
    fn altaz(&self, radec: RADec) -> AltAz {
        let azel = radec
            .to_hadec(self.lmst_j2000_rad)
            .to_azel(self.latitude_j2000_rad);
        AltAz {
            alt_deg: azel.el.to_degrees(),
            az_deg: azel.az.to_degrees().rem_euclid(360.0),
        }
    }
}

impl SkyView for ErfaView {
    fn star(&self, star: &CatalogStar) -> AltAz {
        let radec = match self.pm_years {
            Some(years) => apply_proper_motion(star, years),
            None => star.radec(),
        };
        self.altaz(radec)
    }

    fn point(&self, radec: RADec) -> AltAz {
        self.altaz(radec)
    }
}

impl CelestialProvider for ErfaProvider {
    fn observe_at(&self, epoch: Epoch, observer: &Observer) -> Box<dyn SkyView + '_> {
        let llh = observer.to_lat_lng_height();
        // The "phase centre" only matters for the precessed hour angle, which
        // isn't used here.
        let info = precess_time(
            llh.longitude_rad,
            llh.latitude_rad,
            RADec::from_radians(0.0, llh.latitude_rad),
            epoch,
            self.dut1,
        );
        let pm_years = self
            .apply_proper_motion
            .then(|| (epoch.to_jde_utc_days() - HIPPARCOS_EPOCH_JD) / DAYS_PER_JULIAN_YEAR);
        Box::new(ErfaView {
            lmst_j2000_rad: info.lmst_j2000,
            latitude_j2000_rad: info.array_latitude_j2000,
            pm_years,
        })
    }
}

/// Linear proper motion. The RA rate is already scaled by cos(dec).
fn apply_proper_motion(star: &CatalogStar, years: f64) -> RADec {
    let dec_deg = star.dec_deg + star.pm_dec_mas_per_year * years / MAS_PER_DEG;
    let cos_dec = star.dec_deg.to_radians().cos();
    let ra_deg = if cos_dec.abs() > f64::EPSILON {
        star.ra_hours * 15.0 + star.pm_ra_mas_per_year * years / MAS_PER_DEG / cos_dec
    } else {
        star.ra_hours * 15.0
    };
    RADec::from_degrees(ra_deg.rem_euclid(360.0), dec_deg.clamp(-90.0, 90.0))
}

/// A stand-in sky for tests and offline use: altitude is declination, and
/// azimuth is right ascension plus the Earth's rotation since J2000. The
/// observer is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityProvider;

struct IdentityView {
    rotation_deg: f64,
}

impl IdentityView {
    fn altaz(&self, ra_deg: f64, dec_deg: f64) -> AltAz {
        AltAz {
            alt_deg: dec_deg,
            az_deg: (ra_deg + self.rotation_deg).rem_euclid(360.0),
        }
    }
}

impl SkyView for IdentityView {
    fn star(&self, star: &CatalogStar) -> AltAz {
        self.altaz(star.ra_hours * 15.0, star.dec_deg)
    }

    fn point(&self, radec: RADec) -> AltAz {
        self.altaz(radec.ra.to_degrees(), radec.dec.to_degrees())
    }
}

impl CelestialProvider for IdentityProvider {
    fn observe_at(&self, epoch: Epoch, _observer: &Observer) -> Box<dyn SkyView + '_> {
        let days = epoch.to_jde_utc_days() - 2451545.0;
        Box::new(IdentityView {
            rotation_deg: (360.0 * SIDEREAL_RATE * days).rem_euclid(360.0),
        })
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("DUT1 must be within ±{MAX_ABS_DUT1_SECONDS} s, but got {0} s")]
    BadDut1(f64),
}
