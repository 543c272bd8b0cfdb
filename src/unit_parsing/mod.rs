// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to parse strings into plain numbers or some quantity with a unit.

mod error;

pub(crate) use error::*;

use hifitime::{Duration, Unit};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, EnumIter, EnumString, IntoStaticStr)]
pub(crate) enum DurationUnit {
    /// Milliseconds
    #[strum(serialize = "ms")]
    Ms,

    /// Seconds
    #[strum(serialize = "s")]
    S,

    /// Minutes
    #[strum(serialize = "min")]
    Min,

    /// Hours
    #[strum(serialize = "h")]
    H,

    /// Days
    #[strum(serialize = "d")]
    D,

    NoUnit,
}

impl DurationUnit {
    /// Turn a parsed number into a [`Duration`]. Naked numbers are seconds.
    pub(crate) fn to_duration(self, value: f64) -> Duration {
        let unit = match self {
            DurationUnit::Ms => Unit::Millisecond,
            DurationUnit::S | DurationUnit::NoUnit => Unit::Second,
            DurationUnit::Min => Unit::Minute,
            DurationUnit::H => Unit::Hour,
            DurationUnit::D => Unit::Day,
        };
        Duration::from_f64(value, unit)
    }
}

/// Parse a string that may have a unit of time attached to it.
pub(crate) fn parse_duration(s: &str) -> Result<(f64, DurationUnit), UnitParseError> {
    // Try to parse a naked number.
    let maybe_number: Option<f64> = s.trim().parse().ok();
    if let Some(number) = maybe_number {
        return Ok((number, DurationUnit::NoUnit));
    };

    // That didn't work; let's search over our supported units.
    let suffix = s
        .trim()
        .trim_start_matches(|c| char::is_numeric(c) || c == '.')
        .trim();
    for unit in DurationUnit::iter().filter(|&u| u != DurationUnit::NoUnit) {
        let unit_str: &'static str = unit.into();
        if suffix.to_lowercase() == unit_str {
            let prefix = s.trim().trim_end_matches(char::is_alphabetic).trim();
            let number: f64 = match prefix.parse() {
                Ok(n) => n,
                Err(_) => {
                    return Err(UnitParseError::GotTimeUnitButCantParse {
                        input: s.to_string(),
                        unit: unit_str,
                    })
                }
            };
            return Ok((number, unit));
        }
    }

    // If we made it this far, we don't know how to parse the string.
    Err(UnitParseError::Unknown {
        input: s.to_string(),
        unit_type: "duration",
    })
}

/// Which geographic coordinate an angle string describes. This determines the
/// allowed hemisphere letters and range.
#[derive(Debug, Clone, Copy, PartialEq, IntoStaticStr)]
pub(crate) enum AngleAxis {
    #[strum(serialize = "latitude")]
    Latitude,

    #[strum(serialize = "longitude")]
    Longitude,
}

impl AngleAxis {
    fn limit(self) -> f64 {
        match self {
            AngleAxis::Latitude => 90.0,
            AngleAxis::Longitude => 180.0,
        }
    }

    /// The hemisphere letters for this axis. The first is positive.
    fn hemispheres(self) -> [char; 2] {
        match self {
            AngleAxis::Latitude => ['N', 'S'],
            AngleAxis::Longitude => ['E', 'W'],
        }
    }
}

/// Parse a latitude or longitude into signed degrees. Both plain signed
/// numbers ("-33.9") and hemisphere strings ("33.9 S", "20.5099E") are
/// accepted. A degree symbol between the number and the letter is ignored.
pub(crate) fn parse_angle(s: &str, axis: AngleAxis) -> Result<f64, UnitParseError> {
    let axis_str: &'static str = axis.into();
    let trimmed = s.trim();

    let (number_str, sign) = match trimmed.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            let letter = c.to_ascii_uppercase();
            let [positive, negative] = axis.hemispheres();
            let sign = if letter == positive {
                1.0
            } else if letter == negative {
                -1.0
            } else {
                return Err(UnitParseError::BadHemisphere {
                    input: s.to_string(),
                    axis: axis_str,
                    letter: c,
                });
            };
            let number_str = trimmed[..trimmed.len() - 1].trim_end().trim_end_matches('°');
            // A sign and a hemisphere together are ambiguous.
            if number_str.starts_with('-') || number_str.starts_with('+') {
                return Err(UnitParseError::SignAndHemisphere(s.to_string()));
            }
            (number_str.trim(), sign)
        }
        _ => (trimmed.trim_end_matches('°'), 1.0),
    };

    let value: f64 = number_str.parse().map_err(|_| UnitParseError::Unknown {
        input: s.to_string(),
        unit_type: axis_str,
    })?;
    let value = value * sign;
    if !value.is_finite() || value.abs() > axis.limit() {
        return Err(UnitParseError::AngleOutOfRange {
            input: s.to_string(),
            axis: axis_str,
            limit: axis.limit(),
        });
    }
    Ok(value)
}
