// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnitParseError {
    #[error("Successfully parsed a time unit ({unit}), but could not parse the numerical component of '{input}'")]
    GotTimeUnitButCantParse { input: String, unit: &'static str },

    #[error("'{input}' has hemisphere '{letter}', which isn't valid for a {axis}")]
    BadHemisphere {
        input: String,
        axis: &'static str,
        letter: char,
    },

    #[error("'{0}' has both a sign and a hemisphere; use one or the other")]
    SignAndHemisphere(String),

    #[error("The {axis} '{input}' is outside of -{limit}° to {limit}°")]
    AngleOutOfRange {
        input: String,
        axis: &'static str,
        limit: f64,
    },

    #[error("Could not parse '{input}' as a {unit_type}")]
    Unknown {
        input: String,
        unit_type: &'static str,
    },
}
