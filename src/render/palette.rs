// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use plotters::style::RGBColor;

use super::RenderError;

/// The colours of a sky map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Outside the dome.
    pub background: RGBColor,
    /// Inside the dome.
    pub dome: RGBColor,
    /// The horizon ring.
    pub border: RGBColor,
    pub star: RGBColor,
    pub bright_star: RGBColor,
    pub constellation_line: RGBColor,
    pub constellation_text: RGBColor,
    /// The N, E, S and W labels.
    pub direction_text: RGBColor,
    pub degree_text: RGBColor,
}

impl Default for Palette {
    /// A dark palette with blueish stars.
    fn default() -> Self {
        Palette {
            background: RGBColor(0x0b, 0x0c, 0x1a),
            dome: RGBColor(0x12, 0x16, 0x30),
            border: RGBColor(0x44, 0x55, 0x77),
            star: RGBColor(0xaa, 0xbb, 0xff),
            bright_star: RGBColor(0xff, 0xff, 0xff),
            constellation_line: RGBColor(0x88, 0x99, 0xcc),
            constellation_text: RGBColor(0xcc, 0xdd, 0xee),
            direction_text: RGBColor(0xdd, 0xee, 0xff),
            degree_text: RGBColor(0xaa, 0xbb, 0xcc),
        }
    }
}

/// Parse a colour like "#aabbff" (the '#' is optional) or "#abf". `name` is
/// only used for error messages.
pub fn parse_hex_colour(name: &'static str, value: &str) -> Result<RGBColor, RenderError> {
    let err = || RenderError::BadColour {
        name,
        value: value.to_string(),
    };

    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return Err(err());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
    match hex.len() {
        6 => Ok(RGBColor(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        // "#abf" is short for "#aabbff".
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|c| c * 17);
            Ok(RGBColor(short(0)?, short(1)?, short(2)?))
        }
        _ => Err(err()),
    }
}

/// The inverse of [`parse_hex_colour`].
pub fn to_hex(colour: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", colour.0, colour.1, colour.2)
}
