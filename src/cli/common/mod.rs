// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Both `snapshot` and `animate`
//! need an observer, a catalogue, constellation data and a way to draw, so
//! those arguments are shared between them.

mod printers;
mod render;
mod sky;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};
pub(super) use render::{RenderArgs, RenderArgsError};
pub(super) use sky::{SkyArgs, SkyArgsError};

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    catalog::HIPPARCOS_URL,
    constants::{
        DEFAULT_LABEL_OFFSET_DEG, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_MAGNITUDE_LIMIT,
    },
    constellations::{ConstellationNames, CONSTELLATION_LINES_URL, CONSTELLATION_NAMES_URL},
    render::Orientation,
};

/// Where downloaded data is kept, unless the user says otherwise.
pub(super) const DEFAULT_DATA_DIR: &str = "skydome-data";
pub(super) const DEFAULT_FETCH_TIMEOUT: &str = "30s";
pub(super) const DEFAULT_FETCH_RETRIES: u32 = 3;

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref LATITUDE_HELP: String =
        format!("The observer's latitude, either signed degrees or with a hemisphere (e.g. \"33.9 S\"). Default: {DEFAULT_LATITUDE}");

    pub(super) static ref LONGITUDE_HELP: String =
        format!("The observer's longitude, either signed degrees (east is positive) or with a hemisphere (e.g. \"70.2 W\"). Default: {DEFAULT_LONGITUDE}");

    pub(super) static ref MAGNITUDE_LIMIT_HELP: String =
        format!("Stars dimmer than this apparent magnitude are not drawn. Default: {DEFAULT_MAGNITUDE_LIMIT}");

    pub(super) static ref CATALOG_URL_HELP: String =
        format!("Where to download the Hipparcos main catalogue from, if --catalog isn't given. Default: {HIPPARCOS_URL}");

    pub(super) static ref DATA_DIR_HELP: String =
        format!("The directory that downloaded catalogue and constellation data are kept in. Later runs reuse what's there. Default: {DEFAULT_DATA_DIR}");

    pub(super) static ref LINES_URL_HELP: String =
        format!("The d3-celestial constellation lines GeoJSON. Default: {CONSTELLATION_LINES_URL}");

    pub(super) static ref NAMES_URL_HELP: String =
        format!("The d3-celestial constellation names GeoJSON. Default: {CONSTELLATION_NAMES_URL}");

    pub(super) static ref FETCH_TIMEOUT_HELP: String =
        format!("How long to wait for each download attempt. Supports units, e.g. 10s or 500ms. Default: {DEFAULT_FETCH_TIMEOUT}");

    pub(super) static ref FETCH_RETRIES_HELP: String =
        format!("How many times to retry a failed download. Default: {DEFAULT_FETCH_RETRIES}");

    pub(super) static ref CONSTELLATION_NAMES_HELP: String =
        format!("Which names to label constellations with. Valid values: {}", ConstellationNames::iter().join(", "));

    pub(super) static ref LABEL_OFFSET_HELP: String =
        format!("How far constellation names are pulled towards the zenith from their anchor [degrees]. Default: {DEFAULT_LABEL_OFFSET_DEG}");

    pub(super) static ref ORIENTATION_HELP: String =
        format!("Which way azimuth runs around the dome. \"compass\" puts east on the right, \"sky\" puts east on the left. Valid values: {}. Default: {}", Orientation::iter().join(", "), Orientation::default());
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// Read an arguments file into whatever type is expected, based on the file
/// extension. This must be used in a function returning
/// `Result<_, SkydomeError>`.
macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::str::FromStr;

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let contents = std::fs::read_to_string(&$arg_file)?;
                toml::from_str(&contents).map_err(|err| {
                    SkydomeError::ArgFile(format!(
                        "Couldn't decode toml structure from {}:\n{err}",
                        $arg_file.display()
                    ))
                })?
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let contents = std::fs::read_to_string(&$arg_file)?;
                serde_json::from_str(&contents).map_err(|err| {
                    SkydomeError::ArgFile(format!(
                        "Couldn't decode json structure from {}:\n{err}",
                        $arg_file.display()
                    ))
                })?
            }

            None => {
                return Err(SkydomeError::ArgFile(format!(
                    "Argument file '{}' doesn't have a recognised file extension! Valid extensions are: {}",
                    $arg_file.display(),
                    *ARG_FILE_TYPES_COMMA_SEPARATED
                )))
            }
        }
    });
}
