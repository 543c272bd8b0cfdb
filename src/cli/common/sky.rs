// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arguments describing the observer and where the sky's data comes from.

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use hifitime::Duration;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    InfoPrinter, Warn, CATALOG_URL_HELP, CONSTELLATION_NAMES_HELP, DATA_DIR_HELP,
    DEFAULT_DATA_DIR, DEFAULT_FETCH_RETRIES, DEFAULT_FETCH_TIMEOUT, FETCH_RETRIES_HELP,
    FETCH_TIMEOUT_HELP, LABEL_OFFSET_HELP, LATITUDE_HELP, LINES_URL_HELP, LONGITUDE_HELP,
    MAGNITUDE_LIMIT_HELP, NAMES_URL_HELP,
};
use crate::{
    catalog::{catalog_path, ensure_catalog, load_catalog, HIPPARCOS_URL},
    constants::{
        DEFAULT_LABEL_OFFSET_DEG, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_MAGNITUDE_LIMIT,
    },
    constellations::{
        ConstellationCache, ConstellationNames, HttpGeometrySource, CONSTELLATION_LINES_URL,
        CONSTELLATION_NAMES_URL,
    },
    fetch::Fetcher,
    observer::Observer,
    params::SkyParams,
    projection::ProjectionSettings,
    provider::ErfaProvider,
    unit_parsing::parse_duration,
    SkydomeError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct SkyArgs {
    #[clap(long, help = LATITUDE_HELP.as_str(), help_heading = "OBSERVER", allow_hyphen_values = true)]
    pub(crate) latitude: Option<String>,

    #[clap(long, help = LONGITUDE_HELP.as_str(), help_heading = "OBSERVER", allow_hyphen_values = true)]
    pub(crate) longitude: Option<String>,

    /// The observer's height above sea level [metres]. Default: 0
    #[clap(long, help_heading = "OBSERVER", allow_hyphen_values = true)]
    pub(crate) height: Option<f64>,

    /// UT1 - UTC [seconds]. Default: 0
    #[clap(long, help_heading = "OBSERVER", allow_hyphen_values = true)]
    pub(crate) dut1: Option<f64>,

    #[clap(long, help = MAGNITUDE_LIMIT_HELP.as_str(), help_heading = "STARS", allow_hyphen_values = true)]
    pub(crate) magnitude_limit: Option<f64>,

    /// A local copy of the Hipparcos main catalogue (hip_main.dat, optionally
    /// gzipped). If this isn't given, the catalogue is downloaded.
    #[clap(long, parse(from_os_str), help_heading = "STARS")]
    pub(crate) catalog: Option<PathBuf>,

    #[clap(long, help = CATALOG_URL_HELP.as_str(), help_heading = "STARS")]
    pub(crate) catalog_url: Option<String>,

    /// Draw stars at their catalogue positions, ignoring proper motion.
    #[clap(long, help_heading = "STARS")]
    #[serde(default)]
    pub(crate) no_proper_motion: bool,

    #[clap(long, help = CONSTELLATION_NAMES_HELP.as_str(), help_heading = "CONSTELLATIONS")]
    pub(crate) constellation_names: Option<String>,

    #[clap(long, help = LABEL_OFFSET_HELP.as_str(), help_heading = "CONSTELLATIONS")]
    pub(crate) label_offset: Option<f64>,

    #[clap(long, help = LINES_URL_HELP.as_str(), help_heading = "CONSTELLATIONS")]
    pub(crate) lines_url: Option<String>,

    #[clap(long, help = NAMES_URL_HELP.as_str(), help_heading = "CONSTELLATIONS")]
    pub(crate) names_url: Option<String>,

    #[clap(long, parse(from_os_str), help = DATA_DIR_HELP.as_str(), help_heading = "DOWNLOADS")]
    pub(crate) data_dir: Option<PathBuf>,

    /// Don't download anything; only use what's already in the data
    /// directory (and --catalog).
    #[clap(long, help_heading = "DOWNLOADS")]
    #[serde(default)]
    pub(crate) offline: bool,

    #[clap(long, help = FETCH_TIMEOUT_HELP.as_str(), help_heading = "DOWNLOADS")]
    pub(crate) fetch_timeout: Option<String>,

    #[clap(long, help = FETCH_RETRIES_HELP.as_str(), help_heading = "DOWNLOADS")]
    pub(crate) fetch_retries: Option<u32>,
}

impl SkyArgs {
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            latitude: self.latitude.or(other.latitude),
            longitude: self.longitude.or(other.longitude),
            height: self.height.or(other.height),
            dut1: self.dut1.or(other.dut1),
            magnitude_limit: self.magnitude_limit.or(other.magnitude_limit),
            catalog: self.catalog.or(other.catalog),
            catalog_url: self.catalog_url.or(other.catalog_url),
            no_proper_motion: self.no_proper_motion || other.no_proper_motion,
            constellation_names: self.constellation_names.or(other.constellation_names),
            label_offset: self.label_offset.or(other.label_offset),
            lines_url: self.lines_url.or(other.lines_url),
            names_url: self.names_url.or(other.names_url),
            data_dir: self.data_dir.or(other.data_dir),
            offline: self.offline || other.offline,
            fetch_timeout: self.fetch_timeout.or(other.fetch_timeout),
            fetch_retries: self.fetch_retries.or(other.fetch_retries),
        }
    }

    /// Work out the observer and load everything needed to draw their sky.
    /// Constellation data is only fetched if `need_constellations` is true;
    /// `default_names` is used unless the user picked a name table.
    pub(crate) fn parse(
        self,
        need_constellations: bool,
        default_names: ConstellationNames,
    ) -> Result<SkyParams, SkydomeError> {
        let Self {
            latitude,
            longitude,
            height,
            dut1,
            magnitude_limit,
            catalog,
            catalog_url,
            no_proper_motion,
            constellation_names,
            label_offset,
            lines_url,
            names_url,
            data_dir,
            offline,
            fetch_timeout,
            fetch_retries,
        } = self;

        let observer = Observer::from_strs(
            latitude.as_deref().unwrap_or(DEFAULT_LATITUDE),
            longitude.as_deref().unwrap_or(DEFAULT_LONGITUDE),
            height.unwrap_or(0.0),
        )?;
        let dut1 = Duration::from_seconds(dut1.unwrap_or(0.0));
        let provider = ErfaProvider::load_ephemeris(dut1)?;
        let provider = if no_proper_motion {
            provider.without_proper_motion()
        } else {
            provider
        };
        let mut printer = InfoPrinter::new("Observer".into());
        printer.push_line(format!("{observer}").into());
        printer.push_line(format!("DUT1: {} s", dut1.to_seconds()).into());
        printer.display();

        let magnitude_limit = magnitude_limit.unwrap_or(DEFAULT_MAGNITUDE_LIMIT);
        if !magnitude_limit.is_finite() {
            return Err(SkyArgsError::BadMagnitudeLimit(magnitude_limit).into());
        }
        let label_offset_deg = label_offset.unwrap_or(DEFAULT_LABEL_OFFSET_DEG);
        if !(label_offset_deg.is_finite() && label_offset_deg >= 0.0) {
            return Err(SkyArgsError::BadLabelOffset(label_offset_deg).into());
        }

        let fetch_timeout = parse_fetch_timeout(fetch_timeout.as_deref())?;
        let fetch_retries = fetch_retries.unwrap_or(DEFAULT_FETCH_RETRIES);
        let fetcher = Fetcher::new(fetch_timeout, fetch_retries)?;
        let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let mut printer = InfoPrinter::new("Catalogue".into());
        let catalog_file = match catalog {
            Some(file) => file,
            None => {
                let url = catalog_url.as_deref().unwrap_or(HIPPARCOS_URL);
                let path = catalog_path(&data_dir, url);
                if path.exists() {
                    format!(
                        "Using the catalogue previously downloaded to {}",
                        path.display()
                    )
                    .warn();
                } else if offline {
                    return Err(SkyArgsError::OfflineWithoutCatalogue(path).into());
                }
                printer.push_line(format!("From {url}").into());
                ensure_catalog(&data_dir, url, &fetcher)?
            }
        };
        let stars = load_catalog(&catalog_file)?;
        let num_bright_enough = stars
            .iter()
            .filter(|s| s.magnitude <= magnitude_limit)
            .count();
        printer.push_line(format!("File: {}", catalog_file.display()).into());
        printer.push_line(
            format!(
                "{} stars, {num_bright_enough} brighter than magnitude {magnitude_limit}",
                stars.len()
            )
            .into(),
        );
        if no_proper_motion {
            printer.push_line("Ignoring proper motion".into());
        }
        printer.display();

        let names = match constellation_names.as_deref() {
            Some(s) => ConstellationNames::from_str(&s.to_lowercase())
                .map_err(|_| SkyArgsError::BadConstellationNames(s.to_string()))?,
            None => default_names,
        };
        let constellations = if need_constellations {
            let lines_url = lines_url.unwrap_or_else(|| CONSTELLATION_LINES_URL.to_string());
            let names_url = names_url.unwrap_or_else(|| CONSTELLATION_NAMES_URL.to_string());
            let mut printer = InfoPrinter::new("Constellations".into());
            if offline {
                printer.push_line(format!("Offline; reading from {}", data_dir.display()).into());
            } else {
                printer.push_block(vec![
                    format!("Lines: {lines_url}").into(),
                    format!("Names: {names_url}").into(),
                ]);
            }
            printer.push_line(format!("{names} names").into());

            let source = HttpGeometrySource::new(
                fetcher,
                lines_url,
                names_url,
                Some(data_dir),
                offline,
            )?;
            let cache = ConstellationCache::new(Box::new(source), names);
            // Fetch now, so that nothing is fetched while frames are drawn.
            cache.prefetch()?;
            let num_segments = cache.segments()?.len();
            let num_labels = cache.labels()?.len();
            printer.push_line(format!("{num_segments} segments, {num_labels} labels").into());
            printer.display();
            Some(cache)
        } else {
            debug!("Not loading constellation data");
            if constellation_names.is_some() {
                "--constellation-names has no effect without constellations".warn();
            }
            None
        };

        Ok(SkyParams {
            observer,
            stars,
            provider: Box::new(provider),
            constellations,
            projection: ProjectionSettings {
                magnitude_limit,
                label_offset_deg,
            },
        })
    }
}

pub(super) fn parse_fetch_timeout(s: Option<&str>) -> Result<std::time::Duration, SkyArgsError> {
    let s = s.unwrap_or(DEFAULT_FETCH_TIMEOUT);
    let (value, unit) =
        parse_duration(s).map_err(|_| SkyArgsError::BadFetchTimeout(s.to_string()))?;
    let seconds = unit.to_duration(value).to_seconds();
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(SkyArgsError::BadFetchTimeout(s.to_string()));
    }
    Ok(std::time::Duration::from_secs_f64(seconds))
}

#[derive(Error, Debug)]
pub(crate) enum SkyArgsError {
    #[error("The magnitude limit must be a number, but got {0}")]
    BadMagnitudeLimit(f64),

    #[error("The label offset must be a non-negative number of degrees, but got {0}")]
    BadLabelOffset(f64),

    #[error("Couldn't parse '{0}' as a download timeout; expected e.g. 30s")]
    BadFetchTimeout(String),

    #[error("Unrecognised constellation names '{0}'; expected one of: latin, common")]
    BadConstellationNames(String),

    #[error("Offline mode was requested, but there's no catalogue at '{0}' and --catalog wasn't given")]
    OfflineWithoutCatalogue(PathBuf),
}
