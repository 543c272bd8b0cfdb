// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Star catalogues.
//!
//! Only the Hipparcos main catalogue (CDS I/239, `hip_main.dat`) is supported.
//! Its records are pipe-delimited; positions are J2000 (ICRS) at the
//! catalogue epoch J1991.25.

mod error;

pub use error::CatalogError;

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use log::{debug, info};
use marlu::RADec;

use crate::fetch::Fetcher;

/// Where the Hipparcos main catalogue is downloaded from by default.
pub const HIPPARCOS_URL: &str = "https://cdsarc.cds.unistra.fr/ftp/cats/I/239/hip_main.dat";

/// The field indices of the `hip_main.dat` columns that are used.
const HIP_FIELD: usize = 1;
const VMAG_FIELD: usize = 5;
const RA_DEG_FIELD: usize = 8;
const DEC_DEG_FIELD: usize = 9;
const PM_RA_FIELD: usize = 12;
const PM_DEC_FIELD: usize = 13;

/// A star from a catalogue. Positions are at the catalogue epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStar {
    /// Hipparcos identifier.
    pub hip: u32,

    /// Right ascension \[hours\].
    pub ra_hours: f64,

    /// Declination \[degrees\].
    pub dec_deg: f64,

    /// Apparent visual magnitude.
    pub magnitude: f64,

    /// Proper motion in RA, multiplied by cos(dec) \[mas/yr\].
    pub pm_ra_mas_per_year: f64,

    /// Proper motion in Dec \[mas/yr\].
    pub pm_dec_mas_per_year: f64,
}

impl CatalogStar {
    pub fn radec(&self) -> RADec {
        RADec::from_degrees(self.ra_hours * 15.0, self.dec_deg)
    }
}

/// Parse the records of a Hipparcos main catalogue. Records without a
/// position or visual magnitude are skipped.
pub fn read_hipparcos<R: BufRead>(reader: R) -> Result<Vec<CatalogStar>, CatalogError> {
    let mut stars = vec![];
    let mut num_skipped = 0;
    for (i_line, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_hipparcos_record(&line, i_line + 1)? {
            Some(star) => stars.push(star),
            None => num_skipped += 1,
        }
    }
    debug!("Read {} catalogue stars, skipped {num_skipped} without astrometry", stars.len());

    if stars.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(stars)
}

fn parse_hipparcos_record(line: &str, line_num: usize) -> Result<Option<CatalogStar>, CatalogError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() <= PM_DEC_FIELD {
        return Err(CatalogError::TooFewFields {
            line_num,
            num_fields: fields.len(),
        });
    }

    let parse = |index: usize, name: &'static str| -> Result<Option<f64>, CatalogError> {
        let field = fields[index];
        if field.is_empty() {
            return Ok(None);
        }
        field
            .parse()
            .map(Some)
            .map_err(|_| CatalogError::BadField {
                line_num,
                name,
                value: field.to_string(),
            })
    };

    let hip: u32 = fields[HIP_FIELD]
        .parse()
        .map_err(|_| CatalogError::BadField {
            line_num,
            name: "HIP",
            value: fields[HIP_FIELD].to_string(),
        })?;
    let (ra_deg, dec_deg, magnitude) = match (
        parse(RA_DEG_FIELD, "RAdeg")?,
        parse(DEC_DEG_FIELD, "DEdeg")?,
        parse(VMAG_FIELD, "Vmag")?,
    ) {
        (Some(r), Some(d), Some(m)) => (r, d, m),
        _ => return Ok(None),
    };

    Ok(Some(CatalogStar {
        hip,
        ra_hours: ra_deg / 15.0,
        dec_deg,
        magnitude,
        pm_ra_mas_per_year: parse(PM_RA_FIELD, "pmRA")?.unwrap_or(0.0),
        pm_dec_mas_per_year: parse(PM_DEC_FIELD, "pmDE")?.unwrap_or(0.0),
    }))
}

/// Read a catalogue file. Files ending in ".gz" are decompressed.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogStar>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::DoesntExist(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let reader: Box<dyn Read> = match path.extension().and_then(|e| e.to_str()) {
        Some(e) if e.eq_ignore_ascii_case("gz") => Box::new(GzDecoder::new(file)),
        _ => Box::new(file),
    };
    let stars = read_hipparcos(BufReader::new(reader))?;
    info!("Loaded {} stars from {}", stars.len(), path.display());
    Ok(stars)
}

/// Where a catalogue downloaded from `url` lives in `data_dir`. The file name
/// is taken from the URL.
pub fn catalog_path(data_dir: &Path, url: &str) -> PathBuf {
    let file_name = url
        .rsplit('/')
        .next()
        .filter(|n| !n.is_empty())
        .unwrap_or("hip_main.dat");
    data_dir.join(file_name)
}

/// Make sure a catalogue file is present in `data_dir`, downloading it from
/// `url` if it isn't. A non-empty file that's already there is reused.
pub fn ensure_catalog(
    data_dir: &Path,
    url: &str,
    fetcher: &Fetcher,
) -> Result<PathBuf, CatalogError> {
    let path = catalog_path(data_dir, url);
    match std::fs::metadata(&path) {
        Ok(m) if m.is_file() && m.len() > 0 => {
            debug!("Reusing previously downloaded catalogue {}", path.display());
            return Ok(path);
        }
        _ => (),
    }

    info!("Downloading star catalogue from {url}");
    fetcher.download(url, &path)?;
    Ok(path)
}
