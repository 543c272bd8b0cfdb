// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Constellation stick figures and label positions.
//!
//! The geometry comes as two GeoJSON documents in the d3-celestial layout:
//! one of `MultiLineString` features (the stick figures) and one of `Point`
//! features (the label anchors). Coordinates are `[RA degrees, Dec degrees]`,
//! with RA in -180..180.
//!
//! The data is fetched at most once per [`ConstellationCache`]; everything
//! after that is served from memory.

mod names;

pub use names::ConstellationNames;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use log::{debug, info};
use marlu::RADec;
use serde::Deserialize;
use thiserror::Error;

use crate::fetch::{FetchError, Fetcher};

pub const CONSTELLATION_LINES_URL: &str =
    "https://raw.githubusercontent.com/ofrohn/d3-celestial/master/data/constellations.lines.json";
pub const CONSTELLATION_NAMES_URL: &str =
    "https://raw.githubusercontent.com/ofrohn/d3-celestial/master/data/constellations.json";

/// One straight piece of a constellation's stick figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationSegment {
    /// The IAU abbreviation of the constellation, e.g. "UMa".
    pub code: String,
    pub start: RADec,
    pub end: RADec,
}

/// Where a constellation's name goes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationLabel {
    pub code: String,
    pub anchor: RADec,
}

/// Supplies the raw JSON text of the two geometry documents.
pub trait GeometrySource: Send + Sync {
    fn lines_json(&self) -> Result<String, ConstellationError>;

    fn names_json(&self) -> Result<String, ConstellationError>;
}

/// Gets the geometry documents over HTTP. If a mirror directory is set, the
/// documents are also saved there, and in "offline" mode they are only read
/// from there.
pub struct HttpGeometrySource {
    fetcher: Fetcher,
    lines_url: String,
    names_url: String,
    mirror_dir: Option<PathBuf>,
    offline: bool,
}

impl HttpGeometrySource {
    pub fn new(
        fetcher: Fetcher,
        lines_url: String,
        names_url: String,
        mirror_dir: Option<PathBuf>,
        offline: bool,
    ) -> Result<HttpGeometrySource, ConstellationError> {
        if offline && mirror_dir.is_none() {
            return Err(ConstellationError::OfflineWithoutMirror);
        }
        Ok(HttpGeometrySource {
            fetcher,
            lines_url,
            names_url,
            mirror_dir,
            offline,
        })
    }

    fn mirror_path(&self, url: &str) -> Option<PathBuf> {
        let file_name = url.rsplit('/').next().filter(|n| !n.is_empty())?;
        self.mirror_dir.as_ref().map(|d| d.join(file_name))
    }

    /// Get a document, and mirror it only once `check` accepts it, so a bad
    /// response never replaces a good mirror.
    fn get(
        &self,
        url: &str,
        check: fn(&str) -> Result<(), ConstellationError>,
    ) -> Result<String, ConstellationError> {
        let mirror = self.mirror_path(url);
        if self.offline {
            // `new` guarantees a mirror directory when offline.
            let path = mirror.ok_or(ConstellationError::OfflineWithoutMirror)?;
            return read_mirror(&path);
        }

        let text = self.fetcher.get_text(url)?;
        check(&text)?;
        if let Some(path) = mirror {
            write_mirror(&path, &text)?;
            debug!("Mirrored {url} to {}", path.display());
        }
        Ok(text)
    }
}

fn read_mirror(path: &Path) -> Result<String, ConstellationError> {
    if !path.exists() {
        return Err(ConstellationError::MirrorMissing(path.to_path_buf()));
    }
    debug!("Reading mirrored constellation data {}", path.display());
    Ok(fs::read_to_string(path)?)
}

/// Write through a temporary file, so the mirror is either the old document
/// or the new one.
fn write_mirror(path: &Path, text: &str) -> Result<(), ConstellationError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    if let Err(e) = fs::write(&temp_path, text) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    fs::rename(&temp_path, path)?;
    Ok(())
}

impl GeometrySource for HttpGeometrySource {
    fn lines_json(&self) -> Result<String, ConstellationError> {
        self.get(&self.lines_url, |text| parse_lines(text).map(|_| ()))
    }

    fn names_json(&self) -> Result<String, ConstellationError> {
        self.get(&self.names_url, |text| parse_names(text).map(|_| ()))
    }
}

#[derive(Debug)]
struct Geometry {
    segments: Vec<ConstellationSegment>,
    labels: Vec<ConstellationLabel>,
}

/// Constellation geometry, fetched on first use and read-only afterwards.
pub struct ConstellationCache {
    source: Box<dyn GeometrySource>,
    names: ConstellationNames,
    geometry: OnceLock<Geometry>,
}

impl ConstellationCache {
    pub fn new(source: Box<dyn GeometrySource>, names: ConstellationNames) -> ConstellationCache {
        ConstellationCache {
            source,
            names,
            geometry: OnceLock::new(),
        }
    }

    fn geometry(&self) -> Result<&Geometry, ConstellationError> {
        if let Some(g) = self.geometry.get() {
            return Ok(g);
        }

        let segments = parse_lines(&self.source.lines_json()?)?;
        let labels = parse_names(&self.source.names_json()?)?;
        info!(
            "Got {} constellation segments and {} labels",
            segments.len(),
            labels.len()
        );
        Ok(self.geometry.get_or_init(|| Geometry { segments, labels }))
    }

    /// Fetch the geometry now, if it hasn't been already.
    pub fn prefetch(&self) -> Result<(), ConstellationError> {
        self.geometry().map(|_| ())
    }

    pub fn segments(&self) -> Result<&[ConstellationSegment], ConstellationError> {
        Ok(&self.geometry()?.segments)
    }

    pub fn labels(&self) -> Result<&[ConstellationLabel], ConstellationError> {
        Ok(&self.geometry()?.labels)
    }

    /// The display name for a constellation abbreviation. Never fails; unknown
    /// abbreviations are returned as they are.
    pub fn translate<'a>(&self, code: &'a str) -> &'a str {
        self.names.translate(code)
    }
}

#[derive(Deserialize)]
struct FeatureCollection<G> {
    features: Vec<Feature<G>>,
}

#[derive(Deserialize)]
struct Feature<G> {
    id: String,
    geometry: G,
}

#[derive(Deserialize)]
struct MultiLineString {
    coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Deserialize)]
struct Point {
    coordinates: [f64; 2],
}

/// d3-celestial RAs run from -180° to 180°.
fn to_radec([ra_deg, dec_deg]: [f64; 2]) -> RADec {
    RADec::from_degrees(ra_deg.rem_euclid(360.0), dec_deg)
}

fn parse_lines(json: &str) -> Result<Vec<ConstellationSegment>, ConstellationError> {
    let collection: FeatureCollection<MultiLineString> =
        serde_json::from_str(json).map_err(|source| ConstellationError::Parse {
            what: "constellation lines",
            source,
        })?;

    let mut segments = vec![];
    for Feature { id, geometry } in collection.features {
        for chain in geometry.coordinates {
            for pair in chain.windows(2) {
                segments.push(ConstellationSegment {
                    code: id.clone(),
                    start: to_radec(pair[0]),
                    end: to_radec(pair[1]),
                });
            }
        }
    }
    Ok(segments)
}

fn parse_names(json: &str) -> Result<Vec<ConstellationLabel>, ConstellationError> {
    let collection: FeatureCollection<Point> =
        serde_json::from_str(json).map_err(|source| ConstellationError::Parse {
            what: "constellation names",
            source,
        })?;

    Ok(collection
        .features
        .into_iter()
        .map(|Feature { id, geometry }| ConstellationLabel {
            code: id,
            anchor: to_radec(geometry.coordinates),
        })
        .collect())
}

#[derive(Error, Debug)]
pub enum ConstellationError {
    #[error("Couldn't fetch constellation data: {0}")]
    Fetch(#[from] FetchError),

    #[error("Couldn't parse the {what} document: {source}")]
    Parse {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("Offline mode needs a data directory to read constellation data from")]
    OfflineWithoutMirror,

    #[error("Offline mode was requested, but there is no mirrored constellation data at '{0}'; run once without offline mode first")]
    MirrorMissing(PathBuf),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
