// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalogue file '{0}' doesn't exist")]
    DoesntExist(PathBuf),

    #[error("Catalogue line {line_num} has only {num_fields} fields; is this a Hipparcos hip_main.dat file?")]
    TooFewFields { line_num: usize, num_fields: usize },

    #[error("Catalogue line {line_num}: could not parse {name} value '{value}'")]
    BadField {
        line_num: usize,
        name: &'static str,
        value: String,
    },

    #[error("The catalogue contained no usable stars")]
    Empty,

    #[error("Couldn't download the catalogue: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
