// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Couldn't parse '{value}' as a colour for '{name}'; expected something like '#0b0c1a'")]
    BadColour { name: &'static str, value: String },

    #[error("The figure size must be a positive number of inches, but got {0}")]
    BadFigureSize(f64),

    #[error("The DPI must be positive")]
    BadDpi,

    #[error("A {0} x {0} pixel image is too big")]
    TooBig(u64),

    #[error("Couldn't write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Error from the plotters library: {0}")]
    Plotters(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
