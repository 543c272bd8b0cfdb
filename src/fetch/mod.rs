// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One-shot HTTP downloads with a bounded timeout and bounded retries.

#[cfg(test)]
pub(crate) mod tests;

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
    thread,
    time::Duration,
};

use log::{debug, warn};
use reqwest::{blocking::Client, StatusCode};
use thiserror::Error;

/// The wait before the first retry. Each later retry waits twice as long as
/// the one before it.
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Fetches things over HTTP.
pub struct Fetcher {
    client: Client,

    /// How many times a failed request is retried.
    retries: u32,

    initial_backoff: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration, retries: u32) -> Result<Fetcher, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Fetcher {
            client,
            retries,
            initial_backoff: INITIAL_BACKOFF,
        })
    }

    #[cfg(test)]
    fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// GET `url` and return the body as text.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.with_retries(url, || {
            let response = self.get(url)?;
            response.text().map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })
        })
    }

    /// GET `url` and write the body to `path`. The body is written to a
    /// temporary file next to `path` first, so an interrupted download never
    /// leaves a partial file at `path`.
    pub fn download(&self, url: &str, path: &Path) -> Result<(), FetchError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");

        let result = self.with_retries(url, || {
            let mut response = self.get(url)?;
            let mut file = BufWriter::new(File::create(&temp_path)?);
            response
                .copy_to(&mut file)
                .map_err(|source| FetchError::Request {
                    url: url.to_string(),
                    source,
                })?;
            file.flush()?;
            Ok(())
        });
        if let Err(e) = result {
            // Leave nothing behind.
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, path)?;
        debug!("Downloaded {url} to {}", path.display());
        Ok(())
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    fn with_retries<T>(
        &self,
        url: &str,
        mut attempt: impl FnMut() -> Result<T, FetchError>,
    ) -> Result<T, FetchError> {
        let mut i_attempt = 0;
        loop {
            match attempt() {
                Ok(t) => return Ok(t),
                Err(e) if e.is_retryable() && i_attempt < self.retries => {
                    let wait = backoff_delay(self.initial_backoff, i_attempt);
                    warn!(
                        "Attempt {} of {} to fetch {url} failed ({e}); retrying in {:.1}s",
                        i_attempt + 1,
                        self.retries + 1,
                        wait.as_secs_f64()
                    );
                    thread::sleep(wait);
                    i_attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// The wait before retry number `i_attempt` (starting at 0).
fn backoff_delay(initial: Duration, i_attempt: u32) -> Duration {
    initial.saturating_mul(2_u32.saturating_pow(i_attempt))
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Couldn't create an HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP status {status}")]
    Status { url: String, status: StatusCode },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

impl FetchError {
    /// Client errors (4xx) and local IO errors won't be fixed by trying again.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request { .. } => true,
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::Client(_) | FetchError::IO(_) => false,
        }
    }
}
