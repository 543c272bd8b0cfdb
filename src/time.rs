// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions around time.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use hifitime::{Duration, Epoch};
use thiserror::Error;
use vec1::Vec1;

/// The formats accepted for wall-clock instants, after RFC 3339 is tried.
const INSTANT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// No civil time zone is further than this from UTC \[hours\].
const MAX_UTC_OFFSET_HOURS: f64 = 14.0;

/// Parse an instant. RFC 3339 strings carry their own offset. Anything else
/// (e.g. "2024-06-04 12:30") is local time `utc_offset_hours` ahead of UTC,
/// so "12:30" at an offset of 2 is 10:30 UTC.
pub fn parse_instant(s: &str, utc_offset_hours: f64) -> Result<Epoch, TimeError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(naive_utc_to_epoch(dt.naive_utc()));
    }

    if !utc_offset_hours.is_finite() || utc_offset_hours.abs() > MAX_UTC_OFFSET_HOURS {
        return Err(TimeError::BadUtcOffset(utc_offset_hours));
    }
    let local = INSTANT_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .ok_or_else(|| TimeError::Unparseable(s.to_string()))?;
    let offset = chrono::Duration::seconds((utc_offset_hours * 3600.0).round() as i64);
    let utc = local
        .checked_sub_signed(offset)
        .ok_or_else(|| TimeError::Unparseable(s.to_string()))?;
    Ok(naive_utc_to_epoch(utc))
}

fn naive_utc_to_epoch(dt: NaiveDateTime) -> Epoch {
    Epoch::from_gregorian_utc(
        dt.year(),
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
        // chrono represents leap seconds with nanoseconds >= 1e9.
        dt.nanosecond().min(999_999_999),
    )
}

/// The timestamps of an evenly-spaced sequence, `start + i * step` for `i` in
/// `0..num`.
pub fn frame_timestamps(start: Epoch, step: Duration, num: usize) -> Result<Vec1<Epoch>, TimeError> {
    if step <= Duration::from_seconds(0.0) {
        return Err(TimeError::NonPositiveStep(step));
    }
    let timestamps = (0..num).map(|i| start + step * i as i64).collect();
    Vec1::try_from_vec(timestamps).map_err(|_| TimeError::ZeroTimestamps)
}

#[derive(Error, Debug)]
pub enum TimeError {
    #[error("Could not parse '{0}' as a date and time; expected e.g. '2024-06-04 22:00' or RFC 3339")]
    Unparseable(String),

    #[error("UTC offset {0} h is not within -14 h to 14 h")]
    BadUtcOffset(f64),

    #[error("The time step must be positive, but got {0}")]
    NonPositiveStep(Duration),

    #[error("Cannot make a sequence of zero timestamps")]
    ZeroTimestamps,
}
