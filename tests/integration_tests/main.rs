// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod animate;
mod no_stderr;
mod snapshot;

use std::{process::Output, str::from_utf8};

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;
use tempfile::TempDir;

fn skydome() -> Command {
    Command::cargo_bin("skydome").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// A few bright stars, in the layout of the Hipparcos main catalogue.
const HIP_MAIN: &str = indoc! {"
    H|       91262| |18 36 56.19|+38 46 58.8| 0.03| |H|279.23410832|+38.78299311| |  128.93|  201.02|  287.46|  0.55|  0.54
    H|       91919| |18 44 20.35|+39 40 12.5| 4.59| |H|281.08462836|+39.67012347| |   20.10|   11.15|   62.49|  1.68|  1.94
    H|       92420| |18 50 04.79|+33 21 45.6| 3.52| |H|282.51997830|+33.36266658| |    3.70|    1.10|   -4.46|  0.53|  0.64
    H|       93194| |18 58 56.62|+32 41 22.4| 3.25| |H|284.73592666|+32.68955736| |    5.35|   -2.76|    1.77|  0.48|  0.55
    H|       11767| |02 31 47.08|+89 15 50.9| 1.97| |H|037.94614689|+89.26413805| |    7.56|   44.22|  -11.74|  0.39|  0.45
    H|       32349| |06 45 08.92|-16 42 58.0|-1.44| |H|101.28715539|-16.71611582| |  379.21| -546.01|-1223.08|  0.51|  0.40
"};

const LINES_JSON: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","id":"Lyr","geometry":{"type":"MultiLineString","coordinates":[[[-80.77,38.78],[-75.26,32.69],[-77.48,33.36],[-78.92,39.67]]]}}]}"#;

const NAMES_JSON: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","id":"Lyr","properties":{"name":"Lyra"},"geometry":{"type":"Point","coordinates":[-77.0,36.0]}}]}"#;

/// A data directory holding everything a run needs, so no network access
/// happens with `--offline`.
fn get_data_dir() -> TempDir {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    std::fs::write(tmp_dir.path().join("hip_main.dat"), HIP_MAIN).unwrap();
    std::fs::write(tmp_dir.path().join("constellations.lines.json"), LINES_JSON).unwrap();
    std::fs::write(tmp_dir.path().join("constellations.json"), NAMES_JSON).unwrap();
    tmp_dir
}

#[test]
fn test_help() {
    let cmd = skydome().arg("--help").ok();
    assert!(cmd.is_ok(), "{:?}", cmd.err());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("snapshot"));
    assert!(stdout.contains("animate"));

    for sub_command in ["snapshot", "animate"] {
        let cmd = skydome().args([sub_command, "--help"]).ok();
        assert!(cmd.is_ok(), "{sub_command}: {:?}", cmd.err());
        let (stdout, _) = get_cmd_output(cmd);
        assert!(stdout.contains("--latitude"), "{stdout}");
        assert!(stdout.contains("--offline"), "{stdout}");
    }
}

#[test]
fn test_no_subcommand_is_an_error() {
    let cmd = skydome().ok();
    assert!(cmd.is_err());
}

#[test]
fn test_unknown_argument_is_an_error() {
    let cmd = skydome()
        .args(["snapshot", "--time", "2024-06-04 22:00", "--no-such-flag"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("--no-such-flag"), "{stderr}");
}
