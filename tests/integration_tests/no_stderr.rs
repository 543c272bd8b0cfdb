// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use crate::{get_cmd_output, get_data_dir, skydome};

#[test]
fn test_snapshot_no_stderr() {
    let data_dir = get_data_dir();

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "snapshot",
            "--offline",
            "--data-dir", &format!("{}", data_dir.path().display()),
            "--time", "2024-06-04 22:00",
            "--dry-run",
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "snapshot failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_animate_no_stderr() {
    let data_dir = get_data_dir();

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "animate",
            "--offline",
            "--data-dir", &format!("{}", data_dir.path().display()),
            "--start", "2024-06-04 22:00",
            "--no-constellations",
            "--dry-run",
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "animate failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}
