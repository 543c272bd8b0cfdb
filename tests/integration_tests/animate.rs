// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::{get_cmd_output, get_data_dir, skydome};

#[test]
fn test_dry_run() {
    let data_dir = get_data_dir();
    let out_dir = TempDir::new().expect("couldn't make tmp dir");

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "animate",
            "--offline",
            "--data-dir", &format!("{}", data_dir.path().display()),
            "--start", "2024-06-04T20:00:00Z",
            "--step", "30min",
            "-n", "4",
            "-o", &format!("{}", out_dir.path().display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "animate dry run failed: {:?}", cmd.err());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("4 frames"), "{stdout}");
    assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_bad_step_is_reported() {
    let data_dir = get_data_dir();

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "animate",
            "--offline",
            "--data-dir", &format!("{}", data_dir.path().display()),
            "--start", "2024-06-04 22:00",
            "--step", "0s",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("0s"), "{stderr}");
}

/// Needs a system font.
#[test]
#[ignore]
fn test_animation_is_written() {
    let data_dir = get_data_dir();
    let out_dir = TempDir::new().expect("couldn't make tmp dir");

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "animate",
            "--offline",
            "--data-dir", &format!("{}", data_dir.path().display()),
            "--start", "2024-06-04 22:00",
            "-n", "3",
            "--figure-size", "2",
            "--dpi", "50",
            "-o", &format!("{}", out_dir.path().display()),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "animate failed: {:?}", cmd.err());
    assert!(out_dir.path().join("night_sky_animation.gif").exists());
    assert!(out_dir.path().join("frame_000.png").exists());
}
