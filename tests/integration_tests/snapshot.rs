// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use tempfile::TempDir;

use crate::{get_cmd_output, get_data_dir, skydome};

#[test]
fn test_dry_run_writes_nothing() {
    let data_dir = get_data_dir();
    let out_dir = TempDir::new().expect("couldn't make tmp dir");

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "snapshot",
            "--offline",
            "--data-dir", &format!("{}", data_dir.path().display()),
            "--time", "2024-06-04 22:00",
            "--utc-offset", "2",
            "-o", &format!("{}", out_dir.path().display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "snapshot dry run failed: {:?}", cmd.err());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Observer"), "{stdout}");
    assert!(stdout.contains("Dry run"), "{stdout}");
    assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_time_is_reported() {
    let data_dir = get_data_dir();

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "snapshot",
            "--offline",
            "--data-dir", &format!("{}", data_dir.path().display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("--time"), "{stderr}");
}

#[test]
fn test_offline_without_catalogue_is_reported() {
    let empty_dir = TempDir::new().expect("couldn't make tmp dir");

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "snapshot",
            "--offline",
            "--data-dir", &format!("{}", empty_dir.path().display()),
            "--time", "2024-06-04 22:00",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("catalogue"), "{stderr}");
}

#[test]
fn test_arg_file_and_save_toml() {
    let data_dir = get_data_dir();
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let args_file = tmp_dir.path().join("args.toml");
    let mut f = std::fs::File::create(&args_file).unwrap();
    writeln!(
        f,
        "[sky]\nlatitude = \"33.9 S\"\nlongitude = \"18.4 E\"\noffline = true\ndata_dir = \"{}\"\n\n[snapshot]\ntime = \"2024-12-24 21:00\"",
        data_dir.path().display()
    )
    .unwrap();
    drop(f);
    let saved = tmp_dir.path().join("saved.toml");

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "snapshot",
            &format!("{}", args_file.display()),
            "--save-toml", &format!("{}", saved.display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "snapshot with an arg file failed: {:?}", cmd.err());
    let saved = std::fs::read_to_string(saved).unwrap();
    assert!(saved.contains("33.9 S"), "{saved}");
    assert!(saved.contains("2024-12-24 21:00"), "{saved}");
}

/// Needs a system font.
#[test]
#[ignore]
fn test_snapshot_writes_two_images() {
    let data_dir = get_data_dir();
    let out_dir = TempDir::new().expect("couldn't make tmp dir");

    #[rustfmt::skip]
    let cmd = skydome()
        .args([
            "snapshot",
            "--offline",
            "--data-dir", &format!("{}", data_dir.path().display()),
            "--time", "2024-06-04 22:00",
            "--figure-size", "3",
            "--dpi", "50",
            "-o", &format!("{}", out_dir.path().display()),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "snapshot failed: {:?}", cmd.err());
    assert!(out_dir.path().join("stars_only_dark.png").exists());
    assert!(out_dir
        .path()
        .join("with_constellations_dark.png")
        .exists());
}
