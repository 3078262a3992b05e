// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;

use indoc::formatdoc;
use tempfile::TempDir;

use crate::{get_cmd_output, write_file, xcstack, RECORDING};

#[test]
fn test_replay_crosscorrelator() {
    let dir = TempDir::new().unwrap();
    let recording = write_file("rec.jsonl", &dir, RECORDING);
    let out = dir.path().join("out");

    #[rustfmt::skip]
    let cmd = xcstack()
        .args([
            "replay",
            "--input", &recording.display().to_string(),
            "--output-dir", &out.display().to_string(),
            "--mode", "crosscorrelator",
            "--lines", "Line 1", "Line 2",
        ])
        .ok();
    assert!(cmd.is_ok(), "replay failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Scans stacked: 2"), "{stdout}");

    let csv = fs::read_to_string(out.join("Line1-Line2_spectrum.csv")).unwrap();
    assert_eq!(
        csv.lines().collect::<Vec<_>>(),
        vec!["'lag (ns)';'magnitude';'phase'", "'0';'3';'0.5'", "'1';'6';'1'"]
    );
}

#[test]
fn test_replay_args_file_and_save_toml() {
    let dir = TempDir::new().unwrap();
    let recording = write_file("rec.jsonl", &dir, RECORDING);
    let out = dir.path().join("out");
    let args = write_file(
        "args.toml",
        &dir,
        &formatdoc! {r#"
                input = "{}"
                output_dir = "{}"
                mode = "counter"

                [[lines]]
                name = "Line 1"
                end_channel = 100
                scan_step = 10

                [[lines]]
                name = "Line 2"
            "#,
            recording.display(),
            out.display()
        },
    );
    let saved = dir.path().join("saved.toml");

    let cmd = xcstack()
        .args([
            "replay",
            &args.display().to_string(),
            "--save-toml",
            &saved.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "replay failed: {}", cmd.err().unwrap());
    assert!(out.join("Line1_counts.csv").exists());
    assert!(out.join("Line2_counts.csv").exists());
    assert!(out.join("Line1-Line2_counts.csv").exists());

    // The saved arguments reproduce the run.
    let saved_contents = fs::read_to_string(&saved).unwrap();
    assert!(saved_contents.contains("counter"), "{saved_contents}");
    assert!(saved_contents.contains("end_channel = 100"), "{saved_contents}");
    fs::remove_dir_all(&out).unwrap();
    let cmd = xcstack()
        .args(["replay", &saved.display().to_string()])
        .ok();
    assert!(cmd.is_ok(), "replay failed: {}", cmd.err().unwrap());
    assert!(out.join("Line1-Line2_counts.csv").exists());
}

#[test]
fn test_replay_dry_run() {
    let dir = TempDir::new().unwrap();
    let recording = write_file("rec.jsonl", &dir, RECORDING);
    let out = dir.path().join("out");

    #[rustfmt::skip]
    let cmd = xcstack()
        .args([
            "replay",
            "--dry-run",
            "-i", &recording.display().to_string(),
            "-o", &out.display().to_string(),
            "--lines", "A", "B",
        ])
        .ok();
    assert!(cmd.is_ok(), "replay failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run -- exiting now."), "{stdout}");
    assert!(!out.exists());
}

#[test]
fn test_replay_take_dark_persists() {
    let dir = TempDir::new().unwrap();
    let recording = write_file("rec.jsonl", &dir, RECORDING);
    let settings = dir.path().join("settings.toml");

    #[rustfmt::skip]
    let cmd = xcstack()
        .args([
            "replay",
            "-i", &recording.display().to_string(),
            "-o", &dir.path().join("out").display().to_string(),
            "--settings", &settings.display().to_string(),
            "--mode", "crosscorrelator",
            "--dark-format", "legacy",
            "--take-dark",
            "--lines", "Line 1", "Line 2",
        ])
        .ok();
    assert!(cmd.is_ok(), "replay failed: {}", cmd.err().unwrap());
    let contents = fs::read_to_string(&settings).unwrap();
    assert!(contents.contains(r#""Line1*Line2_Dark" = "0,3;1,6""#), "{contents}");
}

#[test]
fn test_replay_errors() {
    let dir = TempDir::new().unwrap();
    let recording = write_file("rec.jsonl", &dir, RECORDING);

    // No lines.
    let cmd = xcstack()
        .args(["replay", "-i", &recording.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Error: No lines were given"), "{stderr}");

    // Bad mode.
    #[rustfmt::skip]
    let cmd = xcstack()
        .args([
            "replay",
            "-i", &recording.display().to_string(),
            "--mode", "spectrometer",
            "--lines", "A",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("spectrometer"), "{stderr}");

    // Broken recording.
    let broken = write_file("broken.jsonl", &dir, "{\"kind\": \"packet\"");
    #[rustfmt::skip]
    let cmd = xcstack()
        .args([
            "replay",
            "-i", &broken.display().to_string(),
            "-o", &dir.path().join("out").display().to_string(),
            "--lines", "A", "B",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Line 1 of the recording"), "{stderr}");
}
