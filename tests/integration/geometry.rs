// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indoc::indoc;
use tempfile::TempDir;

use crate::{get_cmd_output, write_file, xcstack};

#[test]
fn test_geometry() {
    let dir = TempDir::new().unwrap();
    let args = write_file(
        "lines.toml",
        &dir,
        indoc! {r#"
            [[lines]]
            name = "A"
            end_channel = 100
            scan_step = 10

            [[lines]]
            name = "B"
            end_channel = 50
            scan_step = 5
        "#},
    );

    let cmd = xcstack()
        .args(["geometry", &args.display().to_string()])
        .ok();
    assert!(cmd.is_ok(), "geometry failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("A*B"), "{stdout}");
    assert!(stdout.contains("Spectrum length: 16"), "{stdout}");
}

#[test]
fn test_geometry_needs_two_lines() {
    let dir = TempDir::new().unwrap();
    let args = write_file("lines.json", &dir, r#"{"lines": ["A"]}"#);
    let cmd = xcstack()
        .args(["geometry", &args.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error:"), "{stderr}");
}
