// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;

use tempfile::TempDir;

use crate::{write_file, xcstack};

#[test]
fn test_dark_migrate() {
    let dir = TempDir::new().unwrap();
    let settings = write_file(
        "settings.toml",
        &dir,
        "Line1_Dark = \"1,1;2,2\"\nLine2_Gain = \"3\"\n",
    );

    // A dry run changes nothing.
    let cmd = xcstack()
        .args([
            "dark-migrate",
            "--dry-run",
            "--settings",
            &settings.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "dark-migrate failed: {}", cmd.err().unwrap());
    assert!(fs::read_to_string(&settings)
        .unwrap()
        .contains("\"1,1;2,2\""));

    let cmd = xcstack()
        .args(["dark-migrate", "--settings", &settings.display().to_string()])
        .ok();
    assert!(cmd.is_ok(), "dark-migrate failed: {}", cmd.err().unwrap());
    let contents = fs::read_to_string(&settings).unwrap();
    assert!(contents.contains("[[1.0,1.0],[2.0,2.0]]"), "{contents}");
    assert!(contents.contains("Line2_Gain"), "{contents}");
}
