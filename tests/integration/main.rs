// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod dark_migrate;
mod geometry;
mod replay;

use std::{
    fs,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;

/// Two packets and two cross-correlation scans of the pair of two lines.
const RECORDING: &str = indoc! {r#"
    {"kind": "packet", "timestamp": 0.0, "counts": [10, 20], "autocorrelations": [{"real": 1, "imaginary": 0}, {"real": 2, "imaginary": 0}], "crosscorrelations": [{"real": 0, "imaginary": 1}]}
    {"kind": "packet", "timestamp": 0.5, "counts": [12, 22], "autocorrelations": [{"real": 1, "imaginary": 0}, {"real": 2, "imaginary": 0}], "crosscorrelations": [{"real": 0, "imaginary": 1}]}
    {"kind": "spectrum", "index": 0, "lag_offset": -1.0, "lag_step": 1.0, "magnitude": [0, 2, 4], "phase": [0, 0.5, 1]}
    {"kind": "spectrum", "index": 0, "lag_offset": -1.0, "lag_step": 1.0, "magnitude": [0, 4, 8], "phase": [0, 0.5, 1]}
"#};

fn xcstack() -> Command {
    let mut cmd = Command::cargo_bin("xcstack").unwrap();
    cmd.arg("--no-progress-bars");
    cmd
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

fn write_file<T: AsRef<Path>, U: AsRef<Path>>(filename: T, dir: U, contents: &str) -> PathBuf {
    let path = dir.as_ref().join(filename);
    fs::write(&path, contents).expect("couldn't write file");
    path
}
