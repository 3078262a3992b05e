// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indoc::indoc;
use tempfile::TempDir;

use super::*;
use crate::series::{AxisTransform, Component, SeriesConfig};

fn s(x: f64, y: f64) -> Sample {
    Sample { x, y }
}

#[test]
fn test_spectrum_csv() {
    let mut out = vec![];
    write_spectrum_csv(
        &mut out,
        &[s(-1.5, 2.0), s(0.0, 3.25), s(1.5, 4.0)],
        &[s(-1.5, 0.5), s(0.0, -0.1)],
    )
    .unwrap();
    let expected = indoc! {"
        'lag (ns)';'magnitude';'phase'
        '-1.5';'2';'0.5'
        '0';'3.25';'-0.1'
        '1.5';'4';''
    "};
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_spectrum_csv_matches_phase_by_lag() {
    // A skipped zero leaves a gap at lag 2 in the magnitude only.
    let mut out = vec![];
    write_spectrum_csv(
        &mut out,
        &[s(1.0, 2.0), s(3.0, 4.0), s(4.0, 5.0)],
        &[s(1.0, 0.25), s(2.0, 0.5), s(3.0, 0.75), s(4.0, 1.0)],
    )
    .unwrap();
    let expected = indoc! {"
        'lag (ns)';'magnitude';'phase'
        '1';'2';'0.25'
        '2';'';'0.5'
        '3';'4';'0.75'
        '4';'5';'1'
    "};
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_counts_csv_merges_by_x() {
    let mut out = vec![];
    write_counts_csv(
        &mut out,
        &[s(1.0, 10.0), s(2.0, 11.0)],
        &[s(2.0, 0.5), s(3.0, 0.75)],
        &[s(1.0, 0.1)],
    )
    .unwrap();
    let expected = indoc! {"
        x;counts;magnitude;phase
        1;10;;0.1
        2;11;0.5;
        3;;0.75;
    "};
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_write_files() {
    let dir = TempDir::new().unwrap();
    let mut series = Series::new("A magnitude", SeriesConfig::default());
    series.stack_buffer(
        Component::Magnitude,
        &[0.0, 1.0, 2.0],
        0,
        &AxisTransform::default(),
    );
    let path = dir.path().join("spectrum.csv");
    write_spectrum_file(&path, &series).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert_eq!(contents.lines().nth(2), Some("'2';'2';''"));

    series.add_count(0.0, 5.0, Some(7.0), None, None);
    let path = dir.path().join("counts.csv");
    write_counts_file(&path, &series).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("5;7;;"));

    assert!(matches!(
        write_spectrum_file(&dir.path().join("missing").join("x.csv"), &series),
        Err(ExportError::Create { .. })
    ));
}
