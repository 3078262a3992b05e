// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use approx::assert_abs_diff_eq;

use super::*;

fn frame() -> DarkFrame {
    DarkFrame::from_samples([
        Sample { x: 2.0, y: 0.25 },
        Sample { x: -1.5, y: 3.0 },
        Sample { x: 0.5, y: -2.0 },
    ])
}

#[test]
fn test_lookup_is_exact() {
    let dark = frame();
    assert_abs_diff_eq!(dark.get(0.5).unwrap(), -2.0);
    assert!(dark.get(0.5000001).is_none());
    assert_eq!(dark.len(), 3);
}

#[test]
fn test_legacy_format() {
    let setting = frame().to_setting(DarkFormat::Legacy).unwrap();
    assert_eq!(setting, "-1.5,3;0.5,-2;2,0.25");
    assert_eq!(DarkFrame::from_setting(&setting).unwrap(), frame());
}

#[test]
fn test_json_format() {
    let setting = frame().to_setting(DarkFormat::Json).unwrap();
    assert_eq!(setting, "[[-1.5,3.0],[0.5,-2.0],[2.0,0.25]]");
    assert_eq!(DarkFrame::from_setting(&setting).unwrap(), frame());
}

#[test]
fn test_legacy_tolerates_stray_separators() {
    let dark = DarkFrame::from_setting(" 1,2;;3, 4 ;").unwrap();
    assert_eq!(dark.len(), 2);
    assert_abs_diff_eq!(dark.get(3.0).unwrap(), 4.0);
}

#[test]
fn test_empty_setting_is_empty_frame() {
    assert!(DarkFrame::from_setting("").unwrap().is_empty());
    assert!(DarkFrame::from_setting("[]").unwrap().is_empty());
    assert_eq!(DarkFrame::default().to_setting(DarkFormat::Legacy).unwrap(), "");
}

#[test]
fn test_bad_settings() {
    assert!(matches!(
        DarkFrame::from_setting("1,2;3"),
        Err(DarkError::MalformedToken(t)) if t == "3"
    ));
    assert!(matches!(
        DarkFrame::from_setting("1,two"),
        Err(DarkError::BadNumber { value, .. }) if value == "two"
    ));
    assert!(matches!(
        DarkFrame::from_setting("[[1.0]]"),
        Err(DarkError::Json(_))
    ));
}

#[test]
fn test_dark_format_from_str() {
    assert_eq!(DarkFormat::from_str("json").unwrap(), DarkFormat::Json);
    assert_eq!(DarkFormat::from_str("legacy").unwrap(), DarkFormat::Legacy);
    assert_eq!(DarkFormat::default(), DarkFormat::Json);
}
