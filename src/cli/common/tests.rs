// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{borrow::Cow, str::FromStr};

use super::{printers::render_blocks, *};

#[test]
fn test_arg_file_types() {
    assert_eq!(ARG_FILE_TYPES_COMMA_SEPARATED.as_str(), "toml, json");
    assert!(matches!(ArgFileTypes::from_str("toml"), Ok(ArgFileTypes::Toml)));
    assert!(matches!(ArgFileTypes::from_str("json"), Ok(ArgFileTypes::Json)));
    assert!(ArgFileTypes::from_str("yaml").is_err());
}

#[test]
fn test_help_texts_list_choices() {
    assert!(MODE_HELP.contains("counter, autocorrelator, crosscorrelator"));
    assert!(SCALE_HELP.contains("linear, sqrt, log"));
    assert!(DARK_FORMAT_HELP.contains("json, legacy"));
    assert!(ZERO_POLICY_HELP.contains("skip, keep"));
}

#[test]
fn test_render_blocks() {
    let blocks: Vec<Vec<Cow<'static, str>>> = vec![
        vec!["a".into()],
        vec!["b".into(), "c".into()],
        vec!["d".into()],
    ];
    assert_eq!(
        render_blocks(&blocks),
        vec!["├ a", "├ b", "│ c", "└ d"]
    );

    // A multi-line block at the end doesn't close the tree.
    let blocks: Vec<Vec<Cow<'static, str>>> = vec![vec!["a".into(), "b".into()]];
    assert_eq!(render_blocks(&blocks), vec!["├ a", "│ b"]);
    assert!(render_blocks(&[]).is_empty());
}
