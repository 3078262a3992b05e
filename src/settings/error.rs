// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Couldn't decode settings file {}: {err}", .path.display())]
    Decode { path: PathBuf, err: toml::de::Error },

    #[error("Couldn't encode settings as toml: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("IO error on settings file {}: {err}", .path.display())]
    IO { path: PathBuf, err: std::io::Error },
}
