// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Couldn't create {}: {err}", .path.display())]
    Create { path: PathBuf, err: std::io::Error },

    #[error("IO error when writing CSV: {0}")]
    IO(#[from] std::io::Error),
}
