// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("Couldn't open recording {}: {err}", .path.display())]
    Open { path: PathBuf, err: std::io::Error },

    #[error("Couldn't read line {line} of the recording: {err}")]
    Read { line: usize, err: std::io::Error },

    #[error("Line {line} of the recording isn't a valid record: {err}")]
    Parse { line: usize, err: serde_json::Error },
}
