// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::constants::MIN_CORRELATION_ORDER;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("A scan geometry needs at least {} lines, but {0} were given", MIN_CORRELATION_ORDER)]
    TooFewLines(usize),

    #[error("Line {line} has an end channel ({end}) before its start channel ({start})")]
    EndBeforeStart { line: usize, start: usize, end: usize },

    #[error("Line {0} has a scan step of 0")]
    ZeroStep(usize),

    #[error("Line {0} has a lag step of 0")]
    ZeroLagStep(usize),

    #[error("The combined scan of {0} lines has no channels; each line's bandwidth must be at least its scan step")]
    Empty(usize),

    #[error("The combined scan of {0} lines has too many channels to be indexed")]
    TooLarge(usize),
}
