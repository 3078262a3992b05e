// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for running `xcstack` jobs.
//!
//! The code here mirrors the `cli` module; `cli` holds unparsed, user-facing
//! arguments, whereas parameters have been parsed and are ready to be used
//! directly.

mod replay;

pub(crate) use replay::{ReplayError, ReplayParams, ReplaySummary};
