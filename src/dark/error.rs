// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DarkError {
    #[error("Dark frame token '{0}' is not an 'x,y' pair")]
    MalformedToken(String),

    #[error("Couldn't parse '{value}' (in dark frame token '{token}') as a number")]
    BadNumber { token: String, value: String },

    #[error("Couldn't (de)serialise a dark frame as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
