// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Dark frames: correction values subtracted from newly stacked values, and
//! their persisted string forms.

mod error;
#[cfg(test)]
mod tests;

pub use error::DarkError;

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{series::Sample, stack::StackKey};

/// How a dark frame is written to a settings store. Both forms are always
/// readable.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DarkFormat {
    /// A JSON array of `[x, y]` pairs.
    #[default]
    Json,

    /// `x,y` tokens joined with `;`.
    Legacy,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DarkFrame {
    values: BTreeMap<StackKey, f64>,
}

impl DarkFrame {
    pub fn from_samples<I: IntoIterator<Item = Sample>>(samples: I) -> DarkFrame {
        DarkFrame {
            values: samples
                .into_iter()
                .map(|s| (StackKey(s.x), s.y))
                .collect(),
        }
    }

    /// The correction at exactly `x`, if there is one.
    pub fn get(&self, x: f64) -> Option<f64> {
        self.values.get(&StackKey(x)).copied()
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.values.iter().map(|(k, &y)| Sample { x: k.0, y })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn to_setting(&self, format: DarkFormat) -> Result<String, DarkError> {
        match format {
            DarkFormat::Json => {
                let pairs: Vec<[f64; 2]> = self.samples().map(|s| [s.x, s.y]).collect();
                Ok(serde_json::to_string(&pairs)?)
            }
            DarkFormat::Legacy => Ok(self
                .samples()
                .map(|s| format!("{},{}", s.x, s.y))
                .join(";")),
        }
    }

    /// Parse a persisted dark frame in either format. An empty string is an
    /// empty frame.
    pub fn from_setting(setting: &str) -> Result<DarkFrame, DarkError> {
        let setting = setting.trim();
        if setting.starts_with('[') {
            let pairs: Vec<[f64; 2]> = serde_json::from_str(setting)?;
            return Ok(DarkFrame::from_samples(
                pairs.into_iter().map(|[x, y]| Sample { x, y }),
            ));
        }

        let mut samples = vec![];
        for token in setting.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            let (x, y) = token
                .split_once(',')
                .ok_or_else(|| DarkError::MalformedToken(token.to_string()))?;
            let parse = |value: &str| {
                value.trim().parse::<f64>().map_err(|_| DarkError::BadNumber {
                    token: token.to_string(),
                    value: value.to_string(),
                })
            };
            samples.push(Sample {
                x: parse(x)?,
                y: parse(y)?,
            });
        }
        Ok(DarkFrame::from_samples(samples))
    }
}
