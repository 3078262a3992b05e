// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The running stack map: repeated measurements at the same coordinate are
//! averaged incrementally across passes, without keeping their history.


use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::dark::DarkFrame;
use crate::series::Sample;

/// A coordinate usable as an ordered map key. Ordering follows
/// [`f64::total_cmp`], so every value (including NaN) has a place.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StackKey(pub(crate) f64);

impl PartialEq for StackKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StackKey {}

impl PartialOrd for StackKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StackKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// What to do with a measurement of exactly `0.0`.
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
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ZeroPolicy {
    /// Zero means "nothing new was measured": the stored value is replayed
    /// and nothing is updated. A stacked result of exactly zero is also not
    /// stored.
    #[default]
    Skip,

    /// Zero is a legitimate measurement and is stacked like any other value.
    Keep,
}

/// Incrementally-averaged values keyed by a continuous coordinate (time, lag,
/// histogram bin).
///
/// Each pass contributes with weight `1 / n` and the stored average with
/// weight `(n - 1) / n`, where `n` is the number of passes begun since the
/// last [`StackMap::reset`]. This is the arithmetic mean over passes.
#[derive(Debug, Clone, Default)]
pub struct StackMap {
    values: BTreeMap<StackKey, f64>,
    stack_index: u32,
    zero_policy: ZeroPolicy,
}

impl StackMap {
    pub fn new(zero_policy: ZeroPolicy) -> StackMap {
        StackMap {
            values: BTreeMap::new(),
            stack_index: 0,
            zero_policy,
        }
    }

    /// Start a new accumulation pass, returning the new pass count.
    pub fn begin_pass(&mut self) -> u32 {
        self.stack_index = self.stack_index.saturating_add(1);
        self.stack_index
    }

    /// The number of passes begun since the last reset.
    pub fn stack_index(&self) -> u32 {
        self.stack_index
    }

    pub fn zero_policy(&self) -> ZeroPolicy {
        self.zero_policy
    }

    pub fn set_zero_policy(&mut self, zero_policy: ZeroPolicy) {
        self.zero_policy = zero_policy;
    }

    /// Zero the pass counter, keeping the stored values. The next pass
    /// overwrites rather than averages.
    pub fn reset(&mut self) {
        self.stack_index = 0;
    }

    /// Forget all stored values and zero the pass counter.
    pub fn clear(&mut self) {
        self.values.clear();
        self.stack_index = 0;
    }

    pub fn get(&self, key: f64) -> Option<f64> {
        self.values.get(&StackKey(key)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All stored values, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.values.iter().map(|(k, &y)| Sample { x: k.0, y })
    }

    /// Stack `value` at `key`, subtracting the dark correction at `key` if
    /// one is supplied and present.
    ///
    /// `None` (or a zero under [`ZeroPolicy::Skip`]) means nothing new was
    /// measured; the stored value at `key`, if any, is emitted unchanged. The
    /// return value is the emitted point, if there is one.
    pub fn stack_value(
        &mut self,
        key: f64,
        value: Option<f64>,
        dark: Option<&DarkFrame>,
    ) -> Option<Sample> {
        let skip_zero = self.zero_policy == ZeroPolicy::Skip;
        let value = match value {
            Some(v) if !(skip_zero && v == 0.0) => v,
            _ => return self.get(key).map(|y| Sample { x: key, y }),
        };

        let n = f64::from(self.stack_index.max(1));
        let mut corrected = value / n;
        if let Some(correction) = dark.and_then(|d| d.get(key)) {
            corrected -= correction;
        }
        if let Some(stored) = self.get(key) {
            corrected += stored * (n - 1.0) / n;
        }

        if skip_zero && corrected == 0.0 {
            return None;
        }
        self.values.insert(StackKey(key), corrected);
        Some(Sample {
            x: key,
            y: corrected,
        })
    }
}
