// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::Sample;
use crate::math::smooth;

/// Visible samples paired with their unsmoothed values. The two vectors are
/// always the same length and index-aligned.
#[derive(Debug, Clone, Default)]
pub(crate) struct Trace {
    samples: Vec<Sample>,
    raw: Vec<f64>,
}

impl Trace {
    pub(crate) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
        self.raw.push(sample.y);
    }

    /// Drop every sample with `x < min_x` from both the visible samples and
    /// the raw history.
    pub(crate) fn evict_before(&mut self, min_x: f64) {
        if self.samples.iter().all(|s| s.x >= min_x) {
            return;
        }
        let (samples, raw) = self
            .samples
            .drain(..)
            .zip(self.raw.drain(..))
            .filter(|(s, _)| s.x >= min_x)
            .unzip();
        self.samples = samples;
        self.raw = raw;
    }

    pub(crate) fn smooth(&mut self, window: usize) {
        smooth(&mut self.samples, &self.raw, window);
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
        self.raw.clear();
    }

    pub(crate) fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub(crate) fn raw(&self) -> &[f64] {
        &self.raw
    }

    pub(crate) fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }
}
