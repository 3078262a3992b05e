// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Value histograms and their running (stacked) averages.

#[cfg(test)]
mod tests;

use crate::{
    math::{min_max, stretch, unstretch},
    series::Sample,
    stack::{StackMap, ZeroPolicy},
};

/// Compute a histogram of `values`, returned as `(bin, count)` samples.
///
/// The range is taken over a working buffer of `[0.0, sample_rate,
/// values...]`, so the two header values always widen the range. Only
/// `values` are counted. There are `min(size, values.len())` bins, each
/// reported by its lower edge. If the range is degenerate, everything lands in
/// one bin.
pub fn compute_histogram(values: &[f64], sample_rate: f64, size: usize) -> Vec<Sample> {
    let bins = size.min(values.len());
    if bins == 0 {
        return vec![];
    }

    let mut working = Vec::with_capacity(values.len() + 2);
    working.push(0.0);
    working.push(sample_rate);
    working.extend_from_slice(values);
    let (min, max) = match min_max(&working) {
        Some(mm) => mm,
        None => return vec![],
    };
    if max <= min {
        return vec![Sample {
            x: min,
            y: values.len() as f64,
        }];
    }

    let width = bins as f64;
    let mut counts = vec![0_usize; bins];
    for &v in &working[2..] {
        // Negative and NaN casts saturate to 0.
        let bin = (stretch(v, min, max, width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Sample {
            x: unstretch(i as f64, min, max, width),
            y: count as f64,
        })
        .collect()
}

/// A histogram averaged over repeated builds. Bins are stacked like series
/// values, with a pass counter of their own.
#[derive(Debug, Clone, Default)]
pub struct HistogramStack {
    stack: StackMap,
    bins: Vec<Sample>,
}

impl HistogramStack {
    pub fn new(zero_policy: ZeroPolicy) -> HistogramStack {
        HistogramStack {
            stack: StackMap::new(zero_policy),
            bins: vec![],
        }
    }

    /// Build a histogram of `values` and stack it as a new pass. The rendered
    /// bins are replaced by whatever the stack emitted.
    pub fn accumulate(&mut self, values: &[f64], sample_rate: f64, size: usize) {
        let histogram = compute_histogram(values, sample_rate, size);
        if histogram.is_empty() {
            return;
        }
        self.stack.begin_pass();
        self.bins = histogram
            .into_iter()
            .filter_map(|bin| self.stack.stack_value(bin.x, Some(bin.y), None))
            .collect();
    }

    /// The bins emitted by the latest [`HistogramStack::accumulate`].
    pub fn bins(&self) -> &[Sample] {
        &self.bins
    }

    pub fn stack(&self) -> &StackMap {
        &self.stack
    }

    pub fn stack_index(&self) -> u32 {
        self.stack.stack_index()
    }

    pub fn reset(&mut self) {
        self.stack.reset();
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.bins.clear();
    }
}
