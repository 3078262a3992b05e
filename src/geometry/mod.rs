// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scan geometry of multi-line correlation products.
//!
//! Correlating N lines gives an N-dimensional lag space. Here it's flattened
//! into a single spectrum length so that it can be stacked like any other
//! series.

mod error;

pub use error::GeometryError;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_BASELINE_SIZE, MIN_CORRELATION_ORDER};

/// The scan settings of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineScan {
    pub start_channel: usize,
    pub end_channel: usize,
    pub scan_step: usize,

    /// \[ns\]
    pub start_lag: f64,
    /// \[ns\]
    pub end_lag: f64,
    /// \[ns\]
    pub lag_step: f64,
}

impl Default for LineScan {
    fn default() -> Self {
        LineScan {
            start_channel: 0,
            end_channel: 0,
            scan_step: 1,
            start_lag: 0.0,
            end_lag: 0.0,
            lag_step: 1.0,
        }
    }
}

impl LineScan {
    pub fn channel_bandwidth(&self) -> usize {
        self.end_channel.saturating_sub(self.start_channel)
    }

    pub fn lag_bandwidth(&self) -> f64 {
        self.end_lag - self.start_lag
    }
}

/// One line's contribution to a [`ScanGeometry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelWindow {
    pub start: usize,
    pub end: usize,
    pub step: usize,
    /// The channel bandwidth.
    pub size: usize,

    pub lag_start: f64,
    pub lag_end: f64,
    pub lag_step: f64,
    /// The lag bandwidth.
    pub lag_size: f64,
}

impl From<&LineScan> for ChannelWindow {
    fn from(scan: &LineScan) -> Self {
        ChannelWindow {
            start: scan.start_channel,
            end: scan.end_channel,
            step: scan.scan_step,
            size: scan.channel_bandwidth(),
            lag_start: scan.start_lag,
            lag_end: scan.end_lag,
            lag_step: scan.lag_step,
            lag_size: scan.lag_bandwidth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanGeometry {
    pub windows: Vec<ChannelWindow>,

    /// The length of the flattened spectrum.
    pub size_2nd: usize,

    /// The combined lag span.
    pub lag_size_2nd: f64,

    /// The lag covered by each bin of the flattened spectrum.
    pub lag_step_2nd: f64,
}

/// Derive the combined scan geometry of two or more lines.
///
/// Two lines are stepped together by the larger of their steps (at least 1)
/// and their bandwidths are added, giving `(bw0 + bw1) / step + 1` bins, but
/// never fewer than 3. Their lag bandwidths are added too.
///
/// More lines multiply instead: each contributes `bandwidth / step` bins
/// (integer division) and `lag_bandwidth / lag_step` lags, so zero steps are
/// an error here. So is a product of bins that doesn't fit in a `usize`.
pub fn compute_buffer_sizes(lines: &[LineScan]) -> Result<ScanGeometry, GeometryError> {
    if lines.len() < MIN_CORRELATION_ORDER {
        return Err(GeometryError::TooFewLines(lines.len()));
    }
    for (i, line) in lines.iter().enumerate() {
        if line.end_channel < line.start_channel {
            return Err(GeometryError::EndBeforeStart {
                line: i,
                start: line.start_channel,
                end: line.end_channel,
            });
        }
    }
    let windows: Vec<ChannelWindow> = lines.iter().map(ChannelWindow::from).collect();

    let (size_2nd, lag_size_2nd) = match lines {
        [a, b] => {
            let step = a.scan_step.max(b.scan_step).max(1);
            let size = a
                .channel_bandwidth()
                .checked_add(b.channel_bandwidth())
                .and_then(|bandwidth| (bandwidth / step).checked_add(1))
                .ok_or(GeometryError::TooLarge(lines.len()))?
                .max(MIN_BASELINE_SIZE);
            (size, a.lag_bandwidth() + b.lag_bandwidth())
        }
        _ => {
            let mut size: usize = 1;
            let mut lag_size = 1.0;
            for (i, line) in lines.iter().enumerate() {
                if line.scan_step == 0 {
                    return Err(GeometryError::ZeroStep(i));
                }
                if line.lag_step == 0.0 {
                    return Err(GeometryError::ZeroLagStep(i));
                }
                size = size
                    .checked_mul(line.channel_bandwidth() / line.scan_step)
                    .ok_or(GeometryError::TooLarge(lines.len()))?;
                lag_size *= line.lag_bandwidth() / line.lag_step;
            }
            if size == 0 {
                return Err(GeometryError::Empty(lines.len()));
            }
            (size, lag_size)
        }
    };

    let geometry = ScanGeometry {
        windows,
        size_2nd,
        lag_size_2nd,
        lag_step_2nd: lag_size_2nd / size_2nd as f64,
    };
    trace!(
        "Scan geometry of {} lines: {} bins over {} ns",
        lines.len(),
        geometry.size_2nd,
        geometry.lag_size_2nd
    );
    Ok(geometry)
}
