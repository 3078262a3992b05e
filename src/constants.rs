// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision where they are floats.
 */

/// The number of bins used when a histogram is built from a magnitude or phase
/// trace.
pub const DEFAULT_HISTOGRAM_SIZE: usize = 100;

/// The default length of the moving-average window. A window of 1 or less
/// disables smoothing.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 1;

/// The default amount of time kept in counter-mode traces \[seconds\].
pub const DEFAULT_TIME_RANGE: f64 = 10.0;

/// The default period between correlator packets \[seconds\]. Its reciprocal is
/// the sample rate written into histogram headers.
pub const DEFAULT_PACKET_TIME: f64 = 0.01;

/// The suffix appended to a settings owner's name to store its dark frame.
pub const DARK_SETTING: &str = "Dark";

/// Appended to a series label while dark subtraction is active.
pub const RESIDUALS_SUFFIX: &str = " (residuals)";

/// Exponent used by [`crate::Scale::Log`].
pub const LOG_SCALE_EXPONENT: f64 = 0.1;

/// The smallest number of lines that can form a polytope.
pub const MIN_CORRELATION_ORDER: usize = 2;

/// The smallest combined channel span of a two-line baseline.
pub const MIN_BASELINE_SIZE: usize = 3;

/// The default number of records buffered between the replay reader and the
/// accumulator.
pub const REPLAY_CHANNEL_CAPACITY: usize = 64;
