// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Windowed series buffers.
//!
//! A [`Series`] holds three traces (counts, magnitude and phase). In counter
//! mode samples are appended and anything older than the time window is
//! evicted; in spectrum modes whole scans are stacked into running averages.
//! Every trace has its own [`StackMap`] and [`HistogramStack`], and all of
//! them share a single [`DarkFrame`].

mod trace;
#[cfg(test)]
mod tests;

pub(crate) use trace::Trace;

use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    constants::{DEFAULT_HISTOGRAM_SIZE, DEFAULT_SMOOTHING_WINDOW, RESIDUALS_SUFFIX},
    dark::DarkFrame,
    histogram::HistogramStack,
    stack::{StackMap, ZeroPolicy},
};

/// A single point: a coordinate (time or lag) and its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// One of the three traces kept by a [`Series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Component {
    Counts,
    Magnitude,
    Phase,
}

/// Maps buffer indices and values onto plot coordinates when stacking a scan:
/// `x = i * x_scale + x_offset`, `y = v * y_scale + y_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    pub x_scale: f64,
    pub x_offset: f64,
    pub y_scale: f64,
    pub y_offset: f64,
}

impl Default for AxisTransform {
    fn default() -> Self {
        AxisTransform {
            x_scale: 1.0,
            x_offset: 0.0,
            y_scale: 1.0,
            y_offset: 0.0,
        }
    }
}

/// Tunables shared by every [`Series`] of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// The moving-average window length. 0 or 1 disables smoothing.
    pub window: usize,

    /// The number of histogram bins.
    pub histogram_size: usize,

    pub zero_policy: ZeroPolicy,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        SeriesConfig {
            window: DEFAULT_SMOOTHING_WINDOW,
            histogram_size: DEFAULT_HISTOGRAM_SIZE,
            zero_policy: ZeroPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct Track {
    trace: Trace,
    stack: StackMap,
    histogram: HistogramStack,
}

impl Track {
    fn new(zero_policy: ZeroPolicy) -> Track {
        Track {
            trace: Trace::default(),
            stack: StackMap::new(zero_policy),
            histogram: HistogramStack::new(zero_policy),
        }
    }

    fn clear(&mut self) {
        self.trace.clear();
        self.stack.clear();
        self.histogram.clear();
    }

    fn reset(&mut self) {
        self.stack.reset();
        self.histogram.reset();
    }
}

#[derive(Debug, Clone)]
pub struct Series {
    name: String,
    label: String,
    config: SeriesConfig,
    counts: Track,
    magnitude: Track,
    phase: Track,
    dark: DarkFrame,
    dark_active: bool,
}

impl Series {
    pub fn new<S: Into<String>>(name: S, config: SeriesConfig) -> Series {
        let name = name.into();
        Series {
            label: name.clone(),
            name,
            config,
            counts: Track::new(config.zero_policy),
            magnitude: Track::new(config.zero_policy),
            phase: Track::new(config.zero_policy),
            dark: DarkFrame::default(),
            dark_active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display name. This gains a "(residuals)" suffix while a dark frame
    /// is being subtracted.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    pub fn set_window(&mut self, window: usize) {
        self.config.window = window;
    }

    fn track(&self, component: Component) -> &Track {
        match component {
            Component::Counts => &self.counts,
            Component::Magnitude => &self.magnitude,
            Component::Phase => &self.phase,
        }
    }

    pub fn samples(&self, component: Component) -> &[Sample] {
        self.track(component).trace.samples()
    }

    /// The unsmoothed values behind [`Series::samples`].
    pub fn raw(&self, component: Component) -> &[f64] {
        self.track(component).trace.raw()
    }

    pub fn counts(&self) -> &[Sample] {
        self.samples(Component::Counts)
    }

    pub fn magnitude(&self) -> &[Sample] {
        self.samples(Component::Magnitude)
    }

    pub fn phase(&self) -> &[Sample] {
        self.samples(Component::Phase)
    }

    pub fn stack(&self, component: Component) -> &StackMap {
        &self.track(component).stack
    }

    pub fn histogram(&self, component: Component) -> &HistogramStack {
        &self.track(component).histogram
    }

    pub fn dark(&self) -> &DarkFrame {
        &self.dark
    }

    pub fn dark_active(&self) -> bool {
        self.dark_active
    }

    /// Append a counter-mode sample.
    ///
    /// Everything older than `min_x` is evicted from all three traces first.
    /// `y` goes to the counts trace and the optional magnitude and phase go to
    /// their own traces; each is skipped if absent. The counts trace is
    /// smoothed both before and after the companion traces are updated.
    pub fn add_count(
        &mut self,
        min_x: f64,
        x: f64,
        y: Option<f64>,
        magnitude: Option<f64>,
        phase: Option<f64>,
    ) {
        let window = self.config.window;
        for track in [&mut self.counts, &mut self.magnitude, &mut self.phase] {
            track.trace.evict_before(min_x);
        }

        if let Some(y) = y {
            self.counts.trace.push(Sample { x, y });
        }
        self.counts.trace.smooth(window);

        if let Some(y) = magnitude {
            self.magnitude.trace.push(Sample { x, y });
        }
        if let Some(y) = phase {
            self.phase.trace.push(Sample { x, y });
        }

        self.counts.trace.smooth(window);
        self.magnitude.trace.smooth(window);
        self.phase.trace.smooth(window);
    }

    /// Stack one value into a component's running average, subtracting the
    /// dark frame if it is active. The emitted point, if any, is appended to
    /// the component's trace.
    pub fn stack_value(
        &mut self,
        component: Component,
        key: f64,
        value: Option<f64>,
    ) -> Option<Sample> {
        let dark = self.dark_active.then_some(&self.dark);
        let track = match component {
            Component::Counts => &mut self.counts,
            Component::Magnitude => &mut self.magnitude,
            Component::Phase => &mut self.phase,
        };
        let emitted = track.stack.stack_value(key, value, dark)?;
        track.trace.push(emitted);
        Some(emitted)
    }

    /// Stack a whole scan buffer into a component as a new pass.
    ///
    /// The component's trace is rebuilt from the emitted points. The bin at
    /// `offset` itself is not stacked; stacking starts at `offset + 1`.
    pub fn stack_buffer(
        &mut self,
        component: Component,
        buf: &[f64],
        offset: usize,
        transform: &AxisTransform,
    ) {
        let window = self.config.window;
        let dark = self.dark_active.then_some(&self.dark);
        let track = match component {
            Component::Counts => &mut self.counts,
            Component::Magnitude => &mut self.magnitude,
            Component::Phase => &mut self.phase,
        };

        track.trace.clear();
        track.stack.begin_pass();
        for (i, &v) in buf.iter().enumerate().skip(offset.saturating_add(1)) {
            let key = i as f64 * transform.x_scale + transform.x_offset;
            let value = v * transform.y_scale + transform.y_offset;
            if let Some(emitted) = track.stack.stack_value(key, Some(value), dark) {
                track.trace.push(emitted);
            }
        }
        track.trace.smooth(window);
    }

    /// Accumulate the histogram of a component's current values. `sample_rate`
    /// is the second header value of the working buffer.
    pub fn build_histogram(&mut self, component: Component, sample_rate: f64, size: usize) {
        let track = match component {
            Component::Counts => &mut self.counts,
            Component::Magnitude => &mut self.magnitude,
            Component::Phase => &mut self.phase,
        };
        let values = track.trace.values();
        track.histogram.accumulate(&values, sample_rate, size);
    }

    /// Take the current magnitude trace as the dark frame, or drop the dark
    /// frame if one is active. Returns whether subtraction is now active.
    pub fn toggle_dark(&mut self) -> bool {
        if self.dark_active {
            self.clear_dark();
        } else {
            let frame = DarkFrame::from_samples(self.magnitude.trace.samples().iter().copied());
            self.set_dark(frame);
        }
        self.dark_active
    }

    /// Start subtracting `frame`. The frame is subtracted from every
    /// component, phase included, even though it's taken from the magnitude.
    pub fn set_dark(&mut self, frame: DarkFrame) {
        debug!("{}: dark frame with {} points", self.name, frame.len());
        self.dark = frame;
        self.dark_active = true;
        self.label = format!("{}{RESIDUALS_SUFFIX}", self.name);
    }

    pub fn clear_dark(&mut self) {
        self.dark.clear();
        self.dark_active = false;
        self.label.clone_from(&self.name);
    }

    /// Empty every trace, stack, histogram and the dark frame.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.magnitude.clear();
        self.phase.clear();
        self.clear_dark();
    }

    /// Zero the stacking counters so the next pass starts a new average.
    pub fn reset(&mut self) {
        self.counts.reset();
        self.magnitude.reset();
        self.phase.reset();
    }
}
