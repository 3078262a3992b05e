// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The correlator context: every line, every polytope made from them, and the
settings store that their dark frames persist to.

There are no globals; a [`CorrelatorContext`] is built once and passed around.
Each line and polytope locks its own accumulation state, so packets and scans
for different products can be handled from different threads.
 */

mod error;
mod line;
mod polytope;

pub use error::ContextError;
pub use line::{Line, LineState};
pub use polytope::{Polytope, PolytopeState};

use std::sync::{Mutex, PoisonError};

use itertools::Itertools;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    constants::{
        DARK_SETTING, DEFAULT_PACKET_TIME, DEFAULT_TIME_RANGE, LOG_SCALE_EXPONENT,
        MIN_CORRELATION_ORDER,
    },
    dark::{DarkFormat, DarkFrame},
    geometry::{compute_buffer_sizes, LineScan, ScanGeometry},
    packet::{Packet, SpectrumScan},
    series::{AxisTransform, Component, Series, SeriesConfig},
    settings::{setting_key, SettingsStore},
};

/// What the correlator is doing.
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
pub enum Mode {
    /// Live packets: counts, and correlation magnitude and phase over time.
    #[default]
    Counter,

    /// Stacked autocorrelation scans of each line.
    Autocorrelator,

    /// Stacked cross-correlation scans of each polytope.
    Crosscorrelator,
}

/// The scale applied to scan magnitudes before they're stacked.
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
pub enum Scale {
    #[default]
    Linear,
    Sqrt,
    Log,
}

impl Scale {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Scale::Linear => v,
            Scale::Sqrt => v.sqrt(),
            Scale::Log => v.powf(LOG_SCALE_EXPONENT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelatorConfig {
    pub series: SeriesConfig,

    /// How much time counter-mode traces keep \[seconds\].
    pub time_range: f64,

    /// The period between packets \[seconds\].
    pub packet_time: f64,

    /// Added to packet timestamps \[seconds\].
    pub start_time: f64,

    pub scale: Scale,

    pub mode: Mode,

    /// How dark frames are written to the settings store.
    pub dark_format: DarkFormat,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        CorrelatorConfig {
            series: SeriesConfig::default(),
            time_range: DEFAULT_TIME_RANGE,
            packet_time: DEFAULT_PACKET_TIME,
            start_time: 0.0,
            scale: Scale::default(),
            mode: Mode::default(),
            dark_format: DarkFormat::default(),
        }
    }
}

impl CorrelatorConfig {
    /// The packet rate \[Hz\], used as a histogram header value.
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.packet_time
    }
}

/// A line to put into a [`CorrelatorContext`]. Its hardware index is its
/// position in the list given to [`CorrelatorContext::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    pub name: String,

    #[serde(flatten)]
    pub scan: LineScan,
}

impl LineConfig {
    pub fn new<S: Into<String>>(name: S, scan: LineScan) -> LineConfig {
        LineConfig {
            name: name.into(),
            scan,
        }
    }
}

pub struct CorrelatorContext {
    config: CorrelatorConfig,
    lines: Vec<Line>,
    polytopes: Vec<Polytope>,
    settings: Mutex<Box<dyn SettingsStore + Send>>,
    scan_update: Mutex<()>,
}

impl CorrelatorContext {
    /// Build a context with a polytope for every pair of lines. Pairs are
    /// ordered `(0, 1), (0, 2), ..., (1, 2), ...` and their cross-correlation
    /// indices follow the same order. Any dark frames persisted in `settings`
    /// are loaded and enabled.
    pub fn new<S: SettingsStore + Send + 'static>(
        config: CorrelatorConfig,
        lines: Vec<LineConfig>,
        settings: S,
    ) -> Result<CorrelatorContext, ContextError> {
        let lines: Vec<Line> = lines
            .into_iter()
            .enumerate()
            .map(|(i, l)| Line::new(l.name, i, l.scan, config.series))
            .collect();
        let mut context = CorrelatorContext {
            config,
            lines,
            polytopes: vec![],
            settings: Mutex::new(Box::new(settings)),
            scan_update: Mutex::new(()),
        };

        for line in &context.lines {
            if let Some(frame) = context.load_dark(line.name()) {
                line.lock().spectrum.set_dark(frame);
            }
        }
        for pair in (0..context.lines.len()).combinations(MIN_CORRELATION_ORDER) {
            context.add_polytope(&pair)?;
        }
        debug!(
            "Correlator context with {} lines and {} polytopes",
            context.lines.len(),
            context.polytopes.len()
        );
        Ok(context)
    }

    pub fn config(&self) -> &CorrelatorConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn polytopes(&self) -> &[Polytope] {
        &self.polytopes
    }

    pub fn line(&self, index: usize) -> Result<&Line, ContextError> {
        self.lines.get(index).ok_or(ContextError::UnknownLine(index))
    }

    pub fn polytope(&self, index: usize) -> Result<&Polytope, ContextError> {
        self.polytopes
            .get(index)
            .ok_or(ContextError::UnknownPolytope(index))
    }

    /// The polytope whose values are at `cross_index` in a packet.
    pub fn polytope_by_cross_index(&self, cross_index: usize) -> Option<&Polytope> {
        self.polytopes
            .iter()
            .find(|p| p.cross_index() == cross_index)
    }

    /// Add a polytope of two or more lines, returning its index. Its
    /// cross-correlation index is the number of polytopes before it.
    pub fn add_polytope(&mut self, lines: &[usize]) -> Result<usize, ContextError> {
        for (i, &line) in lines.iter().enumerate() {
            self.line(line)?;
            if lines[..i].contains(&line) {
                return Err(ContextError::RepeatedLine(line));
            }
        }
        if let Some(existing) = self
            .polytopes
            .iter()
            .find(|p| p.order() == lines.len() && lines.iter().all(|&l| p.contains_line(l)))
        {
            return Err(ContextError::PolytopeExists(existing.lines().to_vec()));
        }

        let scans: Vec<LineScan> = lines.iter().map(|&l| self.lines[l].scan()).collect();
        let geometry = compute_buffer_sizes(&scans)?;
        let name = lines.iter().map(|&l| self.lines[l].name()).join("*");
        let cross_index = self.polytopes.len();
        let polytope = Polytope::new(
            name,
            cross_index,
            lines.to_vec(),
            geometry,
            self.config.series,
        );
        if let Some(frame) = self.load_dark(polytope.name()) {
            polytope.lock().spectrum.set_dark(frame);
        }
        trace!(
            "Added polytope '{}' with cross-correlation index {cross_index}",
            polytope.name()
        );
        self.polytopes.push(polytope);
        Ok(cross_index)
    }

    /// Feed a packet to every line and polytope. Only counter mode uses
    /// packets; otherwise this does nothing.
    pub fn add_packet(&self, packet: &Packet) {
        if self.config.mode != Mode::Counter {
            trace!("Ignoring packet at {} in {} mode", packet.timestamp, self.config.mode);
            return;
        }

        let x = self.config.start_time + packet.timestamp;
        let min_x = x - self.config.time_range;
        let sample_rate = self.config.sample_rate();
        let histogram_size = self.config.series.histogram_size;

        for line in &self.lines {
            let y = packet.counts.get(line.index()).copied();
            let auto = packet.autocorrelations.get(line.index());
            let mut state = line.lock();
            state.counts.add_count(
                min_x,
                x,
                y,
                auto.map(|c| c.magnitude()),
                auto.map(|c| c.phase()),
            );
            state
                .counts
                .build_histogram(Component::Counts, sample_rate, histogram_size);
        }

        for polytope in &self.polytopes {
            let cross = packet.crosscorrelations.get(polytope.cross_index());
            let mut state = polytope.lock();
            state.counts.add_count(
                min_x,
                x,
                None,
                cross.map(|c| c.magnitude()),
                cross.map(|c| c.phase()),
            );
            state
                .counts
                .build_histogram(Component::Magnitude, sample_rate, histogram_size);
        }
    }

    /// Stack a finished scan into its line (autocorrelator mode) or polytope
    /// (crosscorrelator mode). Magnitudes are scaled first; phases are not.
    pub fn stack_spectrum(&self, scan: &SpectrumScan) -> Result<(), ContextError> {
        match self.config.mode {
            Mode::Counter => Err(ContextError::WrongMode(Mode::Counter)),

            Mode::Autocorrelator => {
                let line = self.line(scan.index)?;
                self.stack_into(&mut line.lock().spectrum, scan);
                Ok(())
            }

            Mode::Crosscorrelator => {
                let polytope = self
                    .polytope_by_cross_index(scan.index)
                    .ok_or(ContextError::UnknownPolytope(scan.index))?;
                let mut state = polytope.lock();
                if scan.magnitude.len() != state.geometry.size_2nd {
                    debug!(
                        "{}: scan has {} bins, but the geometry expects {}",
                        polytope.name(),
                        scan.magnitude.len(),
                        state.geometry.size_2nd
                    );
                }
                self.stack_into(&mut state.spectrum, scan);
                Ok(())
            }
        }
    }

    fn stack_into(&self, spectrum: &mut Series, scan: &SpectrumScan) {
        let transform = AxisTransform {
            x_scale: scan.lag_step,
            x_offset: scan.lag_offset,
            ..Default::default()
        };
        let scale = self.config.scale;
        let magnitude: Vec<f64> = scan.magnitude.iter().map(|&v| scale.apply(v)).collect();
        let sample_rate = self.config.sample_rate();
        let histogram_size = self.config.series.histogram_size;

        spectrum.stack_buffer(Component::Magnitude, &magnitude, 0, &transform);
        spectrum.build_histogram(Component::Magnitude, sample_rate, histogram_size);
        if !scan.phase.is_empty() {
            spectrum.stack_buffer(Component::Phase, &scan.phase, 0, &transform);
            spectrum.build_histogram(Component::Phase, sample_rate, histogram_size);
        }
    }

    /// Zero every stacking counter, so the next scan starts new averages.
    pub fn reset_stacks(&self) {
        self.for_each_series(Series::reset);
    }

    /// Empty every series, dark frames included. Persisted dark frames stay
    /// in the settings store and are loaded by the next context built from it.
    pub fn clear(&self) {
        self.for_each_series(Series::clear);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        info!("Switching from {} to {mode} mode", self.config.mode);
        self.config.mode = mode;
        self.clear();
    }

    /// Change a line's scan settings and recompute the geometry of every
    /// polytope it is part of. Nothing changes if any geometry is invalid.
    pub fn update_line_scan(&self, line: usize, scan: LineScan) -> Result<(), ContextError> {
        self.line(line)?;
        // Held until every geometry is committed, so concurrent updates can't
        // each miss the other's scan.
        let _guard = self.scan_update.lock().unwrap_or_else(PoisonError::into_inner);
        let scans: Vec<LineScan> = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, l)| if i == line { scan } else { l.scan() })
            .collect();

        let mut updates = vec![];
        for polytope in self.polytopes.iter().filter(|p| p.contains_line(line)) {
            let polytope_scans: Vec<LineScan> =
                polytope.lines().iter().map(|&l| scans[l]).collect();
            updates.push((polytope, compute_buffer_sizes(&polytope_scans)?));
        }

        self.lines[line].set_scan(scan);
        for (polytope, geometry) in updates {
            debug!(
                "{}: spectrum size is now {}",
                polytope.name(),
                geometry.size_2nd
            );
            polytope.lock().geometry = geometry;
        }
        Ok(())
    }

    /// Toggle dark subtraction of a line's spectrum. Returns whether it's now
    /// active.
    pub fn toggle_line_dark(&self, line: usize) -> Result<bool, ContextError> {
        let line = self.line(line)?;
        let mut state = line.lock();
        self.toggle_dark(line.name(), &mut state.spectrum)
    }

    /// Toggle dark subtraction of a polytope's spectrum. Returns whether it's
    /// now active.
    pub fn toggle_polytope_dark(&self, polytope: usize) -> Result<bool, ContextError> {
        let polytope = self.polytope(polytope)?;
        let mut state = polytope.lock();
        self.toggle_dark(polytope.name(), &mut state.spectrum)
    }

    /// The setting is written before the series changes, so a failed write
    /// leaves the series as it was.
    fn toggle_dark(&self, owner: &str, spectrum: &mut Series) -> Result<bool, ContextError> {
        let key = setting_key(owner, DARK_SETTING);
        let mut settings = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        let active = if spectrum.dark_active() {
            settings.remove(&key)?;
            spectrum.clear_dark();
            false
        } else {
            let frame = DarkFrame::from_samples(spectrum.magnitude().iter().copied());
            settings.set(&key, frame.to_setting(self.config.dark_format)?)?;
            spectrum.set_dark(frame);
            true
        };
        info!(
            "{owner}: dark subtraction {}",
            if active { "enabled" } else { "disabled" }
        );
        Ok(active)
    }

    /// A copy of a polytope's current scan geometry.
    pub fn geometry(&self, polytope: usize) -> Result<ScanGeometry, ContextError> {
        Ok(self.polytope(polytope)?.lock().geometry.clone())
    }

    /// Read a persisted dark frame. Unreadable or empty frames are ignored.
    fn load_dark(&self, owner: &str) -> Option<DarkFrame> {
        let key = setting_key(owner, DARK_SETTING);
        let setting = self
            .settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)?;
        match DarkFrame::from_setting(&setting) {
            Ok(frame) if !frame.is_empty() => {
                debug!("{owner}: loaded dark frame with {} points", frame.len());
                Some(frame)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("{owner}: ignoring persisted dark frame: {e}");
                None
            }
        }
    }

    fn for_each_series<F: FnMut(&mut Series)>(&self, mut f: F) {
        for line in &self.lines {
            let mut state = line.lock();
            f(&mut state.counts);
            f(&mut state.spectrum);
        }
        for polytope in &self.polytopes {
            let mut state = polytope.lock();
            f(&mut state.counts);
            f(&mut state.spectrum);
        }
    }
}
