// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Streaming stack accumulation and scan geometry for XC-family radio-astronomy
cross-correlators.

Packets and scan spectra from a correlator (or a recording of one) are fed
into per-line and per-polytope [`Series`], which keep a time-windowed view of
counts, magnitude and phase, stack repeated scans into running averages,
accumulate histograms and optionally subtract a persisted dark frame.
 */

mod cli;
pub mod constants;
pub mod context;
pub mod dark;
pub mod export;
pub mod geometry;
pub mod histogram;
pub(crate) mod math;
pub mod packet;
mod params;
pub mod series;
pub mod settings;
pub mod stack;

// Re-exports.
pub use cli::{XcStack, XcStackError};
pub use context::{
    ContextError, CorrelatorConfig, CorrelatorContext, Line, LineConfig, Mode, Polytope, Scale,
};
pub use dark::{DarkError, DarkFormat, DarkFrame};
pub use export::{write_counts_csv, write_spectrum_csv, ExportError};
pub use geometry::{compute_buffer_sizes, ChannelWindow, GeometryError, LineScan, ScanGeometry};
pub use histogram::{compute_histogram, HistogramStack};
pub use packet::{
    Correlation, Packet, PacketError, PacketSource, Record, RecordReader, SpectrumScan,
};
pub use series::{AxisTransform, Component, Sample, Series, SeriesConfig};
pub use settings::{setting_key, FileSettings, MemorySettings, SettingsError, SettingsStore};
pub use stack::{StackMap, ZeroPolicy};

use crossbeam_utils::atomic::AtomicCell;

lazy_static::lazy_static! {
    /// Are progress bars being drawn? This should only ever be enabled by CLI
    /// code.
    static ref PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
}
