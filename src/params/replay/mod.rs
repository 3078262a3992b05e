// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Replaying a recording through a [`CorrelatorContext`].


use std::{
    fs,
    path::{Path, PathBuf},
    thread::{self, ScopedJoinHandle},
};

use crossbeam_channel::bounded;
use crossbeam_utils::atomic::AtomicCell;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info, warn};
use scopeguard::defer_on_unwind;

use crate::{
    constants::REPLAY_CHANNEL_CAPACITY,
    context::{ContextError, CorrelatorContext, Mode},
    export::{write_counts_file, write_spectrum_file, ExportError},
    packet::{PacketError, Record, RecordReader},
    series::Series,
    PROGRESS_BARS,
};

pub(crate) struct ReplayParams {
    /// The JSON-lines recording.
    pub(crate) input: PathBuf,

    /// Where CSV files are written.
    pub(crate) output_dir: PathBuf,

    pub(crate) context: CorrelatorContext,

    /// Start a new average for every scan rather than stacking them all.
    pub(crate) no_stack: bool,

    /// After replaying, take every final spectrum as a dark frame.
    pub(crate) take_dark: bool,
}

/// What happened during a replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ReplaySummary {
    pub(crate) packets: usize,
    pub(crate) spectra: usize,

    /// Scans that couldn't be used in the context's mode.
    pub(crate) skipped: usize,

    pub(crate) darks_taken: usize,
    pub(crate) outputs: Vec<PathBuf>,
}

impl ReplayParams {
    pub(crate) fn run(&self) -> Result<ReplaySummary, ReplayError> {
        self.run_with_stop(&AtomicCell::new(false))
    }

    /// Replay until the recording is exhausted or `stop` is set.
    pub(crate) fn run_with_stop(
        &self,
        stop: &AtomicCell<bool>,
    ) -> Result<ReplaySummary, ReplayError> {
        let reader = RecordReader::open(&self.input)?;
        info!(
            "Replaying {} in {} mode",
            self.input.display(),
            self.context.mode()
        );

        // Channel for transferring records from the reader to the
        // accumulator.
        let (tx_record, rx_record) = bounded(REPLAY_CHANNEL_CAPACITY);

        let progress = ProgressBar::with_draw_target(
            None,
            if PROGRESS_BARS.load() {
                ProgressDrawTarget::stdout()
            } else {
                ProgressDrawTarget::hidden()
            },
        )
        .with_style(
            ProgressStyle::default_spinner()
                .template("{msg:18}: {spinner} {pos} records ({elapsed_precise})")
                .unwrap(),
        )
        .with_message("Replaying");

        let mut summary: ReplaySummary = thread::scope(|scope| {
            let read_handle: ScopedJoinHandle<Result<(), ReplayError>> = thread::Builder::new()
                .name("read".to_string())
                .spawn_scoped(scope, || {
                    defer_on_unwind! { stop.store(true); }

                    for record in reader {
                        if stop.load() {
                            debug!("Reader stopping early");
                            return Ok(());
                        }
                        let record = match record {
                            Ok(r) => r,
                            Err(e) => {
                                stop.store(true);
                                return Err(ReplayError::from(e));
                            }
                        };
                        // A send error means the accumulator has exited.
                        if tx_record.send(record).is_err() {
                            return Ok(());
                        }
                    }

                    drop(tx_record);
                    debug!("Finished reading");
                    Ok(())
                })
                .expect("OS can create threads");

            // The receiver is moved in so that the reader can't block on a
            // full channel after the accumulator has gone.
            let accumulate_handle = thread::Builder::new()
                .name("accumulate".to_string())
                .spawn_scoped(scope, move || {
                    defer_on_unwind! { stop.store(true); }

                    let result = self.accumulate(rx_record.iter(), stop, &progress);
                    if result.is_err() {
                        stop.store(true);
                    }
                    progress.finish_with_message("Finished");
                    result
                })
                .expect("OS can create threads");

            read_handle.join().unwrap()?;
            accumulate_handle.join().unwrap()
        })?;

        if self.take_dark {
            summary.darks_taken = self.take_darks()?;
        }
        summary.outputs = self.write_outputs()?;

        info!(
            "Replayed {} packets and {} scans ({} skipped)",
            summary.packets, summary.spectra, summary.skipped
        );
        Ok(summary)
    }

    fn accumulate<I: Iterator<Item = Record>>(
        &self,
        records: I,
        stop: &AtomicCell<bool>,
        progress: &ProgressBar,
    ) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::default();
        for record in records {
            if stop.load() {
                debug!("Accumulator stopping early");
                break;
            }
            match record {
                Record::Packet(packet) => {
                    self.context.add_packet(&packet);
                    summary.packets += 1;
                }

                Record::Spectrum(scan) => {
                    if self.no_stack {
                        self.context.reset_stacks();
                    }
                    match self.context.stack_spectrum(&scan) {
                        Ok(()) => summary.spectra += 1,
                        Err(ContextError::WrongMode(mode)) => {
                            debug!("Skipping scan {} in {mode} mode", scan.index);
                            summary.skipped += 1;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            progress.inc(1);
        }
        Ok(summary)
    }

    /// Enable dark subtraction on every non-empty spectrum that isn't already
    /// using one.
    fn take_darks(&self) -> Result<usize, ReplayError> {
        let mut taken = 0;
        match self.context.mode() {
            Mode::Counter => {
                warn!("Dark frames are only taken from stacked scans; there are none in counter mode");
            }

            Mode::Autocorrelator => {
                for (i, line) in self.context.lines().iter().enumerate() {
                    // The lock must be released before toggling.
                    let needed = needs_dark(&line.lock().spectrum);
                    if needed && self.context.toggle_line_dark(i)? {
                        taken += 1;
                    }
                }
            }

            Mode::Crosscorrelator => {
                for (i, polytope) in self.context.polytopes().iter().enumerate() {
                    let needed = needs_dark(&polytope.lock().spectrum);
                    if needed && self.context.toggle_polytope_dark(i)? {
                        taken += 1;
                    }
                }
            }
        }
        Ok(taken)
    }

    fn write_outputs(&self) -> Result<Vec<PathBuf>, ReplayError> {
        fs::create_dir_all(&self.output_dir)?;
        let mut outputs = vec![];
        match self.context.mode() {
            Mode::Counter => {
                for line in self.context.lines() {
                    outputs.push(self.write_output(line.name(), "counts", |p| {
                        write_counts_file(p, &line.lock().counts)
                    })?);
                }
                for polytope in self.context.polytopes() {
                    outputs.push(self.write_output(polytope.name(), "counts", |p| {
                        write_counts_file(p, &polytope.lock().counts)
                    })?);
                }
            }

            Mode::Autocorrelator => {
                for line in self.context.lines() {
                    outputs.push(self.write_output(line.name(), "spectrum", |p| {
                        write_spectrum_file(p, &line.lock().spectrum)
                    })?);
                }
            }

            Mode::Crosscorrelator => {
                for polytope in self.context.polytopes() {
                    outputs.push(self.write_output(polytope.name(), "spectrum", |p| {
                        write_spectrum_file(p, &polytope.lock().spectrum)
                    })?);
                }
            }
        }
        Ok(outputs)
    }

    fn write_output<F>(&self, name: &str, suffix: &str, write: F) -> Result<PathBuf, ReplayError>
    where
        F: FnOnce(&Path) -> Result<(), ExportError>,
    {
        let path = self.output_dir.join(output_filename(name, suffix));
        write(&path)?;
        Ok(path)
    }
}

fn needs_dark(spectrum: &Series) -> bool {
    !spectrum.dark_active() && !spectrum.magnitude().is_empty()
}

/// A file name for a line or polytope: spaces are removed and the `*` between
/// line names becomes `-`.
pub(crate) fn output_filename(name: &str, suffix: &str) -> String {
    format!("{}_{suffix}.csv", name.replace(' ', "").replace('*', "-"))
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum ReplayError {
    #[error(transparent)]
    Packet(#[from] PacketError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
