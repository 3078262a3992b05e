// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Correlator packets, finished scan spectra and where they come from.
//!
//! Talking to the correlator hardware is someone else's job; anything that can
//! produce [`Record`]s can implement [`PacketSource`]. A JSON-lines recording
//! is read with [`RecordReader`].

mod error;

pub use error::PacketError;

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::trace;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A single complex correlation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub real: f64,
    pub imaginary: f64,
}

impl Correlation {
    pub fn complex(&self) -> Complex64 {
        Complex64::new(self.real, self.imaginary)
    }

    pub fn magnitude(&self) -> f64 {
        self.complex().norm()
    }

    /// \[radians\]
    pub fn phase(&self) -> f64 {
        self.complex().arg()
    }
}

/// One correlator packet. `counts` and `autocorrelations` are indexed by line,
/// `crosscorrelations` by cross-correlation index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Seconds since the start of the capture.
    pub timestamp: f64,

    #[serde(default)]
    pub counts: Vec<f64>,

    #[serde(default)]
    pub autocorrelations: Vec<Correlation>,

    #[serde(default)]
    pub crosscorrelations: Vec<Correlation>,
}

fn default_lag_step() -> f64 {
    1.0
}

/// A finished scan. `index` is a line index for autocorrelation scans and a
/// cross-correlation index for crosscorrelation scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumScan {
    pub index: usize,

    /// The lag of the first bin \[ns\].
    #[serde(default)]
    pub lag_offset: f64,

    /// The lag between bins \[ns\].
    #[serde(default = "default_lag_step")]
    pub lag_step: f64,

    pub magnitude: Vec<f64>,

    #[serde(default)]
    pub phase: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Packet(Packet),
    Spectrum(SpectrumScan),
}

pub trait PacketSource {
    /// The next record, or `None` once the source is exhausted.
    fn next_record(&mut self) -> Result<Option<Record>, PacketError>;
}

impl PacketSource for VecDeque<Record> {
    fn next_record(&mut self) -> Result<Option<Record>, PacketError> {
        Ok(self.pop_front())
    }
}

/// Reads one JSON [`Record`] per line. Blank lines and lines starting with `#`
/// are skipped.
pub struct RecordReader<R: BufRead> {
    reader: R,
    line: usize,
    buffer: String,
}

impl RecordReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PacketError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| PacketError::Open {
            path: path.to_path_buf(),
            err,
        })?;
        Ok(RecordReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> RecordReader<R> {
        RecordReader {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }

    /// The number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> PacketSource for RecordReader<R> {
    fn next_record(&mut self) -> Result<Option<Record>, PacketError> {
        loop {
            self.buffer.clear();
            let n = self
                .reader
                .read_line(&mut self.buffer)
                .map_err(|err| PacketError::Read {
                    line: self.line + 1,
                    err,
                })?;
            if n == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buffer.trim();
            if text.is_empty() || text.starts_with('#') {
                trace!("Skipping line {}", self.line);
                continue;
            }
            let record = serde_json::from_str(text).map_err(|err| PacketError::Parse {
                line: self.line,
                err,
            })?;
            return Ok(Some(record));
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record, PacketError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
