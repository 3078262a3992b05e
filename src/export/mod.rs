// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing series out as semicolon-separated CSV.

mod error;
#[cfg(test)]
mod tests;

pub use error::ExportError;

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::debug;

use crate::{
    series::{Sample, Series},
    stack::StackKey,
};

/// Write a stacked spectrum, one row per distinct lag. Every value is
/// single-quoted; a magnitude or phase missing at a lag is left empty.
pub fn write_spectrum_csv<W: Write>(
    mut writer: W,
    magnitude: &[Sample],
    phase: &[Sample],
) -> Result<(), ExportError> {
    writeln!(writer, "'lag (ns)';'magnitude';'phase'")?;
    for (x, [m, p]) in merge_by_x([magnitude, phase]) {
        writeln!(writer, "'{x}';'{m}';'{p}'")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write counter-mode traces, one row per distinct x. Missing values are
/// left empty.
pub fn write_counts_csv<W: Write>(
    mut writer: W,
    counts: &[Sample],
    magnitude: &[Sample],
    phase: &[Sample],
) -> Result<(), ExportError> {
    writeln!(writer, "x;counts;magnitude;phase")?;
    for (x, [c, m, p]) in merge_by_x([counts, magnitude, phase]) {
        writeln!(writer, "{x};{c};{m};{p}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Line up several traces on their x values, in ascending x. Each column is
/// the formatted y of that trace at x, or empty.
fn merge_by_x<const N: usize>(traces: [&[Sample]; N]) -> Vec<(f64, [String; N])> {
    let mut rows: BTreeMap<StackKey, [Option<f64>; N]> = BTreeMap::new();
    for (column, samples) in traces.into_iter().enumerate() {
        for s in samples {
            rows.entry(StackKey(s.x)).or_insert([None; N])[column] = Some(s.y);
        }
    }
    rows.into_iter()
        .map(|(x, values)| {
            (
                x.0,
                values.map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
            )
        })
        .collect()
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    debug!("Writing {}", path.display());
    File::create(path)
        .map(BufWriter::new)
        .map_err(|err| ExportError::Create {
            path: path.to_path_buf(),
            err,
        })
}

/// Write the magnitude and phase of a spectrum series to `path`.
pub fn write_spectrum_file(path: &Path, series: &Series) -> Result<(), ExportError> {
    write_spectrum_csv(create(path)?, series.magnitude(), series.phase())
}

/// Write the counts, magnitude and phase of a counter-mode series to `path`.
pub fn write_counts_file(path: &Path, series: &Series) -> Result<(), ExportError> {
    write_counts_csv(
        create(path)?,
        series.counts(),
        series.magnitude(),
        series.phase(),
    )
}
