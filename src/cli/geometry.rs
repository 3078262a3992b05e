// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Print the combined scan geometry of the lines in an arguments file.

use std::{borrow::Cow, path::PathBuf};

use clap::Parser;
use itertools::Itertools;
use log::debug;

use super::{common::InfoPrinter, replay::ReplayArgs};
use crate::{
    constants::MIN_CORRELATION_ORDER,
    context::{CorrelatorConfig, CorrelatorContext, LineConfig},
    geometry::{GeometryError, ScanGeometry},
    settings::MemorySettings,
    XcStackError,
};

#[derive(Parser, Debug, Clone)]
pub(super) struct GeometryArgs {
    /// A replay arguments file (toml or json) whose `lines` have scan
    /// settings. Every pair of lines is reported, and all of the lines
    /// together if there are more than two.
    #[clap(name = "ARGUMENTS_FILE", parse(from_os_str))]
    args_file: PathBuf,
}

impl GeometryArgs {
    pub(super) fn run(self) -> Result<(), XcStackError> {
        let ReplayArgs { lines, .. } = unpack_arg_file!(self.args_file);
        let lines: Vec<LineConfig> = lines
            .unwrap_or_default()
            .into_iter()
            .map(LineConfig::from)
            .collect();
        for (name, geometry) in geometries(lines)? {
            let mut printer = InfoPrinter::new(name.into());
            printer.push_block(
                geometry
                    .windows
                    .iter()
                    .map(|w| -> Cow<'static, str> {
                        format!(
                            "channels {}-{} step {} ({} wide), lags {}-{} ns step {} ({} ns wide)",
                            w.start, w.end, w.step, w.size, w.lag_start, w.lag_end, w.lag_step, w.lag_size
                        )
                        .into()
                    })
                    .collect(),
            );
            printer.push_line(format!("Spectrum length: {}", geometry.size_2nd).into());
            printer.push_line(
                format!(
                    "Lag span: {} ns ({} ns per bin)",
                    geometry.lag_size_2nd, geometry.lag_step_2nd
                )
                .into(),
            );
            printer.display();
        }
        Ok(())
    }
}

/// The geometry of every pair of `lines`, then of all of them together when
/// there are more than two.
fn geometries(lines: Vec<LineConfig>) -> Result<Vec<(String, ScanGeometry)>, XcStackError> {
    let num_lines = lines.len();
    if num_lines < MIN_CORRELATION_ORDER {
        return Err(GeometryError::TooFewLines(num_lines).into());
    }
    debug!("Computing geometries of {num_lines} lines");

    let mut context =
        CorrelatorContext::new(CorrelatorConfig::default(), lines, MemorySettings::new())?;
    if num_lines > MIN_CORRELATION_ORDER {
        context.add_polytope(&(0..num_lines).collect_vec())?;
    }
    context
        .polytopes()
        .iter()
        .enumerate()
        .map(|(i, p)| -> Result<_, XcStackError> {
            Ok((p.name().to_string(), context.geometry(i)?))
        })
        .collect()
}
