// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    geometry::ScanGeometry,
    series::{Series, SeriesConfig},
};

/// The accumulation state of a [`Polytope`]. The geometry sits behind the
/// same lock as the series so a recomputation can't interleave with
/// stacking.
#[derive(Debug)]
pub struct PolytopeState {
    /// Counter-mode cross-correlation magnitude and phase.
    pub counts: Series,

    /// Stacked cross-correlation scans.
    pub spectrum: Series,

    pub geometry: ScanGeometry,
}

/// The cross-correlation product of two or more lines.
#[derive(Debug)]
pub struct Polytope {
    name: String,
    cross_index: usize,
    lines: Vec<usize>,
    state: Mutex<PolytopeState>,
}

impl Polytope {
    pub(crate) fn new(
        name: String,
        cross_index: usize,
        lines: Vec<usize>,
        geometry: ScanGeometry,
        config: SeriesConfig,
    ) -> Polytope {
        let state = PolytopeState {
            counts: Series::new(format!("{name} counts"), config),
            spectrum: Series::new(format!("{name} magnitude"), config),
            geometry,
        };
        Polytope {
            name,
            cross_index,
            lines,
            state: Mutex::new(state),
        }
    }

    /// The names of the participating lines joined with `*`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where this polytope's values are in a packet's cross-correlations.
    pub fn cross_index(&self) -> usize {
        self.cross_index
    }

    /// The context indices of the participating lines.
    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    pub fn order(&self) -> usize {
        self.lines.len()
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Block until the accumulation state is available.
    pub fn lock(&self) -> MutexGuard<'_, PolytopeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
