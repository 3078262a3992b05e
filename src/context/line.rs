// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use crate::{
    geometry::LineScan,
    series::{Series, SeriesConfig},
};

/// The accumulation state of a [`Line`].
#[derive(Debug)]
pub struct LineState {
    /// Counter-mode data: counts, autocorrelation magnitude and phase.
    pub counts: Series,

    /// Stacked autocorrelation scans.
    pub spectrum: Series,
}

/// A single correlator input.
#[derive(Debug)]
pub struct Line {
    name: String,
    index: usize,
    scan: RwLock<LineScan>,
    state: Mutex<LineState>,
}

impl Line {
    pub(crate) fn new(name: String, index: usize, scan: LineScan, config: SeriesConfig) -> Line {
        let state = LineState {
            counts: Series::new(format!("{name} counts"), config),
            spectrum: Series::new(format!("{name} magnitude"), config),
        };
        Line {
            name,
            index,
            scan: RwLock::new(scan),
            state: Mutex::new(state),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The hardware index of this line, i.e. where its values are in a
    /// [`crate::Packet`].
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn scan(&self) -> LineScan {
        *self.scan.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_scan(&self, scan: LineScan) {
        *self.scan.write().unwrap_or_else(PoisonError::into_inner) = scan;
    }

    /// Block until the accumulation state is available.
    pub fn lock(&self) -> MutexGuard<'_, LineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
