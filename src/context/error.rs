// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use super::Mode;
use crate::{dark::DarkError, geometry::GeometryError, settings::SettingsError};

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("There is no line with index {0}")]
    UnknownLine(usize),

    #[error("There is no polytope with index {0}")]
    UnknownPolytope(usize),

    #[error("Line {0} appears more than once in the polytope")]
    RepeatedLine(usize),

    #[error("A polytope of lines {0:?} already exists")]
    PolytopeExists(Vec<usize>),

    #[error("Scans can't be stacked in {0} mode")]
    WrongMode(Mode),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Dark(#[from] DarkError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
