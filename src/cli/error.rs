// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all xcstack-related errors. This should be the *only* error
//! enum that is publicly visible.

use thiserror::Error;

use super::{dark_migrate::DarkMigrateError, replay::ReplayArgsError};
use crate::{
    context::ContextError, dark::DarkError, export::ExportError, geometry::GeometryError,
    packet::PacketError, params::ReplayError, settings::SettingsError,
};

/// The *only* publicly visible error from xcstack. Where it helps, the message
/// carries a hint about what to change.
#[derive(Error, Debug)]
pub enum XcStackError {
    /// An error related to replay arguments.
    #[error("{0}\n\nSee `xcstack replay --help` for the available options.")]
    Replay(String),

    /// Lines, polytopes and modes.
    #[error("{0}")]
    Context(String),

    /// An error related to line scan settings.
    #[error("{0}\n\nEach line needs start_channel <= end_channel; when more than two lines are correlated, scan_step and lag_step must be non-zero.")]
    Geometry(String),

    /// An error related to persisted dark frames.
    #[error("{0}\n\nDark frames are stored either as a JSON array of [x, y] pairs or as 'x,y' tokens joined with ';'.")]
    Dark(String),

    /// An error related to the settings file.
    #[error("{0}")]
    Settings(String),

    /// An error related to reading a recording.
    #[error("{0}\n\nRecordings hold one JSON object per line, each with a \"kind\" of \"packet\" or \"spectrum\".")]
    Recording(String),

    /// An error related to writing CSV files.
    #[error("{0}")]
    Export(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files may be toml or json, and use the same names as the long command-line options (with underscores).")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<ReplayArgsError> for XcStackError {
    fn from(e: ReplayArgsError) -> Self {
        let s = e.to_string();
        match e {
            ReplayArgsError::Settings(e) => Self::from(e),
            ReplayArgsError::Context(e) => Self::from(e),
            _ => Self::Replay(s),
        }
    }
}

impl From<ReplayError> for XcStackError {
    fn from(e: ReplayError) -> Self {
        match e {
            ReplayError::Packet(e) => Self::from(e),
            ReplayError::Context(e) => Self::from(e),
            ReplayError::Export(e) => Self::from(e),
            ReplayError::IO(e) => Self::from(e),
        }
    }
}

impl From<DarkMigrateError> for XcStackError {
    fn from(e: DarkMigrateError) -> Self {
        let s = e.to_string();
        match e {
            DarkMigrateError::BadFormat(_) => Self::Generic(s),
            DarkMigrateError::Unreadable { .. } => Self::Dark(s),
            DarkMigrateError::Dark(e) => Self::from(e),
            DarkMigrateError::Settings(e) => Self::from(e),
        }
    }
}

impl From<ContextError> for XcStackError {
    fn from(e: ContextError) -> Self {
        let s = e.to_string();
        match e {
            ContextError::Geometry(e) => Self::from(e),
            ContextError::Dark(e) => Self::from(e),
            ContextError::Settings(e) => Self::from(e),
            ContextError::UnknownLine(_)
            | ContextError::UnknownPolytope(_)
            | ContextError::RepeatedLine(_)
            | ContextError::PolytopeExists(_)
            | ContextError::WrongMode(_) => Self::Context(s),
        }
    }
}

impl From<GeometryError> for XcStackError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<DarkError> for XcStackError {
    fn from(e: DarkError) -> Self {
        Self::Dark(e.to_string())
    }
}

impl From<SettingsError> for XcStackError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e.to_string())
    }
}

impl From<PacketError> for XcStackError {
    fn from(e: PacketError) -> Self {
        let s = e.to_string();
        match e {
            PacketError::Open { .. } | PacketError::Read { .. } => Self::Generic(s),
            PacketError::Parse { .. } => Self::Recording(s),
        }
    }
}

impl From<ExportError> for XcStackError {
    fn from(e: ExportError) -> Self {
        Self::Export(e.to_string())
    }
}

impl From<std::io::Error> for XcStackError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
