// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared by `xcstack` subcommands: argument files, help texts and
//! printers.

mod printers;
#[cfg(test)]
mod tests;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{
        DEFAULT_HISTOGRAM_SIZE, DEFAULT_PACKET_TIME, DEFAULT_SMOOTHING_WINDOW, DEFAULT_TIME_RANGE,
    },
    context::{Mode, Scale},
    dark::DarkFormat,
    stack::ZeroPolicy,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref MODE_HELP: String =
        format!("What the correlator was doing while recording. Supported modes: {}. Default: {}",
                Mode::iter().join(", "), Mode::default());

    pub(super) static ref SCALE_HELP: String =
        format!("The scale applied to scan magnitudes before stacking. Supported scales: {}. Default: {}",
                Scale::iter().join(", "), Scale::default());

    pub(super) static ref DARK_FORMAT_HELP: String =
        format!("How dark frames are written to the settings file. Supported formats: {}. Default: {}",
                DarkFormat::iter().join(", "), DarkFormat::default());

    pub(super) static ref ZERO_POLICY_HELP: String =
        format!("What to do with measurements of exactly zero. Supported policies: {}. Default: {}",
                ZeroPolicy::iter().join(", "), ZeroPolicy::default());

    pub(super) static ref TIME_RANGE_HELP: String =
        format!("How much time counter-mode traces keep [seconds]. Default: {DEFAULT_TIME_RANGE}");

    pub(super) static ref PACKET_TIME_HELP: String =
        format!("The period between correlator packets [seconds]. Default: {DEFAULT_PACKET_TIME}");

    pub(super) static ref SMOOTHING_HELP: String =
        format!("The length of the moving-average window. 0 or 1 disables smoothing. Default: {DEFAULT_SMOOTHING_WINDOW}");

    pub(super) static ref HISTOGRAM_SIZE_HELP: String =
        format!("The number of histogram bins. Default: {DEFAULT_HISTOGRAM_SIZE}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// Read an arguments file into whatever type the caller destructures it as.
/// The file type comes from the extension.
macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(XcStackError::ArgFile(format!(
                            "Couldn't decode toml structure from {}:\n{err}",
                            $arg_file.display()
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(XcStackError::ArgFile(format!(
                            "Couldn't decode json structure from {}:\n{err}",
                            $arg_file.display()
                        )))
                    }
                }
            }

            _ => {
                return Err(XcStackError::ArgFile(format!(
                    "Argument file '{}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file.display(), *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}
