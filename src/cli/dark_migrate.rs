// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rewrite the dark frames in a settings file in one format.

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info};
use strum::IntoEnumIterator;

use super::common::DARK_FORMAT_HELP;
use crate::{
    constants::DARK_SETTING,
    dark::{DarkError, DarkFormat, DarkFrame},
    settings::{FileSettings, SettingsError, SettingsStore},
    XcStackError,
};

#[derive(Parser, Debug, Clone)]
pub(super) struct DarkMigrateArgs {
    /// The toml settings file to rewrite.
    #[clap(short, long, parse(from_os_str))]
    settings: PathBuf,

    #[clap(long, help = DARK_FORMAT_HELP.as_str())]
    dark_format: Option<String>,
}

impl DarkMigrateArgs {
    pub(super) fn run(self, dry_run: bool) -> Result<(), XcStackError> {
        let format = match self.dark_format {
            None => DarkFormat::default(),
            Some(f) => DarkFormat::from_str(&f.to_lowercase())
                .map_err(|_| DarkMigrateError::BadFormat(f))?,
        };
        let mut settings = FileSettings::open(&self.settings)?;
        let migrated = migrate(&mut settings, format, dry_run)?;
        if dry_run {
            info!(
                "Dry run -- {} dark frame(s) would be rewritten as {format}",
                migrated.len()
            );
        } else {
            info!(
                "Rewrote {} dark frame(s) in {} as {format}",
                migrated.len(),
                self.settings.display()
            );
        }
        for key in migrated {
            debug!("  {key}");
        }
        Ok(())
    }
}

/// Rewrite every dark frame in `store` that isn't already in `format`,
/// returning the keys that changed. Nothing is written if `dry_run` is set.
pub(super) fn migrate<S: SettingsStore>(
    store: &mut S,
    format: DarkFormat,
    dry_run: bool,
) -> Result<Vec<String>, DarkMigrateError> {
    let suffix = format!("_{DARK_SETTING}");
    let mut migrated = vec![];
    for key in store.keys().into_iter().filter(|k| k.ends_with(&suffix)) {
        let Some(old) = store.get(&key) else {
            continue;
        };
        let frame =
            DarkFrame::from_setting(&old).map_err(|err| DarkMigrateError::Unreadable {
                key: key.clone(),
                err,
            })?;
        let new = frame.to_setting(format)?;
        if new == old {
            continue;
        }
        if !dry_run {
            store.set(&key, new)?;
        }
        migrated.push(key);
    }
    Ok(migrated)
}

#[derive(thiserror::Error, Debug)]
pub(super) enum DarkMigrateError {
    #[error("Couldn't parse '{0}' as a dark format; valid formats are: {}", DarkFormat::iter().join(", "))]
    BadFormat(String),

    #[error("The dark frame '{key}' couldn't be read: {err}")]
    Unreadable { key: String, err: DarkError },

    #[error(transparent)]
    Dark(#[from] DarkError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
