// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Replay a correlator recording, stacking its scans and writing CSV files.


use std::{borrow::Cow, collections::HashSet, path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    display_warnings, InfoPrinter, Warn, ARG_FILE_HELP, DARK_FORMAT_HELP, HISTOGRAM_SIZE_HELP,
    MODE_HELP, PACKET_TIME_HELP, SCALE_HELP, SMOOTHING_HELP, TIME_RANGE_HELP, ZERO_POLICY_HELP,
};
use crate::{
    constants::{
        DEFAULT_HISTOGRAM_SIZE, DEFAULT_PACKET_TIME, DEFAULT_SMOOTHING_WINDOW, DEFAULT_TIME_RANGE,
        MIN_CORRELATION_ORDER,
    },
    context::{ContextError, CorrelatorConfig, CorrelatorContext, LineConfig, Mode, Scale},
    dark::DarkFormat,
    geometry::LineScan,
    params::ReplayParams,
    series::SeriesConfig,
    settings::{FileSettings, MemorySettings, SettingsError},
    stack::ZeroPolicy,
    XcStackError,
};

/// A line given either by name alone (on the command line) or with its scan
/// settings (in an arguments file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(super) enum LineArg {
    Name(String),
    Config(LineConfig),
}

impl From<&str> for LineArg {
    fn from(s: &str) -> Self {
        LineArg::Name(s.to_string())
    }
}

impl From<LineArg> for LineConfig {
    fn from(l: LineArg) -> Self {
        match l {
            LineArg::Name(name) => LineConfig::new(name, LineScan::default()),
            LineArg::Config(c) => c,
        }
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ReplayArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The recording to replay. Each line is a JSON packet or spectrum record.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT AND OUTPUT")]
    pub(super) input: Option<PathBuf>,

    /// The directory CSV files are written to. It is created if it doesn't
    /// exist. Default: the current directory.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT AND OUTPUT")]
    pub(super) output_dir: Option<PathBuf>,

    /// A toml settings file. Dark frames are loaded from and saved to it. If
    /// not given, dark frames only last as long as the replay.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT AND OUTPUT")]
    pub(super) settings: Option<PathBuf>,

    /// The names of the correlator's lines, in hardware order. Scan settings
    /// for each line can only be given in an arguments file.
    #[clap(short, long, multiple_values(true), parse(from_str), help_heading = "CORRELATOR")]
    pub(super) lines: Option<Vec<LineArg>>,

    #[clap(short, long, help = MODE_HELP.as_str(), help_heading = "CORRELATOR")]
    pub(super) mode: Option<String>,

    #[clap(long, help = SCALE_HELP.as_str(), help_heading = "CORRELATOR")]
    pub(super) scale: Option<String>,

    #[clap(long, help = TIME_RANGE_HELP.as_str(), help_heading = "CORRELATOR")]
    pub(super) time_range: Option<f64>,

    #[clap(long, help = PACKET_TIME_HELP.as_str(), help_heading = "CORRELATOR")]
    pub(super) packet_time: Option<f64>,

    #[clap(long, help = SMOOTHING_HELP.as_str(), help_heading = "STACKING")]
    pub(super) smoothing: Option<usize>,

    #[clap(long, help = HISTOGRAM_SIZE_HELP.as_str(), help_heading = "STACKING")]
    pub(super) histogram_size: Option<usize>,

    #[clap(long, help = ZERO_POLICY_HELP.as_str(), help_heading = "STACKING")]
    pub(super) zero_policy: Option<String>,

    #[clap(long, help = DARK_FORMAT_HELP.as_str(), help_heading = "STACKING")]
    pub(super) dark_format: Option<String>,

    /// Start a new average for every scan instead of stacking them all.
    #[clap(long, help_heading = "STACKING")]
    #[serde(default)]
    pub(super) no_stack: bool,

    /// After replaying, use each final spectrum as a dark frame. Frames are
    /// saved to the settings file if one was given.
    #[clap(long, help_heading = "STACKING")]
    #[serde(default)]
    pub(super) take_dark: bool,
}

impl ReplayArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<ReplayArgs, XcStackError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let ReplayArgs {
                args_file: _,
                input,
                output_dir,
                settings,
                lines,
                mode,
                scale,
                time_range,
                packet_time,
                smoothing,
                histogram_size,
                zero_policy,
                dark_format,
                no_stack,
                take_dark,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(ReplayArgs {
                args_file: None,
                input: cli_args.input.or(input),
                output_dir: cli_args.output_dir.or(output_dir),
                settings: cli_args.settings.or(settings),
                lines: cli_args.lines.or(lines),
                mode: cli_args.mode.or(mode),
                scale: cli_args.scale.or(scale),
                time_range: cli_args.time_range.or(time_range),
                packet_time: cli_args.packet_time.or(packet_time),
                smoothing: cli_args.smoothing.or(smoothing),
                histogram_size: cli_args.histogram_size.or(histogram_size),
                zero_policy: cli_args.zero_policy.or(zero_policy),
                dark_format: cli_args.dark_format.or(dark_format),
                no_stack: cli_args.no_stack || no_stack,
                take_dark: cli_args.take_dark || take_dark,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<ReplayParams, ReplayArgsError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            input,
            output_dir,
            settings,
            lines,
            mode,
            scale,
            time_range,
            packet_time,
            smoothing,
            histogram_size,
            zero_policy,
            dark_format,
            no_stack,
            take_dark,
        } = self;

        let input = input.ok_or(ReplayArgsError::NoInput)?;
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));

        let lines: Vec<LineConfig> = lines
            .unwrap_or_default()
            .into_iter()
            .map(LineConfig::from)
            .collect();
        if lines.is_empty() {
            return Err(ReplayArgsError::NoLines);
        }
        // Settings keys ignore spaces, so names that only differ by spaces
        // would share a dark frame.
        let mut seen = HashSet::new();
        for line in &lines {
            if !seen.insert(line.name.replace(' ', "")) {
                return Err(ReplayArgsError::DuplicateLine(line.name.clone()));
            }
        }

        let mode: Mode = parse_enum(mode, "mode", ReplayArgsError::ParseMode)?;
        let scale: Scale = parse_enum(scale, "scale", ReplayArgsError::ParseScale)?;
        let zero_policy: ZeroPolicy =
            parse_enum(zero_policy, "zero policy", ReplayArgsError::ParseZeroPolicy)?;
        let dark_format: DarkFormat =
            parse_enum(dark_format, "dark format", ReplayArgsError::ParseDarkFormat)?;

        let time_range = time_range.unwrap_or(DEFAULT_TIME_RANGE);
        if !time_range.is_finite() || time_range <= 0.0 {
            return Err(ReplayArgsError::NotPositive {
                what: "time range",
                value: time_range,
            });
        }
        let packet_time = packet_time.unwrap_or(DEFAULT_PACKET_TIME);
        if !packet_time.is_finite() || packet_time <= 0.0 {
            return Err(ReplayArgsError::NotPositive {
                what: "packet time",
                value: packet_time,
            });
        }
        let histogram_size = histogram_size.unwrap_or(DEFAULT_HISTOGRAM_SIZE);
        if histogram_size == 0 {
            return Err(ReplayArgsError::ZeroHistogramSize);
        }
        let window = smoothing.unwrap_or(DEFAULT_SMOOTHING_WINDOW);

        if mode == Mode::Crosscorrelator && lines.len() < MIN_CORRELATION_ORDER {
            format!(
                "Only {} line was given, so there are no polytopes to cross-correlate",
                lines.len()
            )
            .warn();
        }
        if mode == Mode::Counter && (no_stack || take_dark) {
            "--no-stack and --take-dark only affect stacked scans, which counter mode doesn't have"
                .warn();
        }
        if take_dark && settings.is_none() {
            "No settings file was given; dark frames won't be saved".warn();
        }

        let config = CorrelatorConfig {
            series: SeriesConfig {
                window,
                histogram_size,
                zero_policy,
            },
            time_range,
            packet_time,
            scale,
            mode,
            dark_format,
            ..Default::default()
        };

        let mut printer = InfoPrinter::new("Replay set up".into());
        printer.push_block(vec![
            format!("Recording: {}", input.display()).into(),
            format!("Output directory: {}", output_dir.display()).into(),
        ]);
        printer.push_block(
            lines
                .iter()
                .map(|l| -> Cow<'static, str> {
                    format!(
                        "{}: channels {}-{} (step {}), lags {}-{} ns (step {})",
                        l.name,
                        l.scan.start_channel,
                        l.scan.end_channel,
                        l.scan.scan_step,
                        l.scan.start_lag,
                        l.scan.end_lag,
                        l.scan.lag_step,
                    )
                    .into()
                })
                .collect(),
        );
        printer.push_block(vec![
            format!("Mode: {mode}, scale: {scale}").into(),
            format!("Time range: {time_range} s, packet time: {packet_time} s").into(),
            format!("Smoothing window: {window}, histogram bins: {histogram_size}").into(),
            format!("Zeros: {zero_policy}, dark format: {dark_format}").into(),
        ]);
        if let Some(settings) = settings.as_ref() {
            printer.push_line(format!("Settings: {}", settings.display()).into());
        }
        printer.display();

        display_warnings();

        let context = match settings {
            Some(path) => CorrelatorContext::new(config, lines, FileSettings::open(path)?)?,
            None => CorrelatorContext::new(config, lines, MemorySettings::new())?,
        };

        Ok(ReplayParams {
            input,
            output_dir,
            context,
            no_stack,
            take_dark,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), XcStackError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let summary = params.run()?;

        let mut printer = InfoPrinter::new("Replay summary".into());
        printer.push_block(vec![
            format!("Packets: {}", summary.packets).into(),
            format!("Scans stacked: {}", summary.spectra).into(),
            format!("Scans skipped: {}", summary.skipped).into(),
        ]);
        if params.take_dark {
            printer.push_line(format!("Dark frames taken: {}", summary.darks_taken).into());
        }
        printer.push_block(
            summary
                .outputs
                .iter()
                .map(|p| Cow::from(format!("Wrote {}", p.display())))
                .collect(),
        );
        printer.display();
        Ok(())
    }
}

/// Parse an optional enum argument, using its default if it's absent.
fn parse_enum<T, F>(
    value: Option<String>,
    what: &'static str,
    err: F,
) -> Result<T, ReplayArgsError>
where
    T: FromStr + Default + strum::IntoEnumIterator + std::fmt::Display,
    F: FnOnce(String, String) -> ReplayArgsError,
{
    match value {
        None => Ok(T::default()),
        Some(s) => T::from_str(&s.to_lowercase()).map_err(|_| {
            trace!("Couldn't parse '{s}' as a {what}");
            err(s, T::iter().join(", "))
        }),
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum ReplayArgsError {
    #[error("No recording was given to replay")]
    NoInput,

    #[error("No lines were given; at least one is needed")]
    NoLines,

    #[error("The line name '{0}' is used more than once (spaces are ignored)")]
    DuplicateLine(String),

    #[error("Couldn't parse '{0}' as a mode; valid modes are: {1}")]
    ParseMode(String, String),

    #[error("Couldn't parse '{0}' as a scale; valid scales are: {1}")]
    ParseScale(String, String),

    #[error("Couldn't parse '{0}' as a zero policy; valid policies are: {1}")]
    ParseZeroPolicy(String, String),

    #[error("Couldn't parse '{0}' as a dark format; valid formats are: {1}")]
    ParseDarkFormat(String, String),

    #[error("The {what} must be positive and finite, but got {value}")]
    NotPositive { what: &'static str, value: f64 },

    #[error("The number of histogram bins can't be 0")]
    ZeroHistogramSize,

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Context(#[from] ContextError),
}
