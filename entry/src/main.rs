// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Runs the demo chambers and turns the tally into an exit status.

#[macro_use]
extern crate log;

mod chambers;
mod config;

use std::{
    env,
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use log::LevelFilter;
use testchamber::{Counters, Session, Stdout};

use crate::config::{CONFIG_ENV, ColorChoice, Config, ConfigError};

const EXIT_CLEAN: u8 = 0;
const EXIT_FAILED: u8 = 1;
/// Exit status for configuration and output errors
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "chamber-demo", version, about = "Run the testchamber demo chambers")]
struct Cli {
    /// TOML config file (defaults to $TESTCHAMBER_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// When to color the report
    #[arg(long, value_enum)]
    color: Option<ColorChoice>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LevelFilter>,

    /// Also run the chambers that fail on purpose
    #[arg(long)]
    with_failures: bool,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| "expected off, error, warn, info, debug or trace".to_string())
}

/// Layer defaults, then the config file, then flags. `env_config` is the
/// value of `TESTCHAMBER_CONFIG`, used only without `--config`.
fn resolve_config(cli: &Cli, env_config: Option<PathBuf>) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    if let Some(path) = cli.config.clone().or(env_config) {
        config.merge_file(&path)?;
    }

    if let Some(color) = cli.color {
        config.color = color;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.with_failures |= cli.with_failures;
    Ok(config)
}

fn exit_status(counters: &Counters, report_ok: bool) -> u8 {
    if !report_ok {
        EXIT_ERROR
    } else if counters.any_failed() {
        EXIT_FAILED
    } else {
        EXIT_CLEAN
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match resolve_config(&cli, env::var_os(CONFIG_ENV).map(PathBuf::from)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("chamber-demo: {err}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let no_color = env::var_os("NO_COLOR").is_some();
    let log_color = config.color.enabled(io::stderr().is_terminal(), no_color);
    if let Err(err) = chamberlog::init(config.log_level, log_color) {
        eprintln!("chamber-demo: {err}");
    }
    debug!("resolved config: {config:?}");

    let color = config.color.enabled(io::stdout().is_terminal(), no_color);
    let mut session = Session::new(Stdout::new(), color);
    session.run_all(chambers::PASSING);
    if config.with_failures {
        session.run_all(chambers::SHOWCASE_FAILURES);
    }

    let report_ok = session.summary().is_ok();
    if !report_ok {
        error!("failed to write the report to stdout");
    }
    ExitCode::from(exit_status(&session.counters(), report_ok))
}

#[cfg(test)]
mod tests {
    use std::{fs, process};

    use clap::error::ErrorKind;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from([&["chamber-demo"][..], args].concat()).unwrap()
    }

    fn config_file(name: &str, text: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("chamber-demo-{}-{name}.toml", process::id()));
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_config(&cli(&[]), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_file() {
        let path = config_file(
            "override",
            "color = \"never\"\nlog_level = \"error\"\nwith_failures = true\n",
        );
        let from_file = resolve_config(&cli(&["--config", path.to_str().unwrap()]), None).unwrap();
        assert_eq!(from_file.color, ColorChoice::Never);
        assert_eq!(from_file.log_level, LevelFilter::Error);
        assert!(from_file.with_failures);

        let args = [
            "--config",
            path.to_str().unwrap(),
            "--color",
            "always",
            "--log-level",
            "trace",
        ];
        let config = resolve_config(&cli(&args), None).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.color, ColorChoice::Always);
        assert_eq!(config.log_level, LevelFilter::Trace);
        // A flag that is absent does not clear the file value
        assert!(config.with_failures);
    }

    #[test]
    fn test_config_flag_beats_environment() {
        let path = config_file("flag", "color = \"never\"\n");
        let args = ["--config", path.to_str().unwrap()];
        let env_path = PathBuf::from("/nonexistent/testchamber.toml");

        let config = resolve_config(&cli(&args), Some(env_path.clone())).unwrap();
        assert_eq!(config.color, ColorChoice::Never);

        let err = resolve_config(&cli(&[]), Some(env_path)).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_log_level_is_a_usage_error() {
        let err = Cli::try_parse_from(["chamber-demo", "--log-level", "chatty"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(cli(&["--log-level", "DEBUG"]).log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn test_exit_status() {
        let mut counters = Counters {
            chambers: 2,
            failed_chambers: 0,
            asserts: 5,
            failed_asserts: 0,
        };
        assert_eq!(exit_status(&counters, true), 0);
        assert_eq!(exit_status(&counters, false), 2);

        counters.failed_chambers = 1;
        counters.failed_asserts = 1;
        assert_eq!(exit_status(&counters, true), 1);
        // Output errors win over failures
        assert_eq!(exit_status(&counters, false), 2);
    }
}
