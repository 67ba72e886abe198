// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! `log` backend for chamber drivers.
//!
//! Records go to stderr so they never interleave with the chamber report on
//! stdout.

use std::{
    fmt,
    io::{self, Write},
    str::FromStr,
    sync::Mutex,
};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
pub use log::{debug, error, info, trace, warn};
use testchamber::AnsiColor;

macro_rules! color_fmt {
    ($color:expr, $($arg:tt)*) => {
        format_args!("{}{}{}", $color, format_args!($($arg)*), AnsiColor::Reset)
    };
}

struct ChamberLogger {
    color: bool,
    // Serializes whole records
    lock: Mutex<()>,
}

static LOGGER: ChamberLogger = ChamberLogger {
    color: true,
    lock: Mutex::new(()),
};

static PLAIN_LOGGER: ChamberLogger = ChamberLogger {
    color: false,
    lock: Mutex::new(()),
};

fn level_color(level: Level) -> AnsiColor {
    match level {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        Level::Info => AnsiColor::Green,
        Level::Debug => AnsiColor::Cyan,
        Level::Trace => AnsiColor::BrightBlack,
    }
}

impl ChamberLogger {
    fn print(&self, args: fmt::Arguments) -> io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        io::stderr().lock().write_fmt(args)
    }
}

impl Log for ChamberLogger {
    #[inline]
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = record.line().unwrap_or(0);
        let path = record.target();
        let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f");

        let _ = if self.color {
            self.print(color_fmt!(
                AnsiColor::White,
                "[{time} {path}:{line}] {args}\n",
                args = color_fmt!(level_color(record.level()), "{}", record.args()),
            ))
        } else {
            self.print(format_args!(
                "[{time} {level:<5} {path}:{line}] {args}\n",
                level = record.level(),
                args = record.args(),
            ))
        };
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Install the logger with the given maximum level.
///
/// Fails if another logger was installed first.
pub fn init(level: LevelFilter, color: bool) -> Result<(), SetLoggerError> {
    let logger = if color { &LOGGER } else { &PLAIN_LOGGER };
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Parse a level name such as `warn` or `debug`; unknown names turn logging
/// off.
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or(LevelFilter::Off)
}

pub fn set_log_level(level: &str) {
    log::set_max_level(parse_level(level));
}
