// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Text rendering of chambers, failures and the final summary.
//!
//! The layout is fixed so that golden output of existing test programs keeps
//! matching. The one exception is a non-ASCII byte in a character column or
//! string, which prints as U+FFFD since the sink only accepts UTF-8.

use core::fmt::{self, Display, Write};

use crate::{
    recorder::Counters,
    runner::CallSite,
    value::{self, Scalar},
};

/// SGR codes used by the report.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiColor {
    Reset        = 0,
    Italic       = 3,
    Red          = 31,
    Green        = 32,
    Yellow       = 33,
    Blue         = 34,
    Magenta      = 35,
    Cyan         = 36,
    White        = 37,
    BrightBlack  = 90,
}

impl Display for AnsiColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{1B}[{}m", *self as u8)
    }
}

const FAILURE_QUOTE: &str = concat!(
    "  »You are a horrible person. That's what it says: a horrible person.\n",
    "   We weren't even testing for that.«\n",
    "                                                  -- GLaDOS, Portal 2",
);

const SUCCESS_QUOTE: &str = concat!(
    "  »Great work! Because this message is prerecorded, any observations\n",
    "   related to your performance are speculation on our part. Please\n",
    "   disregard any undeserved compliments.«\n",
    "                                               -- Announcer, Portal 2",
);

/// Renders report lines into a text sink.
///
/// A failed write marks the reporter as broken; later writes are still
/// attempted so that a transient sink error does not swallow the summary.
pub struct Reporter<W: ?Sized> {
    color: bool,
    broken: bool,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            color,
            broken: false,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + ?Sized> Reporter<W> {
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Whether any write to the sink has failed so far
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    fn emit(&mut self, f: impl FnOnce(&mut Self) -> fmt::Result) -> fmt::Result {
        let res = f(self);
        if res.is_err() {
            self.broken = true;
        }
        res
    }

    fn paint(&mut self, color: AnsiColor) -> fmt::Result {
        if self.color {
            write!(self.out, "{color}")?;
        }
        Ok(())
    }

    /// Blank line, then `TESTCHAMBER <name>:` in blue.
    pub fn chamber_header(&mut self, name: &str) -> fmt::Result {
        self.emit(|r| {
            r.out.write_char('\n')?;
            r.paint(AnsiColor::Blue)?;
            write!(r.out, "TESTCHAMBER {name}:")?;
            r.paint(AnsiColor::Reset)?;
            r.out.write_char('\n')
        })
    }

    /// Print the pass marker unless the chamber failed.
    ///
    /// A failed chamber prints nothing here; its assertions already did.
    pub fn chamber_result(&mut self, failed: bool) -> fmt::Result {
        if failed {
            return Ok(());
        }
        self.emit(|r| {
            r.paint(AnsiColor::Green)?;
            r.out.write_str("✔ PASS")?;
            r.paint(AnsiColor::Reset)?;
            r.out.write_char('\n')
        })
    }

    pub fn assert_failed(&mut self, site: &CallSite<'_>) -> fmt::Result {
        self.emit(|r| {
            r.paint(AnsiColor::Red)?;
            r.out.write_str("✘ FAIL:")?;
            r.paint(AnsiColor::Reset)?;
            writeln!(r.out, " {}:{}\t{}", site.file, site.line, site.expr)
        })
    }

    pub fn value(&mut self, label: &str, value: &dyn Scalar) -> fmt::Result {
        self.emit(|r| {
            write!(r.out, "  \t{label}: \t")?;
            value.fmt_scalar(&mut &mut r.out)?;
            r.out.write_char('\n')
        })
    }

    /// Stand-in line for an element that does not exist.
    pub fn missing_value(&mut self, label: &str) -> fmt::Result {
        self.emit(|r| writeln!(r.out, "  \t{label}: \t<out of range>"))
    }

    pub fn string_value(&mut self, label: &str, bytes: &[u8]) -> fmt::Result {
        self.emit(|r| {
            write!(r.out, "  \t{label}: \t'")?;
            value::write_lossy(&mut r.out, bytes)?;
            r.out.write_str("'\n")
        })
    }

    /// Only prints when an index is set.
    pub fn data_index(&mut self, index: Option<usize>) -> fmt::Result {
        match index {
            Some(index) => self.emit(|r| writeln!(r.out, "  \tat Data Index {index}:")),
            None => Ok(()),
        }
    }

    pub fn message(&mut self, msg: &dyn Display) -> fmt::Result {
        self.emit(|r| {
            r.paint(AnsiColor::Cyan)?;
            r.out.write_str("  MSG: ")?;
            r.paint(AnsiColor::Reset)?;
            writeln!(r.out, " {msg}")
        })
    }

    pub fn summary(&mut self, counters: &Counters) -> fmt::Result {
        self.emit(|r| {
            r.out.write_str("\nWell done. Here come the test results:\n")?;
            writeln!(
                r.out,
                "\tTotal:  {:5} tests, {:5} asserts",
                counters.chambers, counters.asserts
            )?;
            r.out.write_str("\tFailed: ")?;
            r.tally(counters.failed_chambers)?;
            r.out.write_str(" tests, ")?;
            r.tally(counters.failed_asserts)?;
            r.out.write_str(" asserts\n")?;

            let quote = if counters.any_failed() {
                FAILURE_QUOTE
            } else {
                SUCCESS_QUOTE
            };
            r.paint(AnsiColor::Italic)?;
            r.out.write_char('\n')?;
            r.out.write_str(quote)?;
            r.paint(AnsiColor::Reset)?;
            r.out.write_str("\n\n")
        })
    }

    // Red when nonzero, green otherwise.
    fn tally(&mut self, count: usize) -> fmt::Result {
        let color = if count > 0 {
            AnsiColor::Red
        } else {
            AnsiColor::Green
        };
        self.paint(color)?;
        write!(self.out, "{count:5}")?;
        self.paint(AnsiColor::Reset)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use std::io::{self, Write as _};

        /// Sink writing to the process's standard output.
        pub struct Stdout(io::Stdout);

        impl Stdout {
            pub fn new() -> Self {
                Self(io::stdout())
            }
        }

        impl Default for Stdout {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Write for Stdout {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.0.lock().write_all(s.as_bytes()).map_err(|_| fmt::Error)
            }
        }
    }
}
