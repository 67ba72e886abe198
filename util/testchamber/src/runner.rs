// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Chamber runner and assertion primitives
//!
//! A [`Session`] owns the bookkeeping for one run. Each chamber routine gets a
//! [`Chamber`] borrowing the session; assertions record their outcome on it
//! and print diagnostics, but never abort the routine.

use core::fmt::{self, Display, Write};

use crate::{
    recorder::{Counters, Recorder},
    report::Reporter,
    value::{CStrLike, Scalar, Truth},
};

/// Where an assertion was written and what it asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Rendered assertion, e.g. `EQUAL(a,b)`
    pub expr: &'a str,
    pub file: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub const fn new(expr: &'a str, file: &'a str, line: u32) -> Self {
        Self { expr, file, line }
    }
}

/// Signature of a chamber routine.
pub type ChamberFn = fn(&mut Chamber<'_>);

/// A named chamber routine, usually produced by `#[def_chamber]`.
#[derive(Clone, Copy)]
pub struct ChamberDescriptor {
    pub name: &'static str,
    pub func: ChamberFn,
}

impl ChamberDescriptor {
    pub const fn new(name: &'static str, func: ChamberFn) -> Self {
        Self { name, func }
    }
}

impl fmt::Debug for ChamberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChamberDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One test run: the recorder plus the reporter it prints through.
pub struct Session<W> {
    recorder: Recorder,
    reporter: Reporter<W>,
}

impl<W: Write> Session<W> {
    /// Create a session rendering into `out`, with ANSI colors if `color`.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            recorder: Recorder::new(),
            reporter: Reporter::new(out, color),
        }
    }

    /// Run one chamber to completion.
    ///
    /// Returns `true` if every assertion in it passed.
    pub fn run<F>(&mut self, name: &str, routine: F) -> bool
    where
        F: FnOnce(&mut Chamber<'_>),
    {
        debug!("entering chamber {name}");
        self.recorder.begin_chamber();
        let before = self.recorder.counters();
        let _ = self.reporter.chamber_header(name);

        let mut chamber = Chamber {
            recorder: &mut self.recorder,
            reporter: &mut self.reporter,
            data_index: None,
        };
        routine(&mut chamber);

        if self.recorder.any_assert_failed() {
            self.recorder.mark_chamber_failed();
            let after = self.recorder.counters();
            warn!(
                "chamber {name} failed: {} of {} assertions",
                after.failed_asserts - before.failed_asserts,
                after.asserts - before.asserts
            );
        }
        let failed = self.recorder.chamber_failed();
        let _ = self.reporter.chamber_result(failed);
        !failed
    }

    pub fn run_descriptor(&mut self, chamber: &ChamberDescriptor) -> bool {
        self.run(chamber.name, chamber.func)
    }

    /// Run chambers in slice order. Returns `true` if all of them passed.
    pub fn run_all(&mut self, chambers: &[ChamberDescriptor]) -> bool {
        chambers
            .iter()
            .fold(true, |ok, chamber| self.run_descriptor(chamber) && ok)
    }

    /// Print the final results.
    ///
    /// Fails if this or any earlier write to the sink failed.
    pub fn summary(&mut self) -> fmt::Result {
        let counters = self.recorder.counters();
        info!(
            "{} chambers ({} failed), {} asserts ({} failed)",
            counters.chambers, counters.failed_chambers, counters.asserts, counters.failed_asserts
        );
        self.reporter.summary(&counters)?;
        if self.reporter.is_broken() {
            return Err(fmt::Error);
        }
        Ok(())
    }

    pub fn counters(&self) -> Counters {
        self.recorder.counters()
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn get_ref(&self) -> &W {
        self.reporter.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.reporter.into_inner()
    }
}

/// Run context of the chamber in flight.
pub struct Chamber<'s> {
    recorder: &'s mut Recorder,
    reporter: &'s mut Reporter<dyn Write + 's>,
    data_index: Option<usize>,
}

impl Chamber<'_> {
    /// Mark which iteration of a data-driven loop the following assertions
    /// belong to.
    pub fn set_data_index(&mut self, index: usize) {
        self.data_index = Some(index);
    }

    pub fn unset_data_index(&mut self) {
        self.data_index = None;
    }

    pub fn data_index(&self) -> Option<usize> {
        self.data_index
    }

    /// Run `f` with the data index set to `index`, then restore the previous
    /// index.
    pub fn with_data_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.data_index.replace(index);
        let ret = f(self);
        self.data_index = saved;
        ret
    }

    /// Print a diagnostic message. Does not count as an assertion.
    pub fn message(&mut self, msg: impl Display) {
        let _ = self.reporter.message(&msg);
    }

    /// Counters of the whole session so far.
    pub fn counters(&self) -> Counters {
        self.recorder.counters()
    }

    fn fail(&mut self, site: &CallSite<'_>) {
        self.recorder.mark_assertion_failed();
        let _ = self.reporter.assert_failed(site);
        let _ = self.reporter.data_index(self.data_index);
    }

    /// Passes if `value` is true or nonzero.
    pub fn assert_true<T: Truth>(&mut self, site: CallSite<'_>, value: T) -> bool {
        self.recorder.begin_assertion();
        if value.is_true() {
            return true;
        }
        self.fail(&site);
        let _ = self.reporter.value("value", &value);
        false
    }

    /// Passes if `lhs == rhs`.
    pub fn assert_equal<L, R>(&mut self, site: CallSite<'_>, lhs: L, rhs: R) -> bool
    where
        L: PartialEq<R> + Scalar,
        R: Scalar,
    {
        self.recorder.begin_assertion();
        if lhs == rhs {
            return true;
        }
        self.fail(&site);
        let _ = self.reporter.value("lhs", &lhs);
        let _ = self.reporter.value("rhs", &rhs);
        false
    }

    /// Passes if both strings hold the same bytes up to their first NUL.
    pub fn assert_string_equal<A, B>(&mut self, site: CallSite<'_>, str1: A, str2: B) -> bool
    where
        A: CStrLike,
        B: CStrLike,
    {
        self.recorder.begin_assertion();
        let (a, b) = (str1.c_bytes(), str2.c_bytes());
        if a == b {
            return true;
        }
        self.fail(&site);
        let _ = self.reporter.string_value("str1", a);
        let _ = self.reporter.string_value("str2", b);
        false
    }

    /// Passes if the first `n` elements of `lhs` and `rhs` are equal.
    ///
    /// Only the first mismatching index is reported. An index past the end of
    /// either slice counts as a mismatch.
    pub fn assert_elements_equal<L, R>(
        &mut self,
        site: CallSite<'_>,
        lhs: &[L],
        rhs: &[R],
        n: usize,
    ) -> bool
    where
        L: PartialEq<R> + Scalar,
        R: Scalar,
    {
        self.recorder.begin_assertion();
        let Some(index) = (0..n).find(|&i| match (lhs.get(i), rhs.get(i)) {
            (Some(l), Some(r)) => l != r,
            _ => true,
        }) else {
            return true;
        };

        self.fail(&site);
        let _ = self.reporter.value("elem_index", &index);
        let _ = match lhs.get(index) {
            Some(l) => self.reporter.value("lhs[index]", l),
            None => self.reporter.missing_value("lhs[index]"),
        };
        let _ = match rhs.get(index) {
            Some(r) => self.reporter.value("rhs[index]", r),
            None => self.reporter.missing_value("rhs[index]"),
        };
        false
    }
}
