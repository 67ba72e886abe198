// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Pass/fail bookkeeping for chambers and assertions.

/// Tally of a session, read by the final summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    /// Number of chambers entered
    pub chambers: usize,
    /// Number of chambers with at least one failed assertion
    pub failed_chambers: usize,
    /// Number of assertions evaluated
    pub asserts: usize,
    /// Number of assertions that failed
    pub failed_asserts: usize,
}

impl Counters {
    /// Create an empty tally
    pub const fn new() -> Self {
        Self {
            chambers: 0,
            failed_chambers: 0,
            asserts: 0,
            failed_asserts: 0,
        }
    }

    /// Whether any chamber or assertion failed
    pub const fn any_failed(&self) -> bool {
        self.failed_chambers > 0 || self.failed_asserts > 0
    }
}

/// Counters plus the failure flags of the chamber and assertion in flight.
///
/// The recorder never fails; every operation is plain bookkeeping.
#[derive(Debug, Default)]
pub struct Recorder {
    counters: Counters,
    last_assert_failed: bool,
    any_assert_failed: bool,
    chamber_failed: bool,
}

impl Recorder {
    pub const fn new() -> Self {
        Self {
            counters: Counters::new(),
            last_assert_failed: false,
            any_assert_failed: false,
            chamber_failed: false,
        }
    }

    /// Enter a new chamber.
    pub fn begin_chamber(&mut self) {
        self.chamber_failed = false;
        self.any_assert_failed = false;
        self.counters.chambers += 1;
    }

    /// Record the current chamber as failed.
    ///
    /// Only the first call per chamber is counted.
    pub fn mark_chamber_failed(&mut self) {
        if self.chamber_failed {
            return;
        }
        self.chamber_failed = true;
        self.counters.failed_chambers += 1;
    }

    /// Start evaluating an assertion.
    pub fn begin_assertion(&mut self) {
        self.last_assert_failed = false;
        self.counters.asserts += 1;
    }

    /// Record the assertion in flight as failed.
    pub fn mark_assertion_failed(&mut self) {
        self.last_assert_failed = true;
        self.any_assert_failed = true;
        self.counters.failed_asserts += 1;
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Whether an assertion failed since the current chamber began
    pub fn any_assert_failed(&self) -> bool {
        self.any_assert_failed
    }

    /// Whether the current chamber has been marked failed
    pub fn chamber_failed(&self) -> bool {
        self.chamber_failed
    }

    pub fn last_assert_failed(&self) -> bool {
        self.last_assert_failed
    }
}
