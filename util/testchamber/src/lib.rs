// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Test chambers for low-level code.
//!
//! A chamber is a named group of assertions. A [`Session`] runs chambers one
//! after another, counts assertions and failures, and renders a colorized
//! report to any [`core::fmt::Write`] sink.
//!
//! # Example
//!
//! ```rust
//! use testchamber::{Chamber, Session, def_chamber, test_assert, test_equal};
//!
//! #[def_chamber]
//! fn arithmetic(c: &mut Chamber) {
//!     test_assert!(c, 1 + 1 == 2);
//!     test_equal!(c, 2 * 3, 6);
//! }
//!
//! let mut session = Session::new(String::new(), false);
//! session.run_all(&[ARITHMETIC_CHAMBER]);
//! session.summary().unwrap();
//! assert!(!session.counters().any_failed());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate log;

// Lets `#[def_chamber]` expansions name `::testchamber` from inside this crate.
extern crate self as testchamber;

mod assert;
pub mod recorder;
pub mod report;
pub mod runner;
pub mod value;


pub use recorder::{Counters, Recorder};
pub use report::{AnsiColor, Reporter};
#[cfg(feature = "std")]
pub use report::Stdout;
pub use runner::{CallSite, Chamber, ChamberDescriptor, ChamberFn, Session};
// Re-export the chamber registration attribute
pub use testchamber_macros::def_chamber;
pub use value::{CStrLike, Elements, Scalar, Truth};
