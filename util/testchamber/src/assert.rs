// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Assertion macros.
//!
//! Each macro captures the asserted expression text and its source location
//! into a [`CallSite`](crate::CallSite) and forwards to the matching
//! [`Chamber`](crate::Chamber) method. None of them returns early: a failed
//! assertion is recorded and the chamber keeps running.

/// Build a [`CallSite`](crate::CallSite) for the current source location.
#[macro_export]
macro_rules! call_site {
    ($expr:expr) => {
        $crate::CallSite::new($expr, ::core::file!(), ::core::line!())
    };
}

/// Assert that a value is true (or nonzero).
///
/// ```rust
/// # use testchamber::{Session, test_assert};
/// # let mut session = Session::new(String::new(), false);
/// session.run("truth", |c| {
///     test_assert!(c, 1 == 1);
///     test_assert!(c, 7u8);
/// });
/// ```
#[macro_export]
macro_rules! test_assert {
    ($chamber:expr, $x:expr $(,)?) => {
        $chamber.assert_true(
            $crate::call_site!(::core::concat!("ASSERT(", ::core::stringify!($x), ")")),
            $x,
        )
    };
}

/// Assert `x == y`. Prints both operands on failure.
#[macro_export]
macro_rules! test_equal {
    ($chamber:expr, $x:expr, $y:expr $(,)?) => {
        $chamber.assert_equal(
            $crate::call_site!(::core::concat!(
                "EQUAL(",
                ::core::stringify!($x),
                ",",
                ::core::stringify!($y),
                ")"
            )),
            $x,
            $y,
        )
    };
}

/// Assert that two strings are equal up to their first NUL byte.
#[macro_export]
macro_rules! test_string_equal {
    ($chamber:expr, $str1:expr, $str2:expr $(,)?) => {
        $chamber.assert_string_equal(
            $crate::call_site!(::core::concat!(
                "STRING_EQUAL(",
                ::core::stringify!($str1),
                ",",
                ::core::stringify!($str2),
                ")"
            )),
            &$str1,
            &$str2,
        )
    };
}

/// Assert that the first `n` elements of two sequences are equal.
///
/// Works on slices, arrays, vectors and strings (compared bytewise).
///
/// ```rust
/// # use testchamber::{Session, test_elements_equal};
/// # let mut session = Session::new(String::new(), false);
/// session.run("prefix", |c| {
///     test_elements_equal!(c, [1, 2, 3], vec![1, 2, 4], 2);
///     test_elements_equal!(c, "abc", "abd", 2);
/// });
/// assert!(!session.counters().any_failed());
/// ```
#[macro_export]
macro_rules! test_elements_equal {
    ($chamber:expr, $x:expr, $y:expr, $n:expr $(,)?) => {
        $chamber.assert_elements_equal(
            $crate::call_site!(::core::concat!(
                "ELEMENTS_EQUAL(",
                ::core::stringify!($x),
                ",",
                ::core::stringify!($y),
                ",",
                ::core::stringify!($n),
                ")"
            )),
            $crate::Elements::elements(&$x),
            $crate::Elements::elements(&$y),
            $n,
        )
    };
}

/// Print a formatted message without asserting.
#[macro_export]
macro_rules! test_printf {
    ($chamber:expr, $($arg:tt)+) => {
        $chamber.message(::core::format_args!($($arg)+))
    };
}

/// Set the data index reported by failing assertions.
#[macro_export]
macro_rules! test_set_data_index {
    ($chamber:expr, $n:expr $(,)?) => {
        $chamber.set_data_index($n)
    };
}

/// Clear the data index.
#[macro_export]
macro_rules! test_unset_data_index {
    ($chamber:expr $(,)?) => {
        $chamber.unset_data_index()
    };
}
