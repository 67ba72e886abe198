// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! End-to-end runs checked against complete report output.

use testchamber::{
    CallSite, Chamber, Counters, Session, def_chamber, test_assert, test_set_data_index,
    test_string_equal,
};

const SUCCESS_TAIL: &str = concat!(
    "\nWell done. Here come the test results:\n",
    "\tTotal:      1 tests,     1 asserts\n",
    "\tFailed:     0 tests,     0 asserts\n",
    "\n",
    "  »Great work! Because this message is prerecorded, any observations\n",
    "   related to your performance are speculation on our part. Please\n",
    "   disregard any undeserved compliments.«\n",
    "                                               -- Announcer, Portal 2\n\n",
);

const FAILURE_TAIL: &str = concat!(
    "\nWell done. Here come the test results:\n",
    "\tTotal:      1 tests,     1 asserts\n",
    "\tFailed:     1 tests,     1 asserts\n",
    "\n",
    "  »You are a horrible person. That's what it says: a horrible person.\n",
    "   We weren't even testing for that.«\n",
    "                                                  -- GLaDOS, Portal 2\n\n",
);

#[def_chamber]
fn identity(c: &mut Chamber) {
    test_assert!(c, 1 == 1);
}

#[test]
fn passing_chamber_report() {
    let mut session = Session::new(String::new(), false);
    session.run_descriptor(&IDENTITY_CHAMBER);
    session.summary().unwrap();

    assert_eq!(
        session.counters(),
        Counters {
            chambers: 1,
            failed_chambers: 0,
            asserts: 1,
            failed_asserts: 0,
        }
    );
    let expected = format!("\nTESTCHAMBER identity:\n✔ PASS\n{SUCCESS_TAIL}");
    assert_eq!(session.into_inner(), expected);
}

#[test]
fn failing_equality_report() {
    let mut session = Session::new(String::new(), false);
    session.run("unequal", |c| {
        c.assert_equal(CallSite::new("EQUAL(2,3)", "demo.c", 42), 2, 3);
    });
    session.summary().unwrap();

    let counters = session.counters();
    assert_eq!(counters.failed_chambers, 1);
    assert_eq!(counters.failed_asserts, 1);
    let expected = format!(
        "\nTESTCHAMBER unequal:\n\
         ✘ FAIL: demo.c:42\tEQUAL(2,3)\n  \
         \tlhs: \t2 \t0x2\n  \
         \trhs: \t3 \t0x3\n\
         {FAILURE_TAIL}"
    );
    assert_eq!(session.into_inner(), expected);
}

#[test]
fn failing_equality_report_colored() {
    let mut session = Session::new(String::new(), true);
    session.run("unequal", |c| {
        c.assert_equal(CallSite::new("EQUAL(2,3)", "demo.c", 42), 2, 3);
    });
    session.summary().unwrap();

    let out = session.into_inner();
    assert!(out.starts_with(
        "\n\x1b[34mTESTCHAMBER unequal:\x1b[0m\n\
         \x1b[31m✘ FAIL:\x1b[0m demo.c:42\tEQUAL(2,3)\n"
    ));
    assert!(out.contains("\tFailed: \x1b[31m    1\x1b[0m tests, \x1b[31m    1\x1b[0m asserts\n"));
    assert!(out.ends_with("\x1b[3m\n  »You are a horrible person. That's what it says: a horrible person.\n   We weren't even testing for that.«\n                                                  -- GLaDOS, Portal 2\x1b[0m\n\n"));
    assert!(!out.contains("PASS"));
}

#[test]
fn data_driven_loop_reports_index() {
    let cases = [("ab", "ab"), ("ab", "ba"), ("cd", "cd")];
    let mut session = Session::new(String::new(), false);
    session.run("loop", |c| {
        for (i, (lhs, rhs)) in cases.iter().enumerate() {
            test_set_data_index!(c, i);
            test_string_equal!(c, lhs, rhs);
        }
    });

    let counters = session.counters();
    assert_eq!(counters.asserts, 3);
    assert_eq!(counters.failed_asserts, 1);
    assert_eq!(counters.failed_chambers, 1);

    let out = session.into_inner();
    let fail = out.find("✘ FAIL:").unwrap();
    let report = &out[fail..];
    assert!(report.contains("\tSTRING_EQUAL(lhs,rhs)\n  \tat Data Index 1:\n"));
    assert!(report.ends_with("  \tstr1: \t'ab'\n  \tstr2: \t'ba'\n"));
    assert!(!out.contains("Data Index 0"));
    assert!(!out.contains("Data Index 2"));
}

#[test]
fn literal_strings_are_stringized() {
    let mut session = Session::new(String::new(), false);
    session.run("literal", |c| {
        test_set_data_index!(c, 1);
        test_string_equal!(c, "ab", "ba");
    });
    let out = session.into_inner();
    assert!(out.contains("\tSTRING_EQUAL(\"ab\",\"ba\")\n  \tat Data Index 1:\n"));
}

#[test]
fn counters_never_exceed_totals() {
    let mut session = Session::new(String::new(), false);
    for round in 0..6u32 {
        session.run("mixed", |c| {
            for k in 0..round {
                c.assert_true(CallSite::new("ASSERT(k % 3)", "mixed.rs", 1), k % 3);
            }
        });
        let counters = session.counters();
        assert!(counters.failed_asserts <= counters.asserts);
        assert!(counters.failed_chambers <= counters.chambers);
    }
    // Rounds 1..=5 hit k == 0, and k == 3 in rounds 4 and 5
    let counters = session.counters();
    assert_eq!(counters.chambers, 6);
    assert_eq!(counters.failed_chambers, 5);
    assert_eq!(counters.asserts, 15);
    assert_eq!(counters.failed_asserts, 7);
}
