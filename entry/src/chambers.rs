// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Demo chambers, exercising a few byte-level helpers.

use testchamber::{
    Chamber, ChamberDescriptor, def_chamber, test_assert, test_elements_equal, test_equal,
    test_printf, test_set_data_index, test_string_equal, test_unset_data_index,
};

/// Round `addr` up to a multiple of `align`, which must be a power of two.
pub const fn align_up(addr: usize, align: usize) -> usize {
    (addr + align - 1) & !(align - 1)
}

/// Ones' complement sum over big-endian 16-bit words (RFC 1071).
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = data
        .chunks(2)
        .map(|w| u32::from(u16::from_be_bytes([w[0], *w.get(1).unwrap_or(&0)])))
        .sum();
    while sum > 0xffff {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

/// Length of a NUL-terminated byte string.
pub fn c_strlen(bytes: &[u8]) -> usize {
    bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())
}

#[def_chamber]
fn alignment(c: &mut Chamber) {
    let cases: [(usize, usize, usize); 4] = [
        (0, 8, 0),
        (1, 8, 8),
        (4096, 4096, 4096),
        (4097, 4096, 8192),
    ];
    for (i, &(addr, align, expected)) in cases.iter().enumerate() {
        test_set_data_index!(c, i);
        test_equal!(c, align_up(addr, align), expected);
    }
    test_unset_data_index!(c);
    test_assert!(c, align_up(13, 4) % 4 == 0);
}

#[def_chamber]
fn internet_checksum(c: &mut Chamber) {
    let header = [0x45u8, 0x00, 0x00, 0x1c, 0x00, 0x00, 0x00, 0x00, 0x40, 0x11];
    let sum = checksum(&header);
    test_printf!(c, "header checksum 0x{sum:04x}");

    // A buffer carrying its own checksum sums to zero
    let mut with_sum = header.to_vec();
    with_sum.extend_from_slice(&sum.to_be_bytes());
    test_equal!(c, checksum(&with_sum), 0u16);
    test_equal!(c, checksum(&[]), 0xffffu16);
    test_equal!(c, checksum(&[0x01]), !0x0100u16);
}

#[def_chamber("c strings")]
fn c_strings(c: &mut Chamber) {
    let raw = b"boot\0args";
    test_equal!(c, c_strlen(raw), 4);
    test_string_equal!(c, raw, "boot");
    test_elements_equal!(c, raw, "boot", 4);
    test_assert!(c, c_strlen(b"") == 0);
}

#[def_chamber("byte order")]
fn byte_order(c: &mut Chamber) {
    let word = 0x1234_5678u32;
    test_elements_equal!(c, word.to_be_bytes(), [0x12u8, 0x34, 0x56, 0x78], 4);
    test_elements_equal!(c, word.to_le_bytes(), [0x78u8, 0x56, 0x34, 0x12], 4);
    test_equal!(c, word.swap_bytes(), 0x7856_3412u32);
}

#[def_chamber("showcase: unequal")]
fn showcase_unequal(c: &mut Chamber) {
    test_equal!(c, 2, 3);
}

#[def_chamber("showcase: data index")]
fn showcase_data_index(c: &mut Chamber) {
    let expected = ["ab", "ab", "ab"];
    let actual = ["ab", "ba", "ab"];
    for (i, (got, want)) in actual.iter().zip(expected).enumerate() {
        test_set_data_index!(c, i);
        test_string_equal!(c, got, want);
    }
}

#[def_chamber("showcase: elements")]
fn showcase_elements(c: &mut Chamber) {
    test_elements_equal!(c, b"kernel", b"kernal", 6);
}

/// Chambers that are expected to pass.
pub const PASSING: &[ChamberDescriptor] = &[
    ALIGNMENT_CHAMBER,
    INTERNET_CHECKSUM_CHAMBER,
    C_STRINGS_CHAMBER,
    BYTE_ORDER_CHAMBER,
];

/// Chambers that fail on purpose to show the failure report.
pub const SHOWCASE_FAILURES: &[ChamberDescriptor] = &[
    SHOWCASE_UNEQUAL_CHAMBER,
    SHOWCASE_DATA_INDEX_CHAMBER,
    SHOWCASE_ELEMENTS_CHAMBER,
];

#[cfg(test)]
mod tests {
    use testchamber::Session;

    use super::*;

    #[test]
    fn test_passing_chambers_pass() {
        let mut session = Session::new(String::new(), false);
        assert!(session.run_all(PASSING), "{}", session.get_ref());
        let counters = session.counters();
        assert_eq!(counters.chambers, PASSING.len());
        assert_eq!(counters.failed_asserts, 0);
        assert!(session.get_ref().contains("MSG:  header checksum 0x"));
    }

    #[test]
    fn test_showcase_chambers_fail() {
        let mut session = Session::new(String::new(), false);
        assert!(!session.run_all(SHOWCASE_FAILURES));
        let counters = session.counters();
        assert_eq!(counters.failed_chambers, SHOWCASE_FAILURES.len());
        assert_eq!(counters.failed_asserts, 3);

        let out = session.into_inner();
        assert!(out.contains("\tlhs: \t2 \t0x2\n  \trhs: \t3 \t0x3\n"));
        assert!(out.contains("  \tat Data Index 1:\n  \tstr1: \t'ba'\n  \tstr2: \t'ab'\n"));
        assert!(out.contains("\telem_index: \t4 \t0x4\n"));
        assert!(out.contains("\tlhs[index]: \t101 \t0x65 \t'e'\n"));
        assert!(out.contains("\trhs[index]: \t97 \t0x61 \t'a'\n"));
    }

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(&[0xff, 0xff]), 0);
        assert_eq!(checksum(&[0x00, 0x01, 0xf2, 0x03]), !0xf204);
    }
}
