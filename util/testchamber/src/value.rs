// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! How asserted operands are inspected and rendered.

use core::{
    ffi::CStr,
    fmt::{self, Write},
    mem::size_of,
};

/// A value printed as decimal and hexadecimal.
///
/// Values one byte wide are additionally printed as a character. Values
/// narrower than 32 bits print their hex sign-extended to 32 bits, so `-1i8`
/// shows as `0xffffffff`.
pub trait Scalar {
    /// Write `<decimal> \t0x<hex>`, followed by ` \t'<char>'` for byte-wide
    /// values.
    fn fmt_scalar(&self, f: &mut dyn Write) -> fmt::Result;
}

/// A value usable in a boolean assertion: `true` or nonzero passes.
pub trait Truth: Scalar {
    fn is_true(&self) -> bool;
}

/// Character column of a byte. Non-ASCII bytes have no single-byte UTF-8
/// form and print as U+FFFD, like invalid bytes in a string.
fn byte_char(b: u8) -> char {
    if b.is_ascii() {
        b as char
    } else {
        char::REPLACEMENT_CHARACTER
    }
}

macro_rules! impl_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                fn fmt_scalar(&self, f: &mut dyn Write) -> fmt::Result {
                    // Narrow values are promoted to a 32-bit int first, sign
                    // included, as a C varargs call would do.
                    if size_of::<$t>() < size_of::<i32>() {
                        write!(f, "{} \t0x{:x}", self, *self as i32 as u32)?;
                    } else {
                        write!(f, "{} \t0x{:x}", self, self)?;
                    }
                    if size_of::<$t>() == 1 {
                        write!(f, " \t'{}'", byte_char(*self as u8))?;
                    }
                    Ok(())
                }
            }

            impl Truth for $t {
                fn is_true(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_integer!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
);

// A bool is a truth value, not a byte: it renders as 0/1 without a character.
impl Scalar for bool {
    fn fmt_scalar(&self, f: &mut dyn Write) -> fmt::Result {
        let v = u8::from(*self);
        write!(f, "{} \t0x{:x}", v, v)
    }
}

impl Truth for bool {
    fn is_true(&self) -> bool {
        *self
    }
}

impl Scalar for char {
    fn fmt_scalar(&self, f: &mut dyn Write) -> fmt::Result {
        let v = u32::from(*self);
        write!(f, "{} \t0x{:x}", v, v)
    }
}

impl<T: Scalar + ?Sized> Scalar for &T {
    fn fmt_scalar(&self, f: &mut dyn Write) -> fmt::Result {
        (**self).fmt_scalar(f)
    }
}

impl<T: Scalar + ?Sized> Scalar for &mut T {
    fn fmt_scalar(&self, f: &mut dyn Write) -> fmt::Result {
        (**self).fmt_scalar(f)
    }
}

impl<T: Truth + ?Sized> Truth for &T {
    fn is_true(&self) -> bool {
        (**self).is_true()
    }
}

/// A string compared the way C compares NUL-terminated strings.
pub trait CStrLike {
    /// Bytes up to, but not including, the first NUL.
    fn c_bytes(&self) -> &[u8];
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

impl CStrLike for str {
    fn c_bytes(&self) -> &[u8] {
        until_nul(self.as_bytes())
    }
}

impl CStrLike for [u8] {
    fn c_bytes(&self) -> &[u8] {
        until_nul(self)
    }
}

impl<const N: usize> CStrLike for [u8; N] {
    fn c_bytes(&self) -> &[u8] {
        until_nul(self)
    }
}

impl CStrLike for CStr {
    fn c_bytes(&self) -> &[u8] {
        self.to_bytes()
    }
}

impl<T: CStrLike + ?Sized> CStrLike for &T {
    fn c_bytes(&self) -> &[u8] {
        (**self).c_bytes()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        impl CStrLike for String {
            fn c_bytes(&self) -> &[u8] {
                until_nul(self.as_bytes())
            }
        }

        impl CStrLike for Vec<u8> {
            fn c_bytes(&self) -> &[u8] {
                until_nul(self)
            }
        }

        impl CStrLike for std::ffi::CString {
            fn c_bytes(&self) -> &[u8] {
                self.to_bytes()
            }
        }
    }
}

/// Write string bytes, replacing invalid UTF-8 with U+FFFD.
pub(crate) fn write_lossy<W: Write + ?Sized>(f: &mut W, bytes: &[u8]) -> fmt::Result {
    for chunk in bytes.utf8_chunks() {
        f.write_str(chunk.valid())?;
        if !chunk.invalid().is_empty() {
            f.write_char(char::REPLACEMENT_CHARACTER)?;
        }
    }
    Ok(())
}

/// Anything indexable as a contiguous run of elements.
pub trait Elements {
    type Item;

    fn elements(&self) -> &[Self::Item];
}

impl<T> Elements for [T] {
    type Item = T;

    fn elements(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> Elements for [T; N] {
    type Item = T;

    fn elements(&self) -> &[T] {
        self
    }
}

impl Elements for str {
    type Item = u8;

    fn elements(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<T: Elements + ?Sized> Elements for &T {
    type Item = T::Item;

    fn elements(&self) -> &[T::Item] {
        (**self).elements()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        impl<T> Elements for Vec<T> {
            type Item = T;

            fn elements(&self) -> &[T] {
                self
            }
        }

        impl Elements for String {
            type Item = u8;

            fn elements(&self) -> &[u8] {
                self.as_bytes()
            }
        }
    }
}
