/*++

Licensed under the Apache-2.0 license.

File Name:

    hardened.rs

Abstract:

    File contains hardened boolean encoding, value laundering and
    constant time comparison helpers.

--*/

use zerocopy::IntoBytes;

/// Hardened boolean
///
/// A boolean encoded as a word with a large Hamming distance between the
/// `TRUE` and `FALSE` encodings. Every other value is invalid, so a single
/// bit flip can never turn one valid value into the other.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardenedBool(pub u32);

impl HardenedBool {
    pub const TRUE: Self = Self(0x739);
    pub const FALSE: Self = Self(0x1d4);

    /// Returns `true` if the encoding is one of the two valid values.
    pub fn is_valid(self) -> bool {
        self == Self::TRUE || self == Self::FALSE
    }

    /// Decode the value, `None` if the encoding is invalid.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Self::TRUE => Some(true),
            Self::FALSE => Some(false),
            _ => None,
        }
    }
}

impl From<bool> for HardenedBool {
    fn from(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl From<HardenedBool> for u32 {
    fn from(value: HardenedBool) -> Self {
        value.0
    }
}

/// Launder the value to prevent compiler optimization
///
/// # Arguments
///
/// * `val` - Value to launder
///
/// # Returns
///
/// `T` - Same value
#[inline(always)]
pub fn launder<T>(val: T) -> T {
    core::hint::black_box(val)
}

/// Compare two words without an early exit.
pub fn hardened_eq_u32(lhs: u32, rhs: u32) -> bool {
    constant_time_eq::constant_time_eq(&lhs.to_ne_bytes(), &rhs.to_ne_bytes())
}

/// Compare two word slices without an early exit on the first mismatch.
///
/// Slices of different length compare unequal.
pub fn hardened_eq_words(lhs: &[u32], rhs: &[u32]) -> bool {
    constant_time_eq::constant_time_eq(lhs.as_bytes(), rhs.as_bytes())
}
