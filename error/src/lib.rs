/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains API and macros used by the crypto library for error handling

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// Crypto library error type
///
/// The wrapped value is the status word reported across the dispatch
/// boundary. Zero is reserved for success and can never be an error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CryptoError(pub NonZeroU32);

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: CryptoError = CryptoError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl CryptoError {
    /// Create a crypto error; intended to only be used from const contexts, as we don't want
    /// runtime panics if val is zero. The preferred way to get a CryptoError from a u32 is to
    /// use `CryptoError::try_from()` from the `TryFrom` trait impl.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("CryptoError cannot be 0"),
        }
    }

    define_error_constants![
        (
            SIZE_MISMATCH,
            0x0001_0001,
            "Buffer too small or too large for the stated key configuration"
        ),
        (
            INVALID_CONFIG,
            0x0001_0002,
            "Semantically impossible key configuration"
        ),
        (
            INVALID_LENGTH,
            0x0001_0003,
            "Key length outside the size class of the key mode"
        ),
        (
            INTEGRITY_VIOLATION,
            0x0002_0001,
            "Key checksum does not match the key metadata"
        ),
        (
            UNSUPPORTED_KEY_MODE,
            0x0003_0001,
            "Requested operation does not match the key mode"
        ),
        (
            INVALID_STATE,
            0x0003_0002,
            "MAC context handle is not live"
        ),
        (ENTROPY_FAILURE, 0x0004_0001, "Entropy source failure"),
        (
            BAD_ARGS,
            0x0005_0001,
            "Null, misaligned or malformed argument at the dispatch boundary"
        ),
        (
            CONTSVC_INVALID_INDEX,
            0x0005_0002,
            "Dispatch table index out of range"
        ),
        (
            CONTSVC_CONTEXT_EXHAUSTED,
            0x0005_0003,
            "No free streaming MAC context"
        ),
        (
            KAT_HMAC_SHA256_TAG_MISMATCH,
            0x0006_0001,
            "KAT Error: HMAC-SHA256 tag mismatch"
        ),
        (
            KAT_KEYBLOB_MASK_MISMATCH,
            0x0006_0002,
            "KAT Error: keyblob masking mismatch"
        ),
        (
            KAT_KMAC128_TAG_MISMATCH,
            0x0006_0003,
            "KAT Error: KMAC128 tag mismatch"
        ),
    ];
}

impl From<core::num::NonZeroU32> for crate::CryptoError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::CryptoError(val)
    }
}

impl From<CryptoError> for core::num::NonZeroU32 {
    fn from(val: CryptoError) -> Self {
        val.0
    }
}

impl From<CryptoError> for u32 {
    fn from(val: CryptoError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for CryptoError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        match NonZeroU32::try_from(val) {
            Ok(val) => Ok(CryptoError(val)),
            Err(err) => Err(err),
        }
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;

/// Flatten a result into the status word used across the dispatch boundary.
///
/// `0` is success; any other value is the error code, unchanged.
pub fn status_word(result: CryptoResult<()>) -> u32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.into(),
    }
}
