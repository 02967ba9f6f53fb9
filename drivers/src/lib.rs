/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the blinded key crypto library.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod array;
mod blinded_key;
mod entropy;
mod hardened;
mod hmac;
mod integrity;
mod key_config;
mod kmac;
mod unblinded_key;

pub mod keyblob;
pub mod printer;

pub use array::{Array4x12, Array4x16, Array4x8};
pub use blinded_key::BlindedKey;
pub use cryptolib_error::{CryptoError, CryptoResult};
pub use entropy::EntropySource;
pub use hardened::{hardened_eq_u32, hardened_eq_words, launder, HardenedBool};
pub use crate::hmac::{hmac, HmacContext, HmacMode, HmacTag};
pub use integrity::{
    blinded_checksum, blinded_key_check, unblinded_checksum, unblinded_key_check, Crc32,
};
pub use key_config::{
    CryptoLibVersion, KeyConfig, KeyMode, RawKeyConfig, SecurityLevel,
    DIVERSIFICATION_MAX_BYTES, KEY_MAX_BYTES, KEY_MAX_WORDS, WORD_SIZE_BYTES,
};
pub use keyblob::{Keyblob, KEYBLOB_MAX_WORDS};
pub use kmac::{kmac, KmacMode};
pub use unblinded_key::UnblindedKey;
