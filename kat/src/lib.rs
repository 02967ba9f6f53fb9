/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the crypto library Known Answer Tests.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod hmac_functest;
mod hmac_sha256_kat;
mod keyblob_kat;
mod kmac128_kat;

use cryptolib::cprintln;
pub use cryptolib_error::{CryptoError, CryptoResult};
pub use hmac_functest::{run_hmac_functest, FUNCTEST_KEY, FUNCTEST_MASK, FUNCTEST_MESSAGE};
pub use hmac_sha256_kat::HmacSha256Kat;
pub use keyblob_kat::KeyblobKat;
pub use kmac128_kat::Kmac128Kat;

/// Run every known answer test, stopping at the first failure.
pub fn execute_all() -> CryptoResult<()> {
    cprintln!("[kat] ++");

    cprintln!("[kat] Executing keyblob masking KAT");
    KeyblobKat::default().execute()?;

    cprintln!("[kat] Executing HMAC-SHA256 KAT");
    HmacSha256Kat::default().execute()?;

    cprintln!("[kat] Executing KMAC128 KAT");
    Kmac128Kat::default().execute()?;

    cprintln!("[kat] --");
    Ok(())
}
