/*++

Licensed under the Apache-2.0 license.

File Name:

    hmac_sha256_kat.rs

Abstract:

    File contains the Known Answer Tests (KAT) for HMAC-SHA256 over a
    blinded key.

--*/

use cryptolib::{cprintln, hmac, Array4x8, BlindedKey, KeyConfig, KeyMode};
use cryptolib_error::{CryptoError, CryptoResult};

#[derive(Default, Debug)]
pub struct HmacSha256Kat {}

impl HmacSha256Kat {
    /// This function executes the Known Answer Tests (aka KAT) for
    /// HMAC-SHA256.
    ///
    /// Test vector source:
    /// RFC 4231, test case 2
    ///
    /// # Returns
    ///
    /// * `CryptoResult` - Result denoting the KAT outcome.
    pub fn execute(&self) -> CryptoResult<()> {
        self.kat_short_key()?;
        Ok(())
    }

    fn kat_short_key(&self) -> CryptoResult<()> {
        let config = KeyConfig::new(KeyMode::HmacSha256, 4)?;
        let key = BlindedKey::from_key_and_mask(b"Jefe", &[0x3ca5_69f0], config)?;
        let data = b"what do ya want for nothing?";
        let expected_tag = Array4x8::new([
            0x5bdcc146, 0xbf60754e, 0x6a042426, 0x089575c7, 0x5a003f08, 0x9d273983, 0x9dec58b9,
            0x64ec3843,
        ]);

        let mut tag = Array4x8::default();
        let result = hmac(&key, data, (&mut tag).into());
        if result.is_err() || tag != expected_tag {
            cprintln!("[kat] HMAC-SHA256 tag mismatch");
            Err(CryptoError::KAT_HMAC_SHA256_TAG_MISMATCH)?;
        }
        Ok(())
    }
}
