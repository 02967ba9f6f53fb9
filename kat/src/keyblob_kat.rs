/*++

Licensed under the Apache-2.0 license.

File Name:

    keyblob_kat.rs

Abstract:

    File contains the Known Answer Tests (KAT) for keyblob masking.

--*/

use cryptolib::{cprintln, keyblob, BlindedKey, KeyConfig, KeyMode};
use cryptolib_error::{CryptoError, CryptoResult};

const KEY: [u8; 32] = [0x00; 32];
const MASK: [u32; 8] = [0x0101_0101; 8];
const NEW_MASK: [u32; 8] = [
    0x8cb8_47c3, 0xc6d3_4f36, 0x72ed_bf7b, 0x9bc0_317f, 0x8f00_3c7f, 0x1d7b_a049, 0xfd46_3b63,
    0xbb72_0c44,
];

#[derive(Default, Debug)]
pub struct KeyblobKat {}

impl KeyblobKat {
    /// This function executes the Known Answer Tests (aka KAT) for keyblob
    /// masking.
    ///
    /// # Returns
    ///
    /// * `CryptoResult` - Result denoting the KAT outcome.
    pub fn execute(&self) -> CryptoResult<()> {
        self.kat_mask()?;
        self.kat_remask()?;
        Ok(())
    }

    fn config(&self) -> CryptoResult<KeyConfig> {
        KeyConfig::new(KeyMode::HmacSha256, KEY.len())
    }

    // An all zero key masked with 0x01 bytes is 0x01 in both shares.
    fn kat_mask(&self) -> CryptoResult<()> {
        let config = self.config()?;
        let blob = keyblob::from_key_and_mask(&KEY, &MASK, &config)?;
        if blob.as_bytes() != [0x01u8; 64] {
            cprintln!("[kat] Keyblob mask mismatch");
            Err(CryptoError::KAT_KEYBLOB_MASK_MISMATCH)?;
        }

        let mut key = [0xffu8; 32];
        keyblob::unmask(&blob, &config, &mut key)?;
        if key != KEY {
            Err(CryptoError::KAT_KEYBLOB_MASK_MISMATCH)?;
        }
        Ok(())
    }

    fn kat_remask(&self) -> CryptoResult<()> {
        let mut key = BlindedKey::from_key_and_mask(&KEY, &MASK, self.config()?)?;
        key.remask(&NEW_MASK)?;

        let (share0, share1) = keyblob::to_shares(key.keyblob(), key.config())?;
        if share0 != NEW_MASK || share1 != NEW_MASK || !key.verify() {
            cprintln!("[kat] Keyblob remask mismatch");
            Err(CryptoError::KAT_KEYBLOB_MASK_MISMATCH)?;
        }
        Ok(())
    }
}
