/*++

Licensed under the Apache-2.0 license.

File Name:

    kmac128_kat.rs

Abstract:

    File contains the Known Answer Tests (KAT) for KMAC128.

--*/

use cryptolib::printer::HexBytes;
use cryptolib::{cprintln, kmac, BlindedKey, KeyConfig, KeyMode};
use cryptolib_error::{CryptoError, CryptoResult};

const KEY: [u8; 32] = [
    0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4a, 0x4b, 0x4c, 0x4d, 0x4e, 0x4f,
    0x50, 0x51, 0x52, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x5b, 0x5c, 0x5d, 0x5e, 0x5f,
];

const MASK: [u32; 8] = [
    0x0f1e_2d3c, 0x4b5a_6978, 0x8796_a5b4, 0xc3d2_e1f0, 0x1357_9bdf, 0x2468_ace0, 0xfedc_ba98,
    0x7654_3210,
];

#[derive(Default, Debug)]
pub struct Kmac128Kat {}

impl Kmac128Kat {
    /// This function executes the Known Answer Tests (aka KAT) for KMAC128.
    ///
    /// Test vector source:
    /// NIST SP 800-185 KMAC samples, sample #2
    ///
    /// # Returns
    ///
    /// * `CryptoResult` - Result denoting the KAT outcome.
    pub fn execute(&self) -> CryptoResult<()> {
        self.kat_customized()?;
        Ok(())
    }

    fn kat_customized(&self) -> CryptoResult<()> {
        let config = KeyConfig::new(KeyMode::Kmac128, KEY.len())?;
        let key = BlindedKey::from_key_and_mask(&KEY, &MASK, config)?;
        let expected_tag = [
            0x3b, 0x1f, 0xba, 0x96, 0x3c, 0xd8, 0xb0, 0xb5, 0x9e, 0x8c, 0x1a, 0x6d, 0x71, 0x88,
            0x8b, 0x71, 0x43, 0x65, 0x1a, 0xf8, 0xba, 0x0a, 0x70, 0x70, 0xc0, 0x97, 0x9e, 0x28,
            0x11, 0x32, 0x4a, 0xa5,
        ];

        let mut tag = [0u8; 32];
        let result = kmac(&key, &[0, 1, 2, 3], b"My Tagged Application", &mut tag);
        if result.is_err() || tag != expected_tag {
            cprintln!("[kat] KMAC128 tag mismatch: {}", HexBytes(&tag));
            Err(CryptoError::KAT_KMAC128_TAG_MISMATCH)?;
        }
        Ok(())
    }
}
