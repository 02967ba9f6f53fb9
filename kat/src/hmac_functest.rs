/*++

Licensed under the Apache-2.0 license.

File Name:

    hmac_functest.rs

Abstract:

    File contains the HMAC functional test exposed through the dispatch
    table. Unlike a KAT it reports the tag instead of judging it.

--*/

use cryptolib::{hmac, BlindedKey, KeyConfig, KeyMode};
use cryptolib_error::CryptoResult;

/// Functional test key, 256 bits
pub const FUNCTEST_KEY: [u8; 32] = [
    0x1b, 0xff, 0x10, 0xea, 0xa5, 0xb9, 0xb2, 0x04, 0xd6, 0xf3, 0x23, 0x2a, 0x57, 0x3e, 0x8e, 0x51,
    0xa2, 0x7b, 0x68, 0xc3, 0x19, 0x36, 0x6d, 0xea, 0xf2, 0x6b, 0x91, 0xb0, 0x71, 0x2f, 0x7a, 0x34,
];

/// Mask for the functional test key. It must not affect the tag.
pub const FUNCTEST_MASK: [u32; 8] = [
    0x8cb8_47c3, 0xc6d3_4f36, 0x72ed_bf7b, 0x9bc0_317f, 0x8f00_3c7f, 0x1d7b_a049, 0xfd46_3b63,
    0xbb72_0c44,
];

pub const FUNCTEST_MESSAGE: &[u8] = b"Test message.";

/// Compute HMAC-SHA256 of the functional test message
///
/// # Arguments
///
/// * `tag` - Output, the HMAC-SHA256 tag bytes
pub fn run_hmac_functest(tag: &mut [u8; 32]) -> CryptoResult<()> {
    let config = KeyConfig::new(KeyMode::HmacSha256, FUNCTEST_KEY.len())?;
    let key = BlindedKey::from_key_and_mask(&FUNCTEST_KEY, &FUNCTEST_MASK, config)?;
    hmac(&key, FUNCTEST_MESSAGE, (&mut tag[..]).into())
}
