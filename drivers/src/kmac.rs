/*++

Licensed under the Apache-2.0 license.

File Name:

    kmac.rs

Abstract:

    File contains the KMAC128 and KMAC256 operations (NIST SP 800-185)
    over blinded keys.

--*/

use crate::blinded_key::BlindedKey;
use crate::key_config::KeyMode;
use cryptolib_error::{CryptoError, CryptoResult};
use sha3::digest::{ExtendableOutput, Update};
use sha3::{CShake128, CShake128Core, CShake256, CShake256Core};

/// cSHAKE function name reserved for KMAC
const KMAC_FUNCTION_NAME: &[u8] = b"KMAC";

/// Largest sponge rate in bytes (cSHAKE128)
const MAX_RATE_BYTES: usize = 168;

const ZERO_PAD: [u8; MAX_RATE_BYTES] = [0u8; MAX_RATE_BYTES];

/// KMAC variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KmacMode {
    Kmac128,
    Kmac256,
}

impl KmacMode {
    /// KMAC variant for a key mode, `UNSUPPORTED_KEY_MODE` for HMAC keys.
    pub fn from_key_mode(key_mode: KeyMode) -> CryptoResult<Self> {
        match key_mode {
            KeyMode::Kmac128 => Ok(Self::Kmac128),
            KeyMode::Kmac256 => Ok(Self::Kmac256),
            KeyMode::HmacSha256 | KeyMode::HmacSha384 | KeyMode::HmacSha512 => {
                Err(CryptoError::UNSUPPORTED_KEY_MODE)
            }
        }
    }

    /// Sponge rate in bytes
    pub fn rate(self) -> usize {
        match self {
            Self::Kmac128 => 168,
            Self::Kmac256 => 136,
        }
    }
}

/// Encode `value` as `left_encode` into `buf`, returning the used part.
fn left_encode(value: u64, buf: &mut [u8; 9]) -> &[u8] {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take(7).take_while(|b| **b == 0).count();
    let n = bytes.len() - skip;
    buf[0] = n as u8;
    buf[1..=n].copy_from_slice(&bytes[skip..]);
    &buf[..=n]
}

/// Encode `value` as `right_encode` into `buf`, returning the used part.
fn right_encode(value: u64, buf: &mut [u8; 9]) -> &[u8] {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take(7).take_while(|b| **b == 0).count();
    let n = bytes.len() - skip;
    buf[..n].copy_from_slice(&bytes[skip..]);
    buf[n] = n as u8;
    &buf[..=n]
}

fn kmac_xof<H: Update + ExtendableOutput>(
    mut hasher: H,
    rate: usize,
    key: &[u8],
    data: &[u8],
    tag: &mut [u8],
) {
    let mut enc = [0u8; 9];

    // bytepad(encode_string(key), rate)
    let rate_enc = left_encode(rate as u64, &mut enc);
    let mut absorbed = rate_enc.len();
    hasher.update(rate_enc);

    let key_enc = left_encode(key.len() as u64 * 8, &mut enc);
    absorbed += key_enc.len() + key.len();
    hasher.update(key_enc);
    hasher.update(key);

    let pad = (rate - absorbed % rate) % rate;
    hasher.update(&ZERO_PAD[..pad]);

    hasher.update(data);
    hasher.update(right_encode(tag.len() as u64 * 8, &mut enc));
    hasher.finalize_xof_into(tag);
}

/// Calculate the KMAC of a message
///
/// The variant follows the key mode and the output length is the length
/// of `tag`.
///
/// # Arguments
///
/// * `key` - Blinded KMAC key
/// * `data` - Message
/// * `customization` - Customization string, may be empty
/// * `tag` - Output buffer, must not be empty
pub fn kmac(
    key: &BlindedKey,
    data: &[u8],
    customization: &[u8],
    tag: &mut [u8],
) -> CryptoResult<()> {
    key.check()?;
    let mode = KmacMode::from_key_mode(key.config().key_mode())?;
    if tag.is_empty() {
        return Err(CryptoError::SIZE_MISMATCH);
    }

    key.with_key(|raw| {
        match mode {
            KmacMode::Kmac128 => kmac_xof(
                CShake128::from_core(CShake128Core::new_with_function_name(
                    KMAC_FUNCTION_NAME,
                    customization,
                )),
                mode.rate(),
                raw,
                data,
                tag,
            ),
            KmacMode::Kmac256 => kmac_xof(
                CShake256::from_core(CShake256Core::new_with_function_name(
                    KMAC_FUNCTION_NAME,
                    customization,
                )),
                mode.rate(),
                raw,
                data,
                tag,
            ),
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_config::KeyConfig;

    fn sample_key(mode: KeyMode) -> BlindedKey {
        let raw: [u8; 32] = core::array::from_fn(|i| 0x40 + i as u8);
        let config = KeyConfig::new(mode, 32).unwrap();
        BlindedKey::from_key_and_mask(&raw, &[0x600d_f00d; 8], config).unwrap()
    }

    #[test]
    fn test_encodings() {
        let mut buf = [0u8; 9];
        assert_eq!(left_encode(0, &mut buf), &[1u8, 0]);
        assert_eq!(left_encode(168, &mut buf), &[1u8, 168]);
        assert_eq!(left_encode(256, &mut buf), &[2u8, 1, 0]);
        assert_eq!(right_encode(256, &mut buf), &[1u8, 0, 2]);
        assert_eq!(right_encode(0, &mut buf), &[0u8, 1]);
    }

    #[test]
    fn test_kmac128_sample1() {
        let mut tag = [0u8; 32];
        kmac(&sample_key(KeyMode::Kmac128), &[0, 1, 2, 3], b"", &mut tag).unwrap();
        assert_eq!(
            tag,
            [
                0xe5, 0x78, 0x0b, 0x0d, 0x3e, 0xa6, 0xf7, 0xd3, 0xa4, 0x29, 0xc5, 0x70, 0x6a,
                0xa4, 0x3a, 0x00, 0xfa, 0xdb, 0xd7, 0xd4, 0x96, 0x28, 0x83, 0x9e, 0x31, 0x87,
                0x24, 0x3f, 0x45, 0x6e, 0xe1, 0x4e,
            ]
        );
    }

    #[test]
    fn test_kmac128_sample2() {
        let mut tag = [0u8; 32];
        kmac(
            &sample_key(KeyMode::Kmac128),
            &[0, 1, 2, 3],
            b"My Tagged Application",
            &mut tag,
        )
        .unwrap();
        assert_eq!(
            tag,
            [
                0x3b, 0x1f, 0xba, 0x96, 0x3c, 0xd8, 0xb0, 0xb5, 0x9e, 0x8c, 0x1a, 0x6d, 0x71,
                0x88, 0x8b, 0x71, 0x43, 0x65, 0x1a, 0xf8, 0xba, 0x0a, 0x70, 0x70, 0xc0, 0x97,
                0x9e, 0x28, 0x11, 0x32, 0x4a, 0xa5,
            ]
        );
    }

    #[test]
    fn test_kmac_output_length_bound() {
        let key = sample_key(KeyMode::Kmac256);
        let mut short = [0u8; 32];
        let mut long = [0u8; 64];
        kmac(&key, b"data", b"", &mut short).unwrap();
        kmac(&key, b"data", b"", &mut long).unwrap();
        assert_ne!(short[..], long[..32]);
    }

    #[test]
    fn test_kmac_customization_matters() {
        let key = sample_key(KeyMode::Kmac256);
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        kmac(&key, b"data", b"one", &mut first).unwrap();
        kmac(&key, b"data", b"two", &mut second).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_kmac_errors() {
        let key = sample_key(KeyMode::Kmac128);
        assert_eq!(
            kmac(&key, b"data", b"", &mut []),
            Err(CryptoError::SIZE_MISMATCH)
        );

        let hmac_key = sample_key(KeyMode::HmacSha256);
        let mut tag = [0u8; 32];
        assert_eq!(
            kmac(&hmac_key, b"data", b"", &mut tag),
            Err(CryptoError::UNSUPPORTED_KEY_MODE)
        );

        let tampered =
            BlindedKey::from_parts(*key.config(), key.keyblob().clone(), key.checksum() ^ 0x80)
                .unwrap();
        assert_eq!(
            kmac(&tampered, b"data", b"", &mut tag),
            Err(CryptoError::INTEGRITY_VIOLATION)
        );
        assert_eq!(tag, [0u8; 32]);
    }
}
