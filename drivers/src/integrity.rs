/*++

Licensed under the Apache-2.0 license.

File Name:

    integrity.rs

Abstract:

    File contains the key integrity checksum. The checksum only covers
    public metadata and masked key material; it detects corruption, it
    does not authenticate the key.

--*/

use crate::blinded_key::BlindedKey;
use crate::hardened::hardened_eq_u32;
use crate::key_config::KeyConfig;
use crate::keyblob::Keyblob;
use crate::unblinded_key::UnblindedKey;
use zerocopy::IntoBytes;

/// Reflected CRC-32 (IEEE 802.3) polynomial
const CRC32_POLY: u32 = 0xedb8_8320;

/// Running CRC-32 accumulator
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    ctx: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    pub const fn new() -> Self {
        Self { ctx: 0xffff_ffff }
    }

    /// Add one byte to the checksum
    pub fn add8(&mut self, byte: u8) {
        self.ctx ^= byte as u32;
        for _ in 0..8 {
            let mask = 0u32.wrapping_sub(self.ctx & 1);
            self.ctx = (self.ctx >> 1) ^ (CRC32_POLY & mask);
        }
    }

    /// Add one word to the checksum, least significant byte first
    pub fn add32(&mut self, word: u32) {
        for byte in word.to_le_bytes() {
            self.add8(byte);
        }
    }

    /// Add a byte buffer to the checksum
    pub fn add(&mut self, data: &[u8]) {
        for byte in data {
            self.add8(*byte);
        }
    }

    pub fn finish(self) -> u32 {
        !self.ctx
    }
}

fn add_config(crc: &mut Crc32, config: &KeyConfig) {
    crc.add(config.as_raw().as_bytes());
}

/// Calculate the checksum of a blinded key's public fields
///
/// Covers every configuration field, the keyblob length and the masked
/// keyblob words.
///
/// # Arguments
///
/// * `config` - Key configuration
/// * `keyblob` - Masked key material
pub fn blinded_checksum(config: &KeyConfig, keyblob: &Keyblob) -> u32 {
    let mut crc = Crc32::new();
    add_config(&mut crc, config);
    crc.add32(keyblob.len_bytes() as u32);
    for word in keyblob.as_words() {
        crc.add32(*word);
    }
    crc.finish()
}

/// Calculate the checksum of an unblinded key
///
/// # Arguments
///
/// * `config` - Key configuration
/// * `key` - Plain key words
pub fn unblinded_checksum(config: &KeyConfig, key: &[u32]) -> u32 {
    let mut crc = Crc32::new();
    add_config(&mut crc, config);
    crc.add32(core::mem::size_of_val(key) as u32);
    for word in key {
        crc.add32(*word);
    }
    crc.finish()
}

/// Recompute and compare a blinded key's checksum
///
/// The comparison does not exit early on the first differing byte.
pub fn blinded_key_check(key: &BlindedKey) -> bool {
    let expected = blinded_checksum(key.config(), key.keyblob());
    hardened_eq_u32(expected, key.checksum())
}

/// Recompute and compare an unblinded key's checksum
pub fn unblinded_key_check(key: &UnblindedKey) -> bool {
    let expected = unblinded_checksum(key.config(), key.as_words());
    hardened_eq_u32(expected, key.checksum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardened::HardenedBool;
    use crate::key_config::{KeyMode, RawKeyConfig, SecurityLevel};
    use crate::keyblob;

    #[test]
    fn test_crc32_check_value() {
        let mut crc = Crc32::new();
        crc.add(b"123456789");
        assert_eq!(crc.finish(), 0xcbf4_3926);
    }

    #[test]
    fn test_crc32_words_match_bytes() {
        let mut by_word = Crc32::new();
        by_word.add32(0x4433_2211);
        let mut by_byte = Crc32::new();
        by_byte.add(&[0x11, 0x22, 0x33, 0x44]);
        assert_eq!(by_word.finish(), by_byte.finish());
    }

    #[test]
    fn test_checksum_deterministic() {
        let config = KeyConfig::new(KeyMode::HmacSha256, 32).unwrap();
        let keyblob = keyblob::from_key_and_mask(&[0u8; 32], &[0x0101_0101; 8], &config).unwrap();
        let first = blinded_checksum(&config, &keyblob);
        assert_eq!(first, blinded_checksum(&config, &keyblob));
        assert_eq!(first, blinded_checksum(&config.clone(), &keyblob.clone()));
    }

    #[test]
    fn test_checksum_sensitive_to_every_config_field() {
        let base = KeyConfig::new(KeyMode::Kmac256, 32).unwrap();
        let keyblob = Keyblob::from_words(&[0x5a5a_5a5a; 16]).unwrap();
        let reference = blinded_checksum(&base, &keyblob);

        let variants: [fn(&mut RawKeyConfig); 5] = [
            |raw| raw.key_mode = KeyMode::Kmac128.into(),
            |raw| raw.key_length = 48,
            |raw| raw.exportable = HardenedBool::TRUE.into(),
            |raw| raw.security_level = SecurityLevel::Medium.into(),
            |raw| raw.security_level = SecurityLevel::High.into(),
        ];
        for mutate in variants {
            let mut raw = *base.as_raw();
            mutate(&mut raw);
            let other = KeyConfig::try_from(raw).unwrap();
            assert_ne!(blinded_checksum(&other, &keyblob), reference);
        }

        let hw = KeyConfig::new_hw_backed(KeyMode::Kmac256, 32, &[]).unwrap();
        let hw_div = KeyConfig::new_hw_backed(KeyMode::Kmac256, 32, &[1]).unwrap();
        assert_ne!(blinded_checksum(&hw, &keyblob), reference);
        assert_ne!(
            blinded_checksum(&hw, &Keyblob::empty()),
            blinded_checksum(&hw_div, &Keyblob::empty())
        );
    }

    #[test]
    fn test_checksum_sensitive_to_keyblob() {
        let config = KeyConfig::new(KeyMode::HmacSha256, 8).unwrap();
        let keyblob = Keyblob::from_words(&[1, 2, 3, 4]).unwrap();
        let reference = blinded_checksum(&config, &keyblob);

        for idx in 0..4 {
            for bit in [0, 7, 31] {
                let mut words = [1u32, 2, 3, 4];
                words[idx] ^= 1 << bit;
                let flipped = Keyblob::from_words(&words).unwrap();
                assert_ne!(blinded_checksum(&config, &flipped), reference);
            }
        }
    }

    #[test]
    fn test_unblinded_checksum_differs_from_blinded() {
        let config = KeyConfig::new(KeyMode::HmacSha256, 8).unwrap();
        let words = [0xdead_beef, 0x0bad_f00d];
        assert_eq!(
            unblinded_checksum(&config, &words),
            unblinded_checksum(&config, &words)
        );
        assert_ne!(
            unblinded_checksum(&config, &words),
            unblinded_checksum(&config, &[0xdead_beef, 0x0bad_f00c])
        );
    }
}
