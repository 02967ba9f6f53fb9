/*++

Licensed under the Apache-2.0 license.

File Name:

    unblinded_key.rs

Abstract:

    File contains the unblinded key: plain key words carrying the same
    integrity checksum as a blinded key.

--*/

use crate::integrity::{unblinded_checksum, unblinded_key_check};
use crate::key_config::{KeyConfig, KEY_MAX_WORDS, WORD_SIZE_BYTES};
use cryptolib_error::{CryptoError, CryptoResult};

/// Unblinded key
///
/// Holds public or otherwise non-secret key material in the clear, for
/// example a verification key that only needs integrity protection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnblindedKey {
    config: KeyConfig,
    words: [u32; KEY_MAX_WORDS],
    len: usize,
    checksum: u32,
}

impl UnblindedKey {
    fn validate(config: &KeyConfig, words: &[u32]) -> CryptoResult<[u32; KEY_MAX_WORDS]> {
        if config.is_hw_backed() {
            return Err(CryptoError::INVALID_CONFIG);
        }
        if words.len() != config.key_length().div_ceil(WORD_SIZE_BYTES) {
            return Err(CryptoError::SIZE_MISMATCH);
        }
        let mut buf = [0u32; KEY_MAX_WORDS];
        buf.get_mut(..words.len())
            .ok_or(CryptoError::SIZE_MISMATCH)?
            .copy_from_slice(words);
        Ok(buf)
    }

    /// Create and stamp an unblinded key
    ///
    /// # Arguments
    ///
    /// * `config` - Key configuration, must not be hardware-backed
    /// * `words` - Key words, exactly `ceil(key_length / 4)` of them
    pub fn new(config: KeyConfig, words: &[u32]) -> CryptoResult<Self> {
        let buf = Self::validate(&config, words)?;
        Ok(Self {
            config,
            words: buf,
            len: words.len(),
            checksum: unblinded_checksum(&config, words),
        })
    }

    /// Reassemble an unblinded key with a previously stamped checksum.
    pub fn from_parts(config: KeyConfig, words: &[u32], checksum: u32) -> CryptoResult<Self> {
        let buf = Self::validate(&config, words)?;
        Ok(Self {
            config,
            words: buf,
            len: words.len(),
            checksum,
        })
    }

    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    pub fn as_words(&self) -> &[u32] {
        &self.words[..self.len]
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn verify(&self) -> bool {
        unblinded_key_check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_config::KeyMode;

    #[test]
    fn test_new() {
        let config = KeyConfig::new(KeyMode::HmacSha256, 6).unwrap();
        let key = UnblindedKey::new(config, &[0x0403_0201, 0x0605]).unwrap();
        assert_eq!(key.as_words(), &[0x0403_0201u32, 0x0605][..]);
        assert!(key.verify());
    }

    #[test]
    fn test_word_count() {
        let config = KeyConfig::new(KeyMode::HmacSha256, 6).unwrap();
        assert_eq!(
            UnblindedKey::new(config, &[1]),
            Err(CryptoError::SIZE_MISMATCH)
        );
        assert_eq!(
            UnblindedKey::new(config, &[1, 2, 3]),
            Err(CryptoError::SIZE_MISMATCH)
        );
    }

    #[test]
    fn test_hw_backed_rejected() {
        let config = KeyConfig::new_hw_backed(KeyMode::Kmac128, 16, &[]).unwrap();
        assert_eq!(
            UnblindedKey::new(config, &[0; 4]),
            Err(CryptoError::INVALID_CONFIG)
        );
    }

    #[test]
    fn test_tampered() {
        let config = KeyConfig::new(KeyMode::Kmac128, 16).unwrap();
        let key = UnblindedKey::new(config, &[1, 2, 3, 4]).unwrap();
        let moved = UnblindedKey::from_parts(config, &[1, 2, 3, 5], key.checksum()).unwrap();
        assert!(!moved.verify());
        let restored = UnblindedKey::from_parts(config, key.as_words(), key.checksum()).unwrap();
        assert!(restored.verify());
    }
}
