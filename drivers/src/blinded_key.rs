/*++

Licensed under the Apache-2.0 license.

File Name:

    blinded_key.rs

Abstract:

    File contains the blinded key: a configuration, a masked keyblob and
    the checksum that binds them.

--*/

use crate::entropy::EntropySource;
use crate::hardened::launder;
use crate::integrity::{blinded_checksum, blinded_key_check};
use crate::key_config::{KeyConfig, KEY_MAX_BYTES, KEY_MAX_WORDS};
use crate::keyblob::{self, Keyblob};
use cryptolib_error::{CryptoError, CryptoResult};
use zerocopy::IntoBytes;
use zeroize::{Zeroize, Zeroizing};

/// Blinded key
///
/// The plaintext key never leaves this type. Operations that need it go
/// through [`BlindedKey::with_key`], which verifies the checksum first and
/// wipes its scratch copy on every exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlindedKey {
    config: KeyConfig,
    keyblob: Keyblob,
    checksum: u32,
}

impl BlindedKey {
    fn stamp(config: KeyConfig, keyblob: Keyblob) -> Self {
        let checksum = blinded_checksum(&config, &keyblob);
        Self {
            config,
            keyblob,
            checksum,
        }
    }

    /// Mask a raw key and stamp the result
    ///
    /// # Arguments
    ///
    /// * `key` - Raw key, exactly `key_length` bytes
    /// * `mask` - Mask, at least one share of words
    /// * `config` - Key configuration
    pub fn from_key_and_mask(key: &[u8], mask: &[u32], config: KeyConfig) -> CryptoResult<Self> {
        let keyblob = keyblob::from_key_and_mask(key, mask, &config)?;
        Ok(Self::stamp(config, keyblob))
    }

    /// Build a blinded key from two existing shares and stamp the result.
    pub fn from_shares(share0: &[u32], share1: &[u32], config: KeyConfig) -> CryptoResult<Self> {
        let keyblob = keyblob::from_shares(share0, share1, &config)?;
        Ok(Self::stamp(config, keyblob))
    }

    /// Handle to a key held by hardware
    ///
    /// The keyblob is empty; only the configuration is stamped.
    pub fn hw_backed(config: KeyConfig) -> CryptoResult<Self> {
        if !config.is_hw_backed() {
            return Err(CryptoError::INVALID_CONFIG);
        }
        Ok(Self::stamp(config, Keyblob::empty()))
    }

    /// Mask a raw key with a fresh random mask
    ///
    /// # Arguments
    ///
    /// * `key` - Raw key, exactly `key_length` bytes
    /// * `config` - Key configuration
    /// * `entropy` - Mask source
    pub fn import(
        key: &[u8],
        config: KeyConfig,
        entropy: &mut impl EntropySource,
    ) -> CryptoResult<Self> {
        let mut mask = Zeroizing::new([0u32; KEY_MAX_WORDS]);
        let mask = &mut mask[..keyblob::share_num_words(&config)];
        entropy.fill_words(mask)?;
        Self::from_key_and_mask(key, mask, config)
    }

    /// Generate a random MAC key
    ///
    /// Key and mask are both drawn from `entropy`. Hardware-backed
    /// configurations yield a handle with an empty keyblob.
    ///
    /// # Arguments
    ///
    /// * `config` - Key configuration
    /// * `entropy` - Source for the key and the mask
    pub fn generate(config: KeyConfig, entropy: &mut impl EntropySource) -> CryptoResult<Self> {
        if config.is_hw_backed() {
            return Self::hw_backed(config);
        }

        let share_words = keyblob::share_num_words(&config);
        let mut key = Zeroizing::new([0u32; KEY_MAX_WORDS]);
        entropy.fill_words(&mut key[..share_words])?;

        let key_bytes = key.as_bytes();
        Self::import(&key_bytes[..config.key_length()], config, entropy)
    }

    /// Reassemble a blinded key from its stored parts
    ///
    /// The checksum is taken as given; it is verified on every use, not
    /// here.
    ///
    /// # Arguments
    ///
    /// * `config` - Key configuration
    /// * `keyblob` - Masked key material matching `config`
    /// * `checksum` - Previously stamped checksum
    pub fn from_parts(config: KeyConfig, keyblob: Keyblob, checksum: u32) -> CryptoResult<Self> {
        keyblob::check_len(&keyblob, &config)?;
        Ok(Self {
            config,
            keyblob,
            checksum,
        })
    }

    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    pub fn keyblob(&self) -> &Keyblob {
        &self.keyblob
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Returns `true` if the stored checksum matches the key.
    pub fn verify(&self) -> bool {
        blinded_key_check(self)
    }

    /// Verify the checksum, failing with `INTEGRITY_VIOLATION` on mismatch.
    pub fn check(&self) -> CryptoResult<()> {
        if !launder(self.verify()) {
            crate::cprintln!("[cryptolib] Blinded key integrity violation");
            return Err(CryptoError::INTEGRITY_VIOLATION);
        }
        Ok(())
    }

    /// Replace the mask without recombining the key
    ///
    /// # Arguments
    ///
    /// * `mask` - New mask, at least one share of words
    pub fn remask(&mut self, mask: &[u32]) -> CryptoResult<()> {
        self.check()?;
        keyblob::remask(&mut self.keyblob, mask, &self.config)?;
        self.checksum = blinded_checksum(&self.config, &self.keyblob);
        Ok(())
    }

    /// Replace the mask with a fresh random one.
    pub fn refresh(&mut self, entropy: &mut impl EntropySource) -> CryptoResult<()> {
        let mut mask = Zeroizing::new([0u32; KEY_MAX_WORDS]);
        let mask = &mut mask[..keyblob::share_num_words(&self.config)];
        entropy.fill_words(mask)?;
        self.remask(mask)
    }

    /// Run `f` with the unmasked key
    ///
    /// Fails with `INTEGRITY_VIOLATION` before unmasking if the checksum
    /// does not match, and with `INVALID_CONFIG` for hardware-backed keys.
    pub(crate) fn with_key<R>(
        &self,
        f: impl FnOnce(&[u8]) -> CryptoResult<R>,
    ) -> CryptoResult<R> {
        let mut scratch = Zeroizing::new([0u8; KEY_MAX_BYTES]);
        self.with_key_in(&mut scratch, f)
    }

    /// Unmask into `scratch`, run `f`, then wipe `scratch` whatever `f`
    /// returned.
    fn with_key_in<R>(
        &self,
        scratch: &mut [u8; KEY_MAX_BYTES],
        f: impl FnOnce(&[u8]) -> CryptoResult<R>,
    ) -> CryptoResult<R> {
        self.check()?;
        if self.config.is_hw_backed() {
            return Err(CryptoError::INVALID_CONFIG);
        }

        let key = scratch
            .get_mut(..self.config.key_length())
            .ok_or(CryptoError::INVALID_LENGTH)?;
        let result = match keyblob::unmask(&self.keyblob, &self.config, key) {
            Ok(()) => f(key),
            Err(err) => Err(err),
        };
        scratch.zeroize();
        result
    }
}
