/*++

Licensed under the Apache-2.0 license.

File Name:

    keyblob.rs

Abstract:

    File contains the keyblob masking engine. A keyblob stores a secret key
    as two XOR shares: `[key ^ mask, mask]`.

--*/

use crate::hardened::hardened_eq_words;
use crate::key_config::{KeyConfig, KEY_MAX_WORDS, WORD_SIZE_BYTES};
use cryptolib_error::{CryptoError, CryptoResult};
use zerocopy::IntoBytes;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Largest keyblob: two shares of the largest key
pub const KEYBLOB_MAX_WORDS: usize = 2 * KEY_MAX_WORDS;

/// Masked key storage
///
/// Holds both shares back to back. The buffer is wiped when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Keyblob {
    words: [u32; KEYBLOB_MAX_WORDS],
    len: usize,
}

impl Keyblob {
    /// Create a zero length keyblob
    pub const fn empty() -> Self {
        Self {
            words: [0u32; KEYBLOB_MAX_WORDS],
            len: 0,
        }
    }

    /// Copy a keyblob out of a word buffer
    ///
    /// # Arguments
    ///
    /// * `words` - Shares, back to back
    pub fn from_words(words: &[u32]) -> CryptoResult<Self> {
        let mut keyblob = Self::with_len(words.len())?;
        keyblob.as_words_mut().copy_from_slice(words);
        Ok(keyblob)
    }

    fn with_len(len: usize) -> CryptoResult<Self> {
        if len > KEYBLOB_MAX_WORDS {
            return Err(CryptoError::SIZE_MISMATCH);
        }
        let mut keyblob = Self::empty();
        keyblob.len = len;
        Ok(keyblob)
    }

    pub fn as_words(&self) -> &[u32] {
        &self.words[..self.len]
    }

    fn as_words_mut(&mut self) -> &mut [u32] {
        &mut self.words[..self.len]
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.as_words().as_bytes()
    }

    pub fn len_words(&self) -> usize {
        self.len
    }

    pub fn len_bytes(&self) -> usize {
        self.len * WORD_SIZE_BYTES
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Keyblob {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Keyblob {
    fn eq(&self, other: &Self) -> bool {
        hardened_eq_words(self.as_words(), other.as_words())
    }
}

impl Eq for Keyblob {}

impl core::fmt::Debug for Keyblob {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Keyblob")
            .field("len_words", &self.len)
            .finish_non_exhaustive()
    }
}

/// Number of words a keyblob occupies for the given configuration
///
/// Zero for hardware-backed keys, otherwise two shares.
pub fn num_words(config: &KeyConfig) -> usize {
    2 * share_num_words(config)
}

/// Number of words in one share for the given configuration
pub fn share_num_words(config: &KeyConfig) -> usize {
    if config.is_hw_backed() {
        0
    } else {
        config.key_length().div_ceil(WORD_SIZE_BYTES)
    }
}

/// Check that a keyblob has the length its configuration dictates.
pub fn check_len(keyblob: &Keyblob, config: &KeyConfig) -> CryptoResult<()> {
    if keyblob.len_words() != num_words(config) {
        return Err(CryptoError::SIZE_MISMATCH);
    }
    Ok(())
}

fn reject_hw_backed(config: &KeyConfig) -> CryptoResult<()> {
    if config.is_hw_backed() {
        return Err(CryptoError::INVALID_CONFIG);
    }
    Ok(())
}

/// Build a keyblob from a raw key and a mask
///
/// Share 0 is `key ^ mask`, share 1 is the mask. Key bytes are packed into
/// little-endian words and the last word is zero padded. Hardware-backed
/// configurations produce an empty keyblob.
///
/// # Arguments
///
/// * `key` - Raw key, exactly `key_length` bytes
/// * `mask` - Mask, at least one share of words
/// * `config` - Key configuration
pub fn from_key_and_mask(key: &[u8], mask: &[u32], config: &KeyConfig) -> CryptoResult<Keyblob> {
    if config.is_hw_backed() {
        return Ok(Keyblob::empty());
    }

    let share_words = share_num_words(config);
    if key.len() != config.key_length() || mask.len() < share_words {
        return Err(CryptoError::SIZE_MISMATCH);
    }

    let mut keyblob = Keyblob::with_len(2 * share_words)?;
    let (share0, share1) = keyblob.as_words_mut().split_at_mut(share_words);
    for ((dest, chunk), mask_word) in share0.iter_mut().zip(key.chunks(WORD_SIZE_BYTES)).zip(mask) {
        let mut word = Zeroizing::new([0u8; WORD_SIZE_BYTES]);
        word[..chunk.len()].copy_from_slice(chunk);
        *dest = u32::from_le_bytes(*word) ^ mask_word;
    }
    share1.copy_from_slice(&mask[..share_words]);

    Ok(keyblob)
}

/// Split a keyblob into its two shares
///
/// The returned slices borrow from the keyblob.
pub fn to_shares<'a>(
    keyblob: &'a Keyblob,
    config: &KeyConfig,
) -> CryptoResult<(&'a [u32], &'a [u32])> {
    reject_hw_backed(config)?;
    check_len(keyblob, config)?;
    Ok(keyblob.as_words().split_at(share_num_words(config)))
}

/// Build a keyblob from two shares
///
/// # Arguments
///
/// * `share0` - First share, exactly one share of words
/// * `share1` - Second share, exactly one share of words
/// * `config` - Key configuration
pub fn from_shares(share0: &[u32], share1: &[u32], config: &KeyConfig) -> CryptoResult<Keyblob> {
    reject_hw_backed(config)?;

    let share_words = share_num_words(config);
    if share0.len() != share_words || share1.len() != share_words {
        return Err(CryptoError::SIZE_MISMATCH);
    }

    let mut keyblob = Keyblob::with_len(2 * share_words)?;
    let (dest0, dest1) = keyblob.as_words_mut().split_at_mut(share_words);
    dest0.copy_from_slice(share0);
    dest1.copy_from_slice(share1);
    Ok(keyblob)
}

/// Recombine the shares into the raw key
///
/// # Arguments
///
/// * `keyblob` - Masked key
/// * `config` - Key configuration
/// * `key` - Caller owned scratch buffer, exactly `key_length` bytes
pub fn unmask(keyblob: &Keyblob, config: &KeyConfig, key: &mut [u8]) -> CryptoResult<()> {
    let (share0, share1) = to_shares(keyblob, config)?;
    if key.len() != config.key_length() {
        return Err(CryptoError::SIZE_MISMATCH);
    }

    for ((chunk, s0), s1) in key.chunks_mut(WORD_SIZE_BYTES).zip(share0).zip(share1) {
        let word = Zeroizing::new((s0 ^ s1).to_le_bytes());
        chunk.copy_from_slice(&word[..chunk.len()]);
    }
    Ok(())
}

/// Replace the mask of a keyblob in place
///
/// Share 0 first absorbs the new mask and only then drops the old one, so
/// no intermediate value equals the plaintext key.
///
/// # Arguments
///
/// * `keyblob` - Masked key
/// * `mask` - New mask, at least one share of words
/// * `config` - Key configuration
pub fn remask(keyblob: &mut Keyblob, mask: &[u32], config: &KeyConfig) -> CryptoResult<()> {
    reject_hw_backed(config)?;
    check_len(keyblob, config)?;

    let share_words = share_num_words(config);
    if mask.len() < share_words {
        return Err(CryptoError::SIZE_MISMATCH);
    }

    let (share0, share1) = keyblob.as_words_mut().split_at_mut(share_words);
    for ((s0, s1), new_mask) in share0.iter_mut().zip(share1.iter_mut()).zip(mask) {
        *s0 ^= *new_mask;
        *s0 ^= *s1;
        *s1 = *new_mask;
    }
    Ok(())
}
