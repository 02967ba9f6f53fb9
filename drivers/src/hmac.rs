/*++

Licensed under the Apache-2.0 license.

File Name:

    hmac.rs

Abstract:

    File contains the HMAC-SHA2 operations over blinded keys.

--*/

use crate::array::{Array4x12, Array4x16, Array4x8};
use crate::blinded_key::BlindedKey;
use crate::key_config::KeyMode;
use cryptolib_error::{CryptoError, CryptoResult};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HMAC hash function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmacMode {
    Sha256,
    Sha384,
    Sha512,
}

impl HmacMode {
    /// Hash function for a key mode, `UNSUPPORTED_KEY_MODE` for KMAC keys.
    pub fn from_key_mode(key_mode: KeyMode) -> CryptoResult<Self> {
        match key_mode {
            KeyMode::HmacSha256 => Ok(Self::Sha256),
            KeyMode::HmacSha384 => Ok(Self::Sha384),
            KeyMode::HmacSha512 => Ok(Self::Sha512),
            KeyMode::Kmac128 | KeyMode::Kmac256 => Err(CryptoError::UNSUPPORTED_KEY_MODE),
        }
    }

    /// Tag length in bytes
    pub fn tag_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// HMAC output
#[derive(Debug)]
pub enum HmacTag<'a> {
    /// HMAC-SHA256 tag as big-endian words
    Sha256(&'a mut Array4x8),

    /// HMAC-SHA384 tag as big-endian words
    Sha384(&'a mut Array4x12),

    /// HMAC-SHA512 tag as big-endian words
    Sha512(&'a mut Array4x16),

    /// Tag bytes, the buffer length must equal the tag length
    Bytes(&'a mut [u8]),
}

impl HmacTag<'_> {
    fn check(&self, mode: HmacMode) -> CryptoResult<()> {
        match (self, mode) {
            (Self::Sha256(_), HmacMode::Sha256)
            | (Self::Sha384(_), HmacMode::Sha384)
            | (Self::Sha512(_), HmacMode::Sha512) => Ok(()),
            (Self::Bytes(buf), mode) if buf.len() == mode.tag_len() => Ok(()),
            _ => Err(CryptoError::SIZE_MISMATCH),
        }
    }

    fn write(&mut self, digest: &[u8]) -> CryptoResult<()> {
        let words: &mut [u32] = match self {
            Self::Sha256(arr) => &mut arr.0,
            Self::Sha384(arr) => &mut arr.0,
            Self::Sha512(arr) => &mut arr.0,
            Self::Bytes(buf) => {
                if buf.len() != digest.len() {
                    return Err(CryptoError::SIZE_MISMATCH);
                }
                buf.copy_from_slice(digest);
                return Ok(());
            }
        };
        if words.len() * 4 != digest.len() {
            return Err(CryptoError::SIZE_MISMATCH);
        }
        for (word, bytes) in words.iter_mut().zip(digest.chunks_exact(4)) {
            *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        Ok(())
    }
}

impl<'a> From<&'a mut Array4x8> for HmacTag<'a> {
    fn from(value: &'a mut Array4x8) -> Self {
        Self::Sha256(value)
    }
}

impl<'a> From<&'a mut Array4x12> for HmacTag<'a> {
    fn from(value: &'a mut Array4x12) -> Self {
        Self::Sha384(value)
    }
}

impl<'a> From<&'a mut Array4x16> for HmacTag<'a> {
    fn from(value: &'a mut Array4x16) -> Self {
        Self::Sha512(value)
    }
}

impl<'a> From<&'a mut [u8]> for HmacTag<'a> {
    fn from(value: &'a mut [u8]) -> Self {
        Self::Bytes(value)
    }
}

enum HmacState {
    Sha256(Hmac<Sha256>),
    Sha384(Hmac<Sha384>),
    Sha512(Hmac<Sha512>),
}

impl HmacState {
    fn new(mode: HmacMode, key: &[u8]) -> CryptoResult<Self> {
        let state = match mode {
            HmacMode::Sha256 => Self::Sha256(
                <Hmac<Sha256> as Mac>::new_from_slice(key)
                    .map_err(|_| CryptoError::INVALID_LENGTH)?,
            ),
            HmacMode::Sha384 => Self::Sha384(
                <Hmac<Sha384> as Mac>::new_from_slice(key)
                    .map_err(|_| CryptoError::INVALID_LENGTH)?,
            ),
            HmacMode::Sha512 => Self::Sha512(
                <Hmac<Sha512> as Mac>::new_from_slice(key)
                    .map_err(|_| CryptoError::INVALID_LENGTH)?,
            ),
        };
        Ok(state)
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(mac) => mac.update(data),
            Self::Sha384(mac) => mac.update(data),
            Self::Sha512(mac) => mac.update(data),
        }
    }

    fn finalize(self, tag: &mut HmacTag) -> CryptoResult<()> {
        match self {
            Self::Sha256(mac) => tag.write(&mac.finalize().into_bytes()),
            Self::Sha384(mac) => tag.write(&mac.finalize().into_bytes()),
            Self::Sha512(mac) => tag.write(&mac.finalize().into_bytes()),
        }
    }
}

/// Key checks shared by the one-shot and streaming operations
fn hmac_mode(key: &BlindedKey, tag: Option<&HmacTag>) -> CryptoResult<HmacMode> {
    key.check()?;
    let mode = HmacMode::from_key_mode(key.config().key_mode())?;
    if let Some(tag) = tag {
        tag.check(mode)?;
    }
    Ok(mode)
}

/// Calculate the HMAC of a message
///
/// The hash function follows the key mode. The key checksum is verified
/// before anything is unmasked.
///
/// # Arguments
///
/// * `key` - Blinded HMAC key
/// * `data` - Message
/// * `tag` - Output buffer sized for the key mode
pub fn hmac(key: &BlindedKey, data: &[u8], mut tag: HmacTag) -> CryptoResult<()> {
    let mode = hmac_mode(key, Some(&tag))?;
    let mut state = key.with_key(|raw| HmacState::new(mode, raw))?;
    state.update(data);
    state.finalize(&mut tag)
}

/// Streaming HMAC operation
///
/// Deliberately not `Clone`. Once finalized the context rejects every
/// further call with `INVALID_STATE`.
pub struct HmacContext {
    state: Option<HmacState>,
    mode: HmacMode,
}

impl core::fmt::Debug for HmacContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HmacContext")
            .field("mode", &self.mode)
            .field("finalized", &self.is_finalized())
            .finish()
    }
}

impl HmacContext {
    /// Start a streaming HMAC operation
    ///
    /// # Arguments
    ///
    /// * `key` - Blinded HMAC key
    pub fn init(key: &BlindedKey) -> CryptoResult<Self> {
        let mode = hmac_mode(key, None)?;
        let state = key.with_key(|raw| HmacState::new(mode, raw))?;
        Ok(Self {
            state: Some(state),
            mode,
        })
    }

    /// Absorb the next message chunk.
    pub fn update(&mut self, data: &[u8]) -> CryptoResult<()> {
        let state = self.state.as_mut().ok_or(CryptoError::INVALID_STATE)?;
        state.update(data);
        Ok(())
    }

    /// Write the tag and close the context
    ///
    /// A tag buffer of the wrong size leaves the context open.
    pub fn finalize(&mut self, mut tag: HmacTag) -> CryptoResult<()> {
        if self.state.is_none() {
            return Err(CryptoError::INVALID_STATE);
        }
        tag.check(self.mode)?;
        let state = self.state.take().ok_or(CryptoError::INVALID_STATE)?;
        state.finalize(&mut tag)
    }

    pub fn mode(&self) -> HmacMode {
        self.mode
    }

    pub fn is_finalized(&self) -> bool {
        self.state.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_config::KeyConfig;

    const TC1_TAG: [u8; 32] = [
        0xb0, 0x34, 0x4c, 0x61, 0xd8, 0xdb, 0x38, 0x53, 0x5c, 0xa8, 0xaf, 0xce, 0xaf, 0x0b, 0xf1,
        0x2b, 0x88, 0x1d, 0xc2, 0x00, 0xc9, 0x83, 0x3d, 0xa7, 0x26, 0xe9, 0x37, 0x6c, 0x2e, 0x32,
        0xcf, 0xf7,
    ];

    fn tc1_key() -> BlindedKey {
        let config = KeyConfig::new(KeyMode::HmacSha256, 20).unwrap();
        BlindedKey::from_key_and_mask(&[0x0b; 20], &[0x1357_9bdf; 5], config).unwrap()
    }

    #[test]
    fn test_hmac_sha256_tc1() {
        let mut tag = Array4x8::default();
        hmac(&tc1_key(), b"Hi There", (&mut tag).into()).unwrap();
        assert_eq!(tag, Array4x8::from(TC1_TAG));
    }

    #[test]
    fn test_hmac_bytes_tag() {
        let mut tag = [0u8; 32];
        hmac(&tc1_key(), b"Hi There", (&mut tag[..]).into()).unwrap();
        assert_eq!(tag, TC1_TAG);

        let mut short = [0u8; 31];
        assert_eq!(
            hmac(&tc1_key(), b"Hi There", (&mut short[..]).into()),
            Err(CryptoError::SIZE_MISMATCH)
        );
    }

    #[test]
    fn test_hmac_wrong_tag_variant() {
        let mut tag = Array4x12::default();
        assert_eq!(
            hmac(&tc1_key(), b"Hi There", (&mut tag).into()),
            Err(CryptoError::SIZE_MISMATCH)
        );
    }

    #[test]
    fn test_hmac_sha384_and_sha512_lengths() {
        let config = KeyConfig::new(KeyMode::HmacSha384, 48).unwrap();
        let key = BlindedKey::from_key_and_mask(&[0x5a; 48], &[9; 12], config).unwrap();
        let mut tag384 = Array4x12::default();
        hmac(&key, b"abc", (&mut tag384).into()).unwrap();
        assert_ne!(tag384, Array4x12::default());

        let config = KeyConfig::new(KeyMode::HmacSha512, 64).unwrap();
        let key = BlindedKey::from_key_and_mask(&[0x5a; 64], &[9; 16], config).unwrap();
        let mut tag512 = Array4x16::default();
        hmac(&key, b"abc", (&mut tag512).into()).unwrap();
        assert_ne!(tag512, Array4x16::default());
    }

    #[test]
    fn test_hmac_rejects_kmac_key() {
        let config = KeyConfig::new(KeyMode::Kmac128, 16).unwrap();
        let key = BlindedKey::from_key_and_mask(&[0; 16], &[0; 4], config).unwrap();
        let mut tag = Array4x8::default();
        assert_eq!(
            hmac(&key, b"", (&mut tag).into()),
            Err(CryptoError::UNSUPPORTED_KEY_MODE)
        );
        assert_eq!(
            HmacContext::init(&key).map(|_| ()),
            Err(CryptoError::UNSUPPORTED_KEY_MODE)
        );
    }

    #[test]
    fn test_hmac_rejects_tampered_key() {
        let key = tc1_key();
        let tampered =
            BlindedKey::from_parts(*key.config(), key.keyblob().clone(), !key.checksum()).unwrap();
        let mut tag = Array4x8::default();
        assert_eq!(
            hmac(&tampered, b"Hi There", (&mut tag).into()),
            Err(CryptoError::INTEGRITY_VIOLATION)
        );
        assert_eq!(tag, Array4x8::default());
    }

    #[test]
    fn test_hmac_rejects_hw_backed_key() {
        let config = KeyConfig::new_hw_backed(KeyMode::HmacSha256, 32, &[]).unwrap();
        let key = BlindedKey::hw_backed(config).unwrap();
        let mut tag = Array4x8::default();
        assert_eq!(
            hmac(&key, b"", (&mut tag).into()),
            Err(CryptoError::INVALID_CONFIG)
        );
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let mut ctx = HmacContext::init(&tc1_key()).unwrap();
        assert_eq!(ctx.mode(), HmacMode::Sha256);
        ctx.update(b"Hi ").unwrap();
        ctx.update(b"").unwrap();
        ctx.update(b"There").unwrap();
        let mut tag = Array4x8::default();
        ctx.finalize((&mut tag).into()).unwrap();
        assert_eq!(tag, Array4x8::from(TC1_TAG));
        assert!(ctx.is_finalized());
    }

    #[test]
    fn test_finalized_context_rejected() {
        let mut ctx = HmacContext::init(&tc1_key()).unwrap();
        let mut tag = Array4x8::default();
        ctx.finalize((&mut tag).into()).unwrap();
        assert_eq!(ctx.update(b"more"), Err(CryptoError::INVALID_STATE));
        assert_eq!(
            ctx.finalize((&mut tag).into()),
            Err(CryptoError::INVALID_STATE)
        );
    }

    #[test]
    fn test_wrong_tag_leaves_context_open() {
        let mut ctx = HmacContext::init(&tc1_key()).unwrap();
        ctx.update(b"Hi There").unwrap();
        let mut wrong = Array4x16::default();
        assert_eq!(
            ctx.finalize((&mut wrong).into()),
            Err(CryptoError::SIZE_MISMATCH)
        );
        assert!(!ctx.is_finalized());
        let mut tag = Array4x8::default();
        ctx.finalize((&mut tag).into()).unwrap();
        assert_eq!(tag, Array4x8::from(TC1_TAG));
    }
}
