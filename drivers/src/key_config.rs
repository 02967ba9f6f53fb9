/*++

Licensed under the Apache-2.0 license.

File Name:

    key_config.rs

Abstract:

    File contains the key configuration value object and its raw,
    word-sized serialized form.

--*/

use crate::hardened::HardenedBool;
use cryptolib_error::{CryptoError, CryptoResult};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Storage word size
pub const WORD_SIZE_BYTES: usize = core::mem::size_of::<u32>();

/// Largest unmasked key accepted by any key mode
pub const KEY_MAX_BYTES: usize = 128;

/// Largest unmasked key in words
pub const KEY_MAX_WORDS: usize = KEY_MAX_BYTES / WORD_SIZE_BYTES;

/// Largest hardware diversification input
pub const DIVERSIFICATION_MAX_BYTES: usize = 32;

/// Key format version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CryptoLibVersion {
    V1 = 0x7f4,
}

impl From<CryptoLibVersion> for u32 {
    /// Converts to this type from the input type.
    fn from(version: CryptoLibVersion) -> Self {
        version as Self
    }
}

impl TryFrom<u32> for CryptoLibVersion {
    type Error = CryptoError;

    fn try_from(value: u32) -> CryptoResult<Self> {
        match value {
            0x7f4 => Ok(Self::V1),
            _ => Err(CryptoError::INVALID_CONFIG),
        }
    }
}

/// Algorithm family a key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum KeyMode {
    HmacSha256 = 0x7f9,
    HmacSha384 = 0x2a1,
    HmacSha512 = 0x5c3,
    Kmac128 = 0x336,
    Kmac256 = 0x4ec,
}

impl KeyMode {
    /// Returns `true` if `len` bytes is in the key size class of this mode.
    pub fn is_valid_key_length(self, len: usize) -> bool {
        match self {
            Self::HmacSha256 => (1..=64).contains(&len),
            Self::HmacSha384 | Self::HmacSha512 => (1..=128).contains(&len),
            Self::Kmac128 => matches!(len, 16 | 24 | 32 | 48 | 64),
            Self::Kmac256 => matches!(len, 32 | 48 | 64),
        }
    }
}

impl From<KeyMode> for u32 {
    /// Converts to this type from the input type.
    fn from(mode: KeyMode) -> Self {
        mode as Self
    }
}

impl TryFrom<u32> for KeyMode {
    type Error = CryptoError;

    fn try_from(value: u32) -> CryptoResult<Self> {
        match value {
            0x7f9 => Ok(Self::HmacSha256),
            0x2a1 => Ok(Self::HmacSha384),
            0x5c3 => Ok(Self::HmacSha512),
            0x336 => Ok(Self::Kmac128),
            0x4ec => Ok(Self::Kmac256),
            _ => Err(CryptoError::INVALID_CONFIG),
        }
    }
}

/// Side-channel protection level requested for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SecurityLevel {
    Low = 0x1e9,
    Medium = 0xeab,
    High = 0xa7e,
}

impl From<SecurityLevel> for u32 {
    /// Converts to this type from the input type.
    fn from(level: SecurityLevel) -> Self {
        level as Self
    }
}

impl TryFrom<u32> for SecurityLevel {
    type Error = CryptoError;

    fn try_from(value: u32) -> CryptoResult<Self> {
        match value {
            0x1e9 => Ok(Self::Low),
            0xeab => Ok(Self::Medium),
            0xa7e => Ok(Self::High),
            _ => Err(CryptoError::INVALID_CONFIG),
        }
    }
}

/// Raw key configuration
///
/// Flat word-sized layout shared with callers outside the trust boundary.
/// It is also the exact byte sequence covered by the key checksum. Nothing
/// in here is trusted until converted into a [`KeyConfig`].
#[repr(C)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout,
)]
pub struct RawKeyConfig {
    pub version: u32,
    pub key_mode: u32,
    pub key_length: u32,
    pub hw_backed: u32,
    pub diversification_len: u32,
    pub diversification: [u8; DIVERSIFICATION_MAX_BYTES],
    pub exportable: u32,
    pub security_level: u32,
}

/// Validated key configuration
///
/// Immutable once constructed. Every constructor runs the same validation,
/// so holding a `KeyConfig` means the configuration is self-consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyConfig {
    raw: RawKeyConfig,
    version: CryptoLibVersion,
    key_mode: KeyMode,
    security_level: SecurityLevel,
    hw_backed: bool,
    exportable: bool,
}

impl KeyConfig {
    /// Create a software key configuration
    ///
    /// The key is not hardware-backed, not exportable and requests the low
    /// security level.
    ///
    /// # Arguments
    ///
    /// * `key_mode` - Algorithm family of the key
    /// * `key_length` - Length of the unmasked key in bytes
    pub fn new(key_mode: KeyMode, key_length: usize) -> CryptoResult<Self> {
        Self::try_from(RawKeyConfig {
            version: CryptoLibVersion::V1.into(),
            key_mode: key_mode.into(),
            key_length: Self::length_word(key_length)?,
            hw_backed: HardenedBool::FALSE.into(),
            diversification_len: 0,
            diversification: [0u8; DIVERSIFICATION_MAX_BYTES],
            exportable: HardenedBool::FALSE.into(),
            security_level: SecurityLevel::Low.into(),
        })
    }

    /// Create a hardware-backed key configuration
    ///
    /// # Arguments
    ///
    /// * `key_mode` - Algorithm family of the key
    /// * `key_length` - Length of the key held by hardware, in bytes
    /// * `diversification` - Diversification input for the hardware key
    pub fn new_hw_backed(
        key_mode: KeyMode,
        key_length: usize,
        diversification: &[u8],
    ) -> CryptoResult<Self> {
        let mut raw = Self::new(key_mode, key_length)?.raw;
        let dest = raw
            .diversification
            .get_mut(..diversification.len())
            .ok_or(CryptoError::INVALID_CONFIG)?;
        dest.copy_from_slice(diversification);
        raw.diversification_len = diversification.len() as u32;
        raw.hw_backed = HardenedBool::TRUE.into();
        Self::try_from(raw)
    }

    /// Return a copy of this configuration with a different exportable flag.
    pub fn with_exportable(self, exportable: bool) -> CryptoResult<Self> {
        let mut raw = self.raw;
        raw.exportable = HardenedBool::from(exportable).into();
        Self::try_from(raw)
    }

    /// Return a copy of this configuration with a different security level.
    pub fn with_security_level(self, level: SecurityLevel) -> CryptoResult<Self> {
        let mut raw = self.raw;
        raw.security_level = level.into();
        Self::try_from(raw)
    }

    pub fn version(&self) -> CryptoLibVersion {
        self.version
    }

    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    /// Length of the unmasked key in bytes
    pub fn key_length(&self) -> usize {
        self.raw.key_length as usize
    }

    pub fn is_hw_backed(&self) -> bool {
        self.hw_backed
    }

    pub fn is_exportable(&self) -> bool {
        self.exportable
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.security_level
    }

    /// Diversification input, empty for software keys
    pub fn diversification(&self) -> &[u8] {
        &self.raw.diversification[..self.raw.diversification_len as usize]
    }

    /// Serialized form of this configuration
    pub fn as_raw(&self) -> &RawKeyConfig {
        &self.raw
    }

    fn length_word(key_length: usize) -> CryptoResult<u32> {
        u32::try_from(key_length).map_err(|_| CryptoError::INVALID_LENGTH)
    }

    fn decode_bool(value: u32) -> CryptoResult<bool> {
        HardenedBool(value)
            .to_bool()
            .ok_or(CryptoError::INVALID_CONFIG)
    }
}

impl TryFrom<RawKeyConfig> for KeyConfig {
    type Error = CryptoError;

    fn try_from(raw: RawKeyConfig) -> CryptoResult<Self> {
        let version = CryptoLibVersion::try_from(raw.version)?;
        let key_mode = KeyMode::try_from(raw.key_mode)?;
        let security_level = SecurityLevel::try_from(raw.security_level)?;
        let hw_backed = Self::decode_bool(raw.hw_backed)?;
        let exportable = Self::decode_bool(raw.exportable)?;

        if !key_mode.is_valid_key_length(raw.key_length as usize) {
            return Err(CryptoError::INVALID_LENGTH);
        }

        // Diversification only feeds the hardware key derivation.
        let div_len = raw.diversification_len as usize;
        if div_len > DIVERSIFICATION_MAX_BYTES || (!hw_backed && div_len != 0) {
            return Err(CryptoError::INVALID_CONFIG);
        }
        if raw.diversification[div_len..].iter().any(|b| *b != 0) {
            return Err(CryptoError::INVALID_CONFIG);
        }

        // A key that lives only in hardware can never be exported.
        if hw_backed && exportable {
            return Err(CryptoError::INVALID_CONFIG);
        }

        Ok(Self {
            raw,
            version,
            key_mode,
            security_level,
            hw_backed,
            exportable,
        })
    }
}

impl From<KeyConfig> for RawKeyConfig {
    fn from(config: KeyConfig) -> Self {
        config.raw
    }
}
