/*++

Licensed under the Apache-2.0 license.

File Name:

    abi.rs

Abstract:

    File contains the by-pointer structures exchanged across the dispatch
    table. Nothing here is trusted until converted into engine types.

--*/

use core::ffi::c_void;
use crate::context::HMAC_CONTEXTS;
use core::mem::{align_of, size_of};
use cryptolib::{EntropySource, RawKeyConfig, WORD_SIZE_BYTES};
use cryptolib_error::{CryptoError, CryptoResult};

/// Borrow `len` elements at `ptr`
///
/// A zero length yields an empty slice whatever the pointer. Otherwise the
/// pointer must be non-null and aligned for `T`.
///
/// # Safety
///
/// A non-empty region must be valid for reads for the returned lifetime.
pub(crate) unsafe fn slice_ref<'a, T>(ptr: *const T, len: usize) -> CryptoResult<&'a [T]> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() || (ptr as usize) % align_of::<T>() != 0 {
        return Err(CryptoError::BAD_ARGS);
    }
    Ok(core::slice::from_raw_parts(ptr, len))
}

/// Mutably borrow `len` elements at `ptr`
///
/// # Safety
///
/// A non-empty region must be valid for writes and unaliased for the
/// returned lifetime.
pub(crate) unsafe fn slice_mut<'a, T>(ptr: *mut T, len: usize) -> CryptoResult<&'a mut [T]> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() || (ptr as usize) % align_of::<T>() != 0 {
        return Err(CryptoError::BAD_ARGS);
    }
    Ok(core::slice::from_raw_parts_mut(ptr, len))
}

/// Read-only byte buffer
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ConstBuf {
    pub data: *const u8,
    pub len: usize,
}

impl ConstBuf {
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: data.as_ptr(),
            len: data.len(),
        }
    }

    /// # Safety
    ///
    /// `data` must be valid for `len` bytes of reads.
    pub(crate) unsafe fn as_slice<'a>(&self) -> CryptoResult<&'a [u8]> {
        slice_ref(self.data, self.len)
    }
}

/// Writable byte buffer
#[repr(C)]
#[derive(Debug)]
pub struct MutBuf {
    pub data: *mut u8,
    pub len: usize,
}

impl MutBuf {
    pub fn from_slice(data: &mut [u8]) -> Self {
        Self {
            data: data.as_mut_ptr(),
            len: data.len(),
        }
    }

    /// # Safety
    ///
    /// `data` must be valid for `len` bytes of writes.
    pub(crate) unsafe fn as_mut_slice<'a>(&self) -> CryptoResult<&'a mut [u8]> {
        slice_mut(self.data, self.len)
    }
}

/// Blinded key as laid out across the dispatch table
#[repr(C)]
#[derive(Debug)]
pub struct RawBlindedKey {
    pub config: RawKeyConfig,

    /// Keyblob length in bytes
    pub keyblob_length: usize,

    pub keyblob: *mut u32,
    pub checksum: u32,
}

impl RawBlindedKey {
    /// Describe a caller owned keyblob buffer; the checksum starts at zero.
    pub fn new(config: RawKeyConfig, keyblob: &mut [u32]) -> Self {
        Self {
            config,
            keyblob_length: keyblob.len() * WORD_SIZE_BYTES,
            keyblob: keyblob.as_mut_ptr(),
            checksum: 0,
        }
    }
}

/// Unblinded key as laid out across the dispatch table
#[repr(C)]
#[derive(Debug)]
pub struct RawUnblindedKey {
    pub config: RawKeyConfig,

    /// Key length in bytes
    pub key_length: usize,

    pub key: *const u32,
    pub checksum: u32,
}

impl RawUnblindedKey {
    pub fn new(config: RawKeyConfig, key: &[u32], checksum: u32) -> Self {
        Self {
            key_length: config.key_length as usize,
            config,
            key: key.as_ptr(),
            checksum,
        }
    }
}

/// Caller supplied entropy callback
///
/// `fill` writes `len` random words to its second argument and returns zero
/// on success.
#[repr(C)]
#[derive(Debug)]
pub struct RawEntropySource {
    pub ctx: *mut c_void,
    pub fill: Option<unsafe extern "C" fn(*mut c_void, *mut u32, usize) -> u32>,
}

impl RawEntropySource {
    pub fn new(
        ctx: *mut c_void,
        fill: unsafe extern "C" fn(*mut c_void, *mut u32, usize) -> u32,
    ) -> Self {
        Self {
            ctx,
            fill: Some(fill),
        }
    }
}

impl EntropySource for RawEntropySource {
    fn fill_words(&mut self, dest: &mut [u32]) -> CryptoResult<()> {
        let fill = self.fill.ok_or(CryptoError::BAD_ARGS)?;
        if dest.is_empty() {
            return Ok(());
        }
        // SAFETY: `dest` is a live, exclusively borrowed buffer of `len` words.
        let status = unsafe { fill(self.ctx, dest.as_mut_ptr(), dest.len()) };
        if status != 0 {
            return Err(CryptoError::ENTROPY_FAILURE);
        }
        Ok(())
    }
}

/// Handle to a streaming HMAC operation
///
/// The context itself lives in the engine. A handle names a pool slot and
/// the generation it was issued for; it goes stale when the operation is
/// finalized or restarted. The all-zero handle names nothing.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawHmacContext {
    pub index: u32,
    pub generation: u32,
}

/// Size of [`RawHmacContext`] in words
pub const HMAC_CONTEXT_WORDS: usize = 2;

const _: () = assert!(size_of::<RawHmacContext>() == HMAC_CONTEXT_WORDS * WORD_SIZE_BYTES);

impl RawHmacContext {
    pub const fn new() -> Self {
        Self {
            index: 0,
            generation: 0,
        }
    }

    /// Returns `true` once initialized, until finalized.
    pub fn is_active(&self) -> bool {
        HMAC_CONTEXTS.is_active(self)
    }
}
