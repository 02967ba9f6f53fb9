/*++

Licensed under the Apache-2.0 license.

File Name:

    table.rs

Abstract:

    File contains the ordinal indexed dispatch table.

--*/

use crate::entry::*;
use crate::init::contsvc_init;
use cryptolib::cprintln;
use cryptolib_error::CryptoError;

/// Layout version of the dispatch table. Bumped when entries are appended.
pub const CONTSVC_TABLE_VERSION: u32 = 1;

pub const CONTSVC_TABLE_LEN: usize = 18;

/// Uniform entry signature. Returns `0` on success or the error code.
pub type ContsvcFn = unsafe extern "C" fn(usize, usize, usize, usize) -> u32;

/// Dispatch table ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpId(pub u32);

impl OpId {
    pub const SELF_TEST: Self = Self(0);
    pub const KEYBLOB_NUM_WORDS: Self = Self(1);
    pub const KEYBLOB_SHARE_NUM_WORDS: Self = Self(2);
    pub const KEYBLOB_TO_SHARES: Self = Self(3);
    pub const KEYBLOB_FROM_SHARES: Self = Self(4);
    pub const KEYBLOB_FROM_KEY_AND_MASK: Self = Self(5);
    pub const KEYBLOB_REMASK: Self = Self(6);
    pub const MAC_KEYGEN: Self = Self(7);
    pub const HMAC: Self = Self(8);
    pub const KMAC: Self = Self(9);
    pub const HMAC_INIT: Self = Self(10);
    pub const HMAC_UPDATE: Self = Self(11);
    pub const HMAC_FINAL: Self = Self(12);
    pub const UNBLINDED_CHECKSUM: Self = Self(13);
    pub const BLINDED_CHECKSUM: Self = Self(14);
    pub const UNBLINDED_KEY_CHECK: Self = Self(15);
    pub const BLINDED_KEY_CHECK: Self = Self(16);
    pub const HMAC_FUNCTEST: Self = Self(17);
}

impl From<u32> for OpId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<OpId> for u32 {
    fn from(value: OpId) -> Self {
        value.0
    }
}

#[used]
#[cfg_attr(target_os = "none", link_section = ".contsvc_hdr")]
pub static CONTSVC_TABLE: [ContsvcFn; CONTSVC_TABLE_LEN] = [
    contsvc_self_test,
    // Keyblob
    contsvc_keyblob_num_words,
    contsvc_keyblob_share_num_words,
    contsvc_keyblob_to_shares,
    contsvc_keyblob_from_shares,
    contsvc_keyblob_from_key_and_mask,
    contsvc_keyblob_remask,
    // MAC
    contsvc_mac_keygen,
    contsvc_hmac,
    contsvc_kmac,
    contsvc_hmac_init,
    contsvc_hmac_update,
    contsvc_hmac_final,
    // Integrity
    contsvc_unblinded_checksum,
    contsvc_blinded_checksum,
    contsvc_unblinded_key_check,
    contsvc_blinded_key_check,
    contsvc_hmac_functest,
];

/// Look up the entry for an ordinal.
pub fn get(id: OpId) -> Option<ContsvcFn> {
    CONTSVC_TABLE.get(id.0 as usize).copied()
}

/// Invoke the entry for an ordinal
///
/// Runs [`contsvc_init`] first if it has not yet succeeded; a known answer
/// test failure is reported in place of the operation. Unknown ordinals
/// report `CONTSVC_INVALID_INDEX`.
///
/// # Safety
///
/// `args` must satisfy the contract of the selected entry.
pub unsafe fn call(id: OpId, args: [usize; 4]) -> u32 {
    if let Err(err) = contsvc_init() {
        cprintln!("[contsvc] Initialization failed");
        return err.into();
    }
    match get(id) {
        Some(entry) => entry(args[0], args[1], args[2], args[3]),
        None => {
            cprintln!("[contsvc] Invalid operation index {}", id.0);
            CryptoError::CONTSVC_INVALID_INDEX.into()
        }
    }
}
