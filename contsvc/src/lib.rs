/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the trusted operation dispatch table.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod abi;
mod context;
mod entry;
mod init;
mod table;

pub use abi::{
    ConstBuf, MutBuf, RawBlindedKey, RawEntropySource, RawHmacContext, RawUnblindedKey,
    HMAC_CONTEXT_WORDS,
};
pub use context::{HmacContextPool, HMAC_CONTEXTS, HMAC_CONTEXT_POOL_LEN};
pub use entry::*;
pub use init::{contsvc_init, is_initialized};
pub use table::{call, get, ContsvcFn, OpId, CONTSVC_TABLE, CONTSVC_TABLE_LEN, CONTSVC_TABLE_VERSION};
