/*++

Licensed under the Apache-2.0 license.

File Name:

    init.rs

Abstract:

    File contains the one time initialization run before the first
    dispatched operation.

--*/

use core::sync::atomic::{AtomicBool, Ordering};
use cryptolib::cprintln;
use cryptolib_error::CryptoResult;

static KATS_PASSED: AtomicBool = AtomicBool::new(false);

/// Run the known answer tests
///
/// Safe to call more than once; after the first success it returns
/// immediately. A failure is not latched, so a later call runs the tests
/// again.
pub fn contsvc_init() -> CryptoResult<()> {
    if KATS_PASSED.load(Ordering::Acquire) {
        return Ok(());
    }
    cryptolib_kat::execute_all()?;
    KATS_PASSED.store(true, Ordering::Release);
    cprintln!("[contsvc] Known answer tests passed");
    Ok(())
}

/// Returns `true` once [`contsvc_init`] has succeeded.
pub fn is_initialized() -> bool {
    KATS_PASSED.load(Ordering::Acquire)
}
