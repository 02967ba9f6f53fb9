/*++

Licensed under the Apache-2.0 license.

File Name:

    entropy.rs

Abstract:

    File contains the entropy source interface used for masks and keys.

--*/

use cryptolib_error::CryptoResult;

/// Source of random words
///
/// Implementations report a failure instead of returning weak output. A
/// failing source must leave the caller's state untouched.
pub trait EntropySource {
    /// Fill `dest` with random words.
    fn fill_words(&mut self, dest: &mut [u32]) -> CryptoResult<()>;
}

impl<T: EntropySource + ?Sized> EntropySource for &mut T {
    fn fill_words(&mut self, dest: &mut [u32]) -> CryptoResult<()> {
        (**self).fill_words(dest)
    }
}
