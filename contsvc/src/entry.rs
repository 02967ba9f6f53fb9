/*++

Licensed under the Apache-2.0 license.

File Name:

    entry.rs

Abstract:

    File contains the dispatch table entry points. Each entry validates
    its own pointers, converts them into engine values and reports the
    engine status word unchanged.

--*/

use crate::abi::{
    slice_mut, slice_ref, ConstBuf, MutBuf, RawBlindedKey, RawEntropySource, RawHmacContext,
    RawUnblindedKey,
};
use crate::context::HMAC_CONTEXTS;
use crate::table::CONTSVC_TABLE_VERSION;
use core::mem::align_of;
use cryptolib::{
    blinded_checksum, keyblob, unblinded_checksum, BlindedKey, HardenedBool, HmacContext,
    KeyConfig, Keyblob, RawKeyConfig, UnblindedKey, WORD_SIZE_BYTES,
};
use cryptolib_error::{status_word, CryptoError, CryptoResult};
use cryptolib_kat::run_hmac_functest;

unsafe fn arg_ref<'a, T>(addr: usize) -> CryptoResult<&'a T> {
    if addr == 0 || addr % align_of::<T>() != 0 {
        return Err(CryptoError::BAD_ARGS);
    }
    Ok(&*(addr as *const T))
}

unsafe fn arg_mut<'a, T>(addr: usize) -> CryptoResult<&'a mut T> {
    if addr == 0 || addr % align_of::<T>() != 0 {
        return Err(CryptoError::BAD_ARGS);
    }
    Ok(&mut *(addr as *mut T))
}

unsafe fn read_config(addr: usize) -> CryptoResult<KeyConfig> {
    KeyConfig::try_from(*arg_ref::<RawKeyConfig>(addr)?)
}

/// Keyblob length in words, checked against the configuration
fn keyblob_words(config: &KeyConfig, len_bytes: usize) -> CryptoResult<usize> {
    let words = keyblob::num_words(config);
    if len_bytes != words * WORD_SIZE_BYTES {
        return Err(CryptoError::SIZE_MISMATCH);
    }
    Ok(words)
}

unsafe fn read_blinded_key(raw: &RawBlindedKey) -> CryptoResult<BlindedKey> {
    let config = KeyConfig::try_from(raw.config)?;
    let words = keyblob_words(&config, raw.keyblob_length)?;
    let keyblob = Keyblob::from_words(slice_ref(raw.keyblob, words)?)?;
    BlindedKey::from_parts(config, keyblob, raw.checksum)
}

unsafe fn write_blinded_key(raw: &mut RawBlindedKey, key: &BlindedKey) -> CryptoResult<()> {
    let dest = slice_mut(raw.keyblob, key.keyblob().len_words())?;
    dest.copy_from_slice(key.keyblob().as_words());
    raw.checksum = key.checksum();
    Ok(())
}

unsafe fn read_unblinded_key(raw: &RawUnblindedKey) -> CryptoResult<UnblindedKey> {
    let config = KeyConfig::try_from(raw.config)?;
    if raw.key_length != config.key_length() {
        return Err(CryptoError::SIZE_MISMATCH);
    }
    let words = slice_ref(raw.key, config.key_length().div_ceil(WORD_SIZE_BYTES))?;
    UnblindedKey::from_parts(config, words, raw.checksum)
}

unsafe fn num_words(config: usize, out: usize) -> CryptoResult<()> {
    let config = read_config(config)?;
    *arg_mut::<usize>(out)? = keyblob::num_words(&config);
    Ok(())
}

unsafe fn share_num_words(config: usize, out: usize) -> CryptoResult<()> {
    let config = read_config(config)?;
    *arg_mut::<usize>(out)? = keyblob::share_num_words(&config);
    Ok(())
}

unsafe fn to_shares(blob: usize, config: usize, share0: usize, share1: usize) -> CryptoResult<()> {
    let config = read_config(config)?;
    let blob = Keyblob::from_words(slice_ref(
        blob as *const u32,
        keyblob::num_words(&config),
    )?)?;
    let (src0, src1) = keyblob::to_shares(&blob, &config)?;
    let dest0 = slice_mut(share0 as *mut u32, src0.len())?;
    let dest1 = slice_mut(share1 as *mut u32, src1.len())?;
    dest0.copy_from_slice(src0);
    dest1.copy_from_slice(src1);
    Ok(())
}

unsafe fn from_shares(share0: usize, share1: usize, config: usize, out: usize) -> CryptoResult<()> {
    let config = read_config(config)?;
    let share_words = keyblob::share_num_words(&config);
    let blob = keyblob::from_shares(
        slice_ref(share0 as *const u32, share_words)?,
        slice_ref(share1 as *const u32, share_words)?,
        &config,
    )?;
    slice_mut(out as *mut u32, blob.len_words())?.copy_from_slice(blob.as_words());
    Ok(())
}

unsafe fn from_key_and_mask(key: usize, mask: usize, config: usize, out: usize) -> CryptoResult<()> {
    let config = read_config(config)?;
    let key_len = if config.is_hw_backed() {
        0
    } else {
        config.key_length()
    };
    let blob = keyblob::from_key_and_mask(
        slice_ref(key as *const u8, key_len)?,
        slice_ref(mask as *const u32, keyblob::share_num_words(&config))?,
        &config,
    )?;
    slice_mut(out as *mut u32, blob.len_words())?.copy_from_slice(blob.as_words());
    Ok(())
}

unsafe fn remask(key: usize, mask: usize) -> CryptoResult<()> {
    let raw = arg_mut::<RawBlindedKey>(key)?;
    let mut blinded = read_blinded_key(raw)?;
    let mask = slice_ref(
        mask as *const u32,
        keyblob::share_num_words(blinded.config()),
    )?;
    blinded.remask(mask)?;
    write_blinded_key(raw, &blinded)
}

unsafe fn mac_keygen(key: usize, entropy: usize) -> CryptoResult<()> {
    let raw = arg_mut::<RawBlindedKey>(key)?;
    let entropy = arg_mut::<RawEntropySource>(entropy)?;
    let config = KeyConfig::try_from(raw.config)?;
    keyblob_words(&config, raw.keyblob_length)?;
    let blinded = BlindedKey::generate(config, entropy)?;
    write_blinded_key(raw, &blinded)
}

unsafe fn hmac(key: usize, msg: usize, tag: usize) -> CryptoResult<()> {
    let key = read_blinded_key(arg_ref(key)?)?;
    let msg = arg_ref::<ConstBuf>(msg)?.as_slice()?;
    let tag = arg_ref::<MutBuf>(tag)?.as_mut_slice()?;
    cryptolib::hmac(&key, msg, tag.into())
}

unsafe fn kmac(key: usize, msg: usize, customization: usize, tag: usize) -> CryptoResult<()> {
    let key = read_blinded_key(arg_ref(key)?)?;
    let msg = arg_ref::<ConstBuf>(msg)?.as_slice()?;
    let customization = arg_ref::<ConstBuf>(customization)?.as_slice()?;
    let tag = arg_ref::<MutBuf>(tag)?.as_mut_slice()?;
    cryptolib::kmac(&key, msg, customization, tag)
}

unsafe fn hmac_init(ctx: usize, key: usize) -> CryptoResult<()> {
    let ctx = arg_mut::<RawHmacContext>(ctx)?;
    let key = read_blinded_key(arg_ref(key)?)?;
    HMAC_CONTEXTS.init(ctx, HmacContext::init(&key)?)
}

unsafe fn hmac_update(ctx: usize, msg: usize) -> CryptoResult<()> {
    let ctx = arg_ref::<RawHmacContext>(ctx)?;
    let msg = arg_ref::<ConstBuf>(msg)?.as_slice()?;
    HMAC_CONTEXTS.update(ctx, msg)
}

unsafe fn hmac_final(ctx: usize, tag: usize) -> CryptoResult<()> {
    let ctx = arg_mut::<RawHmacContext>(ctx)?;
    let tag = arg_ref::<MutBuf>(tag)?.as_mut_slice()?;
    HMAC_CONTEXTS.finalize(ctx, tag.into())
}

unsafe fn unblinded_key_checksum(key: usize, out: usize) -> CryptoResult<()> {
    let key = read_unblinded_key(arg_ref(key)?)?;
    *arg_mut::<u32>(out)? = unblinded_checksum(key.config(), key.as_words());
    Ok(())
}

unsafe fn blinded_key_checksum(key: usize, out: usize) -> CryptoResult<()> {
    let key = read_blinded_key(arg_ref(key)?)?;
    *arg_mut::<u32>(out)? = blinded_checksum(key.config(), key.keyblob());
    Ok(())
}

unsafe fn unblinded_key_check(key: usize, out: usize) -> CryptoResult<()> {
    let key = read_unblinded_key(arg_ref(key)?)?;
    *arg_mut::<u32>(out)? = HardenedBool::from(key.verify()).into();
    Ok(())
}

unsafe fn blinded_key_check(key: usize, out: usize) -> CryptoResult<()> {
    let key = read_blinded_key(arg_ref(key)?)?;
    *arg_mut::<u32>(out)? = HardenedBool::from(key.verify()).into();
    Ok(())
}

unsafe fn hmac_functest(tag: usize) -> CryptoResult<()> {
    run_hmac_functest(arg_mut::<[u8; 32]>(tag)?)
}

/// Diagnostic entry, `a + b + CONTSVC_TABLE_VERSION` with wrapping
pub extern "C" fn contsvc_self_test(a: usize, b: usize, _c: usize, _d: usize) -> u32 {
    (a as u32)
        .wrapping_add(b as u32)
        .wrapping_add(CONTSVC_TABLE_VERSION)
}

/// # Safety
///
/// `config` points to a `RawKeyConfig`, `out` to a writable `usize`.
pub unsafe extern "C" fn contsvc_keyblob_num_words(
    config: usize,
    out: usize,
    _c: usize,
    _d: usize,
) -> u32 {
    status_word(num_words(config, out))
}

/// # Safety
///
/// `config` points to a `RawKeyConfig`, `out` to a writable `usize`.
pub unsafe extern "C" fn contsvc_keyblob_share_num_words(
    config: usize,
    out: usize,
    _c: usize,
    _d: usize,
) -> u32 {
    status_word(share_num_words(config, out))
}

/// # Safety
///
/// `keyblob` holds the number of words the configuration dictates and each
/// share output has room for one share.
pub unsafe extern "C" fn contsvc_keyblob_to_shares(
    keyblob: usize,
    config: usize,
    share0: usize,
    share1: usize,
) -> u32 {
    status_word(to_shares(keyblob, config, share0, share1))
}

/// # Safety
///
/// Each share holds one share of words and `keyblob` has room for both.
pub unsafe extern "C" fn contsvc_keyblob_from_shares(
    share0: usize,
    share1: usize,
    config: usize,
    keyblob: usize,
) -> u32 {
    status_word(from_shares(share0, share1, config, keyblob))
}

/// # Safety
///
/// `key` holds `key_length` bytes, `mask` one share of words and `keyblob`
/// has room for the whole keyblob.
pub unsafe extern "C" fn contsvc_keyblob_from_key_and_mask(
    key: usize,
    mask: usize,
    config: usize,
    keyblob: usize,
) -> u32 {
    status_word(from_key_and_mask(key, mask, config, keyblob))
}

/// # Safety
///
/// `key` points to a `RawBlindedKey` whose keyblob is writable, `mask` to
/// one share of words.
pub unsafe extern "C" fn contsvc_keyblob_remask(
    key: usize,
    mask: usize,
    _c: usize,
    _d: usize,
) -> u32 {
    status_word(remask(key, mask))
}

/// # Safety
///
/// `key` points to a `RawBlindedKey` with a configuration and a writable
/// keyblob buffer, `entropy` to a `RawEntropySource`.
pub unsafe extern "C" fn contsvc_mac_keygen(
    key: usize,
    entropy: usize,
    _c: usize,
    _d: usize,
) -> u32 {
    status_word(mac_keygen(key, entropy))
}

/// # Safety
///
/// `key` points to a `RawBlindedKey`, `msg` to a `ConstBuf` and `tag` to a
/// `MutBuf`.
pub unsafe extern "C" fn contsvc_hmac(key: usize, msg: usize, tag: usize, _d: usize) -> u32 {
    status_word(hmac(key, msg, tag))
}

/// # Safety
///
/// `key` points to a `RawBlindedKey`, `msg` and `customization` to
/// `ConstBuf`s and `tag` to a `MutBuf`.
pub unsafe extern "C" fn contsvc_kmac(
    key: usize,
    msg: usize,
    customization: usize,
    tag: usize,
) -> u32 {
    status_word(kmac(key, msg, customization, tag))
}

/// # Safety
///
/// `ctx` points to a `RawHmacContext`, `key` to a `RawBlindedKey`.
pub unsafe extern "C" fn contsvc_hmac_init(ctx: usize, key: usize, _c: usize, _d: usize) -> u32 {
    status_word(hmac_init(ctx, key))
}

/// # Safety
///
/// `ctx` points to a `RawHmacContext`, `msg` to a `ConstBuf`.
pub unsafe extern "C" fn contsvc_hmac_update(ctx: usize, msg: usize, _c: usize, _d: usize) -> u32 {
    status_word(hmac_update(ctx, msg))
}

/// # Safety
///
/// `ctx` points to a `RawHmacContext`, `tag` to a `MutBuf`.
pub unsafe extern "C" fn contsvc_hmac_final(ctx: usize, tag: usize, _c: usize, _d: usize) -> u32 {
    status_word(hmac_final(ctx, tag))
}

/// # Safety
///
/// `key` points to a `RawUnblindedKey`, `out` to a writable `u32`.
pub unsafe extern "C" fn contsvc_unblinded_checksum(
    key: usize,
    out: usize,
    _c: usize,
    _d: usize,
) -> u32 {
    status_word(unblinded_key_checksum(key, out))
}

/// # Safety
///
/// `key` points to a `RawBlindedKey`, `out` to a writable `u32`.
pub unsafe extern "C" fn contsvc_blinded_checksum(
    key: usize,
    out: usize,
    _c: usize,
    _d: usize,
) -> u32 {
    status_word(blinded_key_checksum(key, out))
}

/// Writes a hardened boolean to `out`.
///
/// # Safety
///
/// `key` points to a `RawUnblindedKey`, `out` to a writable `u32`.
pub unsafe extern "C" fn contsvc_unblinded_key_check(
    key: usize,
    out: usize,
    _c: usize,
    _d: usize,
) -> u32 {
    status_word(unblinded_key_check(key, out))
}

/// Writes a hardened boolean to `out`.
///
/// # Safety
///
/// `key` points to a `RawBlindedKey`, `out` to a writable `u32`.
pub unsafe extern "C" fn contsvc_blinded_key_check(
    key: usize,
    out: usize,
    _c: usize,
    _d: usize,
) -> u32 {
    status_word(blinded_key_check(key, out))
}

/// # Safety
///
/// `tag` points to 32 writable bytes.
pub unsafe extern "C" fn contsvc_hmac_functest(tag: usize, _b: usize, _c: usize, _d: usize) -> u32 {
    status_word(hmac_functest(tag))
}
