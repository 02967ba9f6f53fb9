// Licensed under the Apache-2.0 license

use cryptolib::{Array4x8, BlindedKey, KeyConfig, KeyMode};
use cryptolib_kat::{
    execute_all, run_hmac_functest, HmacSha256Kat, KeyblobKat, Kmac128Kat, FUNCTEST_KEY,
    FUNCTEST_MESSAGE,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

#[test]
fn test_kats_pass() {
    KeyblobKat::default().execute().unwrap();
    HmacSha256Kat::default().execute().unwrap();
    Kmac128Kat::default().execute().unwrap();
    execute_all().unwrap();
}

#[test]
fn test_functest_matches_reference() {
    let mut tag = [0u8; 32];
    run_hmac_functest(&mut tag).unwrap();

    let mut reference = <Hmac<Sha256> as Mac>::new_from_slice(&FUNCTEST_KEY).unwrap();
    reference.update(FUNCTEST_MESSAGE);
    assert_eq!(tag[..], reference.finalize().into_bytes()[..]);
}

#[test]
fn test_functest_mask_independent() {
    let mut tag = [0u8; 32];
    run_hmac_functest(&mut tag).unwrap();

    let config = KeyConfig::new(KeyMode::HmacSha256, 32).unwrap();
    let key = BlindedKey::from_key_and_mask(&FUNCTEST_KEY, &[0; 8], config).unwrap();
    let mut other = Array4x8::default();
    cryptolib::hmac(&key, FUNCTEST_MESSAGE, (&mut other).into()).unwrap();
    assert_eq!(<[u8; 32]>::from(other), tag);
}

#[test]
fn test_functest_key_encoding() {
    assert_eq!(
        hex::encode(FUNCTEST_KEY),
        "1bff10eaa5b9b204d6f3232a573e8e51a27b68c319366deaf26b91b0712f7a34"
    );
}
