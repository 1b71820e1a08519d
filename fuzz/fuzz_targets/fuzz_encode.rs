//! Fuzz target for `encode`.
//!
//! Tests that `encode` handles arbitrary byte input gracefully, either
//! producing a key that decodes back to the window or reporting the first
//! invalid byte.

#![no_main]

use kmercompare::kmer::{canonical_key, decode, encode, reverse_complement_key, KmerLength, MAX_K};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > MAX_K {
        return;
    }
    let k = KmerLength::relaxed(data.len()).unwrap();

    match encode(data) {
        Ok(key) => {
            assert!(key < k.table_size(), "key {key} out of range for k={k}");

            // Soft-masked bases decode as upper case
            assert_eq!(decode(key, k).as_ref(), data.to_ascii_uppercase().as_slice());

            let rc = reverse_complement_key(key, k);
            assert_eq!(reverse_complement_key(rc, k), key);
            assert!(canonical_key(key, k) <= key);
        }
        Err(err) => {
            assert!(err.position < data.len());
            assert_eq!(err.base, data[err.position]);
            assert!(encode(&data[..err.position]).is_ok());
        }
    }
});
