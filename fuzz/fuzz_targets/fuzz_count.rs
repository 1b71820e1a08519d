//! Fuzz target for the rolling k-mer counter.
//!
//! The counter must agree with encoding every window from scratch, for both
//! strands, on arbitrary bytes.

#![no_main]

use kmercompare::{
    counter::{FrequencyCounter, Strand},
    kmer::{canonical_key, encode, KmerLength, MAX_K},
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, &[u8])| {
    let (k, data) = input;
    let Ok(k) = KmerLength::relaxed(usize::from(k) % MAX_K + 1) else {
        return;
    };

    let mut forward = vec![0u64; k.table_size()];
    let mut canonical = vec![0u64; k.table_size()];
    let mut skipped = 0u64;
    if data.len() >= k.get() {
        for window in data.windows(k.get()) {
            match encode(window) {
                Ok(key) => {
                    forward[key] += 1;
                    canonical[canonical_key(key, k)] += 1;
                }
                Err(_) => skipped += 1,
            }
        }
    }

    for (strand, expected) in [(Strand::Forward, &forward), (Strand::Canonical, &canonical)] {
        let mut counter = FrequencyCounter::new(k, strand);
        counter.add_sequence(data);
        let (table, stats) = counter.finish();
        assert_eq!(table.counts(), expected.as_slice());
        assert_eq!(stats.skipped_windows, skipped);
    }
});
