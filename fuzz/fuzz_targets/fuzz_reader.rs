//! Fuzz target for `SequenceReader`.
//!
//! Arbitrary bytes must parse into records or stop with an error, never
//! panic, and strict mode must agree with lenient mode whenever it succeeds.

#![no_main]

use kmercompare::reader::{ReadMode, SequenceReader};
use libfuzzer_sys::fuzz_target;

fn parse(data: &[u8], mode: ReadMode) -> Option<usize> {
    let reader = SequenceReader::new(data, "fuzz.fa", mode).ok()?;
    let mut records = 0;
    for record in reader {
        let record = record.ok()?;
        assert!(!record.symbols().contains(&b'\n'));
        records += 1;
    }
    Some(records)
}

fuzz_target!(|data: &[u8]| {
    let lenient = parse(data, ReadMode::Lenient);
    if let (Some(strict), Some(lenient)) = (parse(data, ReadMode::Strict), lenient) {
        assert_eq!(strict, lenient);
    }
});
