//! K-mer encoding.
//!
//! A k-mer is packed into an integer key by treating it as a base-4 number,
//! most significant base first, with the fixed codes `A=0, C=1, G=2, T=3`.
//! Keys for a given `k` are exactly the range `[0, 4^k)`, so a [`KmerTable`]
//! can index a flat array with them.
//!
//! Lower-case (soft-masked) bases encode like their upper-case forms. Any
//! other byte has no encoding.
//!
//! [`KmerTable`]: crate::table::KmerTable

use bytes::Bytes;
use serde::Serialize;

use crate::error::{InvalidBaseError, KmerLengthError};

/// Smallest k-mer length accepted by [`KmerLength::new`].
pub const MIN_K: usize = 3;

/// Largest k-mer length; `4^11` counters keeps every table a modest allocation.
pub const MAX_K: usize = 11;

/// A validated k-mer length.
///
/// # Example
///
/// ```rust
/// use kmercompare::kmer::KmerLength;
///
/// let k = KmerLength::new(5)?;
/// assert_eq!(k.get(), 5);
/// assert_eq!(k.table_size(), 1024);
/// assert!(KmerLength::new(12).is_err());
/// # Ok::<(), kmercompare::error::KmerLengthError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KmerLength(usize);

impl KmerLength {
    /// Validates `k` against the `[MIN_K, MAX_K]` policy.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is outside `[MIN_K, MAX_K]`.
    pub const fn new(k: usize) -> Result<Self, KmerLengthError> {
        Self::bounded(k, MIN_K)
    }

    /// Validates only the table-size bound, `1 <= k <= MAX_K`.
    ///
    /// For callers that apply their own lower bound, such as tests over
    /// dinucleotides.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is zero or above `MAX_K`.
    pub const fn relaxed(k: usize) -> Result<Self, KmerLengthError> {
        Self::bounded(k, 1)
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn bounded(k: usize, min: usize) -> Result<Self, KmerLengthError> {
        if k < min || k > MAX_K {
            return Err(KmerLengthError {
                k,
                min: min as u8,
                max: MAX_K as u8,
            });
        }
        Ok(Self(k))
    }

    /// Returns the k-mer length.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of distinct k-mers, `4^k`.
    #[must_use]
    pub const fn table_size(self) -> usize {
        1 << (2 * self.0)
    }

    /// Bit mask covering the `2k` low bits of a key.
    #[must_use]
    pub const fn mask(self) -> usize {
        self.table_size() - 1
    }
}

impl TryFrom<usize> for KmerLength {
    type Error = KmerLengthError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

impl std::fmt::Display for KmerLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A nucleotide with its 2-bit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parses a base, accepting soft-masked lower case.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' | b'a' => Some(Self::A),
            b'C' | b'c' => Some(Self::C),
            b'G' | b'g' => Some(Self::G),
            b'T' | b't' => Some(Self::T),
            _ => None,
        }
    }

    /// Inverse of [`Base::code`]; only the two low bits are read.
    #[must_use]
    pub const fn from_code(code: usize) -> Self {
        match code & 0b11 {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }

    #[must_use]
    pub const fn code(self) -> usize {
        match self {
            Self::A => 0,
            Self::C => 1,
            Self::G => 2,
            Self::T => 3,
        }
    }

    #[must_use]
    pub const fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::C => Self::G,
            Self::G => Self::C,
            Self::T => Self::A,
        }
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

impl TryFrom<u8> for Base {
    type Error = InvalidBaseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_byte(value).ok_or(InvalidBaseError {
            base: value,
            position: 0,
        })
    }
}

/// Encodes a window of bases into its key.
///
/// The window length is the k-mer length; the key lies in `[0, 4^len)`.
///
/// # Errors
///
/// Returns [`InvalidBaseError`] pointing at the first byte that is not a
/// nucleotide.
///
/// # Example
///
/// ```rust
/// use kmercompare::kmer::encode;
///
/// assert_eq!(encode(b"AAA")?, 0);
/// assert_eq!(encode(b"ACG")?, 0b00_01_10);
/// assert_eq!(encode(b"TTT")?, 63);
/// assert!(encode(b"ANA").is_err());
/// # Ok::<(), kmercompare::error::InvalidBaseError>(())
/// ```
pub fn encode(window: &[u8]) -> Result<usize, InvalidBaseError> {
    window
        .iter()
        .enumerate()
        .try_fold(0usize, |key, (position, &byte)| {
            let base = Base::from_byte(byte).ok_or(InvalidBaseError { base: byte, position })?;
            Ok((key << 2) | base.code())
        })
}

/// Decodes a key back into its k bases.
///
/// Bits above `2k` are ignored.
#[must_use]
pub fn decode(key: usize, k: KmerLength) -> Bytes {
    let k = k.get();
    (0..k)
        .map(|i| Base::from_code(key >> (2 * (k - 1 - i))).as_byte())
        .collect()
}

/// Decodes a key into a `String`.
#[must_use]
pub fn decode_to_string(key: usize, k: KmerLength) -> String {
    // Decoded bytes are always ASCII nucleotides
    decode(key, k).iter().map(|&b| b as char).collect()
}

/// Key of the reverse complement of the k-mer with key `key`.
#[must_use]
pub fn reverse_complement_key(key: usize, k: KmerLength) -> usize {
    let mut remaining = key;
    let mut rc = 0;
    for _ in 0..k.get() {
        rc = (rc << 2) | (0b11 - (remaining & 0b11));
        remaining >>= 2;
    }
    rc
}

/// The smaller of a key and its reverse complement key.
#[must_use]
pub fn canonical_key(key: usize, k: KmerLength) -> usize {
    key.min(reverse_complement_key(key, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kmer_length_policy_bounds() {
        assert!(KmerLength::new(2).is_err());
        assert!(KmerLength::new(3).is_ok());
        assert!(KmerLength::new(11).is_ok());
        assert!(KmerLength::new(12).is_err());

        let err = KmerLength::new(0).unwrap_err();
        assert_eq!((err.min, err.max), (3, 11));
    }

    #[test]
    fn kmer_length_relaxed_accepts_short_lengths() {
        assert_eq!(KmerLength::relaxed(1).unwrap().get(), 1);
        assert_eq!(KmerLength::relaxed(2).unwrap().table_size(), 16);
        assert!(KmerLength::relaxed(0).is_err());
        assert!(KmerLength::relaxed(12).is_err());
    }

    #[test]
    fn table_size_is_four_to_the_k() {
        for k in MIN_K..=MAX_K {
            let len = KmerLength::new(k).unwrap();
            assert_eq!(len.table_size(), 4usize.pow(u32::try_from(k).unwrap()));
        }
    }

    #[test]
    fn encode_is_base_four_most_significant_first() {
        assert_eq!(encode(b"AC").unwrap(), 1);
        assert_eq!(encode(b"CA").unwrap(), 4);
        assert_eq!(encode(b"GT").unwrap(), 2 * 4 + 3);
        assert_eq!(encode(b"TTTTT").unwrap(), 1023);
    }

    #[test]
    fn encode_soft_masked_matches_upper_case() {
        assert_eq!(encode(b"acgt").unwrap(), encode(b"ACGT").unwrap());
    }

    #[test]
    fn encode_reports_first_invalid_position() {
        let err = encode(b"ACNGN").unwrap_err();
        assert_eq!(err.base, b'N');
        assert_eq!(err.position, 2);
    }

    #[test]
    fn decode_gattaca() {
        let k = KmerLength::new(7).unwrap();
        let key = encode(b"GATTACA").unwrap();
        insta::assert_snapshot!(decode_to_string(key, k), @"GATTACA");
    }

    #[test]
    fn decode_ignores_high_bits() {
        let k = KmerLength::new(3).unwrap();
        let key = encode(b"TGC").unwrap();
        assert_eq!(decode(key | (0b11 << 6), k).as_ref(), b"TGC");
    }

    #[test]
    fn reverse_complement_key_matches_sequence() {
        let k = KmerLength::new(4).unwrap();
        let key = encode(b"AACG").unwrap();
        assert_eq!(reverse_complement_key(key, k), encode(b"CGTT").unwrap());
    }

    #[test]
    fn canonical_key_of_palindrome_is_itself() {
        let k = KmerLength::new(4).unwrap();
        let key = encode(b"ACGT").unwrap();
        assert_eq!(canonical_key(key, k), key);
    }

    #[test]
    fn base_complement_and_codes() {
        for byte in [b'A', b'C', b'G', b'T'] {
            let base = Base::try_from(byte).unwrap();
            assert_eq!(Base::from_code(base.code()), base);
            assert_eq!(base.complement().code(), 3 - base.code());
            assert_eq!(base.as_byte(), byte);
        }
        assert!(Base::try_from(b'N').is_err());
    }
}
