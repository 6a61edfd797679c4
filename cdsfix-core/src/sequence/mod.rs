//! Nucleotide sequence utilities.
//!
//! Sequences handled by the fixer are upper-case strings over {A, C, G, T}.
//! This module holds the scanning primitives shared by the analyzers (GC
//! counting, motif search, reverse complement) and the
//! [`CodingSequence`](coding::CodingSequence) that carries a session's state.
//!
//! ## Examples
//!
//! ```rust
//! use cdsfix_core::sequence::{count_gc, gc_fraction, reverse_complement};
//!
//! assert_eq!(count_gc(b"ATGC"), 2);
//! assert!((gc_fraction(b"GGGCCA") - 5.0 / 6.0).abs() < 1e-12);
//! assert_eq!(reverse_complement(b"GGTCTC"), b"GAGACC");
//! ```

pub mod coding;

use std::sync::LazyLock;

use bio::alphabets::Alphabet;
use bio::alphabets::dna;
use wide::CmpEq;
use wide::u8x32;

use crate::constants::CHUNK_SIZE;
use crate::types::InputError;

pub use coding::CodingSequence;

static NUCLEOTIDES: LazyLock<Alphabet> = LazyLock::new(|| Alphabet::new(b"ACGT"));

/// Converts a nucleotide character to its 2-bit code.
///
/// # Encoding
///
/// - A: 00 (0)
/// - C: 01 (1)
/// - G: 10 (2)
/// - T: 11 (3)
/// - Other: 4 (invalid marker)
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::sequence::char_to_nuc;
///
/// assert_eq!(char_to_nuc(b'A'), 0);
/// assert_eq!(char_to_nuc(b'g'), 2);
/// assert_eq!(char_to_nuc(b'T'), 3);
/// assert_eq!(char_to_nuc(b'N'), 4); // Invalid
/// ```
#[must_use]
pub const fn char_to_nuc(c: u8) -> u8 {
    match c.to_ascii_uppercase() {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        b'T' => 3,
        _ => 4,
    }
}

/// Test if a base is guanine or cytosine
#[must_use]
pub const fn is_gc(base: u8) -> bool {
    matches!(base, b'G' | b'C')
}

/// Count G and C bases.
///
/// Scans 32 bytes at a time with `u8x32` comparisons and finishes the tail
/// scalar. Only upper-case bases are counted.
#[must_use]
pub fn count_gc(sequence: &[u8]) -> usize {
    let g_upper = u8x32::splat(b'G');
    let c_upper = u8x32::splat(b'C');

    let mut chunks = sequence.chunks_exact(CHUNK_SIZE);
    let mut gc_count = 0usize;

    for chunk in &mut chunks {
        let mut input_array = [0u8; CHUNK_SIZE];
        input_array.copy_from_slice(chunk);
        let input = u8x32::from(input_array);

        let gc_mask = input.cmp_eq(g_upper) | input.cmp_eq(c_upper);
        gc_count += gc_mask.move_mask().count_ones() as usize;
    }

    gc_count
        + chunks
            .remainder()
            .iter()
            .filter(|&&base| is_gc(base))
            .count()
}

/// GC fraction of `sequence`, `0.0` when empty
#[must_use]
pub fn gc_fraction(sequence: &[u8]) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    count_gc(sequence) as f64 / sequence.len() as f64
}

/// Test if `sequence` consists only of upper-case A, C, G and T
#[must_use]
pub fn is_nucleotide_word(sequence: &[u8]) -> bool {
    NUCLEOTIDES.is_word(sequence)
}

/// First character outside {A, C, G, T}, as `(character index, character)`
#[must_use]
pub fn first_invalid_nucleotide(sequence: &str) -> Option<(usize, char)> {
    if is_nucleotide_word(sequence.as_bytes()) {
        return None;
    }
    sequence
        .chars()
        .enumerate()
        .find(|(_, c)| !matches!(c, 'A' | 'C' | 'G' | 'T'))
}

/// Reverse complement of an upper-case nucleotide sequence
#[must_use]
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    dna::revcomp(sequence)
}

/// Start offsets of every occurrence of `pattern`, overlaps included.
///
/// An empty pattern never matches.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::sequence::find_occurrences;
///
/// assert_eq!(find_occurrences(b"AAAA", b"AA"), vec![0, 1, 2]);
/// assert!(find_occurrences(b"ACGT", b"").is_empty());
/// ```
#[must_use]
pub fn find_occurrences(sequence: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > sequence.len() {
        return Vec::new();
    }
    sequence
        .windows(pattern.len())
        .enumerate()
        .filter_map(|(offset, window)| (window == pattern).then_some(offset))
        .collect()
}

/// Upper-case `sequence` and check it can be read as codons.
///
/// # Errors
///
/// Lengths and positions count characters, not bytes.
///
/// - [`InputError::LengthNotMultipleOfThree`] when the length is not divisible by 3
/// - [`InputError::InvalidNucleotide`] at the first character outside {A, C, G, T}
pub fn normalize(sequence: &str) -> Result<String, InputError> {
    let normalized = sequence.to_ascii_uppercase();

    let length = normalized.chars().count();
    if length % 3 != 0 {
        return Err(InputError::LengthNotMultipleOfThree { length });
    }

    if let Some((position, found)) = first_invalid_nucleotide(&normalized) {
        return Err(InputError::InvalidNucleotide { position, found });
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_counts_characters() {
        assert_eq!(normalize("atgTAA").unwrap(), "ATGTAA");
        // 'é' is two bytes but one character
        assert_eq!(
            normalize("ATé").unwrap_err(),
            InputError::InvalidNucleotide { position: 2, found: 'é' }
        );
        assert_eq!(
            normalize("éAAA").unwrap_err(),
            InputError::LengthNotMultipleOfThree { length: 4 }
        );
        assert_eq!(
            normalize("éAATTT").unwrap_err(),
            InputError::InvalidNucleotide { position: 0, found: 'é' }
        );
    }

    #[test]
    fn test_count_gc_short() {
        assert_eq!(count_gc(b""), 0);
        assert_eq!(count_gc(b"AT"), 0);
        assert_eq!(count_gc(b"GGGCCC"), 6);
    }

    #[test]
    fn test_count_gc_matches_scalar_across_chunks() {
        let sequence: Vec<u8> = b"ATGCGGCATTAC".iter().copied().cycle().take(101).collect();
        let scalar = sequence.iter().filter(|&&base| is_gc(base)).count();
        assert_eq!(count_gc(&sequence), scalar);
        let head = &sequence[..64];
        assert_eq!(
            count_gc(head),
            head.iter().filter(|&&base| is_gc(base)).count()
        );
    }

    #[test]
    fn test_gc_fraction() {
        assert_eq!(gc_fraction(b""), 0.0);
        assert!((gc_fraction(b"AAGTTT") - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"CGTCTC"), b"GAGACG");
        assert_eq!(reverse_complement(b"GAATTC"), b"GAATTC");
        assert!(reverse_complement(b"").is_empty());
    }

    #[test]
    fn test_first_invalid_nucleotide() {
        assert_eq!(first_invalid_nucleotide("ACGT"), None);
        assert_eq!(first_invalid_nucleotide("ACXY"), Some((2, 'X')));
        assert_eq!(first_invalid_nucleotide("acgt"), Some((0, 'a')));
        assert_eq!(first_invalid_nucleotide("AÅC"), Some((1, 'Å')));
    }

    #[test]
    fn test_find_occurrences() {
        assert_eq!(find_occurrences(b"ATGTATTGA", b"TAT"), vec![3]);
        assert_eq!(find_occurrences(b"TAT", b"TATA"), Vec::<usize>::new());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("atgtac").unwrap(), "ATGTAC");
        assert_eq!(normalize("").unwrap(), "");
        assert_eq!(
            normalize("AT").unwrap_err(),
            InputError::LengthNotMultipleOfThree { length: 2 }
        );
        assert_eq!(
            normalize("ATN").unwrap_err(),
            InputError::InvalidNucleotide {
                position: 2,
                found: 'N'
            }
        );
    }
}
