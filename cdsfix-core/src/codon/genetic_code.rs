//! NCBI translation tables.
//!
//! Each table is a 64-letter string giving the amino acid of every codon, with
//! codons enumerated in T/C/A/G order at each position (`TTT`, `TTC`, `TTA`,
//! `TTG`, `TCT`, ...).

use crate::constants::{
    CODON_COUNT, GENETIC_CODE_1, GENETIC_CODE_2, GENETIC_CODE_3, GENETIC_CODE_4, GENETIC_CODE_5,
    GENETIC_CODE_6, GENETIC_CODE_9, GENETIC_CODE_10, GENETIC_CODE_11, GENETIC_CODE_12,
    GENETIC_CODE_13, GENETIC_CODE_14, GENETIC_CODE_15, GENETIC_CODE_16, GENETIC_CODE_21,
    GENETIC_CODE_22, GENETIC_CODE_23, GENETIC_CODE_24, GENETIC_CODE_25,
};

const TCAG: [u8; 4] = *b"TCAG";

/// Identifiers of every supported NCBI translation table
pub const SUPPORTED_GENETIC_CODES: [u8; 19] = [
    1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 14, 15, 16, 21, 22, 23, 24, 25,
];

/// Amino-acid letters of NCBI translation table `id`.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::codon::genetic_code::amino_acid_letters;
///
/// let standard = amino_acid_letters(1).unwrap();
/// assert_eq!(standard[0], b'F'); // TTT
/// assert!(amino_acid_letters(7).is_none());
/// ```
#[must_use]
pub const fn amino_acid_letters(id: u8) -> Option<&'static [u8; CODON_COUNT]> {
    match id {
        1 => Some(GENETIC_CODE_1),
        2 => Some(GENETIC_CODE_2),
        3 => Some(GENETIC_CODE_3),
        4 => Some(GENETIC_CODE_4),
        5 => Some(GENETIC_CODE_5),
        6 => Some(GENETIC_CODE_6),
        9 => Some(GENETIC_CODE_9),
        10 => Some(GENETIC_CODE_10),
        11 => Some(GENETIC_CODE_11),
        12 => Some(GENETIC_CODE_12),
        13 => Some(GENETIC_CODE_13),
        14 => Some(GENETIC_CODE_14),
        15 => Some(GENETIC_CODE_15),
        16 => Some(GENETIC_CODE_16),
        21 => Some(GENETIC_CODE_21),
        22 => Some(GENETIC_CODE_22),
        23 => Some(GENETIC_CODE_23),
        24 => Some(GENETIC_CODE_24),
        25 => Some(GENETIC_CODE_25),
        _ => None,
    }
}

/// Codon at `index` in NCBI T/C/A/G enumeration order
#[must_use]
pub const fn ncbi_codon(index: usize) -> [u8; 3] {
    [
        TCAG[(index / 16) % 4],
        TCAG[(index / 4) % 4],
        TCAG[index % 4],
    ]
}

/// Iterate `(codon, amino acid)` pairs of translation table `id`
pub fn assignments(id: u8) -> Option<impl Iterator<Item = ([u8; 3], char)>> {
    let letters = amino_acid_letters(id)?;
    Some(
        letters
            .iter()
            .enumerate()
            .map(|(index, &letter)| (ncbi_codon(index), char::from(letter))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ncbi_codon_order() {
        assert_eq!(&ncbi_codon(0), b"TTT");
        assert_eq!(&ncbi_codon(1), b"TTC");
        assert_eq!(&ncbi_codon(4), b"TCT");
        assert_eq!(&ncbi_codon(63), b"GGG");
    }

    #[test]
    fn test_standard_code_landmarks() {
        let table: Vec<_> = assignments(1).unwrap().collect();
        let lookup = |codon: &[u8; 3]| {
            table
                .iter()
                .find(|(candidate, _)| candidate == codon)
                .map(|(_, amino_acid)| *amino_acid)
        };
        assert_eq!(lookup(b"ATG"), Some('M'));
        assert_eq!(lookup(b"TGA"), Some('*'));
        assert_eq!(lookup(b"TGG"), Some('W'));
        assert_eq!(lookup(b"AGA"), Some('R'));
    }

    #[test]
    fn test_mitochondrial_code_reassignments() {
        let table: Vec<_> = assignments(2).unwrap().collect();
        let tga = table.iter().find(|(codon, _)| codon == b"TGA").unwrap();
        assert_eq!(tga.1, 'W');
        let aga = table.iter().find(|(codon, _)| codon == b"AGA").unwrap();
        assert_eq!(aga.1, '*');
    }

    #[test]
    fn test_every_supported_code_resolves() {
        for id in SUPPORTED_GENETIC_CODES {
            assert!(amino_acid_letters(id).is_some(), "table {id}");
        }
        assert!(amino_acid_letters(0).is_none());
        assert!(amino_acid_letters(26).is_none());
    }
}
