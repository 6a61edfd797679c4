//! Codon usage tables.
//!
//! A [`CodonTable`] is the validated, read-only mapping between amino acids and
//! their synonymous codons that every fixing session works against. It answers
//! two questions: which amino acid a codon encodes, and which codons encode a
//! given amino acid, ranked from most to least used.
//!
//! ## Building a table
//!
//! Tables are built either from an explicit amino-acid mapping, typically
//! deserialized from an organism's codon-usage file, or from one of the NCBI
//! translation tables plus a list of usage weights.
//!
//! ```rust
//! use cdsfix_core::codon::{CodonTable, CodonUsage};
//!
//! let weights = vec![
//!     CodonUsage::new("TAT", 16.0),
//!     CodonUsage::new("TAC", 18.1),
//! ];
//! let table = CodonTable::from_genetic_code(1, &weights)?;
//!
//! assert_eq!(table.amino_acid_of("TAT"), Some('Y'));
//! let ranked: Vec<_> = table.codons_for('Y').iter().map(|c| c.codon.as_str()).collect();
//! assert_eq!(ranked, ["TAC", "TAT"]);
//! # Ok::<(), cdsfix_core::types::CodonTableError>(())
//! ```
//!
//! ## Ranking
//!
//! Synonymous codons are ordered by descending usage weight, ties broken by
//! lexicographic codon. Each [`RankedCodon`] also carries its share of the
//! amino acid's total usage, which the built-in analyzers use as their final
//! tie-break.

pub mod genetic_code;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CODON_COUNT, CODON_LENGTH};
use crate::sequence::char_to_nuc;
use crate::types::CodonTableError;

/// Usage weight of one codon, as found in codon-usage tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodonUsage {
    pub codon: String,
    pub weight: f64,
}

impl CodonUsage {
    pub fn new(codon: impl Into<String>, weight: f64) -> Self {
        Self {
            codon: codon.into(),
            weight,
        }
    }
}

/// All codons of one amino acid (or `*` for stop) with their usage weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoAcidCodons {
    pub amino_acid: char,
    pub codons: Vec<CodonUsage>,
}

impl AminoAcidCodons {
    pub fn new(amino_acid: char, codons: Vec<CodonUsage>) -> Self {
        Self { amino_acid, codons }
    }
}

/// A synonymous codon in ranked position
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCodon {
    /// Upper-case codon
    pub codon: String,
    /// Raw usage weight from the input table
    pub weight: f64,
    /// Fraction of the amino acid's total weight, in `0.0..=1.0`
    pub share: f64,
}

/// Validated bidirectional amino acid ↔ codon mapping.
///
/// Every one of the 64 codons is assigned to exactly one amino acid or stop,
/// and every amino acid has at least one codon. The table is immutable once
/// built and is shared read-only by all analyzers of a session.
#[derive(Debug, Clone)]
pub struct CodonTable {
    amino_acids: [char; CODON_COUNT],
    synonyms: BTreeMap<char, Vec<RankedCodon>>,
}

/// Index of a codon in A/C/G/T lexicographic order, `None` for malformed codons.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::codon::codon_index;
///
/// assert_eq!(codon_index(b"AAA"), Some(0));
/// assert_eq!(codon_index(b"acg"), Some(6));
/// assert_eq!(codon_index(b"TTT"), Some(63));
/// assert_eq!(codon_index(b"ANA"), None);
/// assert_eq!(codon_index(b"AA"), None);
/// ```
#[must_use]
pub fn codon_index(codon: &[u8]) -> Option<usize> {
    if codon.len() != CODON_LENGTH {
        return None;
    }
    codon.iter().try_fold(0usize, |index, &base| {
        let nucleotide = char_to_nuc(base);
        (nucleotide < 4).then(|| index * 4 + usize::from(nucleotide))
    })
}

fn codon_at(index: usize) -> String {
    const ACGT: [char; 4] = ['A', 'C', 'G', 'T'];
    [index / 16, (index / 4) % 4, index % 4]
        .iter()
        .map(|&nucleotide| ACGT[nucleotide])
        .collect()
}

impl CodonTable {
    /// Build and validate a table from an amino-acid mapping.
    ///
    /// Codons are upper-cased before validation. An amino acid may appear in
    /// several entries; their codons are merged.
    ///
    /// # Errors
    ///
    /// - [`CodonTableError::InvalidCodon`] for codons that are not three of A/C/G/T
    /// - [`CodonTableError::InvalidWeight`] for negative or non-finite weights
    /// - [`CodonTableError::EmptyAminoAcid`] for an entry without codons
    /// - [`CodonTableError::DuplicateCodon`] when a codon is listed twice
    /// - [`CodonTableError::IncompleteCodonTable`] when any of the 64 codons is unassigned
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdsfix_core::codon::{AminoAcidCodons, CodonTable, CodonUsage};
    /// use cdsfix_core::types::CodonTableError;
    ///
    /// let partial = vec![AminoAcidCodons::new('M', vec![CodonUsage::new("ATG", 1.0)])];
    /// let error = CodonTable::build(&partial).unwrap_err();
    /// assert!(matches!(error, CodonTableError::IncompleteCodonTable { .. }));
    /// ```
    pub fn build(mapping: &[AminoAcidCodons]) -> Result<Self, CodonTableError> {
        let mut amino_acids: [Option<char>; CODON_COUNT] = [None; CODON_COUNT];
        let mut synonyms: BTreeMap<char, Vec<RankedCodon>> = BTreeMap::new();

        for entry in mapping {
            if entry.codons.is_empty() {
                return Err(CodonTableError::EmptyAminoAcid(entry.amino_acid));
            }

            for usage in &entry.codons {
                let codon = usage.codon.to_ascii_uppercase();
                let index = codon_index(codon.as_bytes())
                    .ok_or_else(|| CodonTableError::InvalidCodon(usage.codon.clone()))?;

                if !usage.weight.is_finite() || usage.weight < 0.0 {
                    return Err(CodonTableError::InvalidWeight {
                        codon,
                        weight: usage.weight,
                    });
                }

                if let Some(first) = amino_acids[index] {
                    return Err(CodonTableError::DuplicateCodon {
                        codon,
                        first,
                        second: entry.amino_acid,
                    });
                }
                amino_acids[index] = Some(entry.amino_acid);

                synonyms
                    .entry(entry.amino_acid)
                    .or_default()
                    .push(RankedCodon {
                        codon,
                        weight: usage.weight,
                        share: 0.0,
                    });
            }
        }

        let missing: Vec<String> = (0..CODON_COUNT)
            .filter(|&index| amino_acids[index].is_none())
            .map(codon_at)
            .collect();
        if !missing.is_empty() {
            return Err(CodonTableError::IncompleteCodonTable { missing });
        }

        for ranked in synonyms.values_mut() {
            rank_synonyms(ranked);
        }

        Ok(Self {
            amino_acids: amino_acids.map(|amino_acid| amino_acid.unwrap_or_default()),
            synonyms,
        })
    }

    /// Build a table whose assignments come from NCBI translation table `id`.
    ///
    /// Usage weights are looked up in `usage`; codons missing from it get
    /// weight `0.0`. When a codon is listed more than once the last weight wins.
    ///
    /// # Errors
    ///
    /// [`CodonTableError::UnknownGeneticCode`] for unsupported identifiers, plus
    /// the validation errors of [`CodonTable::build`] for malformed usage entries.
    pub fn from_genetic_code(id: u8, usage: &[CodonUsage]) -> Result<Self, CodonTableError> {
        let assignments =
            genetic_code::assignments(id).ok_or(CodonTableError::UnknownGeneticCode(id))?;

        let mut weights = [0.0f64; CODON_COUNT];
        for entry in usage {
            let index = codon_index(entry.codon.as_bytes())
                .ok_or_else(|| CodonTableError::InvalidCodon(entry.codon.clone()))?;
            weights[index] = entry.weight;
        }

        let mut grouped: BTreeMap<char, Vec<CodonUsage>> = BTreeMap::new();
        for (codon, amino_acid) in assignments {
            let weight = codon_index(&codon).map_or(0.0, |index| weights[index]);
            grouped
                .entry(amino_acid)
                .or_default()
                .push(CodonUsage::new(String::from_utf8_lossy(&codon), weight));
        }

        let mapping: Vec<AminoAcidCodons> = grouped
            .into_iter()
            .map(|(amino_acid, codons)| AminoAcidCodons::new(amino_acid, codons))
            .collect();
        Self::build(&mapping)
    }

    /// NCBI translation table `id` with every codon weighted equally
    ///
    /// # Errors
    ///
    /// [`CodonTableError::UnknownGeneticCode`] for unsupported identifiers.
    pub fn uniform(id: u8) -> Result<Self, CodonTableError> {
        let usage: Vec<CodonUsage> = (0..CODON_COUNT)
            .map(|index| CodonUsage::new(codon_at(index), 1.0))
            .collect();
        Self::from_genetic_code(id, &usage)
    }

    /// Amino acid encoded by `codon` (case-insensitive), `None` if malformed
    #[must_use]
    pub fn amino_acid_of(&self, codon: impl AsRef<[u8]>) -> Option<char> {
        codon_index(codon.as_ref()).map(|index| self.amino_acids[index])
    }

    /// Codons encoding `amino_acid`, best ranked first; empty if unknown
    #[must_use]
    pub fn codons_for(&self, amino_acid: char) -> &[RankedCodon] {
        self.synonyms
            .get(&amino_acid)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Ranked synonyms of `codon`, the codon itself included
    #[must_use]
    pub fn synonyms_of(&self, codon: impl AsRef<[u8]>) -> &[RankedCodon] {
        self.amino_acid_of(codon)
            .map(|amino_acid| self.codons_for(amino_acid))
            .unwrap_or_default()
    }

    /// Amino acids (and `*`) present in the table, in character order
    pub fn amino_acids(&self) -> impl Iterator<Item = char> + '_ {
        self.synonyms.keys().copied()
    }

    /// Translate complete codons of `nucleotides`.
    ///
    /// Malformed codons translate to `X`; a trailing partial codon is ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdsfix_core::codon::CodonTable;
    ///
    /// let table = CodonTable::uniform(11)?;
    /// assert_eq!(table.translate("ATGTATTGA"), "MY*");
    /// assert_eq!(table.translate("ATGNNNTG"), "MX");
    /// # Ok::<(), cdsfix_core::types::CodonTableError>(())
    /// ```
    #[must_use]
    pub fn translate(&self, nucleotides: impl AsRef<[u8]>) -> String {
        nucleotides
            .as_ref()
            .chunks_exact(CODON_LENGTH)
            .map(|codon| self.amino_acid_of(codon).unwrap_or('X'))
            .collect()
    }
}

fn rank_synonyms(ranked: &mut [RankedCodon]) {
    ranked.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.codon.cmp(&b.codon))
    });

    let total: f64 = ranked.iter().map(|codon| codon.weight).sum();
    let count = ranked.len() as f64;
    for codon in ranked.iter_mut() {
        codon.share = if total > 0.0 {
            codon.weight / total
        } else {
            1.0 / count
        };
    }
}
