use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A proposed edit produced by an analyzer during one iteration.
///
/// Suggestions are transient: they live only for the iteration that produced
/// them. The aggregator validates and ranks them; the applier commits at most
/// one per iteration.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::types::Suggestion;
///
/// let suggestion = Suggestion::new(3, 3, "TAC", 10, "Remove TAT");
/// assert_eq!(suggestion.end(), Some(6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Nucleotide offset where the replacement starts
    pub position: usize,
    /// Number of nucleotides replaced
    pub length: usize,
    /// Candidate substring spliced in at `position`
    pub replacement: String,
    /// Rank weight, higher wins
    pub priority: i64,
    /// Free-text reason carried into the change log
    pub reason: String,
}

impl Suggestion {
    /// Create a suggestion replacing `length` nucleotides at `position`
    pub fn new(
        position: usize,
        length: usize,
        replacement: impl Into<String>,
        priority: i64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            position,
            length,
            replacement: replacement.into(),
            priority,
            reason: reason.into(),
        }
    }

    /// Exclusive end offset of the replaced range, `None` on overflow
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.position.checked_add(self.length)
    }
}

/// One committed edit in a session's audit trail.
///
/// Records are appended in session order. Rendering them with [`fmt::Display`]
/// gives the human-readable change log line.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::types::ChangeRecord;
///
/// let change = ChangeRecord {
///     position: 3,
///     from: "TAT".to_string(),
///     to: "TAC".to_string(),
///     reason: "Forbidden motif".to_string(),
/// };
/// assert_eq!(
///     change.to_string(),
///     "Changed position 3 from TAT to TAC for reason: Forbidden motif"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Nucleotide offset of the edit
    pub position: usize,
    /// Nucleotides present before the edit
    pub from: String,
    /// Nucleotides written by the edit
    pub to: String,
    /// Reason given by the analyzer that proposed the edit
    pub reason: String,
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Changed position {} from {} to {} for reason: {}",
            self.position, self.from, self.to, self.reason
        )
    }
}

/// Problems with the caller's input sequence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Sequence cannot be segmented into whole codons
    #[error("sequence length {length} is not a multiple of 3")]
    LengthNotMultipleOfThree { length: usize },
    /// Sequence contains something other than A, C, G or T
    #[error("invalid nucleotide {found:?} at position {position}")]
    InvalidNucleotide { position: usize, found: char },
}

/// Problems building a [`CodonTable`](crate::codon::CodonTable)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodonTableError {
    /// Some of the 64 codons are not assigned to any amino acid
    #[error("incomplete codon table: {} codon(s) unassigned ({})", .missing.len(), .missing.join(", "))]
    IncompleteCodonTable { missing: Vec<String> },
    /// A codon appears more than once in the mapping
    #[error("codon {codon} assigned to both {first} and {second}")]
    DuplicateCodon {
        codon: String,
        first: char,
        second: char,
    },
    /// Codon is not three letters from {A, C, G, T}
    #[error("invalid codon {0:?}")]
    InvalidCodon(String),
    /// Amino acid listed without any codon
    #[error("amino acid {0} has no codons")]
    EmptyAminoAcid(char),
    /// Usage weight is negative, infinite or NaN
    #[error("invalid usage weight {weight} for codon {codon}")]
    InvalidWeight { codon: String, weight: f64 },
    /// No NCBI genetic code with this identifier
    #[error("unknown genetic code {0}")]
    UnknownGeneticCode(u8),
}

/// Reasons a single suggestion is rejected by the aggregator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestionError {
    /// Replaced range falls outside the sequence
    #[error(
        "suggestion range {position}+{length} is outside a sequence of length {sequence_length}"
    )]
    InvalidSuggestionRange {
        position: usize,
        length: usize,
        sequence_length: usize,
    },
    /// Replacement contains something other than A, C, G or T
    #[error("suggestion at position {position} contains invalid nucleotide {found:?}")]
    InvalidNucleotide { position: usize, found: char },
    /// Substitution would change the encoded protein
    #[error("suggestion at position {position} changes translation from {expected} to {found}")]
    TranslationMismatch {
        position: usize,
        expected: String,
        found: String,
    },
}

/// Terminal failures of a fixing session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixError {
    /// Input sequence rejected before any analyzer ran
    #[error("input error: {0}")]
    Input(#[from] InputError),
    /// Codon table failed validation
    #[error("codon table error: {0}")]
    CodonTable(#[from] CodonTableError),
    /// Every suggestion of an iteration was invalid
    #[error("no usable suggestion: {0}")]
    Suggestion(#[from] SuggestionError),
    /// Every candidate of an iteration would revisit an earlier state
    #[error("no progress at iteration {iteration}: every candidate revisits an earlier sequence")]
    NoProgress { iteration: usize },
    /// Iteration cap reached while violations remain
    #[error("failed to converge within {max_iterations} iterations")]
    FailedToConverge { max_iterations: usize },
    /// Analyzer thread pool could not be created
    #[error("failed to build analyzer thread pool: {0}")]
    ThreadPool(String),
}
