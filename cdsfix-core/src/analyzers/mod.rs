//! Constraint analyzers.
//!
//! An analyzer detects one class of violation in the current sequence and
//! proposes corrective [`Suggestion`]s. Every iteration of a session runs all
//! registered analyzers concurrently against the same read-only
//! [`AnalysisContext`]; each writes its proposals through a
//! [`SuggestionEmitter`] and signals completion by returning.
//!
//! Analyzers keep no mutable state between iterations. Implementations must be
//! `Send + Sync` since they run on the session's thread pool.
//!
//! ## Built-in analyzers
//!
//! - [`MotifRemover`]: removes forbidden motifs on both strands
//! - [`GcContentFixer`]: pulls global GC content into a window
//! - [`RepeatRemover`]: breaks exact and inverted repeats
//!
//! Closures can be registered with [`from_fn`].

pub mod gc_content;
pub mod motif;
pub mod repeat;

use std::fmt;

use crate::aggregator::SuggestionEmitter;
use crate::codon::{CodonTable, RankedCodon};
use crate::constants::{CODON_LENGTH, UNRESOLVABLE_PRIORITY, USAGE_SHARE_SCALE};
use crate::sequence::CodingSequence;
use crate::types::Suggestion;

pub use gc_content::GcContentFixer;
pub use motif::{MotifOccurrence, MotifRemover};
pub use repeat::{RepeatPair, RepeatRemover};

/// Read-only view handed to every analyzer during one iteration
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub sequence: &'a CodingSequence,
    pub codon_table: &'a CodonTable,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(sequence: &'a CodingSequence, codon_table: &'a CodonTable) -> Self {
        Self {
            sequence,
            codon_table,
        }
    }

    /// Synonymous alternatives of `codon`, best ranked first, excluding the
    /// codon itself
    pub fn alternatives(&self, codon: &'a str) -> impl Iterator<Item = &'a RankedCodon> + 'a {
        self.codon_table
            .synonyms_of(codon)
            .iter()
            .filter(move |candidate| candidate.codon != codon)
    }
}

/// A scanner for one class of constraint violation.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::aggregator::SuggestionEmitter;
/// use cdsfix_core::analyzers::{AnalysisContext, Analyzer};
/// use cdsfix_core::types::Suggestion;
///
/// /// Replaces every TTA leucine codon with CTG
/// struct NoTta;
///
/// impl Analyzer for NoTta {
///     fn name(&self) -> &str {
///         "no-tta"
///     }
///
///     fn analyze(&self, context: &AnalysisContext<'_>, emitter: &SuggestionEmitter<'_>) {
///         for (slot, codon) in context.sequence.codons() {
///             if codon == "TTA" {
///                 emitter.emit(Suggestion::new(slot.position, 3, "CTG", 1, "TTA codon"));
///             }
///         }
///     }
/// }
/// ```
pub trait Analyzer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Scan `context` and emit zero or more suggestions
    fn analyze(&self, context: &AnalysisContext<'_>, emitter: &SuggestionEmitter<'_>);
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn analyze(&self, context: &AnalysisContext<'_>, emitter: &SuggestionEmitter<'_>) {
        (**self).analyze(context, emitter);
    }
}

/// Analyzer backed by a closure
pub struct FnAnalyzer<F> {
    name: String,
    analyze: F,
}

impl<F> FnAnalyzer<F>
where
    F: Fn(&AnalysisContext<'_>, &SuggestionEmitter<'_>) + Send + Sync,
{
    pub fn new(name: impl Into<String>, analyze: F) -> Self {
        Self {
            name: name.into(),
            analyze,
        }
    }
}

impl<F> Analyzer for FnAnalyzer<F>
where
    F: Fn(&AnalysisContext<'_>, &SuggestionEmitter<'_>) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(&self, context: &AnalysisContext<'_>, emitter: &SuggestionEmitter<'_>) {
        (self.analyze)(context, emitter);
    }
}

impl<F> fmt::Debug for FnAnalyzer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAnalyzer")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Register a closure as an analyzer.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::analyzers::{from_fn, Analyzer};
/// use cdsfix_core::types::Suggestion;
///
/// let analyzer = from_fn("always-gga", |context, emitter| {
///     if context.sequence.codon(0) == Some("GGT") {
///         emitter.emit(Suggestion::new(0, 3, "GGA", 1, "prefer GGA"));
///     }
/// });
/// assert_eq!(analyzer.name(), "always-gga");
/// ```
pub fn from_fn<F>(name: impl Into<String>, analyze: F) -> FnAnalyzer<F>
where
    F: Fn(&AnalysisContext<'_>, &SuggestionEmitter<'_>) + Send + Sync,
{
    FnAnalyzer::new(name, analyze)
}

/// Usage share in per-mille, the last priority tier of built-in analyzers
pub(crate) fn usage_permille(codon: &RankedCodon) -> i64 {
    (codon.share * USAGE_SHARE_SCALE).round() as i64
}

/// Suggestion that rewrites a codon with itself.
///
/// Built-ins emit it for violations no synonymous substitution can address;
/// the resulting state is the current one, so the session stops with
/// `NoProgress` instead of reporting success.
pub(crate) fn unresolvable(position: usize, codon: &str, reason: &str) -> Suggestion {
    Suggestion::new(position, codon.len(), codon, UNRESOLVABLE_PRIORITY, reason)
}

/// Codon-aligned slot offsets overlapping `[start, end)`
pub(crate) fn overlapping_codons(start: usize, end: usize) -> impl Iterator<Item = usize> {
    let slots = if end > start {
        start / CODON_LENGTH..end.div_ceil(CODON_LENGTH)
    } else {
        0..0
    };
    slots.map(|index| index * CODON_LENGTH)
}
