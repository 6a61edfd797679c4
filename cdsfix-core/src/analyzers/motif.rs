use std::collections::BTreeSet;
use std::ops::Range;

use bio::bio_types::strand::Strand;
use tracing::trace;

use crate::aggregator::SuggestionEmitter;
use crate::analyzers::{AnalysisContext, Analyzer, overlapping_codons, unresolvable, usage_permille};
use crate::constants::{CODON_LENGTH, MOTIF_ELIMINATION_WEIGHT, MOTIF_GC_SHIFT_PENALTY};
use crate::sequence::{count_gc, find_occurrences, reverse_complement};
use crate::types::Suggestion;

/// A forbidden motif found in a sequence, in forward-strand coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct MotifOccurrence {
    /// The motif as configured
    pub motif: String,
    /// Start offset of the matched bases on the forward strand
    pub start: usize,
    /// Exclusive end offset on the forward strand
    pub end: usize,
    /// [`Strand::Reverse`] when the motif reads on the reverse complement
    pub strand: Strand,
}

#[derive(Debug, Clone)]
struct Pattern {
    /// Bases as they appear on the forward strand
    bases: Vec<u8>,
    motif: usize,
    strand: Strand,
}

/// Removes forbidden motifs, such as restriction sites, from both strands.
///
/// Every occurrence of a motif, on the sequence or on its reverse complement,
/// is a violation. For each occurrence and each codon it overlaps, the remover
/// proposes every synonymous codon that destroys the occurrence.
///
/// # Priority
///
/// 1. Net number of motif occurrences eliminated, counted across all motifs
///    and both strands around the edited codon
/// 2. Smaller change in G/C bases
/// 3. Higher codon usage share
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::analyzers::MotifRemover;
/// use bio::bio_types::strand::Strand;
///
/// let bsmbi = MotifRemover::new(["CGTCTC"], "BsmBI site");
/// let found = bsmbi.occurrences(b"GGACGAGACGGC");
///
/// assert_eq!(found.len(), 1);
/// assert_eq!((found[0].start, found[0].end), (4, 10));
/// assert_eq!(found[0].strand, Strand::Reverse);
/// ```
#[derive(Debug, Clone)]
pub struct MotifRemover {
    motifs: Vec<String>,
    patterns: Vec<Pattern>,
    longest: usize,
    reason: String,
}

impl MotifRemover {
    /// Create a remover for `motifs`, reporting `reason` in the change log.
    ///
    /// Motifs are upper-cased; empty and repeated motifs are ignored.
    pub fn new<I, S>(motifs: I, reason: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for motif in motifs {
            let motif = motif.as_ref().to_ascii_uppercase();
            if !motif.is_empty() && !unique.contains(&motif) {
                unique.push(motif);
            }
        }

        let mut patterns = Vec::with_capacity(unique.len() * 2);
        for (index, motif) in unique.iter().enumerate() {
            let forward = motif.as_bytes().to_vec();
            let reverse = reverse_complement(&forward);
            let palindromic = reverse == forward;

            patterns.push(Pattern {
                bases: forward,
                motif: index,
                strand: Strand::Forward,
            });
            if !palindromic {
                patterns.push(Pattern {
                    bases: reverse,
                    motif: index,
                    strand: Strand::Reverse,
                });
            }
        }

        let longest = unique.iter().map(String::len).max().unwrap_or(0);

        Self {
            motifs: unique,
            patterns,
            longest,
            reason: reason.into(),
        }
    }

    pub fn motifs(&self) -> &[String] {
        &self.motifs
    }

    /// Every occurrence of every motif on either strand, ordered by start
    /// offset, then motif, forward strand first.
    ///
    /// Palindromic motifs are reported once, on the forward strand.
    pub fn occurrences(&self, sequence: &[u8]) -> Vec<MotifOccurrence> {
        self.matches(sequence)
            .into_iter()
            .map(|(start, pattern)| MotifOccurrence {
                motif: self.motifs[pattern.motif].clone(),
                start,
                end: start + pattern.bases.len(),
                strand: pattern.strand,
            })
            .collect()
    }

    fn matches(&self, sequence: &[u8]) -> Vec<(usize, &Pattern)> {
        let mut found: Vec<(usize, &Pattern)> = self
            .patterns
            .iter()
            .flat_map(|pattern| {
                find_occurrences(sequence, &pattern.bases)
                    .into_iter()
                    .map(move |start| (start, pattern))
            })
            .collect();
        found.sort_by_key(|(start, pattern)| {
            (*start, pattern.motif, pattern.strand == Strand::Reverse)
        });
        found
    }

    fn count_in(&self, window: &[u8]) -> usize {
        self.patterns
            .iter()
            .map(|pattern| find_occurrences(window, &pattern.bases).len())
            .sum()
    }

    /// Bases around the codon at `position` that any occurrence touching the
    /// codon can span
    fn local_window(&self, position: usize, sequence_length: usize) -> Range<usize> {
        let reach = self.longest.saturating_sub(1);
        let start = position.saturating_sub(reach);
        let end = (position + CODON_LENGTH + reach).min(sequence_length);
        start..end
    }
}

impl Analyzer for MotifRemover {
    fn name(&self) -> &str {
        "motif-remover"
    }

    fn analyze(&self, context: &AnalysisContext<'_>, emitter: &SuggestionEmitter<'_>) {
        let sequence = context.sequence.as_bytes();
        let matches = self.matches(sequence);
        if matches.is_empty() {
            return;
        }
        trace!(occurrences = matches.len(), "forbidden motifs present");

        let mut proposed: BTreeSet<(usize, &str)> = BTreeSet::new();

        for (start, pattern) in matches {
            let end = start + pattern.bases.len();
            let mut resolvable = false;
            let mut first_codon = None;

            for position in overlapping_codons(start, end) {
                let Some(current) = context.sequence.codon(position / CODON_LENGTH) else {
                    continue;
                };
                first_codon.get_or_insert((position, current));

                let window = self.local_window(position, sequence.len());
                let before = self.count_in(&sequence[window.clone()]);
                let offset = position - window.start;
                let target = start - window.start..end - window.start;

                for alternative in context.alternatives(current) {
                    let mut patched = sequence[window.clone()].to_vec();
                    patched[offset..offset + CODON_LENGTH]
                        .copy_from_slice(alternative.codon.as_bytes());

                    if patched[target.clone()] == pattern.bases[..] {
                        continue;
                    }
                    resolvable = true;

                    if !proposed.insert((position, alternative.codon.as_str())) {
                        continue;
                    }

                    let eliminated = before as i64 - self.count_in(&patched) as i64;
                    let gc_shift = count_gc(alternative.codon.as_bytes())
                        .abs_diff(count_gc(current.as_bytes())) as i64;
                    let priority = eliminated * MOTIF_ELIMINATION_WEIGHT
                        - gc_shift * MOTIF_GC_SHIFT_PENALTY
                        + usage_permille(alternative);

                    emitter.emit(Suggestion::new(
                        position,
                        CODON_LENGTH,
                        alternative.codon.clone(),
                        priority,
                        self.reason.clone(),
                    ));
                }
            }

            if !resolvable
                && let Some((position, current)) = first_codon
                && proposed.insert((position, current))
            {
                trace!(position, motif = %self.motifs[pattern.motif], "motif cannot be removed synonymously");
                emitter.emit(unresolvable(position, current, &self.reason));
            }
        }
    }
}
