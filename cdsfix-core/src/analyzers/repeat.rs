use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::trace;

use crate::aggregator::SuggestionEmitter;
use crate::analyzers::{AnalysisContext, Analyzer, overlapping_codons, unresolvable, usage_permille};
use crate::codon::RankedCodon;
use crate::constants::{CODON_LENGTH, REPEAT_BREAK_WEIGHT};
use crate::sequence::reverse_complement;
use crate::types::Suggestion;

/// Two windows of a sequence that match exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatPair {
    /// Start of the earliest instance of the window
    pub first: usize,
    /// Start of the later instance
    pub second: usize,
    /// The later instance is the reverse complement of the first
    pub inverted: bool,
}

/// Breaks exact repeats of `window` or more bases.
///
/// A repeat is a window-sized substring found again later in the sequence,
/// either verbatim or as its reverse complement (an inverted repeat). For
/// each repeat the remover proposes, per codon inside either instance, every
/// synonym that makes the two instances differ.
///
/// # Priority
///
/// Number of repeats the substitution breaks, counted over every repeat the
/// codon takes part in, then codon usage share.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::analyzers::RepeatRemover;
///
/// let remover = RepeatRemover::new(6);
/// let repeats = remover.find_repeats(b"ACGTTGCAAACGTTG");
/// assert_eq!(repeats.len(), 1);
/// assert_eq!((repeats[0].first, repeats[0].second), (0, 9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatRemover {
    window: usize,
}

impl RepeatRemover {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Every window that repeats an earlier window, paired with the earliest
    /// instance it matches.
    pub fn find_repeats(&self, sequence: &[u8]) -> Vec<RepeatPair> {
        if self.window == 0 || sequence.len() < self.window {
            return Vec::new();
        }

        let mut first_seen: HashMap<&[u8], usize> = HashMap::new();
        let mut pairs = Vec::new();

        for (second, kmer) in sequence.windows(self.window).enumerate() {
            if let Some(&first) = first_seen.get(kmer) {
                pairs.push(RepeatPair {
                    first,
                    second,
                    inverted: false,
                });
            } else if let Some(&first) = first_seen.get(reverse_complement(kmer).as_slice()) {
                pairs.push(RepeatPair {
                    first,
                    second,
                    inverted: true,
                });
            }
            first_seen.entry(kmer).or_insert(second);
        }

        pairs
    }

    fn instance(&self, sequence: &[u8], start: usize, position: usize, codon: &[u8]) -> Vec<u8> {
        (start..start + self.window)
            .map(|index| {
                if (position..position + CODON_LENGTH).contains(&index) {
                    codon[index - position]
                } else {
                    sequence[index]
                }
            })
            .collect()
    }

    /// Whether writing `codon` at `position` makes the pair's instances differ
    fn breaks(&self, sequence: &[u8], pair: &RepeatPair, position: usize, codon: &[u8]) -> bool {
        let first = self.instance(sequence, pair.first, position, codon);
        let second = self.instance(sequence, pair.second, position, codon);
        if pair.inverted {
            first != reverse_complement(&second)
        } else {
            first != second
        }
    }
}

impl Analyzer for RepeatRemover {
    fn name(&self) -> &str {
        "repeat-remover"
    }

    fn analyze(&self, context: &AnalysisContext<'_>, emitter: &SuggestionEmitter<'_>) {
        let sequence = context.sequence.as_bytes();
        let pairs = self.find_repeats(sequence);
        if pairs.is_empty() {
            return;
        }
        trace!(repeats = pairs.len(), window = self.window, "repeats present");

        let mut breaks: BTreeMap<(usize, &str), (i64, &RankedCodon)> = BTreeMap::new();
        let mut stuck: BTreeSet<usize> = BTreeSet::new();

        for pair in &pairs {
            let codons: BTreeSet<usize> = overlapping_codons(pair.first, pair.first + self.window)
                .chain(overlapping_codons(pair.second, pair.second + self.window))
                .collect();

            let mut broken = false;
            for position in codons {
                let Some(current) = context.sequence.codon(position / CODON_LENGTH) else {
                    continue;
                };
                let breakers = context
                    .alternatives(current)
                    .filter(|alternative| self.breaks(sequence, pair, position, alternative.codon.as_bytes()));

                for alternative in breakers {
                    breaks
                        .entry((position, alternative.codon.as_str()))
                        .or_insert((0, alternative))
                        .0 += 1;
                    broken = true;
                }
            }

            if !broken {
                stuck.insert(pair.second / CODON_LENGTH * CODON_LENGTH);
            }
        }

        let reason = format!("Repeat of {} bases", self.window);

        for ((position, _), (count, alternative)) in breaks {
            emitter.emit(Suggestion::new(
                position,
                CODON_LENGTH,
                alternative.codon.clone(),
                count * REPEAT_BREAK_WEIGHT + usage_permille(alternative),
                reason.clone(),
            ));
        }

        for position in stuck {
            if let Some(current) = context.sequence.codon(position / CODON_LENGTH) {
                emitter.emit(unresolvable(position, current, &reason));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SuggestionSink;
    use crate::codon::CodonTable;
    use crate::sequence::CodingSequence;

    fn suggestions(remover: &RepeatRemover, sequence: &str) -> Vec<Suggestion> {
        let table = CodonTable::uniform(1).unwrap();
        let sequence = CodingSequence::new(sequence, &table).unwrap();
        let context = AnalysisContext::new(&sequence, &table);
        let sink = SuggestionSink::new();
        remover.analyze(&context, &sink.emitter(0));
        sink.into_suggestions()
    }

    #[test]
    fn test_find_direct_repeats() {
        let remover = RepeatRemover::new(4);
        let pairs = remover.find_repeats(b"GATCAAGATC");
        assert!(pairs.contains(&RepeatPair {
            first: 0,
            second: 6,
            inverted: false,
        }));
    }

    #[test]
    fn test_find_inverted_repeats() {
        let remover = RepeatRemover::new(6);
        // AAACCC ... GGGTTT
        let pairs = remover.find_repeats(b"AAACCCTATGGGTTT");
        assert_eq!(
            pairs,
            vec![RepeatPair {
                first: 0,
                second: 9,
                inverted: true,
            }]
        );
    }

    #[test]
    fn test_short_or_zero_window() {
        assert!(RepeatRemover::new(0).find_repeats(b"AAAAAA").is_empty());
        assert!(RepeatRemover::new(10).find_repeats(b"AAAAAA").is_empty());
    }

    #[test]
    fn test_counts_repeats_broken_per_edit() {
        // Lys-Lys-Lys twice: AAGAAGAAG is found at 0 and 9
        let remover = RepeatRemover::new(9);
        let proposals = suggestions(&remover, "AAGAAGAAGAAGAAGAAG");
        assert!(!proposals.is_empty());
        assert!(proposals.iter().all(|s| s.replacement == "AAA"));
        let strongest = proposals.iter().map(|s| s.priority).max().unwrap();
        assert!(strongest >= 2 * REPEAT_BREAK_WEIGHT);
        assert_eq!(proposals[0].reason, "Repeat of 9 bases");
    }

    #[test]
    fn test_every_breaking_synonym_is_credited() {
        // CTGAAA twice: any Leu synonym at 0 breaks the pair, not only the best ranked
        let remover = RepeatRemover::new(6);
        let proposals = suggestions(&remover, "CTGAAACTGAAA");

        let mut at_start: Vec<_> = proposals
            .iter()
            .filter(|s| s.position == 0)
            .map(|s| (s.replacement.as_str(), s.priority))
            .collect();
        at_start.sort();
        assert_eq!(
            at_start,
            [
                ("CTA", REPEAT_BREAK_WEIGHT + 167),
                ("CTC", REPEAT_BREAK_WEIGHT + 167),
                ("CTT", REPEAT_BREAK_WEIGHT + 167),
                ("TTA", REPEAT_BREAK_WEIGHT + 167),
                ("TTG", REPEAT_BREAK_WEIGHT + 167),
            ]
        );
        assert!(proposals.iter().any(|s| s.position == 9 && s.replacement == "AAG"));
    }

    #[test]
    fn test_unbreakable_repeat_emits_identity() {
        let remover = RepeatRemover::new(6);
        let proposals = suggestions(&remover, "ATGTGGATGTGG");
        assert!(!proposals.is_empty());
        assert!(proposals.iter().all(|s| s.priority == i64::MIN));
        assert!(proposals.iter().all(|s| s.replacement == "ATG" || s.replacement == "TGG"));
    }

    #[test]
    fn test_unique_sequence_is_silent() {
        let remover = RepeatRemover::new(6);
        assert!(suggestions(&remover, "ATGAAACCCTTTGGGTAA").is_empty());
    }
}
