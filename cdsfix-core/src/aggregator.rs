//! Concurrent suggestion collection, validation and ranking.
//!
//! One round fans the registered analyzers out on the session's rayon pool,
//! one task each, against a shared read-only snapshot. The tasks append to a
//! [`SuggestionSink`] that lives for that round only; the scope join is the
//! barrier after which the sink is drained, ranked and validated.

use std::sync::{Mutex, PoisonError};

use rayon::ThreadPool;
use tracing::{debug, trace, warn};

use crate::analyzers::{AnalysisContext, Analyzer};
use crate::codon::CodonTable;
use crate::constants::CODON_LENGTH;
use crate::sequence::{CodingSequence, first_invalid_nucleotide};
use crate::types::{Suggestion, SuggestionError};

/// A suggestion tagged with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedSuggestion {
    /// Registration index of the analyzer that emitted it
    pub analyzer: usize,
    /// Global emission order within the round
    pub emission: usize,
    pub suggestion: Suggestion,
}

/// Append-only, mutex-guarded collection point for one round
#[derive(Debug, Default)]
pub struct SuggestionSink {
    entries: Mutex<Vec<EmittedSuggestion>>,
}

impl SuggestionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle through which analyzer `analyzer` appends to this sink
    pub fn emitter(&self, analyzer: usize) -> SuggestionEmitter<'_> {
        SuggestionEmitter {
            sink: self,
            analyzer,
        }
    }

    fn push(&self, analyzer: usize, suggestion: Suggestion) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let emission = entries.len();
        entries.push(EmittedSuggestion {
            analyzer,
            emission,
            suggestion,
        });
    }

    /// Everything emitted so far, in emission order
    pub fn into_emitted(self) -> Vec<EmittedSuggestion> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Emitted suggestions without their origin tags
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.into_emitted()
            .into_iter()
            .map(|emitted| emitted.suggestion)
            .collect()
    }
}

/// Write handle given to one analyzer for one round
#[derive(Debug, Clone, Copy)]
pub struct SuggestionEmitter<'a> {
    sink: &'a SuggestionSink,
    analyzer: usize,
}

impl SuggestionEmitter<'_> {
    /// Append a suggestion to the round's sink
    pub fn emit(&self, suggestion: Suggestion) {
        self.sink.push(self.analyzer, suggestion);
    }

    /// Registration index of the analyzer holding this handle
    pub fn analyzer(&self) -> usize {
        self.analyzer
    }
}

/// Result of one aggregation round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// No analyzer reported a violation
    Clean,
    /// Valid suggestions, best ranked first
    Candidates(Vec<Suggestion>),
}

/// Run every analyzer once against `context` and return what they emitted.
///
/// Blocks until all analyzer tasks have finished.
pub fn collect_suggestions(
    pool: &ThreadPool,
    analyzers: &[Box<dyn Analyzer>],
    context: &AnalysisContext<'_>,
) -> Vec<EmittedSuggestion> {
    let sink = SuggestionSink::new();

    pool.scope(|scope| {
        for (index, analyzer) in analyzers.iter().enumerate() {
            let emitter = sink.emitter(index);
            scope.spawn(move |_| {
                trace!(analyzer = analyzer.name(), "analyzer started");
                analyzer.analyze(context, &emitter);
            });
        }
    });

    sink.into_emitted()
}

/// Order suggestions by priority (descending), then analyzer registration
/// order, position and emission order.
pub fn rank(emitted: &mut [EmittedSuggestion]) {
    emitted.sort_by(|a, b| {
        b.suggestion
            .priority
            .cmp(&a.suggestion.priority)
            .then_with(|| a.analyzer.cmp(&b.analyzer))
            .then_with(|| a.suggestion.position.cmp(&b.suggestion.position))
            .then_with(|| a.emission.cmp(&b.emission))
    });
}

/// Check that applying `suggestion` keeps `sequence` a valid coding sequence
/// for the same protein.
///
/// # Errors
///
/// - [`SuggestionError::InvalidSuggestionRange`] if the range leaves the sequence
/// - [`SuggestionError::InvalidNucleotide`] if the replacement is not over {A, C, G, T}
/// - [`SuggestionError::TranslationMismatch`] if the codon-aligned span around
///   the edit translates differently afterwards, or the replacement length
///   differs from the replaced length
pub fn validate_suggestion(
    suggestion: &Suggestion,
    sequence: &CodingSequence,
    codon_table: &CodonTable,
) -> Result<(), SuggestionError> {
    let sequence_length = sequence.len();
    let end = suggestion
        .end()
        .filter(|&end| end <= sequence_length)
        .ok_or(SuggestionError::InvalidSuggestionRange {
            position: suggestion.position,
            length: suggestion.length,
            sequence_length,
        })?;

    if let Some((offset, found)) = first_invalid_nucleotide(&suggestion.replacement) {
        return Err(SuggestionError::InvalidNucleotide {
            position: suggestion.position + offset,
            found,
        });
    }

    let span_start = suggestion.position / CODON_LENGTH * CODON_LENGTH;
    let span_end = end.div_ceil(CODON_LENGTH) * CODON_LENGTH;
    let bytes = sequence.as_bytes();

    let mut patched = Vec::with_capacity(span_end - span_start + suggestion.replacement.len());
    patched.extend_from_slice(&bytes[span_start..suggestion.position]);
    patched.extend_from_slice(suggestion.replacement.as_bytes());
    patched.extend_from_slice(&bytes[end..span_end]);

    let expected = codon_table.translate(&bytes[span_start..span_end]);
    let found = codon_table.translate(&patched);

    if suggestion.replacement.len() != suggestion.length || expected != found {
        return Err(SuggestionError::TranslationMismatch {
            position: suggestion.position,
            expected,
            found,
        });
    }

    Ok(())
}

/// Collect, rank and validate one round of suggestions.
///
/// Invalid suggestions are dropped while at least one valid suggestion
/// remains.
///
/// # Errors
///
/// Returns the first validation error in ranking order when every suggestion
/// of the round is invalid.
pub fn run_round(
    pool: &ThreadPool,
    analyzers: &[Box<dyn Analyzer>],
    context: &AnalysisContext<'_>,
) -> Result<RoundOutcome, SuggestionError> {
    let mut emitted = collect_suggestions(pool, analyzers, context);
    if emitted.is_empty() {
        return Ok(RoundOutcome::Clean);
    }

    rank(&mut emitted);
    debug!(suggestions = emitted.len(), "collected suggestions");

    let mut valid = Vec::with_capacity(emitted.len());
    let mut first_error = None;

    for candidate in emitted {
        match validate_suggestion(&candidate.suggestion, context.sequence, context.codon_table) {
            Ok(()) => valid.push(candidate.suggestion),
            Err(error) => {
                warn!(
                    analyzer = analyzers
                        .get(candidate.analyzer)
                        .map_or("unknown", |analyzer| analyzer.name()),
                    position = candidate.suggestion.position,
                    %error,
                    "discarding invalid suggestion"
                );
                first_error.get_or_insert(error);
            }
        }
    }

    match first_error {
        Some(error) if valid.is_empty() => Err(error),
        _ => Ok(RoundOutcome::Candidates(valid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::from_fn;

    fn pool(threads: usize) -> ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    fn table() -> CodonTable {
        CodonTable::uniform(1).unwrap()
    }

    fn emitted(analyzer: usize, emission: usize, position: usize, priority: i64) -> EmittedSuggestion {
        EmittedSuggestion {
            analyzer,
            emission,
            suggestion: Suggestion::new(position, 3, "AAA", priority, "test"),
        }
    }

    #[test]
    fn test_rank_total_order() {
        let mut suggestions = vec![
            emitted(1, 0, 0, 5),
            emitted(0, 1, 6, 5),
            emitted(0, 2, 3, 5),
            emitted(2, 3, 0, 9),
            emitted(0, 4, 3, 5),
        ];
        rank(&mut suggestions);
        let order: Vec<_> = suggestions.iter().map(|entry| entry.emission).collect();
        assert_eq!(order, [3, 2, 4, 1, 0]);
    }

    #[test]
    fn test_validate_range() {
        let table = table();
        let sequence = CodingSequence::new("ATGTAT", &table).unwrap();

        let past_end = Suggestion::new(4, 3, "AAA", 0, "past end");
        assert_eq!(
            validate_suggestion(&past_end, &sequence, &table).unwrap_err(),
            SuggestionError::InvalidSuggestionRange {
                position: 4,
                length: 3,
                sequence_length: 6,
            }
        );

        let overflow = Suggestion::new(usize::MAX, 2, "AA", 0, "overflow");
        assert!(matches!(
            validate_suggestion(&overflow, &sequence, &table).unwrap_err(),
            SuggestionError::InvalidSuggestionRange { .. }
        ));
    }

    #[test]
    fn test_validate_alphabet() {
        let table = table();
        let sequence = CodingSequence::new("ATG", &table).unwrap();
        let suggestion = Suggestion::new(0, 2, "XY", 0, "bad");
        assert_eq!(
            validate_suggestion(&suggestion, &sequence, &table).unwrap_err(),
            SuggestionError::InvalidNucleotide {
                position: 0,
                found: 'X'
            }
        );
    }

    #[test]
    fn test_validate_translation() {
        let table = table();
        let sequence = CodingSequence::new("ATGTATTGA", &table).unwrap();

        let synonymous = Suggestion::new(3, 3, "TAC", 0, "ok");
        assert!(validate_suggestion(&synonymous, &sequence, &table).is_ok());

        let third_base = Suggestion::new(5, 1, "C", 0, "ok");
        assert!(validate_suggestion(&third_base, &sequence, &table).is_ok());

        let missense = Suggestion::new(3, 3, "TGT", 0, "Y to C");
        assert_eq!(
            validate_suggestion(&missense, &sequence, &table).unwrap_err(),
            SuggestionError::TranslationMismatch {
                position: 3,
                expected: "Y".to_string(),
                found: "C".to_string(),
            }
        );

        // TAT TGA -> TAC CGA
        let straddling = Suggestion::new(5, 2, "CC", 0, "Y* to YR");
        assert_eq!(
            validate_suggestion(&straddling, &sequence, &table).unwrap_err(),
            SuggestionError::TranslationMismatch {
                position: 5,
                expected: "Y*".to_string(),
                found: "YR".to_string(),
            }
        );

        // Base 6 is already T, so this straddling edit only touches TAT
        let silent_straddle = Suggestion::new(5, 2, "CT", 0, "Y* kept");
        assert!(validate_suggestion(&silent_straddle, &sequence, &table).is_ok());
    }

    #[test]
    fn test_validate_length_change() {
        let table = table();
        let sequence = CodingSequence::new("ATGTATTGA", &table).unwrap();
        let shrink = Suggestion::new(3, 3, "", 0, "delete codon");
        assert!(matches!(
            validate_suggestion(&shrink, &sequence, &table).unwrap_err(),
            SuggestionError::TranslationMismatch { .. }
        ));
        let grow = Suggestion::new(3, 3, "TACTAC", 0, "duplicate codon");
        assert!(matches!(
            validate_suggestion(&grow, &sequence, &table).unwrap_err(),
            SuggestionError::TranslationMismatch { .. }
        ));
    }

    #[test]
    fn test_run_round_clean() {
        let table = table();
        let sequence = CodingSequence::new("ATG", &table).unwrap();
        let context = AnalysisContext::new(&sequence, &table);
        let analyzers: Vec<Box<dyn Analyzer>> = vec![Box::new(from_fn("quiet", |_, _| {}))];
        assert_eq!(
            run_round(&pool(1), &analyzers, &context).unwrap(),
            RoundOutcome::Clean
        );
    }

    #[test]
    fn test_run_round_discards_invalid() {
        let table = table();
        let sequence = CodingSequence::new("ATGTAT", &table).unwrap();
        let context = AnalysisContext::new(&sequence, &table);
        let analyzers: Vec<Box<dyn Analyzer>> = vec![
            Box::new(from_fn("bad", |_, emitter| {
                emitter.emit(Suggestion::new(3, 3, "TGT", 100, "missense"));
            })),
            Box::new(from_fn("good", |_, emitter| {
                emitter.emit(Suggestion::new(3, 3, "TAC", 1, "synonymous"));
            })),
        ];
        let outcome = run_round(&pool(2), &analyzers, &context).unwrap();
        assert_eq!(
            outcome,
            RoundOutcome::Candidates(vec![Suggestion::new(3, 3, "TAC", 1, "synonymous")])
        );
    }

    #[test]
    fn test_run_round_all_invalid_reports_best_ranked() {
        let table = table();
        let sequence = CodingSequence::new("ATG", &table).unwrap();
        let context = AnalysisContext::new(&sequence, &table);
        let analyzers: Vec<Box<dyn Analyzer>> = vec![
            Box::new(from_fn("low", |_, emitter| {
                emitter.emit(Suggestion::new(9, 3, "AAA", 1, "out of range"));
            })),
            Box::new(from_fn("high", |_, emitter| {
                emitter.emit(Suggestion::new(0, 2, "XY", 2, "bad letters"));
            })),
        ];
        let error = run_round(&pool(2), &analyzers, &context).unwrap_err();
        assert!(matches!(error, SuggestionError::InvalidNucleotide { .. }));
    }

    #[test]
    fn test_collect_tags_analyzer_index() {
        let table = table();
        let sequence = CodingSequence::new("ATG", &table).unwrap();
        let context = AnalysisContext::new(&sequence, &table);
        let analyzers: Vec<Box<dyn Analyzer>> = (0..4)
            .map(|index| {
                Box::new(from_fn(format!("a{index}"), move |_, emitter| {
                    emitter.emit(Suggestion::new(0, 3, "ATG", index, "tag"));
                })) as Box<dyn Analyzer>
            })
            .collect();

        let mut emitted = collect_suggestions(&pool(2), &analyzers, &context);
        assert_eq!(emitted.len(), 4);
        emitted.sort_by_key(|entry| entry.analyzer);
        for (index, entry) in emitted.iter().enumerate() {
            assert_eq!(entry.analyzer, index);
            assert_eq!(entry.suggestion.priority, index as i64);
        }
    }
}
