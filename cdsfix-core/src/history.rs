use std::collections::HashSet;

use tracing::trace;

use crate::sequence::CodingSequence;
use crate::types::{ChangeRecord, Suggestion};

/// Session audit trail and cycle detector.
///
/// Holds every sequence state observed in the session, the initial one
/// included, and the ordered list of committed changes.
#[derive(Debug, Clone, Default)]
pub struct History {
    seen: HashSet<String>,
    changes: Vec<ChangeRecord>,
}

impl History {
    /// Start a history whose first observed state is `initial`
    pub fn new(initial: &str) -> Self {
        Self {
            seen: HashSet::from([initial.to_string()]),
            changes: Vec::new(),
        }
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn into_changes(self) -> Vec<ChangeRecord> {
        self.changes
    }

    /// Number of distinct states observed
    pub fn states_seen(&self) -> usize {
        self.seen.len()
    }

    pub fn has_seen(&self, state: &str) -> bool {
        self.seen.contains(state)
    }

    /// Apply the first candidate, in the given order, whose result is a state
    /// not observed before.
    ///
    /// Candidates must already be validated. Returns the committed change, or
    /// `None` when every candidate would revisit an earlier state.
    pub fn apply_first_novel(
        &mut self,
        sequence: &mut CodingSequence,
        candidates: &[Suggestion],
    ) -> Option<&ChangeRecord> {
        for suggestion in candidates {
            let Some(candidate) =
                sequence.splice(suggestion.position, suggestion.length, &suggestion.replacement)
            else {
                continue;
            };

            if self.seen.contains(&candidate) {
                trace!(
                    position = suggestion.position,
                    replacement = %suggestion.replacement,
                    "candidate revisits an earlier state"
                );
                continue;
            }

            let end = suggestion.position + suggestion.length;
            let from = sequence.as_str()[suggestion.position..end].to_string();

            self.seen.insert(candidate.clone());
            sequence.commit(candidate);
            self.changes.push(ChangeRecord {
                position: suggestion.position,
                from,
                to: suggestion.replacement.clone(),
                reason: suggestion.reason.clone(),
            });
            return self.changes.last();
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::CodonTable;

    #[test]
    fn test_initial_state_is_seen() {
        let history = History::new("ATG");
        assert!(history.has_seen("ATG"));
        assert_eq!(history.states_seen(), 1);
        assert!(history.changes().is_empty());
    }

    #[test]
    fn test_apply_records_change() {
        let table = CodonTable::uniform(1).unwrap();
        let mut sequence = CodingSequence::new("ATGTATTGA", &table).unwrap();
        let mut history = History::new(sequence.as_str());

        let candidates = [Suggestion::new(3, 3, "TAC", 1, "Remove TAT")];
        let change = history
            .apply_first_novel(&mut sequence, &candidates)
            .cloned()
            .unwrap();

        assert_eq!(sequence.as_str(), "ATGTACTGA");
        assert_eq!(
            change,
            ChangeRecord {
                position: 3,
                from: "TAT".to_string(),
                to: "TAC".to_string(),
                reason: "Remove TAT".to_string(),
            }
        );
        assert!(history.has_seen("ATGTACTGA"));
    }

    #[test]
    fn test_skips_candidates_that_revisit() {
        let table = CodonTable::uniform(1).unwrap();
        let mut sequence = CodingSequence::new("GGT", &table).unwrap();
        let mut history = History::new(sequence.as_str());

        let first = [Suggestion::new(0, 3, "GGA", 1, "flip")];
        assert!(history.apply_first_novel(&mut sequence, &first).is_some());

        let candidates = [
            Suggestion::new(0, 3, "GGT", 5, "flip back"),
            Suggestion::new(0, 3, "GGC", 1, "elsewhere"),
        ];
        let change = history
            .apply_first_novel(&mut sequence, &candidates)
            .cloned()
            .unwrap();
        assert_eq!(change.to, "GGC");
        assert_eq!(history.changes().len(), 2);
    }

    #[test]
    fn test_no_novel_candidate() {
        let table = CodonTable::uniform(1).unwrap();
        let mut sequence = CodingSequence::new("ATG", &table).unwrap();
        let mut history = History::new(sequence.as_str());

        let identity = [Suggestion::new(0, 3, "ATG", i64::MIN, "stuck")];
        assert!(history.apply_first_novel(&mut sequence, &identity).is_none());
        assert!(history.changes().is_empty());
        assert_eq!(sequence.as_str(), "ATG");
    }
}
