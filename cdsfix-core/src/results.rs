use std::fmt::Write as _;

use thiserror::Error;

use crate::sequence::gc_fraction;
use crate::types::{ChangeRecord, FixError};

/// Outcome of a successful fixing session.
///
/// # Fields
///
/// - `sequence`: the rewritten sequence, translating to the input protein
/// - `changes`: every committed edit, in session order
/// - `iterations`: analysis rounds run, the final clean round included
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::codon::CodonTable;
/// use cdsfix_core::fix_simple;
///
/// let table = CodonTable::uniform(11)?;
/// let report = fix_simple("ATGTATTGA", &table, &["TAT"])?;
///
/// assert_eq!(report.sequence, "ATGTACTGA");
/// assert_eq!(report.changes.len(), 1);
/// println!("{}", report.change_log());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixReport {
    /// Final nucleotide sequence, upper case.
    pub sequence: String,

    /// Audit trail of committed edits.
    ///
    /// Empty when the input already satisfied every analyzer.
    pub changes: Vec<ChangeRecord>,

    /// Number of analysis rounds, one more than the number of changes.
    pub iterations: usize,
}

impl FixReport {
    /// GC fraction of the final sequence
    pub fn gc_content(&self) -> f64 {
        gc_fraction(self.sequence.as_bytes())
    }

    /// Human-readable change log, one line per change
    pub fn change_log(&self) -> String {
        render_changes(&self.changes)
    }
}

/// A session that ended without satisfying every analyzer.
///
/// Carries the state reached before the failure so callers can inspect or
/// salvage partial progress. [`std::error::Error::source`] is the
/// underlying [`FixError`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("fixing failed after {} change(s)", .changes.len())]
pub struct FixFailure {
    /// Why the session stopped
    #[source]
    pub error: FixError,
    /// Sequence when the session stopped; the input when validation failed
    pub sequence: String,
    /// Changes committed before the failure
    pub changes: Vec<ChangeRecord>,
}

impl FixFailure {
    pub(crate) fn new(error: FixError, sequence: String, changes: Vec<ChangeRecord>) -> Self {
        Self {
            error,
            sequence,
            changes,
        }
    }

    pub fn error(&self) -> &FixError {
        &self.error
    }

    /// Human-readable log of the changes made before the failure
    pub fn change_log(&self) -> String {
        render_changes(&self.changes)
    }
}

fn render_changes(changes: &[ChangeRecord]) -> String {
    let mut log = String::new();
    for change in changes {
        let _ = writeln!(log, "{change}");
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn change(position: usize, from: &str, to: &str) -> ChangeRecord {
        ChangeRecord {
            position,
            from: from.to_string(),
            to: to.to_string(),
            reason: "test".to_string(),
        }
    }

    #[test]
    fn test_report_change_log() {
        let report = FixReport {
            sequence: "GGACCA".to_string(),
            changes: vec![change(0, "GGG", "GGA"), change(3, "CCC", "CCA")],
            iterations: 3,
        };
        assert_eq!(
            report.change_log(),
            "Changed position 0 from GGG to GGA for reason: test\n\
             Changed position 3 from CCC to CCA for reason: test\n"
        );
        assert!((report.gc_content() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_failure_exposes_source() {
        let failure = FixFailure::new(
            FixError::NoProgress { iteration: 3 },
            "GGA".to_string(),
            vec![change(0, "GGG", "GGT"), change(0, "GGT", "GGA")],
        );
        assert_eq!(failure.to_string(), "fixing failed after 2 change(s)");
        let source = failure.source().unwrap();
        assert!(source.to_string().contains("no progress at iteration 3"));
        assert_eq!(failure.error(), &FixError::NoProgress { iteration: 3 });
    }
}
