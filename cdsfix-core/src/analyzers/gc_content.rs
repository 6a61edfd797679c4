use tracing::trace;

use crate::aggregator::SuggestionEmitter;
use crate::analyzers::{AnalysisContext, Analyzer, unresolvable, usage_permille};
use crate::constants::{CODON_LENGTH, GC_STEP_WEIGHT};
use crate::sequence::{count_gc, gc_fraction};
use crate::types::Suggestion;

/// Keeps the global GC fraction inside `[lower, upper]`.
///
/// Above `upper`, each codon that can lose G/C bases gets one suggestion: the
/// synonym with the largest reduction, ties resolved by codon rank. Below
/// `lower` the same happens in the other direction. In bounds, and for empty
/// sequences, nothing is proposed.
///
/// When no codon can move the fraction in the required direction, GC-neutral
/// synonyms are proposed instead so the session can explore before cycle
/// detection ends it.
///
/// # Priority
///
/// G/C bases moved in the required direction, then codon usage share.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::analyzers::GcContentFixer;
///
/// let fixer = GcContentFixer::new(0.60, 0.40);
/// assert_eq!(fixer.bounds(), (0.40, 0.60));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GcContentFixer {
    upper: f64,
    lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Lower,
    Raise,
}

impl GcContentFixer {
    /// GC window with maximum `upper` and minimum `lower`, both fractions
    pub fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }

    /// `(lower, upper)` bounds
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    fn direction(&self, gc: f64) -> Option<Direction> {
        if gc > self.upper {
            Some(Direction::Lower)
        } else if gc < self.lower {
            Some(Direction::Raise)
        } else {
            None
        }
    }

    fn reason(&self, gc: f64, direction: Direction) -> String {
        match direction {
            Direction::Lower => format!(
                "GC content {:.1}% above maximum {:.1}%",
                gc * 100.0,
                self.upper * 100.0
            ),
            Direction::Raise => format!(
                "GC content {:.1}% below minimum {:.1}%",
                gc * 100.0,
                self.lower * 100.0
            ),
        }
    }
}

impl Analyzer for GcContentFixer {
    fn name(&self) -> &str {
        "gc-content"
    }

    fn analyze(&self, context: &AnalysisContext<'_>, emitter: &SuggestionEmitter<'_>) {
        let sequence = context.sequence.as_bytes();
        if sequence.is_empty() {
            return;
        }

        let gc = gc_fraction(sequence);
        let Some(direction) = self.direction(gc) else {
            return;
        };
        let reason = self.reason(gc, direction);
        trace!(gc, ?direction, "GC content out of bounds");

        let mut improvements = Vec::new();
        let mut laterals = Vec::new();

        for (slot, codon) in context.sequence.codons() {
            let current_gc = count_gc(codon.as_bytes()) as i64;
            let mut best = None;

            for alternative in context.alternatives(codon) {
                let delta = count_gc(alternative.codon.as_bytes()) as i64 - current_gc;
                let step = match direction {
                    Direction::Lower => -delta,
                    Direction::Raise => delta,
                };

                if step > 0 {
                    if best.is_none_or(|(best_step, _)| step > best_step) {
                        best = Some((step, alternative));
                    }
                } else if step == 0 {
                    laterals.push(Suggestion::new(
                        slot.position,
                        CODON_LENGTH,
                        alternative.codon.clone(),
                        usage_permille(alternative),
                        reason.clone(),
                    ));
                }
            }

            if let Some((step, alternative)) = best {
                improvements.push(Suggestion::new(
                    slot.position,
                    CODON_LENGTH,
                    alternative.codon.clone(),
                    step * GC_STEP_WEIGHT + usage_permille(alternative),
                    reason.clone(),
                ));
            }
        }

        let proposals = if !improvements.is_empty() {
            improvements
        } else if !laterals.is_empty() {
            laterals
        } else {
            context
                .sequence
                .codon(0)
                .map(|codon| vec![unresolvable(0, codon, &reason)])
                .unwrap_or_default()
        };

        for suggestion in proposals {
            emitter.emit(suggestion);
        }
    }
}
