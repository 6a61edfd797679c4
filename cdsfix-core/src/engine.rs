use std::fmt;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, instrument, warn};

use crate::aggregator::{RoundOutcome, run_round};
use crate::analyzers::{AnalysisContext, Analyzer, MotifRemover};
use crate::codon::CodonTable;
use crate::config::FixConfig;
use crate::history::History;
use crate::results::{FixFailure, FixReport};
use crate::sequence::CodingSequence;
use crate::types::FixError;

/// Reason recorded by [`fix_simple`] for every change it makes
pub const FORBIDDEN_MOTIF_REASON: &str = "Forbidden motif";

/// Reusable fixing session builder.
///
/// A `Fixer` owns a codon table, an ordered list of analyzers and a
/// [`FixConfig`]. Each call to [`Fixer::fix`] runs an independent session;
/// nothing is carried over between sessions.
///
/// Registration order matters: when two suggestions have the same priority,
/// the one from the analyzer registered first wins.
///
/// # Examples
///
/// ## Motifs and GC content together
///
/// ```rust
/// use cdsfix_core::Fixer;
/// use cdsfix_core::analyzers::{GcContentFixer, MotifRemover};
/// use cdsfix_core::codon::CodonTable;
///
/// let fixer = Fixer::new(CodonTable::uniform(11)?)
///     .with_analyzer(MotifRemover::new(["GGTCTC", "CGTCTC"], "TypeIIS site"))
///     .with_analyzer(GcContentFixer::new(0.65, 0.35));
///
/// let report = fixer.fix("ATGAAAGGTCTCTAA")?;
/// assert!(!report.sequence.contains("GGTCTC"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// ## Tight iteration budget
///
/// ```rust
/// use cdsfix_core::Fixer;
/// use cdsfix_core::analyzers::MotifRemover;
/// use cdsfix_core::codon::CodonTable;
/// use cdsfix_core::config::FixConfig;
/// use cdsfix_core::types::FixError;
///
/// let config = FixConfig {
///     max_iterations: 1,
///     ..FixConfig::default()
/// };
/// let fixer = Fixer::new(CodonTable::uniform(1)?)
///     .with_config(config)
///     .with_analyzer(MotifRemover::new(["TAT"], "TAT codon"));
///
/// let failure = fixer.fix("TATTAT").unwrap_err();
/// assert_eq!(failure.error, FixError::FailedToConverge { max_iterations: 1 });
/// assert_eq!(failure.changes.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Fixer {
    codon_table: CodonTable,
    analyzers: Vec<Box<dyn Analyzer>>,
    config: FixConfig,
}

impl Fixer {
    /// Creates a fixer with no analyzers and the default configuration.
    ///
    /// # Arguments
    ///
    /// * `codon_table` - Validated synonym table used for every session
    pub fn new(codon_table: CodonTable) -> Self {
        Self {
            codon_table,
            analyzers: Vec::new(),
            config: FixConfig::default(),
        }
    }

    /// Replaces the session configuration
    #[must_use]
    pub fn with_config(mut self, config: FixConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers an analyzer after the ones already registered
    #[must_use]
    pub fn with_analyzer(self, analyzer: impl Analyzer + 'static) -> Self {
        self.with_boxed_analyzer(Box::new(analyzer))
    }

    #[must_use]
    pub fn with_boxed_analyzer(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.analyzers.push(analyzer);
        self
    }

    pub fn codon_table(&self) -> &CodonTable {
        &self.codon_table
    }

    pub fn config(&self) -> &FixConfig {
        &self.config
    }

    /// Names of the registered analyzers, in registration order
    pub fn analyzer_names(&self) -> impl Iterator<Item = &str> {
        self.analyzers.iter().map(|analyzer| analyzer.name())
    }

    /// Runs one fixing session on `sequence`.
    ///
    /// The input is upper-cased and validated, then analysis rounds alternate
    /// with single committed changes until a round reports no violation.
    ///
    /// # Arguments
    ///
    /// * `sequence` - Protein-coding nucleotide sequence, case-insensitive
    ///
    /// # Returns
    ///
    /// A [`FixReport`] whose sequence translates to the same protein as the
    /// input and satisfies every registered analyzer.
    ///
    /// # Errors
    ///
    /// Returns a [`FixFailure`] carrying the sequence and change history
    /// reached so far, with one of:
    /// - [`FixError::Input`] if the sequence is not a whole number of
    ///   {A, C, G, T} codons
    /// - [`FixError::Suggestion`] if every suggestion of a round is invalid
    /// - [`FixError::NoProgress`] if every candidate of a round revisits an
    ///   earlier state
    /// - [`FixError::FailedToConverge`] if violations remain after
    ///   `max_iterations` changes
    /// - [`FixError::ThreadPool`] if the analyzer pool cannot be created
    pub fn fix(&self, sequence: &str) -> Result<FixReport, FixFailure> {
        run_session(sequence, &self.codon_table, &self.analyzers, &self.config)
    }
}

impl fmt::Debug for Fixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixer")
            .field("analyzers", &self.analyzer_names().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Runs one session with `analyzers` and the default configuration.
///
/// See [`Fixer::fix`] for the session semantics and errors.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::analyzers::{Analyzer, GcContentFixer};
/// use cdsfix_core::codon::CodonTable;
/// use cdsfix_core::fix;
///
/// let table = CodonTable::uniform(1)?;
/// let analyzers: Vec<Box<dyn Analyzer>> = vec![Box::new(GcContentFixer::new(0.9, 0.1))];
///
/// let report = fix("AAATTT", &table, analyzers)?;
/// assert!(report.gc_content() >= 0.1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn fix(
    sequence: &str,
    codon_table: &CodonTable,
    analyzers: Vec<Box<dyn Analyzer>>,
) -> Result<FixReport, FixFailure> {
    run_session(sequence, codon_table, &analyzers, &FixConfig::default())
}

/// Removes `motifs` from both strands of `sequence` with a single
/// [`MotifRemover`].
///
/// Changes are logged with [`FORBIDDEN_MOTIF_REASON`]. An empty motif list
/// returns the normalized input unchanged.
///
/// # Errors
///
/// As [`Fixer::fix`].
pub fn fix_simple<I, S>(
    sequence: &str,
    codon_table: &CodonTable,
    motifs: I,
) -> Result<FixReport, FixFailure>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let analyzers: Vec<Box<dyn Analyzer>> =
        vec![Box::new(MotifRemover::new(motifs, FORBIDDEN_MOTIF_REASON))];
    run_session(sequence, codon_table, &analyzers, &FixConfig::default())
}

fn build_pool(config: &FixConfig, analyzer_count: usize) -> Result<ThreadPool, FixError> {
    ThreadPoolBuilder::new()
        .num_threads(config.pool_size(analyzer_count))
        .thread_name(|index| format!("cdsfix-analyzer-{index}"))
        .build()
        .map_err(|e| FixError::ThreadPool(e.to_string()))
}

#[instrument(
    name = "fix_session",
    skip_all,
    fields(length = sequence.len(), analyzers = analyzers.len())
)]
fn run_session(
    sequence: &str,
    codon_table: &CodonTable,
    analyzers: &[Box<dyn Analyzer>],
    config: &FixConfig,
) -> Result<FixReport, FixFailure> {
    let mut current = match CodingSequence::new(sequence, codon_table) {
        Ok(current) => current,
        Err(error) => {
            warn!(%error, "rejected input sequence");
            return Err(FixFailure::new(error.into(), sequence.to_string(), Vec::new()));
        }
    };

    let pool = match build_pool(config, analyzers.len()) {
        Ok(pool) => pool,
        Err(error) => {
            warn!(%error, "cannot start session");
            return Err(FixFailure::new(error, current.into_string(), Vec::new()));
        }
    };

    info!(
        codons = current.slots().len(),
        max_iterations = config.max_iterations,
        "fixing session started"
    );

    let mut history = History::new(current.as_str());
    let mut round = 0;

    let error = loop {
        let context = AnalysisContext::new(&current, codon_table);
        let candidates = match run_round(&pool, analyzers, &context) {
            Ok(RoundOutcome::Clean) => {
                info!(
                    iterations = round + 1,
                    changes = history.changes().len(),
                    "fixing session converged"
                );
                return Ok(FixReport {
                    sequence: current.into_string(),
                    changes: history.into_changes(),
                    iterations: round + 1,
                });
            }
            Ok(RoundOutcome::Candidates(candidates)) => candidates,
            Err(error) => break FixError::Suggestion(error),
        };

        if round == config.max_iterations {
            break FixError::FailedToConverge {
                max_iterations: config.max_iterations,
            };
        }

        match history.apply_first_novel(&mut current, &candidates) {
            Some(change) => debug!(
                iteration = round + 1,
                candidates = candidates.len(),
                position = change.position,
                from = %change.from,
                to = %change.to,
                "applied change"
            ),
            None => break FixError::NoProgress { iteration: round + 1 },
        }

        round += 1;
    };

    warn!(%error, changes = history.changes().len(), "fixing session failed");
    Err(FixFailure::new(
        error,
        current.into_string(),
        history.into_changes(),
    ))
}
