//! # cdsfix - synonymous-codon constraint fixer
//!
//! Rewrites a protein-coding DNA sequence so that it satisfies a set of
//! sequence-level constraints while still translating to exactly the same
//! protein. Every edit is a synonymous codon substitution.
//!
//! ## Overview
//!
//! Constraints are expressed as [`analyzers::Analyzer`]s. A fixing session
//! repeats a simple loop: run every analyzer concurrently against the current
//! sequence, validate and rank their suggestions, and commit the single best
//! one that leads to a sequence not seen before. The session succeeds as soon
//! as an analysis round produces no suggestions.
//!
//! ## Features
//!
//! - **Forbidden motifs**: restriction sites and other motifs removed from
//!   both strands
//! - **GC content**: global GC fraction pulled into a window
//! - **Repeats**: exact and inverted repeats broken up
//! - **Codon usage**: synonyms ranked by organism-specific usage weights over
//!   any supported NCBI genetic code
//! - **Parallel analysis**: one rayon task per analyzer per round
//! - **Audit trail**: every committed change recorded with its reason
//!
//! ## Quick Start
//!
//! ```rust
//! use cdsfix_core::codon::CodonTable;
//! use cdsfix_core::fix_simple;
//!
//! let table = CodonTable::uniform(11)?;
//! let report = fix_simple("ATGTATTGA", &table, ["TAT"])?;
//!
//! assert_eq!(report.sequence, "ATGTACTGA");
//! for change in &report.changes {
//!     println!("{change}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Several constraints
//!
//! ```rust
//! use cdsfix_core::Fixer;
//! use cdsfix_core::analyzers::{GcContentFixer, MotifRemover, RepeatRemover};
//! use cdsfix_core::codon::{CodonTable, CodonUsage};
//!
//! let usage = [
//!     CodonUsage::new("GGT", 19.2),
//!     CodonUsage::new("GGA", 18.4),
//!     CodonUsage::new("GGG", 9.9),
//!     CodonUsage::new("GGC", 9.4),
//! ];
//! let table = CodonTable::from_genetic_code(1, &usage)?;
//!
//! let fixer = Fixer::new(table)
//!     .with_analyzer(MotifRemover::new(["GGTCTC", "CGTCTC"], "TypeIIS site"))
//!     .with_analyzer(GcContentFixer::new(0.70, 0.30))
//!     .with_analyzer(RepeatRemover::new(20));
//!
//! let report = fixer.fix("ATGGGTCTCGGCTAA")?;
//! assert_eq!(report.sequence, "ATGGGACTCGGCTAA");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Session configuration
//! - [`engine`]: Session builder and convergence loop
//! - [`types`]: Suggestions, change records and error types
//! - [`results`]: Session outcomes
//! - [`codon`]: Codon tables and NCBI genetic codes
//! - [`sequence`]: Nucleotide utilities and the codon-segmented sequence
//! - [`analyzers`]: The analyzer trait and built-in analyzers
//! - [`aggregator`]: Concurrent suggestion collection, validation and ranking
//! - [`history`]: Change history and cycle detection
//!
//! ## Error Handling
//!
//! Sessions return [`Result<FixReport, FixFailure>`](results::FixFailure).
//! A failure keeps the sequence and changes reached so far; its
//! [`FixError`](types::FixError) tells why the session stopped:
//!
//! - Invalid input sequences
//! - Rounds in which every suggestion was invalid
//! - Cycles, when every candidate revisits an earlier sequence
//! - Exhausted iteration budgets
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and one `fix_session` span per session.
//! It never installs a subscriber.

pub mod aggregator;
pub mod analyzers;
pub mod codon;
pub mod config;
pub mod constants;
pub mod engine;
pub mod history;
pub mod results;
pub mod sequence;
pub mod types;

pub use engine::{Fixer, fix, fix_simple};
pub use results::{FixFailure, FixReport};
pub use types::{ChangeRecord, FixError, Suggestion};
