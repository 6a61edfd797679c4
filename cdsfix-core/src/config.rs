use crate::constants::DEFAULT_MAX_ITERATIONS;

/// Configuration settings for a fixing session.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use cdsfix_core::config::FixConfig;
///
/// let config = FixConfig::default();
/// assert_eq!(config.max_iterations, 1000);
/// ```
///
/// ## Tight iteration budget on a small thread pool
///
/// ```rust
/// use cdsfix_core::config::FixConfig;
///
/// let config = FixConfig {
///     max_iterations: 50,
///     max_threads: Some(2),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixConfig {
    /// Maximum number of changes applied before the session gives up.
    ///
    /// When this many changes have been committed and analyzers still report
    /// violations, the session fails with
    /// [`FixError::FailedToConverge`](crate::types::FixError::FailedToConverge).
    /// Jointly unsatisfiable constraint sets end here unless cycle detection
    /// stops them first.
    ///
    /// **Default**: `1000`
    pub max_iterations: usize,

    /// Upper bound on analyzer threads.
    ///
    /// Each iteration runs one task per registered analyzer on a pool sized to
    /// the analyzer count. When set, the pool is capped at this many threads
    /// and excess analyzer tasks queue behind the running ones.
    ///
    /// **Default**: `None` (one thread per analyzer)
    pub max_threads: Option<usize>,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_threads: None,
        }
    }
}

impl FixConfig {
    /// Number of pool threads for a session with `analyzer_count` analyzers
    #[must_use]
    pub fn pool_size(&self, analyzer_count: usize) -> usize {
        let wanted = analyzer_count.max(1);
        match self.max_threads {
            Some(cap) => wanted.min(cap.max(1)),
            None => wanted,
        }
    }
}
