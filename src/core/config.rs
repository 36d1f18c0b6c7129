//! Configuration for model composition
//!
//! Controls how the lattice composer builds its cells and whether the
//! composed wiring is validated before it is handed out.
use serde::{Deserialize, Serialize};

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Cells are built in order within a single thread
    Sequential,
    /// Cells are built concurrently on a rayon pool
    Rayon,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Sequential
    }
}

/// Configuration for lattice composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionConfig {
    /// The concurrency mode used for the cell instantiation pass
    pub concurrency_mode: ConcurrencyMode,
    /// The size of a dedicated thread pool.
    /// Only relevant when concurrency_mode is Rayon; `None` uses the global pool
    pub thread_pool_size: Option<usize>,
    /// Run the coupling validator once the lattice is wired
    pub validate_after_compose: bool,
}

impl CompositionConfig {
    /// Create a new configuration with default values
    ///
    /// Default configuration is sequential with validation enabled
    pub fn new() -> Self {
        Self {
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
            validate_after_compose: true,
        }
    }

    /// Set the concurrency mode
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel cell construction
    ///
    /// # Note
    /// This setting only has an effect when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Enable or disable validation after composition
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_after_compose = validate;
        self
    }
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self::new()
    }
}
