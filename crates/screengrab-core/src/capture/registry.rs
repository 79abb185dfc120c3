//! Ordered registry of capture strategies
//!
//! Strategies are tried in registration order; the first one whose
//! availability check passes is used for the whole run.

use std::sync::Arc;

use crate::error::{CaptureError, CaptureResult};

use super::CaptureStrategy;

/// Priority-ordered set of compiled-in capture mechanisms
#[derive(Default, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn CaptureStrategy>>,
}

impl StrategyRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a strategy after every previously registered one.
    ///
    /// Earlier registrations take precedence.
    pub fn register(&mut self, strategy: Arc<dyn CaptureStrategy>) -> &mut Self {
        tracing::debug!(strategy = strategy.name(), "Registered capture strategy");
        self.strategies.push(strategy);
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, strategy: Arc<dyn CaptureStrategy>) -> Self {
        self.register(strategy);
        self
    }

    /// Names of every registered strategy, in priority order
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Every registered strategy, in priority order
    pub fn all(&self) -> &[Arc<dyn CaptureStrategy>] {
        &self.strategies
    }

    /// Number of registered strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategies whose availability check currently succeeds, in priority
    /// order
    pub fn available_strategies(&self) -> Vec<Arc<dyn CaptureStrategy>> {
        self.strategies
            .iter()
            .filter(|s| s.is_available())
            .cloned()
            .collect()
    }

    /// The first available strategy in registration order.
    ///
    /// Probing stops at the first success, so later strategies are not
    /// touched.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoStrategyAvailable`] listing every strategy tried.
    pub fn active_strategy(&self) -> CaptureResult<Arc<dyn CaptureStrategy>> {
        for strategy in &self.strategies {
            if strategy.is_available() {
                tracing::debug!(strategy = strategy.name(), "Selected capture strategy");
                return Ok(Arc::clone(strategy));
            }
            tracing::debug!(strategy = strategy.name(), "Capture strategy unavailable");
        }

        Err(CaptureError::NoStrategyAvailable { tried: self.names() })
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}
