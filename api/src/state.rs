//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use engine::MacroEngine;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// The macro engine is immutable once built, so every request expands
/// against the same instance without locking.
#[derive(Clone, Debug)]
pub struct AppState {
    engine: Arc<MacroEngine>,
}

impl AppState {
    /// Creates a new application state around the given engine.
    #[must_use]
    pub fn new(engine: MacroEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns the macro engine.
    #[must_use]
    pub fn engine(&self) -> &MacroEngine {
        &self.engine
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MacroEngine::new())
    }
}
