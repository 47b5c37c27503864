//! Template expansion.
//!
//! Scans a template, evaluates every invocation and splices the fragments
//! back into the original text.

use super::error::{MacroError, MacroResult};
use super::registry::{MacroCall, MacroRegistry};
use super::scanner::{PatternScanner, Scanner};
use crate::context::QueryContext;
use crate::time_range::TimeRange;
use std::fmt;
use std::sync::Arc;

/// Text substituted for a failed invocation while the rest of the template is expanded.
pub const MACRO_ERROR_PLACEHOLDER: &str = "macro_error()";

/// Expands `$name(args)` macros in SQL templates.
///
/// The engine holds no per-call state; the time range and query context are
/// passed to [`MacroEngine::interpolate`], so one instance can be shared.
///
/// # Example
///
/// ```
/// use engine::{MacroEngine, QueryContext, TimeRange};
///
/// let engine = MacroEngine::new();
/// let range = TimeRange::from_epoch_secs(1000, 2000).unwrap();
/// let mut context = QueryContext::new();
///
/// let sql = engine
///     .interpolate("SELECT * FROM t WHERE $__timeFilter(ts)", &range, &mut context)
///     .unwrap();
/// assert_eq!(
///     sql,
///     "SELECT * FROM t WHERE ts >= FROM_UNIXTIME(1000) AND ts <= FROM_UNIXTIME(2000)"
/// );
/// ```
#[derive(Clone)]
pub struct MacroEngine {
    registry: MacroRegistry,
    scanner: Arc<dyn Scanner>,
}

impl MacroEngine {
    /// Creates an engine with the MySQL macros and the default scanner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(MacroRegistry::mysql())
    }

    /// Creates an engine with a custom registry and the default scanner.
    #[must_use]
    pub fn with_registry(registry: MacroRegistry) -> Self {
        Self {
            registry,
            scanner: Arc::new(PatternScanner),
        }
    }

    /// Replaces the scanner used to find and tokenize invocations.
    #[must_use]
    pub fn with_scanner(mut self, scanner: impl Scanner + 'static) -> Self {
        self.scanner = Arc::new(scanner);
        self
    }

    /// Returns the macro registry.
    #[must_use]
    pub fn registry(&self) -> &MacroRegistry {
        &self.registry
    }

    /// Returns the macro registry for registering additional macros.
    pub fn registry_mut(&mut self) -> &mut MacroRegistry {
        &mut self.registry
    }

    /// Expands all macros in `sql`.
    ///
    /// Every invocation is evaluated, even after one has failed, so context
    /// writes from later macros still happen. Context writes are never rolled
    /// back.
    ///
    /// # Errors
    ///
    /// Returns the first `MacroError` in template order. No SQL is returned
    /// in that case.
    pub fn interpolate(
        &self,
        sql: &str,
        range: &TimeRange,
        context: &mut QueryContext,
    ) -> MacroResult<String> {
        let invocations = self.scanner.scan(sql);
        tracing::trace!(count = invocations.len(), "Expanding SQL macros");

        let mut errors = ErrorAggregator::default();
        let mut expanded = String::with_capacity(sql.len());
        let mut last = 0;

        for invocation in invocations {
            expanded.push_str(&sql[last..invocation.span.start]);

            let args = self.scanner.tokenize(invocation.raw_args);
            let call = MacroCall::new(invocation.name, &args);
            match self.registry.evaluate(&call, range, context) {
                Ok(fragment) => expanded.push_str(&fragment),
                Err(e) => {
                    tracing::debug!(macro_name = invocation.name, error = %e, "Macro evaluation failed");
                    expanded.push_str(MACRO_ERROR_PLACEHOLDER);
                    errors.record(e);
                }
            }

            last = invocation.span.end;
        }
        expanded.push_str(&sql[last..]);

        errors.finish(expanded)
    }
}

impl Default for MacroEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MacroEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroEngine")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Keeps the first error of an expansion.
#[derive(Debug, Default)]
struct ErrorAggregator {
    first: Option<MacroError>,
}

impl ErrorAggregator {
    fn record(&mut self, error: MacroError) {
        self.first.get_or_insert(error);
    }

    fn finish(self, expanded: String) -> MacroResult<String> {
        match self.first {
            Some(error) => Err(error),
            None => Ok(expanded),
        }
    }
}
