//! Name-keyed macro handlers.

use super::error::{MacroError, MacroResult};
use super::{group, time, wherein};
use crate::context::QueryContext;
use crate::time_range::TimeRange;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One macro call with its tokenized arguments.
#[derive(Debug, Clone, Copy)]
pub struct MacroCall<'a> {
    /// The macro name as written in the template.
    pub name: &'a str,
    /// Trimmed argument tokens. Never empty: `$m()` has one empty token.
    pub args: &'a [String],
}

impl<'a> MacroCall<'a> {
    /// Creates a call.
    #[must_use]
    pub const fn new(name: &'a str, args: &'a [String]) -> Self {
        Self { name, args }
    }

    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).map(String::as_str)
    }

    /// Fails with `MissingArgument` unless at least `min` tokens were given.
    ///
    /// # Errors
    ///
    /// Returns `MacroError::MissingArgument` if there are fewer than `min` tokens.
    pub fn require(&self, min: usize, expected: &'static str) -> MacroResult<()> {
        if self.args.len() < min {
            return Err(self.missing(expected));
        }
        Ok(())
    }

    /// Returns the first argument as the column expression.
    ///
    /// Only the token count is checked: `$m()` yields one empty token, and
    /// that empty column is passed through as written.
    ///
    /// # Errors
    ///
    /// Returns `MacroError::MissingArgument` if there are no tokens at all.
    pub fn column(&self, expected: &'static str) -> MacroResult<&'a str> {
        self.arg(0).ok_or_else(|| self.missing(expected))
    }

    fn missing(&self, expected: &'static str) -> MacroError {
        MacroError::MissingArgument {
            name: self.name.to_string(),
            expected,
        }
    }
}

/// Turns one macro call into a SQL fragment.
///
/// Handlers get the time range and query context as explicit arguments and
/// hold no per-call state, so one handler can serve concurrent expansions.
pub trait MacroHandler: Send + Sync {
    /// Evaluates the call.
    ///
    /// # Errors
    ///
    /// Returns a `MacroError` if the arguments are missing or invalid.
    fn evaluate(
        &self,
        call: &MacroCall<'_>,
        range: &TimeRange,
        context: &mut QueryContext,
    ) -> MacroResult<String>;
}

impl<F> MacroHandler for F
where
    F: Fn(&MacroCall<'_>, &TimeRange, &mut QueryContext) -> MacroResult<String> + Send + Sync,
{
    fn evaluate(
        &self,
        call: &MacroCall<'_>,
        range: &TimeRange,
        context: &mut QueryContext,
    ) -> MacroResult<String> {
        (self)(call, range, context)
    }
}

/// Maps macro names to handlers.
///
/// # Example
///
/// ```
/// use engine::macros::{MacroCall, MacroRegistry, MacroResult};
/// use engine::{QueryContext, TimeRange};
///
/// let mut registry = MacroRegistry::mysql();
/// registry.register(
///     "__now",
///     |_: &MacroCall<'_>, _: &TimeRange, _: &mut QueryContext| -> MacroResult<String> {
///         Ok("NOW()".to_string())
///     },
/// );
/// assert!(registry.contains("__now"));
/// assert!(registry.contains("__timeFilter"));
/// ```
#[derive(Clone, Default)]
pub struct MacroRegistry {
    handlers: HashMap<String, Arc<dyn MacroHandler>>,
}

impl MacroRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the MySQL time-series macros.
    #[must_use]
    pub fn mysql() -> Self {
        let mut registry = Self::new();
        registry.register("__time", time::TimeColumn);
        registry.register("__timeEpoch", time::TimeColumn);
        registry.register("__timeFilter", time::TimeFilter);
        registry.register("__timeFrom", time::TimeFrom);
        registry.register("__timeTo", time::TimeTo);
        registry.register("__unixEpochFilter", time::UnixEpochFilter);
        registry.register("__unixEpochFrom", time::UnixEpochFrom);
        registry.register("__unixEpochTo", time::UnixEpochTo);
        registry.register("__timeGroup", group::TimeGroup);
        registry.register("__wherein", wherein::WhereIn);
        registry
    }

    /// Registers a handler, replacing any handler with the same name.
    pub fn register(&mut self, name: impl Into<String>, handler: impl MacroHandler + 'static) {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Returns true if a handler is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Dispatches a call to its handler.
    ///
    /// # Errors
    ///
    /// Returns `MacroError::UnknownMacro` if no handler is registered under the
    /// call's name, or whatever error the handler returns.
    pub fn evaluate(
        &self,
        call: &MacroCall<'_>,
        range: &TimeRange,
        context: &mut QueryContext,
    ) -> MacroResult<String> {
        let handler = self
            .handlers
            .get(call.name)
            .ok_or_else(|| MacroError::UnknownMacro(call.name.to_string()))?;
        handler.evaluate(call, range, context)
    }
}

impl fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroRegistry")
            .field("macros", &self.names())
            .finish()
    }
}
