//! SQL template macros.
//!
//! This module finds `$name(args)` invocations in SQL templates and replaces
//! them with MySQL fragments for the query's time range.
//!
//! # Supported Macros
//!
//! ```sql
//! SELECT $__time(created_at), value FROM metrics WHERE $__timeFilter(created_at)
//! SELECT $__timeGroup(created_at, '5m', NULL) AS time, avg(value) FROM metrics GROUP BY 1
//! SELECT * FROM events WHERE ts BETWEEN $__unixEpochFrom() AND $__unixEpochTo()
//! SELECT * FROM hosts WHERE $__wherein(hostname, 'web-1', 'web-2')
//! ```
//!
//! # Example
//!
//! ```
//! use engine::macros::{MacroEngine, MacroError};
//! use engine::{QueryContext, TimeRange};
//!
//! let engine = MacroEngine::new();
//! let range = TimeRange::from_epoch_secs(1000, 2000).unwrap();
//!
//! let result = engine.interpolate("SELECT $__nope()", &range, &mut QueryContext::new());
//! assert_eq!(result, Err(MacroError::UnknownMacro("__nope".to_string())));
//! ```

mod error;
mod expand;
mod group;
mod registry;
mod scanner;
mod time;
mod wherein;

pub use error::{MacroError, MacroResult};
pub use expand::{MacroEngine, MACRO_ERROR_PLACEHOLDER};
pub use group::TimeGroup;
pub use registry::{MacroCall, MacroHandler, MacroRegistry};
pub use scanner::{split_arguments, MacroInvocation, PatternScanner, Scanner};
pub use time::{
    TimeColumn, TimeFilter, TimeFrom, TimeTo, UnixEpochFilter, UnixEpochFrom, UnixEpochTo,
};
pub use wherein::WhereIn;

/// Returns true if `token` is `word`, bare or in single quotes.
fn is_keyword(token: &str, word: &str) -> bool {
    token == word
        || token
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .is_some_and(|t| t == word)
}
