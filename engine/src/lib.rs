//! Sqlmacro Engine
//!
//! This crate expands time-range macros in SQL templates issued by
//! time-series dashboards against MySQL.
//!
//! # Modules
//!
//! - [`macros`] - Macro scanning, evaluation and template expansion
//! - [`time_range`] - Query time windows
//! - [`context`] - Per-query context receiving the fill policy
//! - [`duration`] - Duration strings such as `5m` or `1h30m`
//!
//! # Example
//!
//! ```
//! use engine::{MacroEngine, QueryContext, TimeRange};
//!
//! let engine = MacroEngine::new();
//! let range = TimeRange::from_epoch_secs(1000, 2000).unwrap();
//! let mut context = QueryContext::new();
//!
//! let sql = engine
//!     .interpolate("SELECT $__timeGroup(ts, '1m', NULL), avg(v) FROM m", &range, &mut context)
//!     .unwrap();
//!
//! assert!(sql.contains("/(60)"));
//! assert_eq!(context.fill_policy().unwrap().interval_secs, 60.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod duration;
pub mod macros;
pub mod time_range;

pub use context::{FillPolicy, FillValue, QueryContext};
pub use macros::{MacroEngine, MacroError};
pub use time_range::{TimeRange, TimeRangeError};

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde_json;
