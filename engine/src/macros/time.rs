//! Time column and time range macros.
//!
//! MySQL stores the time column as `DATETIME`/`TIMESTAMP` for the `__time*`
//! family and as raw epoch seconds for the `__unixEpoch*` family.

use super::error::MacroResult;
use super::registry::{MacroCall, MacroHandler};
use crate::context::QueryContext;
use crate::time_range::TimeRange;

const TIME_COLUMN: &str = "time column";

/// `$__time(col)` and `$__timeEpoch(col)`: `UNIX_TIMESTAMP(col) as time_sec`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeColumn;

impl MacroHandler for TimeColumn {
    fn evaluate(
        &self,
        call: &MacroCall<'_>,
        _range: &TimeRange,
        _context: &mut QueryContext,
    ) -> MacroResult<String> {
        let column = call.column(TIME_COLUMN)?;
        Ok(format!("UNIX_TIMESTAMP({column}) as time_sec"))
    }
}

/// `$__timeFilter(col)`: inclusive range check against `FROM_UNIXTIME` bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFilter;

impl MacroHandler for TimeFilter {
    fn evaluate(
        &self,
        call: &MacroCall<'_>,
        range: &TimeRange,
        _context: &mut QueryContext,
    ) -> MacroResult<String> {
        let column = call.column(TIME_COLUMN)?;
        Ok(format!(
            "{column} >= FROM_UNIXTIME({}) AND {column} <= FROM_UNIXTIME({})",
            range.from_epoch(),
            range.to_epoch()
        ))
    }
}

/// `$__timeFrom()`: `FROM_UNIXTIME(from)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFrom;

impl MacroHandler for TimeFrom {
    fn evaluate(
        &self,
        _call: &MacroCall<'_>,
        range: &TimeRange,
        _context: &mut QueryContext,
    ) -> MacroResult<String> {
        Ok(format!("FROM_UNIXTIME({})", range.from_epoch()))
    }
}

/// `$__timeTo()`: `FROM_UNIXTIME(to)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeTo;

impl MacroHandler for TimeTo {
    fn evaluate(
        &self,
        _call: &MacroCall<'_>,
        range: &TimeRange,
        _context: &mut QueryContext,
    ) -> MacroResult<String> {
        Ok(format!("FROM_UNIXTIME({})", range.to_epoch()))
    }
}

/// `$__unixEpochFilter(col)`: inclusive range check against epoch seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixEpochFilter;

impl MacroHandler for UnixEpochFilter {
    fn evaluate(
        &self,
        call: &MacroCall<'_>,
        range: &TimeRange,
        _context: &mut QueryContext,
    ) -> MacroResult<String> {
        let column = call.column(TIME_COLUMN)?;
        Ok(format!(
            "{column} >= {} AND {column} <= {}",
            range.from_epoch(),
            range.to_epoch()
        ))
    }
}

/// `$__unixEpochFrom()`
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixEpochFrom;

impl MacroHandler for UnixEpochFrom {
    fn evaluate(
        &self,
        _call: &MacroCall<'_>,
        range: &TimeRange,
        _context: &mut QueryContext,
    ) -> MacroResult<String> {
        Ok(range.from_epoch().to_string())
    }
}

/// `$__unixEpochTo()`
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixEpochTo;

impl MacroHandler for UnixEpochTo {
    fn evaluate(
        &self,
        _call: &MacroCall<'_>,
        range: &TimeRange,
        _context: &mut QueryContext,
    ) -> MacroResult<String> {
        Ok(range.to_epoch().to_string())
    }
}
