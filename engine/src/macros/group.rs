//! `$__timeGroup(col, interval[, fill])`
//!
//! Buckets the time column into fixed windows aligned to the epoch. The
//! optional fill argument records the gap-filling policy in the query
//! context for the stage that post-processes results.

use super::error::{MacroError, MacroResult};
use super::is_keyword;
use super::registry::{MacroCall, MacroHandler};
use crate::context::{QueryContext, FILL, FILL_INTERVAL, FILL_NULL, FILL_VALUE};
use crate::duration::{as_seconds_f64, parse_duration};
use crate::time_range::TimeRange;

/// Handler for `$__timeGroup`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeGroup;

impl MacroHandler for TimeGroup {
    fn evaluate(
        &self,
        call: &MacroCall<'_>,
        _range: &TimeRange,
        context: &mut QueryContext,
    ) -> MacroResult<String> {
        const EXPECTED: &str = "time column and interval";
        call.require(2, EXPECTED)?;
        let column = call.column(EXPECTED)?;

        let raw_interval = &call.args[1];
        let seconds = parse_duration(raw_interval.trim_matches(|c: char| c == '\'' || c == '"'))
            .map(as_seconds_f64)
            .map_err(|_| MacroError::InvalidDuration(raw_interval.clone()))?;

        // Whole seconds, rounded half-to-even. Zero and negative widths are emitted as is.
        let width = seconds.round_ties_even();

        // Only the exact three-argument form carries a fill policy.
        if let [_, _, fill] = call.args {
            context.set(FILL, true);
            context.set(FILL_INTERVAL, seconds);

            if is_keyword(fill, "NULL") {
                context.set(FILL_NULL, true);
            } else {
                let value = fill
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| MacroError::InvalidNumericLiteral(fill.clone()))?;
                context.set(FILL_VALUE, value);
            }
        }

        Ok(format!(
            "cast(cast(UNIX_TIMESTAMP({column})/({width:.0}) as signed)*{width:.0} as signed)"
        ))
    }
}
