//! `$__wherein(col, v1, ..., vN)`
//!
//! Builds an `IN` filter from dashboard variable values. `ALL` selects
//! everything and `NULL` matches missing values.

use super::error::MacroResult;
use super::is_keyword;
use super::registry::{MacroCall, MacroHandler};
use crate::context::QueryContext;
use crate::time_range::TimeRange;

/// Handler for `$__wherein`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhereIn;

impl MacroHandler for WhereIn {
    fn evaluate(
        &self,
        call: &MacroCall<'_>,
        _range: &TimeRange,
        _context: &mut QueryContext,
    ) -> MacroResult<String> {
        const EXPECTED: &str = "column and params";
        call.require(2, EXPECTED)?;
        let original = call.column(EXPECTED)?;
        let column = unquote_column(original);
        let values = &call.args[1..];

        if let [value] = values {
            if is_keyword(value, "ALL") {
                return Ok("1 = 1".to_string());
            }
            if is_keyword(value, "NULL") {
                return Ok(format!("{column} IS NULL"));
            }
        }

        let mut has_null = false;
        let mut params = Vec::with_capacity(values.len());
        for value in values {
            if is_keyword(value, "NULL") {
                has_null = true;
            } else if value.starts_with('\'') {
                params.push(value.clone());
            } else {
                params.push(format!("'{value}'"));
            }
        }
        let params = params.join(",");

        // The IS NULL clause deliberately reuses the column token as written.
        if has_null {
            Ok(format!("{column} in ({params}) or {original} IS NULL"))
        } else {
            Ok(format!("{column} in ({params})"))
        }
    }
}

/// Strips one pair of single quotes from a column written as `'col'`.
fn unquote_column(token: &str) -> &str {
    match token.strip_prefix('\'') {
        Some(rest) => rest.strip_suffix('\'').unwrap_or(rest),
        None => token,
    }
}
