//! Macro invocation scanner using nom.
//!
//! Finds calls like:
//! - `$__timeFilter(created_at)`
//! - `$__timeGroup(created_at, '5m', NULL)`
//! - `$__timeFrom()`
//!
//! Arguments end at the first `)`, so nested calls or parenthesized
//! expressions inside arguments are not supported by [`PatternScanner`].

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    sequence::{delimited, preceded},
    IResult, Parser,
};
use std::ops::Range;

/// A macro call found in a SQL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInvocation<'a> {
    /// Byte range of the whole `$name(args)` text in the template.
    pub span: Range<usize>,
    /// The macro name, without the leading `$`.
    pub name: &'a str,
    /// The raw text between the parentheses.
    pub raw_args: &'a str,
}

/// Locates macro invocations and splits their arguments.
///
/// The engine only talks to this trait, so a quote- and paren-aware
/// implementation can replace [`PatternScanner`] without touching any macro.
pub trait Scanner: Send + Sync {
    /// Returns all invocations in `sql`, ordered and non-overlapping.
    fn scan<'a>(&self, sql: &'a str) -> Vec<MacroInvocation<'a>>;

    /// Splits the raw argument text of one invocation into tokens.
    fn tokenize(&self, raw_args: &str) -> Vec<String> {
        split_arguments(raw_args)
    }
}

/// Single-pass scanner for `$IDENT(ARGS)` where `ARGS` contains no `)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternScanner;

impl Scanner for PatternScanner {
    fn scan<'a>(&self, sql: &'a str) -> Vec<MacroInvocation<'a>> {
        let mut found = Vec::new();
        let mut offset = 0;

        while let Some(pos) = sql[offset..].find('$') {
            let start = offset + pos;
            match invocation(&sql[start..]) {
                Ok((rest, (name, raw_args))) => {
                    let end = sql.len() - rest.len();
                    found.push(MacroInvocation {
                        span: start..end,
                        name,
                        raw_args,
                    });
                    offset = end;
                }
                // '$' is a single byte, so this stays on a char boundary
                Err(_) => offset = start + 1,
            }
        }

        found
    }
}

/// Splits raw macro arguments on `,` and trims surrounding whitespace.
///
/// Quotes are kept. An empty string yields one empty token.
///
/// # Examples
///
/// ```
/// use engine::macros::split_arguments;
///
/// assert_eq!(split_arguments(" ts , '5m' "), vec!["ts", "'5m'"]);
/// assert_eq!(split_arguments(""), vec![""]);
/// ```
#[must_use]
pub fn split_arguments(raw_args: &str) -> Vec<String> {
    raw_args
        .split(',')
        .map(|arg| arg.trim().to_string())
        .collect()
}

// ============================================================================
// Grammar
// ============================================================================

fn invocation(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        char('$'),
        (
            identifier,
            delimited(char('('), take_till(|c: char| c == ')'), char(')')),
        ),
    )
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_').parse(input)
}
