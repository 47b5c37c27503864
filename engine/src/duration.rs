//! Duration string parser using nom.
//!
//! Parses durations like:
//! - `30s`, `1m`, `1h`
//! - `1h30m`, `2m30s500ms`
//! - `1.5h`, `.5s`, `-90s`
//!
//! Supported units are `ns`, `us` (also `µs`/`μs`), `ms`, `s`, `m` and `h`.
//! Relative time bounds additionally accept `d` and `w`.

use chrono::TimeDelta;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1},
    combinator::{all_consuming, map_res, opt, recognize, value},
    multi::many1,
    IResult, Parser,
};
use thiserror::Error;

const NANOS_PER_MICRO: f64 = 1e3;
const NANOS_PER_MILLI: f64 = 1e6;
const NANOS_PER_SECOND: f64 = 1e9;
const NANOS_PER_MINUTE: f64 = 60.0 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: f64 = 60.0 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: f64 = 24.0 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: f64 = 7.0 * NANOS_PER_DAY;

/// Errors that can occur during duration parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The text is not a duration.
    #[error("invalid duration '{0}'")]
    Invalid(String),

    /// The duration does not fit in a signed 64-bit nanosecond count.
    #[error("duration '{0}' is out of range")]
    OutOfRange(String),
}

/// Parses a duration string such as `1m` or `1h30m`.
///
/// # Errors
///
/// Returns a `DurationError` if:
/// - The text is empty or contains anything besides `<number><unit>` pairs
/// - A unit is missing or unknown
/// - The total overflows
///
/// # Examples
///
/// ```
/// use engine::duration::parse_duration;
///
/// let interval = parse_duration("1h30m").unwrap();
/// assert_eq!(interval.num_seconds(), 5400);
/// ```
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    parse_with_units(input, false)
}

/// Parses an offset for relative time bounds, which also accepts days and weeks.
pub(crate) fn parse_offset(input: &str) -> Result<TimeDelta, DurationError> {
    parse_with_units(input, true)
}

/// Returns the length of a duration in (fractional) seconds.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn as_seconds_f64(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NANOS_PER_SECOND,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn parse_with_units(input: &str, calendar_units: bool) -> Result<TimeDelta, DurationError> {
    // A lone zero is the only unit-less duration.
    if matches!(input, "0" | "+0" | "-0") {
        return Ok(TimeDelta::zero());
    }

    let (_, (negative, nanos)) = all_consuming(|i| signed_duration(i, calendar_units))
        .parse(input)
        .map_err(|_| DurationError::Invalid(input.to_string()))?;

    if !nanos.is_finite() || nanos.round() >= i64::MAX as f64 {
        return Err(DurationError::OutOfRange(input.to_string()));
    }

    let delta = TimeDelta::nanoseconds(nanos.round() as i64);
    Ok(if negative { -delta } else { delta })
}

// ============================================================================
// Grammar
// ============================================================================

fn signed_duration(input: &str, calendar_units: bool) -> IResult<&str, (bool, f64)> {
    let (input, sign) = opt(alt((char('-'), char('+')))).parse(input)?;
    let (input, parts) = many1(|i| component(i, calendar_units)).parse(input)?;

    Ok((input, (sign == Some('-'), parts.into_iter().sum())))
}

fn component(input: &str, calendar_units: bool) -> IResult<&str, f64> {
    let (input, amount) = map_res(decimal, |s: &str| s.parse::<f64>()).parse(input)?;
    let (input, nanos) = unit(input, calendar_units)?;
    Ok((input, amount * nanos))
}

fn decimal(input: &str) -> IResult<&str, &str> {
    alt((
        recognize((digit1, opt((char('.'), digit0)))),
        recognize((char('.'), digit1)),
    ))
    .parse(input)
}

fn unit(input: &str, calendar_units: bool) -> IResult<&str, f64> {
    let (rest, nanos) = alt((
        value(1.0, tag("ns")),
        value(NANOS_PER_MICRO, alt((tag("us"), tag("µs"), tag("μs")))),
        value(NANOS_PER_MILLI, tag("ms")),
        value(NANOS_PER_SECOND, tag("s")),
        value(NANOS_PER_MINUTE, tag("m")),
        value(NANOS_PER_HOUR, tag("h")),
        value(NANOS_PER_DAY, tag("d")),
        value(NANOS_PER_WEEK, tag("w")),
    ))
    .parse(input)?;

    if !calendar_units && nanos >= NANOS_PER_DAY {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }

    Ok((rest, nanos))
}
