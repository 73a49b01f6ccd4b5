//! Device line grammar.
//!
//! Lines are checked in this order, first match wins:
//!
//! | form | kind |
//! |------|------|
//! | `12.5,-3` | [`LineKind::Coordinate`] (device units, centimeters) |
//! | `Status: ... Recording=YES` | [`LineKind::Status`] |
//! | `Position (mm): X=1.5 Y=2` | [`LineKind::Position`] |
//! | `... Recording started ...` | [`LineKind::RecordingStarted`] |
//! | `... Recording stopped ...` | [`LineKind::RecordingStopped`] |
//!
//! A position report missing either value is [`LineKind::Malformed`].
//! Everything else (echoes, queue reports, noise) is [`LineKind::Ignored`].

use crate::parse::grammar::{signed_decimal, to_finite};
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while1};
use nom::character::complete::{char, digit0, digit1, multispace0};
use nom::combinator::{all_consuming, map, opt, recognize, value};
use nom::sequence::{pair, tuple};
use nom::IResult;

const STATUS_PREFIX: &str = "Status:";
const POSITION_PREFIX: &str = "Position (mm):";

/// Classification of one trimmed device line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    Coordinate { x: f64, y: f64 },
    /// Status report, shown verbatim. `recording` is set when the line
    /// carries a `Recording=YES|NO` token.
    Status { text: &'a str, recording: Option<bool> },
    /// Position report, already in millimeters.
    Position { x: f64, y: f64 },
    RecordingStarted,
    RecordingStopped,
    /// A position report without usable X and Y values.
    Malformed(&'a str),
    Ignored,
}

/// Classify a single line. Surrounding whitespace is ignored.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Ignored;
    }

    if let Ok((_, (x, y))) = coordinate(line) {
        if let (Some(x), Some(y)) = (to_finite(x), to_finite(y)) {
            return LineKind::Coordinate { x, y };
        }
    }

    if line.starts_with(STATUS_PREFIX) {
        return LineKind::Status {
            text: line,
            recording: find(line, recording_token),
        };
    }

    if line.starts_with(POSITION_PREFIX) {
        // Only the first tag per axis counts, even when its value is unusable.
        let x = find(line, |i| axis_run('x', i)).and_then(parse_float_prefix);
        let y = find(line, |i| axis_run('y', i)).and_then(parse_float_prefix);
        return match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => LineKind::Position { x, y },
            _ => LineKind::Malformed(line),
        };
    }

    let lower = line.to_ascii_lowercase();
    if lower.contains("recording started") {
        LineKind::RecordingStarted
    } else if lower.contains("recording stopped") {
        LineKind::RecordingStopped
    } else {
        LineKind::Ignored
    }
}

/// `x,y` with optional whitespace around the comma.
fn coordinate(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(map(
        tuple((signed_decimal, multispace0, char(','), multispace0, signed_decimal)),
        |(x, _, _, _, y)| (x, y),
    ))(input)
}

/// `Recording = YES|NO`, case-insensitive.
fn recording_token(input: &str) -> IResult<&str, bool> {
    map(
        tuple((
            tag_no_case("recording"),
            multispace0,
            char('='),
            multispace0,
            alt((value(true, tag_no_case("yes")), value(false, tag_no_case("no")))),
        )),
        |(_, _, _, _, flag)| flag,
    )(input)
}

/// `<axis> = <run of digits, '-' and '.'>`, case-insensitive axis letter.
/// The run is returned unparsed.
fn axis_run(axis: char, input: &str) -> IResult<&str, &str> {
    let (rest, _) = tuple((
        alt((char(axis.to_ascii_lowercase()), char(axis.to_ascii_uppercase()))),
        multispace0,
        char('='),
        multispace0,
    ))(input)?;
    take_while1(|c: char| c.is_ascii_digit() || c == '-' || c == '.')(rest)
}

/// Leading float of `text`, ignoring trailing garbage: `"1.5.2"` is 1.5,
/// `"-.5"` is -0.5, `"-"` is `None`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let number = recognize::<_, _, nom::error::Error<&str>, _>(pair(
        opt(char('-')),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    ))(text);
    match number {
        Ok((_, matched)) => matched.parse::<f64>().ok(),
        Err(_) => None,
    }
}

/// Run `parser` at every char boundary of `line`; first success wins.
fn find<'a, T>(line: &'a str, mut parser: impl FnMut(&'a str) -> IResult<&'a str, T>) -> Option<T> {
    line.char_indices()
        .find_map(|(offset, _)| parser(&line[offset..]).ok().map(|(_, found)| found))
}
