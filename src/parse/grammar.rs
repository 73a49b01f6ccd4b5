//! Shared nom primitives for the text grammars.
//!
//! Decimals follow the `-?\d+(\.\d+)?` form: optional minus sign, integral
//! digits, optional fraction. No exponent, no leading plus sign.

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, digit1, multispace0, multispace1, one_of};
use nom::combinator::{map, opt, recognize};
use nom::sequence::{pair, tuple};
use nom::IResult;

/// Signed decimal, returned as its source text.
pub fn signed_decimal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

/// Field name: ASCII letters and underscores.
pub fn field_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic() || c == '_')(input)
}

/// `name:value` or `name=value`, whitespace allowed around the separator.
pub fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    map(
        tuple((field_name, multispace0, one_of(":="), multispace0, signed_decimal)),
        |(name, _, _, _, value)| (name, value),
    )(input)
}

/// Separator between two positional numbers: a comma with optional
/// whitespace around it, or a run of whitespace.
pub fn pair_separator(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(tuple((multispace0, char(','), multispace0))),
        multispace1,
    ))(input)
}

/// Convert decimal text to a finite float.
pub fn to_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Scan `line` left to right for every `name:value` / `name=value` pair,
/// resuming after each match.
pub fn scan_key_values(line: &str) -> Vec<(&str, &str)> {
    let mut found = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        match key_value(rest) {
            Ok((remaining, kv)) => {
                found.push(kv);
                rest = remaining;
            }
            Err(_) => {
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }
    }
    found
}
