//! Line-oriented point records.
//!
//! Accepted per line (after trimming):
//!
//! - `20,30` or `20 30`: positional x then y
//! - `x:20,y:30`, `x=20; y=30`, `x: 20 y: 20 z: 3`: named fields

use super::grammar::{pair_separator, scan_key_values, signed_decimal, key_value, to_finite};
use crate::types::Point;
use indexmap::IndexMap;
use nom::combinator::all_consuming;
use nom::character::complete::multispace0;
use nom::sequence::tuple;

/// Parse one trimmed, non-blank line. `None` means x or y could not be found.
pub(crate) fn parse_line(line: &str) -> Option<Point> {
    if let Some(point) = parse_positional(line) {
        return Some(point);
    }

    let mut fields = IndexMap::new();
    for token in line
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if let Ok((_, (name, value))) = all_consuming(key_value)(token) {
            fields.insert(name, value);
        }
    }

    // Tokenizing on whitespace breaks pairs written as `x : 20`; recover them
    // with a scan over the whole line.
    if !fields.contains_key("x") || !fields.contains_key("y") {
        for (name, value) in scan_key_values(line) {
            fields.insert(name, value);
        }
    }

    let number = |name: &str| fields.get(name).and_then(|v| to_finite(v));
    let mut point = Point::new(number("x")?, number("y")?);
    point.z = number("z");
    point.t = number("t");
    Some(point)
}

/// Two signed decimals separated by a comma or whitespace, nothing else.
fn parse_positional(line: &str) -> Option<Point> {
    let (_, (_, x, _, y, _)) = all_consuming(tuple((
        multispace0,
        signed_decimal,
        pair_separator,
        signed_decimal,
        multispace0,
    )))(line)
    .ok()?;
    Some(Point::new(to_finite(x)?, to_finite(y)?))
}
