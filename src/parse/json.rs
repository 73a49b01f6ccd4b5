//! JSON point lists: `[{"x":..,"y":..}, ..]` or `{"points": [..]}`

use crate::error::{Result, SketchError};
use crate::types::{Point, PointSequence};
use serde_json::{Map, Value};

/// Interpret an already-decoded JSON value.
///
/// Returns `None` when the value is neither an array nor an object with a
/// `points` array, so the caller can fall back to the line grammar.
pub(crate) fn points_from_json(value: &Value) -> Option<Result<PointSequence>> {
    match value {
        Value::Array(items) => Some(convert_array(items, true)),
        Value::Object(map) => match map.get("points") {
            Some(Value::Array(items)) => Some(convert_array(items, false)),
            _ => None,
        },
        _ => None,
    }
}

fn convert_array(items: &[Value], require_shape: bool) -> Result<PointSequence> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = match item.as_object() {
                Some(object) if !require_shape || object.contains_key("x") || object.contains_key("y") => object,
                _ if require_shape => {
                    return Err(SketchError::Parse(
                        "JSON array items must be objects with x and y".to_string(),
                    ))
                }
                _ => {
                    return Err(SketchError::Parse(format!(
                        "points[{}] is not an object",
                        index
                    )))
                }
            };
            convert_object(index, object)
        })
        .collect()
}

fn convert_object(index: usize, object: &Map<String, Value>) -> Result<Point> {
    let required = |axis: &str| -> Result<f64> {
        match object.get(axis) {
            None | Some(Value::Null) => Err(SketchError::Parse(format!(
                "point {} is missing {}",
                index, axis
            ))),
            Some(value) => coerce(value).ok_or_else(|| {
                SketchError::Parse(format!(
                    "point {}: {} is not a finite number ({})",
                    index, axis, value
                ))
            }),
        }
    };
    let optional = |axis: &str| -> Result<Option<f64>> {
        match object.get(axis) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => coerce(value).map(Some).ok_or_else(|| {
                SketchError::Parse(format!(
                    "point {}: {} is not a finite number ({})",
                    index, axis, value
                ))
            }),
        }
    };

    Ok(Point {
        x: required("x")?,
        y: required("y")?,
        z: optional("z")?,
        t: optional("t")?,
    })
}

/// Numbers and numeric strings coerce to a finite float; anything else is rejected.
fn coerce(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_of_objects() {
        let value = json!([{"x": 10, "y": 20, "z": 5}, {"x": 20, "y": 30, "label": "a"}]);
        let points = points_from_json(&value).unwrap().unwrap();
        assert_eq!(points, vec![
            Point::new(10.0, 20.0).with_z(5.0),
            Point::new(20.0, 30.0),
        ]);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let value = json!([{"x": "1.5", "y": " 2 "}]);
        let points = points_from_json(&value).unwrap().unwrap();
        assert_eq!(points, vec![Point::new(1.5, 2.0)]);
    }

    #[test]
    fn test_array_item_shape_error() {
        let value = json!([{"x": 1, "y": 2}, 7]);
        let err = points_from_json(&value).unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error: JSON array items must be objects with x and y"
        );
    }

    #[test]
    fn test_missing_axis_rejected() {
        let value = json!([{"x": 1}]);
        let err = points_from_json(&value).unwrap().unwrap_err();
        assert!(err.to_string().contains("missing y"));
    }

    #[test]
    fn test_points_wrapper() {
        let value = json!({"name": "trace", "points": [{"x": 0, "y": 0}, {"x": 1, "y": 1}]});
        let points = points_from_json(&value).unwrap().unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_other_values_fall_through() {
        assert!(points_from_json(&json!(5)).is_none());
        assert!(points_from_json(&json!({"a": 1})).is_none());
        assert!(points_from_json(&json!({"points": 3})).is_none());
    }

    #[test]
    fn test_non_numeric_rejected() {
        let value = json!({"points": [{"x": true, "y": 1}]});
        assert!(points_from_json(&value).unwrap().is_err());
    }
}
