//! Numeric attribute parsing for scene description elements
//!
//! Attributes are whitespace separated lists ("0 0 1", "1 0 0 0"). An absent
//! attribute is `Ok(None)` so callers can apply their documented default; a
//! present but malformed one is an error.

use roxmltree::Node;

use super::SceneError;
use crate::foundation::math::{QuatWxyz, Vec3};

fn invalid(node: Node<'_, '_>, attribute: &'static str, value: &str, reason: impl Into<String>) -> SceneError {
    SceneError::InvalidAttribute {
        element: node.tag_name().name().to_string(),
        attribute,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parse a float list with an arity in `min..=max`
pub fn floats(
    node: Node<'_, '_>,
    attribute: &'static str,
    min: usize,
    max: usize,
) -> Result<Option<Vec<f32>>, SceneError> {
    let Some(text) = node.attribute(attribute) else {
        return Ok(None);
    };

    let values = text
        .split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(node, attribute, text, e.to_string()))?;

    if values.len() < min || values.len() > max {
        let expected = if min == max {
            format!("expected {min} values, found {}", values.len())
        } else {
            format!("expected {min} to {max} values, found {}", values.len())
        };
        return Err(invalid(node, attribute, text, expected));
    }

    Ok(Some(values))
}

/// Parse a single float
pub fn scalar(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<f32>, SceneError> {
    Ok(floats(node, attribute, 1, 1)?.map(|v| v[0]))
}

/// Parse a 3-vector
pub fn vec3(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<Vec3>, SceneError> {
    Ok(floats(node, attribute, 3, 3)?.map(|v| Vec3::new(v[0], v[1], v[2])))
}

/// Parse a scalar-first quaternion; a zero-length quaternion is rejected
pub fn quat_wxyz(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<QuatWxyz>, SceneError> {
    let Some(values) = floats(node, attribute, 4, 4)? else {
        return Ok(None);
    };

    let quat = QuatWxyz::new(values[0], values[1], values[2], values[3]);
    if quat.norm() <= f32::EPSILON {
        let text = node.attribute(attribute).unwrap_or_default();
        return Err(invalid(node, attribute, text, "zero-length quaternion"));
    }
    Ok(Some(quat))
}

/// Parse an RGBA color; an RGB triple gets an opaque alpha
pub fn rgba(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<[f32; 4]>, SceneError> {
    Ok(floats(node, attribute, 3, 4)?.map(|v| [v[0], v[1], v[2], v.get(3).copied().unwrap_or(1.0)]))
}

/// Parse an RGB color
pub fn rgb(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<[f32; 3]>, SceneError> {
    Ok(floats(node, attribute, 3, 3)?.map(|v| [v[0], v[1], v[2]]))
}

/// Parse an integer
pub fn int(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<i32>, SceneError> {
    let Some(text) = node.attribute(attribute) else {
        return Ok(None);
    };
    text.trim()
        .parse::<i32>()
        .map(Some)
        .map_err(|e| invalid(node, attribute, text, e.to_string()))
}

/// Parse a "true"/"false" flag
pub fn boolean(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<bool>, SceneError> {
    let Some(text) = node.attribute(attribute) else {
        return Ok(None);
    };
    match text.trim() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(invalid(node, attribute, text, "expected \"true\" or \"false\"")),
    }
}

/// Owned copy of a string attribute, empty values treated as absent
pub fn string(node: Node<'_, '_>, attribute: &'static str) -> Option<String> {
    node.attribute(attribute)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
