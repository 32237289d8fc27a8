//! Merging into YAML documents that are not owned by the descriptor store.
//!
//! The extension descriptor is edited as a raw `serde_yaml::Value` so that
//! anything a user added by hand survives the rewrite. Locations inside it are
//! addressed with small path expressions such as
//! `resources[0].parameters.config`, parsed by [`parse_path`] and resolved by
//! [`navigate_yaml_value`].

pub mod extension;

use serde_yaml::Value;

use crate::error::{Error, Result};

/// One step of a path expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// Parse `a.b[2].c` into segments.
///
/// A backslash escapes the next character, so `URL\.headers` is a single
/// key. Bracket content that is not a number is taken as a key.
///
/// ```
/// use mta_config::merge::{parse_path, PathSegment};
///
/// let segments = parse_path("resources[1].name");
/// assert_eq!(segments[1], PathSegment::Index(1));
/// ```
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut key = String::new();
    let mut chars = path.trim().chars();

    let flush = |key: &mut String, segments: &mut Vec<PathSegment>| {
        if !key.is_empty() {
            segments.push(PathSegment::Key(std::mem::take(key)));
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    key.push(next);
                }
            }
            '.' => flush(&mut key, &mut segments),
            '[' => {
                flush(&mut key, &mut segments);
                let inner: String = chars.by_ref().take_while(|c| *c != ']').collect();
                let inner = inner.trim();
                match inner.parse::<usize>() {
                    Ok(index) => segments.push(PathSegment::Index(index)),
                    Err(_) if !inner.is_empty() => {
                        segments.push(PathSegment::Key(inner.to_string()))
                    }
                    Err(_) => {}
                }
            }
            _ => key.push(ch),
        }
    }
    flush(&mut key, &mut segments);
    segments
}

/// Walk `path` inside `value` and return the value found there.
///
/// Missing mapping keys are inserted as `null` and a `null` met on the way is
/// turned into the container the next segment needs. Indexing past the end of
/// a sequence and stepping into a scalar are errors.
pub fn navigate_yaml_value<'a>(
    value: &'a mut Value,
    path: &[PathSegment],
) -> Result<&'a mut Value> {
    let mut current = value;
    for segment in path {
        if current.is_null() {
            *current = match segment {
                PathSegment::Key(_) => Value::Mapping(Default::default()),
                PathSegment::Index(_) => Value::Sequence(Vec::new()),
            };
        }
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Mapping(map)) => map
                .entry(Value::String(key.clone()))
                .or_insert(Value::Null),
            (PathSegment::Index(index), Value::Sequence(seq)) => {
                let len = seq.len();
                seq.get_mut(*index).ok_or_else(|| Error::Merge {
                    operation: "navigate".to_string(),
                    message: format!("index {} out of bounds (length {})", index, len),
                })?
            }
            (segment, other) => {
                return Err(Error::Merge {
                    operation: "navigate".to_string(),
                    message: format!(
                        "cannot step into {} with {:?}",
                        type_name(other),
                        segment
                    ),
                })
            }
        };
    }
    Ok(current)
}

/// Human readable kind of a YAML value, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
