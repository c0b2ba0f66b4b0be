//! Field paths and form errors
//!
//! Every error the form can produce is attached to a dotted field path such as
//! `superStrategies.0.strategies.1.type`, the same addressing used by edits.

use itertools::Itertools;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Dotted path into the form document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    /// Extend with a named field
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.to_string()));
        FieldPath(segments)
    }

    /// Extend with a list position
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        FieldPath(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("."))
    }
}

impl FromStr for FieldPath {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(EditError::InvalidPath(s.to_string()));
        }

        let mut segments = Vec::new();
        for part in s.split('.') {
            if part.is_empty() {
                return Err(EditError::InvalidPath(s.to_string()));
            }
            match parse_index(part) {
                Some(index) => segments.push(PathSegment::Index(index)),
                None => segments.push(PathSegment::Field(part.to_string())),
            }
        }
        Ok(FieldPath(segments))
    }
}

/// Canonical decimal index only: no sign, no leading zeros
fn parse_index(part: &str) -> Option<usize> {
    if !part.bytes().all(|b| b.is_ascii_digit()) || (part.len() > 1 && part.starts_with('0')) {
        return None;
    }
    part.parse().ok()
}

impl Serialize for FieldPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A single validation message attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: FieldPath,
    pub message: String,
}

impl FieldError {
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        FieldError {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All field errors found in one validation pass, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("form has {} invalid field(s): {}", .errors.len(), .errors.iter().join("; "))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: FieldPath, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, message));
    }

    /// Absorb another set of errors, keeping order
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First message reported for a dotted path
    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.path.to_string() == path)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Distinct paths that carry at least one error
    pub fn paths(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| e.path.to_string())
            .unique()
            .collect()
    }

    /// Ok when nothing was reported
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Serialized as `{ "path": "message" }`, first message per path
impl Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let first_per_path: Vec<&FieldError> =
            self.errors.iter().unique_by(|e| e.path.clone()).collect();
        let mut map = serializer.serialize_map(Some(first_per_path.len()))?;
        for error in first_per_path {
            map.serialize_entry(&error.path, &error.message)?;
        }
        map.end()
    }
}

/// Errors from path-addressed edits of the working copy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("index {index} out of range at {path} (length {len})")]
    IndexOutOfRange {
        path: FieldPath,
        index: usize,
        len: usize,
    },

    #[error("unknown field: {0}")]
    UnknownField(FieldPath),

    #[error("invalid field path: '{0}'")]
    InvalidPath(String),
}
