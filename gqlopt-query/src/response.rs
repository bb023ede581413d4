//! GraphQL error payloads
//!
//! The `errors` entries of a GraphQL response, as produced by an `ErrorDecoder`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Line and column in the query document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// One segment of the path to the field that raised an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(i64),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// A single GraphQL error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Location>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: None,
            path: None,
            extensions: None,
        }
    }

    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_extensions(mut self, extensions: serde_json::Value) -> Self {
        self.extensions = Some(extensions);
        self
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(path) = self.path.as_ref().filter(|p| !p.is_empty()) {
            let joined: Vec<String> = path.iter().map(|s| s.to_string()).collect();
            write!(f, " (path: {})", joined.join("."))?;
        }
        Ok(())
    }
}

/// The decoded error collection of a failed response.
///
/// Decoders must not return an empty collection as success; `decode_response`
/// turns one into a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphQlErrors(Vec<GraphQlError>);

impl GraphQlErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&GraphQlError> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GraphQlError> {
        self.0.iter()
    }
}

impl From<Vec<GraphQlError>> for GraphQlErrors {
    fn from(errors: Vec<GraphQlError>) -> Self {
        Self(errors)
    }
}

impl FromIterator<GraphQlError> for GraphQlErrors {
    fn from_iter<I: IntoIterator<Item = GraphQlError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for GraphQlErrors {
    type Item = GraphQlError;
    type IntoIter = std::vec::IntoIter<GraphQlError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a GraphQlErrors {
    type Item = &'a GraphQlError;
    type IntoIter = std::slice::Iter<'a, GraphQlError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for GraphQlErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for GraphQlErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_error() {
        let errors: GraphQlErrors = serde_json::from_value(serde_json::json!([
            {
                "message": "Cannot query field \"nam\" on type \"User\".",
                "locations": [{ "line": 1, "column": 14 }],
                "path": ["user", 0, "nam"],
                "extensions": { "code": "GRAPHQL_VALIDATION_FAILED" }
            }
        ]))
        .unwrap();

        assert_eq!(errors.len(), 1);
        let err = errors.first().unwrap();
        assert_eq!(err.locations.as_ref().unwrap()[0], Location { line: 1, column: 14 });
        assert_eq!(
            err.path.as_ref().unwrap(),
            &vec![
                PathSegment::Field("user".into()),
                PathSegment::Index(0),
                PathSegment::Field("nam".into()),
            ]
        );
        assert_eq!(err.extensions.as_ref().unwrap()["code"], "GRAPHQL_VALIDATION_FAILED");
    }

    #[test]
    fn test_message_only_error() {
        let err: GraphQlError = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(err, GraphQlError::new("boom"));

        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"message":"boom"}"#);
    }

    #[test]
    fn test_extensions_are_serialized() {
        let err = GraphQlError::new("rate limited")
            .with_extensions(serde_json::json!({ "code": "RATE_LIMITED", "retryAfter": 30 }));

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "rate limited",
                "extensions": { "code": "RATE_LIMITED", "retryAfter": 30 }
            })
        );
        assert_eq!(serde_json::from_value::<GraphQlError>(json).unwrap(), err);
    }

    #[test]
    fn test_display_joins_messages() {
        let errors: GraphQlErrors = vec![
            GraphQlError::new("first").with_path(vec![
                PathSegment::Field("user".into()),
                PathSegment::Index(2),
            ]),
            GraphQlError::new("second"),
        ]
        .into();

        assert_eq!(errors.to_string(), "first (path: user.2); second");
    }
}
