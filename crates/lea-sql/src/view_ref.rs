//! Reference to a view read by a query.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(schema, name)` pair naming a view that a query reads from.
///
/// `schema` is `None` when the reference is unqualified. Resolving such a
/// reference against the set of known views is left to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewRef {
    /// Schema qualifier, if the reference carries one
    pub schema: Option<String>,
    /// View name within the schema
    pub name: String,
}

impl ViewRef {
    /// Create a schema-qualified reference
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Create an unqualified reference
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Parse `schema.name` or a bare `name`.
    ///
    /// Only the first dot separates the schema. Returns `None` for empty parts.
    pub fn parse(reference: &str) -> Option<Self> {
        match reference.split_once('.') {
            Some((schema, name)) if !schema.is_empty() && !name.is_empty() => {
                Some(Self::qualified(schema, name))
            }
            Some(_) => None,
            None if reference.is_empty() => None,
            None => Some(Self::unqualified(reference)),
        }
    }
}

impl fmt::Display for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}
