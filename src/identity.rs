//! Caller identity
//!
//! The execution environment authenticates every caller and hands the ledger
//! an opaque identifier. The ledger only compares identities for equality and
//! uses them as map keys; it never parses or validates them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, authenticated identity of the actor performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallerId(pub String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CallerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
