//! Route identifiers
//!
//! A route is reachable through exactly one identifier: its scope and its
//! name joined by a single space (`"math add"`).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Separator placed between the scope and the route name.
pub const SCOPE_SEPARATOR: char = ' ';

/// Globally unique route identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    /// Joins `scope` and `name` into an identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use simplycall_common::RouteId;
    ///
    /// let id = RouteId::new("math", "add");
    /// assert_eq!(id.as_str(), "math add");
    /// ```
    pub fn new(scope: &str, name: &str) -> Self {
        let mut id = String::with_capacity(scope.len() + name.len() + 1);
        id.push_str(scope);
        id.push(SCOPE_SEPARATOR);
        id.push_str(name);
        RouteId(id)
    }

    /// Wraps an identifier that was already joined, e.g. one read off the wire.
    pub fn from_raw(id: impl Into<String>) -> Self {
        RouteId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RouteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RouteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteId {
    fn from(id: &str) -> Self {
        RouteId(id.to_string())
    }
}

impl From<String> for RouteId {
    fn from(id: String) -> Self {
        RouteId(id)
    }
}
