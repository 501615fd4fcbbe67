//! HTTP response value object
//!
//! One `Response` type is shared by the live transport path and the cache
//! reconstruction path, so callers never need to care where the bytes came
//! from.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A completed HTTP GET response.
///
/// Immutable once constructed. Serializable so the cache store can persist it
/// verbatim and rebuild an identical value later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
    /// Response headers (string-valued headers only)
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Response {
    /// Whether the status code is in the 2xx range
    pub fn success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
