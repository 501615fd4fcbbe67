//! Cache module for storing HTTP responses to disk
//!
//! This module provides a response cache that persists fetched pages to the
//! filesystem with a fixed TTL (time-to-live). Stale or corrupt entries are
//! transparently refetched; an unusable cache directory disables caching for
//! the lifetime of the instance rather than failing the run.

mod manager;

pub use manager::{ResponseCache, CACHE_TTL};
