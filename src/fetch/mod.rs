//! Resilient HTTP fetching
//!
//! Response value type, the transport seam, and the retrying cache-backed
//! client that feeds the extraction pipeline.

mod client;
mod response;
mod transport;

pub use client::{FetchClient, FetchOptions, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
pub use response::Response;
pub use transport::{HttpTransport, Transport, TransportError};

#[cfg(test)]
pub(crate) use transport::testing;
