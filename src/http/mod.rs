//! JSON HTTP client for upstream services (review store, identity issuer).
//!
//! Centralizes base-URL prefixing, JSON encoding/decoding and the mapping of
//! non-success responses into [`HttpError::Status`]. Callers never see a raw
//! reqwest response.

mod client;
mod error;

pub use client::{HttpClient, RequestOptions};
pub use error::HttpError;
