//! Authenticated REST API client.
//!
//! This module provides the `ApiClient`, which attaches the session's bearer
//! token to every request and tears the session down when the server answers
//! `401 Unauthorized`.

pub mod client;
pub mod error;

pub use client::{build_headers, ApiClient, RequestOptions};
pub use error::ApiError;
