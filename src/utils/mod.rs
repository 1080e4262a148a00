//! Utility modules shared by the adapters and the pipeline.
//!
//! - [`HttpClient`]: per-adapter HTTP client with user agent and timeouts
//! - [`with_retry`] / [`RetryConfig`]: bounded retry on transient errors

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::{api_retry_config, is_transient, with_retry, RetryConfig};
