//! HTTP client module
//!
//! Provides the transport seam used by the GitHub client and the page
//! fetcher, plus the reqwest-backed implementation.
//!
//! # Features
//!
//! - **Transport Trait**: Injectable request executor, shared across tasks
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{ApiRequest, ApiResponse, Transport};
