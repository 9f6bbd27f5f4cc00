// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # starfetch
//!
//! A small GitHub REST client built around a concurrent page fetcher.
//!
//! ## Features
//!
//! - **Concurrent Pagination**: Request pages `1..=N` at once with bounded concurrency
//! - **Partial Results**: Failed pages are reported, not fatal, unless an error policy says so
//! - **Retry & Rate Limiting**: Backoff on 429/5xx, optional token-bucket limiter
//! - **Pluggable Transport**: Swap the HTTP layer for a mock in tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use starfetch::{config::Config, github::GitHub, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_file("starfetch.yaml")?;
//!     let github = GitHub::from_config(&config)?;
//!
//!     let report = github.starred_repos("octocat", 3).await?;
//!     for repo in &report.items {
//!         println!("{}", repo.full_name);
//!     }
//!     for failure in &report.failures {
//!         eprintln!("page {} failed: {}", failure.page, failure.error);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      GitHub client                      │
//! │  get_user   get_authenticated_user   starred_repos      │
//! └─────────────────────────────────────────────────────────┘
//!                 │                          │
//!                 │               ┌──────────┴──────────┐
//!                 │               │    PageFetcher      │
//!                 │               │ fan-out → channel   │
//!                 │               │ → FetchReport       │
//!                 │               └──────────┬──────────┘
//! ┌───────────────┴──────────────────────────┴──────────────┐
//! │            Transport (HttpClient / mock)                │
//! │       Retry · Backoff · Rate Limit · Timeouts           │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document GitHub model fields before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Concurrent page fetching
pub mod pagination;

/// GitHub endpoints and models
pub mod github;

/// Configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use github::{GitHub, GitHubUser, Repository, UserUpdate};
pub use pagination::{ErrorPolicy, FetchOptions, FetchReport, PageFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
