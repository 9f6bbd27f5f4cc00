//! Pagination module
//!
//! Concurrent fetching of page-numbered list endpoints.
//!
//! # Overview
//!
//! A [`PageFetcher`] requests pages `1..=N` at once (bounded by
//! [`FetchOptions::concurrency`]), records one [`PageOutcome`] per page, and
//! combines them into a [`FetchReport`]. Failed pages never abort their
//! siblings; the [`ErrorPolicy`] decides whether they fail the whole fetch.

mod fetcher;
mod types;

pub use fetcher::{PageFetcher, GITHUB_ACCEPT};
pub(crate) use types::check_path_segment;
pub use types::{
    ErrorPolicy, FetchOptions, FetchReport, PageFailure, PageOrdering, PageOutcome, PageRequest,
    PageRoute, PageTarget, DEFAULT_CONCURRENCY, OWNER_PLACEHOLDER,
};
