//! Pagination types
//!
//! Page requests, per-page outcomes, and the combined report returned by
//! [`super::PageFetcher`].

use crate::error::{Error, Result};
use crate::http::ApiRequest;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Placeholder replaced by the owner in a [`PageRoute`] template
pub const OWNER_PLACEHOLDER: &str = "{owner}";

/// Default number of concurrently running page requests
pub const DEFAULT_CONCURRENCY: usize = 4;

// ============================================================================
// Options
// ============================================================================

/// What to do when some pages fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Return every successful page; failures are listed on the report
    #[default]
    Partial,
    /// Fail the whole fetch if any page failed
    FailOnAny,
    /// Fail only when every requested page failed
    FailOnAll,
}

/// Order in which pages are concatenated into the combined result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOrdering {
    /// Ascending page number, regardless of completion order
    #[default]
    PageNumber,
    /// Completion order
    Arrival,
}

/// Tuning for a paginated fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum page requests in flight at once
    pub concurrency: usize,
    /// Deadline for the whole fetch; pages still outstanding are abandoned
    pub deadline: Option<Duration>,
    /// Optional `per_page` query value
    pub per_page: Option<u32>,
    /// Failure policy
    pub error_policy: ErrorPolicy,
    /// Combined result ordering
    pub ordering: PageOrdering,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
            per_page: None,
            error_policy: ErrorPolicy::default(),
            ordering: PageOrdering::default(),
        }
    }
}

impl FetchOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency bound (zero is treated as one)
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the whole-fetch deadline
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the `per_page` query value
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Set the error policy
    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the result ordering
    #[must_use]
    pub fn ordering(mut self, ordering: PageOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}

// ============================================================================
// Routes and requests
// ============================================================================

/// Path template for a paginated list endpoint, e.g. `users/{owner}/starred`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    template: String,
}

impl PageRoute {
    /// Create a route from a template
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Repositories starred by a user
    pub fn starred() -> Self {
        Self::new("users/{owner}/starred")
    }

    /// Repositories owned by a user
    pub fn user_repos() -> Self {
        Self::new("users/{owner}/repos")
    }

    /// The raw template
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Resolve the template against a base URL
    ///
    /// The owner becomes a single percent-encoded path segment. Any path on
    /// the base URL is kept as a prefix.
    pub fn resolve(&self, base: &Url, owner: &str) -> Result<Url> {
        check_path_segment("owner", owner)?;
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::invalid_value("base_url", format!("'{base}' cannot be a base URL"))
            })?;
            segments.pop_if_empty();
            for segment in self.template.split('/').filter(|s| !s.is_empty()) {
                if segment == OWNER_PLACEHOLDER {
                    segments.push(owner);
                } else {
                    segments.push(segment);
                }
            }
        }
        Ok(url)
    }
}

/// Reject values that cannot stand as a single path segment
///
/// `url` drops `.` and `..` segments instead of encoding them, which would
/// address a different endpoint.
pub(crate) fn check_path_segment(field: &str, value: &str) -> Result<()> {
    match value.trim() {
        "" => Err(Error::invalid_value(field, "must not be empty")),
        "." | ".." => Err(Error::invalid_value(
            field,
            format!("'{value}' is not a valid path segment"),
        )),
        _ => Ok(()),
    }
}

/// Everything a page task needs to address its request
#[derive(Debug, Clone)]
pub struct PageTarget {
    /// API base URL
    pub base_url: Url,
    /// Endpoint route
    pub route: PageRoute,
    /// `Accept` header value
    pub accept: String,
    /// Optional `per_page` query value
    pub per_page: Option<u32>,
}

/// One page of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Resource owner used in the route
    pub owner: String,
    /// Bearer credential
    pub credential: String,
    /// 1-based page number
    pub page: u32,
}

impl PageRequest {
    /// Create a page request
    pub fn new(owner: impl Into<String>, credential: impl Into<String>, page: u32) -> Self {
        Self {
            owner: owner.into(),
            credential: credential.into(),
            page,
        }
    }

    /// Build the transport request for this page
    pub fn to_api_request(&self, target: &PageTarget) -> Result<ApiRequest> {
        let url = target.route.resolve(&target.base_url, &self.owner)?;
        let mut request = ApiRequest::get(url)
            .header("Accept", target.accept.as_str())
            .bearer(self.credential.as_str())
            .query("page", self.page.to_string());
        if let Some(per_page) = target.per_page {
            request = request.query("per_page", per_page.to_string());
        }
        Ok(request)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of one page task
#[derive(Debug)]
pub struct PageOutcome<I> {
    /// Page number
    pub page: u32,
    /// Decoded items or the failure cause
    pub result: Result<Vec<I>>,
}

/// A page that contributed nothing to the combined result
#[derive(Debug)]
pub struct PageFailure {
    /// Page number
    pub page: u32,
    /// Failure cause
    pub error: Error,
}

/// Combined result of a paginated fetch
#[derive(Debug)]
pub struct FetchReport<I> {
    /// Items from every successful page
    pub items: Vec<I>,
    /// Number of pages requested
    pub pages_requested: u32,
    /// Number of pages that decoded successfully
    pub pages_succeeded: u32,
    /// Failed pages, ascending by page number
    pub failures: Vec<PageFailure>,
}

impl<I> Default for FetchReport<I> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pages_requested: 0,
            pages_succeeded: 0,
            failures: Vec::new(),
        }
    }
}

impl<I> FetchReport<I> {
    /// Combine page outcomes
    ///
    /// With [`PageOrdering::PageNumber`] outcomes are concatenated by page
    /// number; otherwise in the order given. Item order within a page is kept.
    pub fn from_outcomes(
        pages_requested: u32,
        mut outcomes: Vec<PageOutcome<I>>,
        ordering: PageOrdering,
    ) -> Self {
        if ordering == PageOrdering::PageNumber {
            outcomes.sort_by_key(|outcome| outcome.page);
        }

        let mut report = Self {
            pages_requested,
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.result {
                Ok(items) => {
                    report.pages_succeeded += 1;
                    report.items.extend(items);
                }
                Err(error) => report.failures.push(PageFailure {
                    page: outcome.page,
                    error,
                }),
            }
        }
        report.failures.sort_by_key(|failure| failure.page);
        report
    }

    /// True when no page failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when pages were requested and none succeeded
    pub fn all_failed(&self) -> bool {
        self.pages_requested > 0 && self.pages_succeeded == 0
    }

    /// Number of combined items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the combined result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Page numbers that failed
    pub fn failed_pages(&self) -> Vec<u32> {
        self.failures.iter().map(|f| f.page).collect()
    }

    /// Consume the report and return the items
    pub fn into_items(self) -> Vec<I> {
        self.items
    }

    /// Apply an error policy
    pub fn check(self, policy: ErrorPolicy) -> Result<Self> {
        let failed = match policy {
            ErrorPolicy::Partial => false,
            ErrorPolicy::FailOnAny => !self.is_complete(),
            ErrorPolicy::FailOnAll => self.all_failed(),
        };
        if failed {
            Err(self.into_error())
        } else {
            Ok(self)
        }
    }

    fn into_error(self) -> Error {
        let failed = self.failures.len();
        let total = self.pages_requested;
        match self.failures.into_iter().next() {
            Some(first) => Error::PageFailures {
                failed,
                total,
                first_page: first.page,
                first_error: Box::new(first.error),
            },
            None => Error::Other(format!("no page of {total} succeeded")),
        }
    }
}

impl<I> IntoIterator for FetchReport<I> {
    type Item = I;
    type IntoIter = std::vec::IntoIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
