//! Concurrent page fetcher
//!
//! Issues one request per page, bounded by a semaphore, and fans the decoded
//! pages back in through a channel sized to the page count. The drain loop
//! ends when every page task has dropped its sender.

use super::types::{
    check_path_segment, FetchOptions, FetchReport, PageOutcome, PageRequest, PageRoute, PageTarget,
};
use crate::error::{Error, Result};
use crate::http::Transport;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

/// Default `Accept` header for GitHub REST requests
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Fetches a fixed number of pages of a list endpoint concurrently
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    target: Arc<PageTarget>,
    options: FetchOptions,
}

impl PageFetcher {
    /// Create a fetcher for `route` under `base_url`
    pub fn new(transport: Arc<dyn Transport>, base_url: Url, route: PageRoute) -> Self {
        let options = FetchOptions::default();
        Self {
            transport,
            target: Arc::new(PageTarget {
                base_url,
                route,
                accept: GITHUB_ACCEPT.to_string(),
                per_page: options.per_page,
            }),
            options,
        }
    }

    /// Replace the fetch options
    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        Arc::make_mut(&mut self.target).per_page = options.per_page;
        self.options = options;
        self
    }

    /// Override the `Accept` header
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.target).accept = accept.into();
        self
    }

    /// Current options
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch pages `1..=page_count` for `owner` and combine them
    ///
    /// The page count is used as given; callers clamp it. Per-page failures
    /// are collected on the report and then judged by the configured
    /// [`ErrorPolicy`](super::ErrorPolicy).
    pub async fn fetch<I>(
        &self,
        owner: &str,
        credential: &str,
        page_count: u32,
    ) -> Result<FetchReport<I>>
    where
        I: DeserializeOwned + Send + 'static,
    {
        check_path_segment("owner", owner)?;

        if page_count == 0 {
            debug!(owner, "No pages requested");
            return Ok(FetchReport::default());
        }

        let started = Instant::now();
        let outcomes = self.collect::<I>(owner, credential, page_count).await;
        let report = FetchReport::from_outcomes(page_count, outcomes, self.options.ordering);

        info!(
            owner,
            route = self.target.route.template(),
            pages = page_count,
            succeeded = report.pages_succeeded,
            failed = report.failures.len(),
            items = report.items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Paginated fetch finished"
        );

        report.check(self.options.error_policy)
    }

    /// Run every page task and gather exactly one outcome per page
    async fn collect<I>(&self, owner: &str, credential: &str, page_count: u32) -> Vec<PageOutcome<I>>
    where
        I: DeserializeOwned + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let (tx, mut rx) = mpsc::channel::<PageOutcome<I>>(page_count as usize);
        let mut tasks = JoinSet::new();

        for page in 1..=page_count {
            let request = PageRequest::new(owner, credential, page);
            let transport = Arc::clone(&self.transport);
            let target = Arc::clone(&self.target);
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let result = fetch_page::<I>(transport.as_ref(), &target, &request).await;
                if let Err(ref e) = result {
                    warn!(page, error = %e, "Page fetch failed");
                }
                // Capacity equals the page count, so this never waits for room.
                let _ = tx.send(PageOutcome { page, result }).await;
            });
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(page_count as usize);
        let mut deadline_hit = None;

        let drain = async {
            while let Some(outcome) = rx.recv().await {
                outcomes.push(outcome);
            }
        };
        match self.options.deadline {
            Some(deadline) => {
                if tokio::time::timeout(deadline, drain).await.is_err() {
                    warn!(
                        deadline_ms = deadline.as_millis() as u64,
                        "Deadline reached, abandoning outstanding pages"
                    );
                    tasks.abort_all();
                    deadline_hit = Some(deadline);
                }
            }
            None => drain.await,
        }

        // A task already mid-poll when aborted can still publish, so every
        // task must finish before the final drain.
        while tasks.join_next().await.is_some() {}
        while let Ok(outcome) = rx.try_recv() {
            outcomes.push(outcome);
        }

        let reported: HashSet<u32> = outcomes.iter().map(|o| o.page).collect();
        for page in (1..=page_count).filter(|p| !reported.contains(p)) {
            let error = match deadline_hit {
                Some(deadline) => Error::Timeout {
                    timeout_ms: deadline.as_millis() as u64,
                },
                None => Error::TaskAborted { page },
            };
            warn!(page, error = %error, "Page produced no result");
            outcomes.push(PageOutcome {
                page,
                result: Err(error),
            });
        }

        outcomes
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("target", &self.target)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Build, send, and decode a single page
async fn fetch_page<I: DeserializeOwned>(
    transport: &dyn Transport,
    target: &PageTarget,
    request: &PageRequest,
) -> Result<Vec<I>> {
    let api_request = request.to_api_request(target)?;
    debug!(page = request.page, url = %api_request.url, "Fetching page");

    let response = transport.send(api_request).await?.error_for_status()?;
    let items: Vec<I> = response.json()?;

    debug!(page = request.page, count = items.len(), "Fetched page");
    Ok(items)
}
