//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, ProfileArgs};
use crate::config::Config;
use crate::error::Result;
use crate::github::{GitHub, UserUpdate};
use crate::pagination::{ErrorPolicy, FetchOptions};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::User { username } => {
                let user = GitHub::from_config(&config)?.get_user(username).await?;
                output(&user)
            }
            Commands::Me => {
                let user = GitHub::from_config(&config)?
                    .get_authenticated_user()
                    .await?;
                output(&user)
            }
            Commands::UpdateMe(args) => self.update_me(&config, args).await,
            Commands::Starred {
                owner,
                pages,
                concurrency,
                deadline_secs,
                strict,
            } => {
                self.starred(&config, owner, *pages, *concurrency, *deadline_secs, *strict)
                    .await
            }
        }
    }

    /// Load the config file and apply command-line overrides
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.cli.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(token) = &self.cli.token {
            config.api.token = Some(token.clone());
        }
        if let Some(base_url) = &self.cli.base_url {
            config.api.base_url = base_url.clone();
        }

        config.validate()?;
        debug!(base_url = %config.api.base_url, has_token = config.token().is_some(), "Loaded config");
        Ok(config)
    }

    async fn update_me(&self, config: &Config, args: &ProfileArgs) -> Result<()> {
        let update = UserUpdate::from(args);
        let user = GitHub::from_config(config)?
            .update_authenticated_user(&update)
            .await?;
        output(&user)
    }

    async fn starred(
        &self,
        config: &Config,
        owner: &str,
        pages: Option<u32>,
        concurrency: Option<usize>,
        deadline_secs: Option<u64>,
        strict: bool,
    ) -> Result<()> {
        let page_count = config.fetch.clamp_pages(pages);
        if let Some(requested) = pages.filter(|p| *p > page_count) {
            warn!(requested, max = config.fetch.max_pages, "Page count capped");
        }

        let options = fetch_options(config, concurrency, deadline_secs, strict);
        let github = GitHub::from_config(config)?.with_fetch_options(options);
        let report = github.starred_repos(owner, page_count).await?;

        for failure in &report.failures {
            warn!(page = failure.page, error = %failure.error, "Page failed");
        }
        output(&report.items)
    }
}

/// Fetch options from config, overridden by `starred` flags
fn fetch_options(
    config: &Config,
    concurrency: Option<usize>,
    deadline_secs: Option<u64>,
    strict: bool,
) -> FetchOptions {
    let mut options = config.fetch.fetch_options();
    if let Some(concurrency) = concurrency {
        options = options.concurrency(concurrency);
    }
    if let Some(secs) = deadline_secs {
        options = options.deadline(Duration::from_secs(secs));
    }
    if strict {
        options = options.error_policy(ErrorPolicy::FailOnAny);
    }
    options
}

/// Print a value as one compact JSON document
fn output<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pagination::PageOrdering;
    use clap::Parser;
    use std::io::Write;

    fn runner(args: &[&str]) -> Runner {
        Runner::new(Cli::parse_from(args))
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let config = runner(&["starfetch", "me"]).load_config().unwrap();
        assert_eq!(config, Config::default());
        assert!(config.token().is_none());
    }

    #[test]
    fn test_load_config_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api:\n  base_url: https://ghe.example.com/api/v3\n  token: from-file\nfetch:\n  ordering: arrival"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = runner(&["starfetch", "--config", path, "me"])
            .load_config()
            .unwrap();
        assert_eq!(config.token().as_deref(), Some("from-file"));
        assert_eq!(config.api.base_url, "https://ghe.example.com/api/v3");

        let config = runner(&[
            "starfetch",
            "--config",
            path,
            "--token",
            "from-flag",
            "--base-url",
            "http://localhost:8080",
            "me",
        ])
        .load_config()
        .unwrap();
        assert_eq!(config.token().as_deref(), Some("from-flag"));
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.fetch.ordering, PageOrdering::Arrival);
    }

    #[test]
    fn test_load_config_rejects_invalid_base_url_flag() {
        let err = runner(&["starfetch", "--base-url", "not a url", "me"])
            .load_config()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_) | Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = runner(&["starfetch", "--config", "/nonexistent/starfetch.yaml", "me"])
            .load_config()
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_strict_maps_to_fail_on_any() {
        let config = Config::default();

        let options = fetch_options(&config, None, None, false);
        assert_eq!(options.error_policy, ErrorPolicy::Partial);
        assert_eq!(options, config.fetch.fetch_options());

        let options = fetch_options(&config, Some(2), Some(10), true);
        assert_eq!(options.error_policy, ErrorPolicy::FailOnAny);
        assert_eq!(options.concurrency, 2);
        assert_eq!(options.deadline, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_strict_overrides_configured_policy() {
        let config = Config::from_yaml("fetch:\n  error_policy: fail_on_all").unwrap();
        assert_eq!(
            fetch_options(&config, None, None, false).error_policy,
            ErrorPolicy::FailOnAll
        );
        assert_eq!(
            fetch_options(&config, None, None, true).error_policy,
            ErrorPolicy::FailOnAny
        );
    }
}
