//! CLI commands and argument parsing

use crate::github::UserUpdate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// GitHub starred-repository fetcher
#[derive(Parser, Debug)]
#[command(name = "starfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API token, overrides the config file
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// API base URL, overrides the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a user's public profile
    User {
        /// GitHub login
        username: String,
    },

    /// Show the authenticated user
    Me,

    /// Update the authenticated user's profile
    UpdateMe(ProfileArgs),

    /// List repositories starred by a user
    Starred {
        /// GitHub login whose stars are listed
        owner: String,

        /// Pages to fetch (capped by fetch.max_pages)
        #[arg(short, long)]
        pages: Option<u32>,

        /// Page requests in flight at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Deadline for the whole fetch, in seconds
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Fail if any page fails
        #[arg(long)]
        strict: bool,
    },
}

/// Profile fields for `update-me`
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub blog: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub hireable: Option<bool>,

    #[arg(long)]
    pub bio: Option<String>,

    #[arg(long)]
    pub twitter_username: Option<String>,
}

impl From<&ProfileArgs> for UserUpdate {
    fn from(args: &ProfileArgs) -> Self {
        Self {
            name: args.name.clone(),
            email: args.email.clone(),
            blog: args.blog.clone(),
            twitter_username: args.twitter_username.clone(),
            company: args.company.clone(),
            location: args.location.clone(),
            hireable: args.hireable,
            bio: args.bio.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_starred() {
        let cli = Cli::parse_from([
            "starfetch",
            "--token",
            "secret",
            "starred",
            "octocat",
            "--pages",
            "3",
            "--strict",
        ]);
        assert_eq!(cli.token.as_deref(), Some("secret"));
        match cli.command {
            Commands::Starred {
                owner,
                pages,
                concurrency,
                strict,
                ..
            } => {
                assert_eq!(owner, "octocat");
                assert_eq!(pages, Some(3));
                assert_eq!(concurrency, None);
                assert!(strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_update_me() {
        let cli = Cli::parse_from([
            "starfetch",
            "update-me",
            "--bio",
            "Rustacean",
            "--hireable",
            "true",
        ]);
        let Commands::UpdateMe(args) = cli.command else {
            panic!("expected update-me");
        };
        let update = UserUpdate::from(&args);
        assert_eq!(update.bio.as_deref(), Some("Rustacean"));
        assert_eq!(update.hireable, Some(true));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["starfetch", "me", "-v", "--base-url", "http://localhost"]);
        assert!(cli.verbose);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost"));
        assert!(matches!(cli.command, Commands::Me));
    }
}
