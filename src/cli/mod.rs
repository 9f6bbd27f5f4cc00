//! CLI module
//!
//! Command-line interface for the GitHub client.
//!
//! # Commands
//!
//! - `user` - Show a user's public profile
//! - `me` - Show the authenticated user
//! - `update-me` - Update the authenticated user's profile
//! - `starred` - List a user's starred repositories

mod commands;
mod runner;

pub use commands::{Cli, Commands, ProfileArgs};
pub use runner::Runner;
