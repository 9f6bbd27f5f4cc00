//! GitHub module
//!
//! Typed access to the GitHub REST endpoints this crate uses.
//!
//! - [`GitHub::get_user`] - `GET /users/{username}`
//! - [`GitHub::get_authenticated_user`] - `GET /user`
//! - [`GitHub::update_authenticated_user`] - `PATCH /user`
//! - [`GitHub::starred_repos`] - `GET /users/{owner}/starred`, pages fetched concurrently

mod client;
mod types;

pub use client::GitHub;
pub use types::{GitHubUser, License, Owner, Permissions, Plan, Repository, UserUpdate};
