//! Blog data source abstraction layer.
//!
//! This module defines the [`BlogSource`] trait, the common [`BlogSummary`]
//! type, and the single error kind a source can report ([`FetchError`]).
//! Concrete implementations live in sub-modules (currently only [`http`]).
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `fixture.rs`).
//! 2. Define a struct and implement [`BlogSource`] for it.
//! 3. Add `mod fixture;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of (or next to) [`HttpBlogSource`].
//!
//! The feed loader, fetch dispatcher, and UI never see the concrete type.

mod blog;
mod error;
mod http;

pub use blog::{BlogSummary, UserId};
pub use error::FetchError;
pub use http::HttpBlogSource;

use async_trait::async_trait;

/// Trait that every blog source must implement.
///
/// The fetch dispatcher calls these methods from tokio tasks, so
/// implementations must be [`Send`] + [`Sync`].  Both operations return one
/// page; a page shorter than `limit` means the server has nothing further.
#[async_trait]
pub trait BlogSource: Send + Sync {
    /// Blogs filed under `category`.  The literal `"all"` means unfiltered.
    async fn get_blogs(
        &self,
        category: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<BlogSummary>, FetchError>;

    /// Blogs recommended for `user`.
    async fn get_recommended_blogs(
        &self,
        user: &UserId,
        page: u32,
        limit: u32,
    ) -> Result<Vec<BlogSummary>, FetchError>;
}
