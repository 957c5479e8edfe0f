//! Content store - reads posts and writes comments
//!
//! [`ContentStore`] is the seam between page handlers and the content lake.
//! The application builds one store at startup and hands it to the server;
//! tests hand it a [`MemoryStore`] instead.

mod error;
mod memory;
pub mod queries;
mod sanity;

use async_trait::async_trait;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sanity::SanityClient;

#[cfg(test)]
pub(crate) use memory::tests::fixture;

use crate::content::{CreatedDocument, NewComment, Post, PostSummary};

/// Read and write access to blog documents
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All posts, in store order
    async fn fetch_posts(&self) -> Result<Vec<PostSummary>>;

    /// The post with `slug` and its approved comments, `None` if no post matches
    async fn fetch_post(&self, slug: &str) -> Result<Option<Post>>;

    /// Slugs of all posts
    async fn fetch_slugs(&self) -> Result<Vec<String>>;

    /// Create an unapproved comment document
    async fn create_comment(&self, comment: &NewComment) -> Result<CreatedDocument>;
}
