/// Title metadata providers
///
/// The catalog only needs canonical title fields when a title is first added,
/// plus a search passthrough so clients can find the TMDB id to add.
use crate::{
    error::AppResult,
    models::{SearchPage, TitleKind, TitleMetadata},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Source of canonical title metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the canonical fields for one title
    ///
    /// Fails with `NotFound` when the source has no such title.
    async fn fetch_metadata(&self, kind: TitleKind, tmdb_id: u64) -> AppResult<TitleMetadata>;

    /// Search titles of one kind by name
    async fn search(&self, kind: TitleKind, query: &str, page: u32) -> AppResult<SearchPage>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
