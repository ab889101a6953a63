use crate::{
    error::AppResult,
    models::{CatalogId, Title, TitleKind, TitlePatch},
};

/// A title document together with its optimistic-concurrency version token
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedTitle {
    pub title: Title,
    pub version: i64,
}

/// Result of a conditional patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The patch was applied; carries the version now stored
    Applied { version: i64 },
    /// The document changed since `expected_version` was read
    Conflict,
}

/// Document store holding one document per title
///
/// Implementations must apply a patch and bump the version as one atomic step,
/// and only when the stored version still equals `expected_version`.
#[async_trait::async_trait]
pub trait TitleStore: Send + Sync {
    /// Inserts a new title; fails with `Duplicate` when the catalog id is taken
    async fn insert(&self, title: &Title) -> AppResult<()>;

    /// Loads a title and its current version
    async fn load(&self, id: &CatalogId) -> AppResult<Option<VersionedTitle>>;

    /// Lists titles in creation order, optionally restricted to one kind
    async fn list(&self, kind: Option<TitleKind>) -> AppResult<Vec<Title>>;

    /// Applies `patch` if the stored version is still `expected_version`
    ///
    /// Fails with `NotFound` if the title no longer exists.
    async fn apply_patch(
        &self,
        id: &CatalogId,
        expected_version: i64,
        patch: &TitlePatch,
    ) -> AppResult<PatchOutcome>;
}
