use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    db::{PatchOutcome, TitleStore, VersionedTitle},
    error::{AppError, AppResult},
    models::{CatalogId, Title, TitleKind, TitlePatch},
};

/// In-memory title store for tests and local runs
///
/// The version check and the patch happen under one write lock, which gives the
/// same compare-and-swap semantics as the Postgres store.
#[derive(Default)]
pub struct InMemoryTitleStore {
    titles: RwLock<HashMap<CatalogId, VersionedTitle>>,
}

impl InMemoryTitleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TitleStore for InMemoryTitleStore {
    async fn insert(&self, title: &Title) -> AppResult<()> {
        let mut titles = self.titles.write().await;
        if titles.contains_key(&title.id) {
            return Err(AppError::Duplicate(format!(
                "Title {} already exists in the catalog",
                title.id
            )));
        }

        titles.insert(
            title.id.clone(),
            VersionedTitle {
                title: title.clone(),
                version: 1,
            },
        );
        Ok(())
    }

    async fn load(&self, id: &CatalogId) -> AppResult<Option<VersionedTitle>> {
        Ok(self.titles.read().await.get(id).cloned())
    }

    async fn list(&self, kind: Option<TitleKind>) -> AppResult<Vec<Title>> {
        let titles = self.titles.read().await;
        let mut listed: Vec<Title> = titles
            .values()
            .map(|v| &v.title)
            .filter(|t| kind.map_or(true, |k| t.kind() == k))
            .cloned()
            .collect();
        listed.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(listed)
    }

    async fn apply_patch(
        &self,
        id: &CatalogId,
        expected_version: i64,
        patch: &TitlePatch,
    ) -> AppResult<PatchOutcome> {
        let mut titles = self.titles.write().await;
        let stored = titles
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))?;

        if stored.version != expected_version {
            return Ok(PatchOutcome::Conflict);
        }

        stored.title.apply(patch);
        stored.version += 1;
        Ok(PatchOutcome::Applied {
            version: stored.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures, AnnotationChange, Comment};
    use chrono::Utc;

    fn add_comment_patch(id: &str) -> TitlePatch {
        let now = Utc::now();
        TitlePatch::new(
            AnnotationChange::AppendComment(Comment {
                comment_id: id.to_string(),
                user_id: "user-a".to_string(),
                user_name: "Ada".to_string(),
                content: "hello".to_string(),
                created_at: now,
                updated_at: now,
            }),
            now,
        )
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_catalog_id() {
        let store = InMemoryTitleStore::new();
        store.insert(&fixtures::movie(603)).await.unwrap();

        let result = store.insert(&fixtures::movie(603)).await;
        assert!(matches!(result, Err(AppError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_patch_bumps_version() {
        let store = InMemoryTitleStore::new();
        let title = fixtures::movie(603);
        store.insert(&title).await.unwrap();

        let outcome = store
            .apply_patch(&title.id, 1, &add_comment_patch("c1"))
            .await
            .unwrap();
        assert_eq!(outcome, PatchOutcome::Applied { version: 2 });

        let loaded = store.load(&title.id).await.unwrap().unwrap();
        assert_eq!(loaded.version, 2);
        assert_eq!(loaded.title.comments.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_version_is_a_conflict_and_changes_nothing() {
        let store = InMemoryTitleStore::new();
        let title = fixtures::movie(603);
        store.insert(&title).await.unwrap();
        store
            .apply_patch(&title.id, 1, &add_comment_patch("c1"))
            .await
            .unwrap();

        let outcome = store
            .apply_patch(&title.id, 1, &add_comment_patch("c2"))
            .await
            .unwrap();
        assert_eq!(outcome, PatchOutcome::Conflict);

        let loaded = store.load(&title.id).await.unwrap().unwrap();
        assert_eq!(loaded.title.comments.len(), 1);
        assert_eq!(loaded.version, 2);
    }

    #[tokio::test]
    async fn test_patch_on_missing_title_is_not_found() {
        let store = InMemoryTitleStore::new();
        let result = store
            .apply_patch(&CatalogId::new("movie-1"), 1, &add_comment_patch("c1"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_load_missing_title_is_none() {
        let store = InMemoryTitleStore::new();
        let loaded = tokio_test::block_on(store.load(&CatalogId::new("tv-1396")));
        assert!(tokio_test::assert_ok!(loaded).is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_kind() {
        let store = InMemoryTitleStore::new();
        store.insert(&fixtures::movie(603)).await.unwrap();
        store.insert(&fixtures::movie(604)).await.unwrap();

        assert_eq!(store.list(None).await.unwrap().len(), 2);
        assert_eq!(store.list(Some(TitleKind::Movie)).await.unwrap().len(), 2);
        assert!(store.list(Some(TitleKind::Tv)).await.unwrap().is_empty());
    }
}
