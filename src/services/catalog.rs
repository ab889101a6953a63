use std::sync::Arc;

use chrono::Utc;

use crate::{
    db::TitleStore,
    error::{AppError, AppResult},
    models::{AddTitleRequest, CatalogId, Identity, SearchPage, Title, TitleKind},
    services::providers::MetadataProvider,
};

/// Title catalog: creation from the metadata source, lookup and listing
///
/// Metadata is copied into the title once, when it is added; it is never
/// refreshed afterwards.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn TitleStore>,
    metadata: Arc<dyn MetadataProvider>,
}

impl Catalog {
    pub fn new(store: Arc<dyn TitleStore>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { store, metadata }
    }

    pub async fn add_title(&self, request: AddTitleRequest, actor: &Identity) -> AppResult<Title> {
        let video_url = request.video_url.trim();
        if !(video_url.starts_with("https://") || video_url.starts_with("http://")) {
            return Err(AppError::Validation(
                "video_url must be an http(s) URL".to_string(),
            ));
        }

        let id = CatalogId::for_tmdb(request.media_type, request.tmdb_id);
        if self.store.load(&id).await?.is_some() {
            return Err(AppError::Duplicate(format!(
                "Title {} already exists in the catalog",
                id
            )));
        }

        let metadata = self
            .metadata
            .fetch_metadata(request.media_type, request.tmdb_id)
            .await?;

        let title = Title::new(
            metadata,
            video_url.to_string(),
            actor.user_id.clone(),
            Utc::now(),
        );
        self.store.insert(&title).await?;

        tracing::info!(
            title_id = %title.id,
            added_by = %actor.user_id,
            provider = self.metadata.name(),
            "Title added to catalog"
        );

        Ok(title)
    }

    pub async fn get_title(&self, id: &CatalogId) -> AppResult<Title> {
        self.store
            .load(id)
            .await?
            .map(|v| v.title)
            .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))
    }

    pub async fn list_titles(&self, kind: Option<TitleKind>) -> AppResult<Vec<Title>> {
        self.store.list(kind).await
    }

    pub async fn search(&self, kind: TitleKind, query: &str, page: u32) -> AppResult<SearchPage> {
        self.metadata.search(kind, query, page).await
    }
}
