use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    db::TitleStore,
    middleware::TokenVerifier,
    services::{providers::MetadataProvider, AnnotationStore, Catalog},
};

/// Shared application state
///
/// Holds injected collaborators only; no request mutates anything here.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub annotations: AnnotationStore,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TitleStore>,
        metadata: Arc<dyn MetadataProvider>,
        tokens: TokenVerifier,
        max_write_attempts: u32,
    ) -> Self {
        Self {
            catalog: Catalog::new(store.clone(), metadata),
            annotations: AnnotationStore::new(store, max_write_attempts),
            tokens: Arc::new(tokens),
        }
    }
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
