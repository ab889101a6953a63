/// Read-through caching for async lookups.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for a background cache write using the key's
/// TTL, and returns it. Expands to an `AppResult`, so use it as the tail
/// expression of a function returning one.
///
/// # Example
/// ```rust,ignore
/// async fn movie(&self, id: u64) -> AppResult<TmdbMovieDetails> {
///     cached!(self.cache, CacheKey::Details { kind: TitleKind::Movie, tmdb_id: id }, async move {
///         self.get_json(&format!("/movie/{}", id), &[]).await
///     })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await? {
            Some(hit) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(hit)
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                let value = $block.await?;
                $cache.set_in_background(&key, &value);
                Ok(value)
            }
        }
    }};
}
