pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

pub use memory::InMemoryTitleStore;
pub use postgres::{create_pool, run_migrations, PgTitleStore};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use store::{PatchOutcome, TitleStore, VersionedTitle};
