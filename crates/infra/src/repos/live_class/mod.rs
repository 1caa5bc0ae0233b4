mod inmemory;
mod postgres;

use campus_scheduler_domain::{LiveClass, ID};
pub use inmemory::InMemoryLiveClassRepo;
pub use postgres::PostgresLiveClassRepo;

#[async_trait::async_trait]
pub trait ILiveClassRepo: Send + Sync {
    async fn insert(&self, class: &LiveClass) -> anyhow::Result<()>;
    async fn save(&self, class: &LiveClass) -> anyhow::Result<()>;
    async fn find(&self, class_id: &ID) -> Option<LiveClass>;
    async fn find_all_active(&self) -> anyhow::Result<Vec<LiveClass>>;
    /// Only used as compensation when the initial calendar of a freshly
    /// created class cannot be built
    async fn delete(&self, class_id: &ID) -> anyhow::Result<()>;
}
