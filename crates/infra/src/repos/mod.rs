mod class_session;
mod live_class;
mod reminder_record;
mod shared;

use class_session::{IClassSessionRepo, InMemoryClassSessionRepo, PostgresClassSessionRepo};
use live_class::{ILiveClassRepo, InMemoryLiveClassRepo, PostgresLiveClassRepo};
use reminder_record::{
    IReminderRecordRepo, InMemoryReminderRecordRepo, PostgresReminderRecordRepo,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub live_classes: Arc<dyn ILiveClassRepo>,
    pub class_sessions: Arc<dyn IClassSessionRepo>,
    pub reminder_records: Arc<dyn IReminderRecordRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        Ok(Self {
            live_classes: Arc::new(PostgresLiveClassRepo::new(pool.clone())),
            class_sessions: Arc::new(PostgresClassSessionRepo::new(pool.clone())),
            reminder_records: Arc::new(PostgresReminderRecordRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            live_classes: Arc::new(InMemoryLiveClassRepo::new()),
            class_sessions: Arc::new(InMemoryClassSessionRepo::new()),
            reminder_records: Arc::new(InMemoryReminderRecordRepo::new()),
        }
    }
}
