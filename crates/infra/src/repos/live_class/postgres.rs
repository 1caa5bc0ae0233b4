use super::ILiveClassRepo;
use campus_scheduler_domain::{ContentSourceRef, LiveClass, ID};
use serde_json::Value;
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresLiveClassRepo {
    pool: PgPool,
}

impl PostgresLiveClassRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LiveClassRaw {
    live_class_uid: Uuid,
    content_source: Value,
    cycle_cursor: i32,
    is_active: bool,
}

impl From<LiveClassRaw> for LiveClass {
    fn from(e: LiveClassRaw) -> Self {
        let content_source: ContentSourceRef =
            serde_json::from_value(e.content_source).unwrap();
        Self {
            id: e.live_class_uid.into(),
            content_source,
            cycle_cursor: e.cycle_cursor as usize,
            is_active: e.is_active,
        }
    }
}

#[async_trait::async_trait]
impl ILiveClassRepo for PostgresLiveClassRepo {
    async fn insert(&self, class: &LiveClass) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO live_classes(live_class_uid, content_source, cycle_cursor, is_active)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(*class.id.inner_ref())
        .bind(Json(&class.content_source))
        .bind(class.cycle_cursor as i32)
        .bind(class.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, class: &LiveClass) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE live_classes
            SET cycle_cursor = $2,
            is_active = $3
            WHERE live_class_uid = $1
            "#,
        )
        .bind(*class.id.inner_ref())
        .bind(class.cycle_cursor as i32)
        .bind(class.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save live class: {:?}", e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, class_id: &ID) -> Option<LiveClass> {
        let class: LiveClassRaw = match sqlx::query_as(
            r#"
            SELECT * FROM live_classes
            WHERE live_class_uid = $1
            "#,
        )
        .bind(*class_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        {
            Ok(class) => class,
            Err(_) => return None,
        };
        Some(class.into())
    }

    async fn find_all_active(&self) -> anyhow::Result<Vec<LiveClass>> {
        let classes: Vec<LiveClassRaw> = sqlx::query_as(
            r#"
            SELECT * FROM live_classes
            WHERE is_active = TRUE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(classes.into_iter().map(|c| c.into()).collect())
    }

    async fn delete(&self, class_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM live_classes AS l
            WHERE l.live_class_uid = $1
            "#,
        )
        .bind(*class_id.inner_ref())
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(anyhow::Error::new)
    }
}
