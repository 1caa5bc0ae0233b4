mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, ReminderConfig, SchedulingConfig};
pub use repos::Repos;
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct CampusContext {
    pub repos: Repos,
    pub ports: Ports,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

/// The external collaborators of the scheduler. Production wiring talks to
/// the platform over HTTP, tests swap in the in-memory implementations.
#[derive(Clone)]
pub struct Ports {
    pub content_catalog: Arc<dyn IContentCatalog>,
    pub access_grants: Arc<dyn IAccessGrants>,
    pub notification_sender: Arc<dyn INotificationSender>,
}

impl Ports {
    fn create_from_env() -> Self {
        let platform_url = get_env_var("PLATFORM_API_URL");
        let platform_key = get_env_var("PLATFORM_API_KEY");
        Self {
            content_catalog: Arc::new(HttpContentCatalog::new(
                platform_url.clone(),
                platform_key.clone(),
            )),
            access_grants: Arc::new(HttpAccessGrants::new(platform_url, platform_key)),
            notification_sender: Arc::new(WebhookNotificationSender::new(
                get_env_var("NOTIFICATION_WEBHOOK_URL"),
                get_env_var("NOTIFICATION_WEBHOOK_KEY"),
            )),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            content_catalog: Arc::new(InMemoryContentCatalog::new()),
            access_grants: Arc::new(InMemoryAccessGrants::new()),
            notification_sender: Arc::new(InMemoryNotificationSender::new()),
        }
    }
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl CampusContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        Self {
            repos,
            ports: Ports::create_from_env(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    /// Context with in-memory repos and ports, used in tests
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            ports: Ports::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> CampusContext {
    CampusContext::create(ContextParams {
        postgres_connection_string: get_env_var("DATABASE_URL"),
    })
    .await
}

fn get_env_var(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{} env var to be present.", key))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_env_var("DATABASE_URL"))
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
