use campus_scheduler_api::Application;
use campus_scheduler_infra::{CampusContext, Config, InMemoryContentCatalog};
use std::sync::Arc;

pub struct TestApp {
    pub config: Config,
    pub catalog: Arc<InMemoryContentCatalog>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, String) {
    let mut ctx = CampusContext::create_inmemory();
    ctx.config.port = 0; // Random port

    let catalog = Arc::new(InMemoryContentCatalog::new());
    ctx.ports.content_catalog = catalog.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config, catalog };
    (app, address)
}
