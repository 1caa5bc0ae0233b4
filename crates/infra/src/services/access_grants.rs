use campus_scheduler_domain::ID;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Lookup of who has been granted access to a single session or to a whole
/// live class. Ownership of grants lives with the platform, the scheduler
/// only reads them to resolve reminder recipients.
#[async_trait::async_trait]
pub trait IAccessGrants: Send + Sync {
    async fn list_session_recipients(&self, session_id: &ID) -> anyhow::Result<Vec<ID>>;
    async fn list_class_recipients(&self, live_class_id: &ID) -> anyhow::Result<Vec<ID>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipientsDTO {
    recipients: Vec<ID>,
}

/// Grant lookup backed by the platform's internal REST API
pub struct HttpAccessGrants {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpAccessGrants {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            client: Client::new(),
        }
    }

    async fn list(&self, path: String) -> anyhow::Result<Vec<ID>> {
        let res: RecipientsDTO = self
            .client
            .get(&format!("{}/{}", self.base_url, path))
            .header("campus-api-key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(res.recipients)
    }
}

#[async_trait::async_trait]
impl IAccessGrants for HttpAccessGrants {
    async fn list_session_recipients(&self, session_id: &ID) -> anyhow::Result<Vec<ID>> {
        self.list(format!("sessions/{}/recipients", session_id)).await
    }

    async fn list_class_recipients(&self, live_class_id: &ID) -> anyhow::Result<Vec<ID>> {
        self.list(format!("live-classes/{}/recipients", live_class_id))
            .await
    }
}

/// Grant lookup seeded through code, used in tests
pub struct InMemoryAccessGrants {
    session_grants: Mutex<HashMap<String, Vec<ID>>>,
    class_grants: Mutex<HashMap<String, Vec<ID>>>,
}

impl InMemoryAccessGrants {
    pub fn new() -> Self {
        Self {
            session_grants: Mutex::new(HashMap::new()),
            class_grants: Mutex::new(HashMap::new()),
        }
    }

    pub fn grant_session(&self, session_id: &ID, recipient_id: &ID) {
        self.session_grants
            .lock()
            .unwrap()
            .entry(session_id.as_string())
            .or_insert_with(Vec::new)
            .push(recipient_id.clone());
    }

    pub fn grant_class(&self, live_class_id: &ID, recipient_id: &ID) {
        self.class_grants
            .lock()
            .unwrap()
            .entry(live_class_id.as_string())
            .or_insert_with(Vec::new)
            .push(recipient_id.clone());
    }
}

#[async_trait::async_trait]
impl IAccessGrants for InMemoryAccessGrants {
    async fn list_session_recipients(&self, session_id: &ID) -> anyhow::Result<Vec<ID>> {
        Ok(self
            .session_grants
            .lock()
            .unwrap()
            .get(&session_id.as_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn list_class_recipients(&self, live_class_id: &ID) -> anyhow::Result<Vec<ID>> {
        Ok(self
            .class_grants
            .lock()
            .unwrap()
            .get(&live_class_id.as_string())
            .cloned()
            .unwrap_or_default())
    }
}
