use campus_scheduler_domain::{ContentItem, ContentSourceRef, ID};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Read access to the platform's content catalog. Items come back ordered
/// by their ordinal position.
#[async_trait::async_trait]
pub trait IContentCatalog: Send + Sync {
    async fn list_items(&self, source: &ContentSourceRef) -> anyhow::Result<Vec<ContentItem>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentItemDTO {
    id: ID,
    ordinal_position: usize,
    title: String,
}

impl From<ContentItemDTO> for ContentItem {
    fn from(e: ContentItemDTO) -> Self {
        Self {
            id: e.id,
            ordinal_position: e.ordinal_position,
            title: e.title,
        }
    }
}

/// Catalog client backed by the platform's internal REST API
pub struct HttpContentCatalog {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpContentCatalog {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl IContentCatalog for HttpContentCatalog {
    async fn list_items(&self, source: &ContentSourceRef) -> anyhow::Result<Vec<ContentItem>> {
        let path = match source {
            ContentSourceRef::Course(course_id) => format!("courses/{}/items", course_id),
            ContentSourceRef::Playlist(playlist_id) => format!("playlists/{}/items", playlist_id),
        };
        let items: Vec<ContentItemDTO> = self
            .client
            .get(&format!("{}/{}", self.base_url, path))
            .header("campus-api-key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut items: Vec<ContentItem> = items.into_iter().map(|i| i.into()).collect();
        items.sort_by_key(|i| i.ordinal_position);
        Ok(items)
    }
}

fn source_key(source: &ContentSourceRef) -> String {
    match source {
        ContentSourceRef::Course(course_id) => format!("course:{}", course_id),
        ContentSourceRef::Playlist(playlist_id) => format!("playlist:{}", playlist_id),
    }
}

/// Catalog seeded through code, used in tests
pub struct InMemoryContentCatalog {
    items: Mutex<HashMap<String, Vec<ContentItem>>>,
}

impl InMemoryContentCatalog {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert_items(&self, source: &ContentSourceRef, items: Vec<ContentItem>) {
        self.items.lock().unwrap().insert(source_key(source), items);
    }
}

#[async_trait::async_trait]
impl IContentCatalog for InMemoryContentCatalog {
    async fn list_items(&self, source: &ContentSourceRef) -> anyhow::Result<Vec<ContentItem>> {
        let mut items = self
            .items
            .lock()
            .unwrap()
            .get(&source_key(source))
            .cloned()
            .unwrap_or_default();
        items.sort_by_key(|i| i.ordinal_position);
        Ok(items)
    }
}
