mod access_grants;
mod content_catalog;
mod notification_sender;

pub use access_grants::{HttpAccessGrants, IAccessGrants, InMemoryAccessGrants};
pub use content_catalog::{HttpContentCatalog, IContentCatalog, InMemoryContentCatalog};
pub use notification_sender::{
    INotificationSender, InMemoryNotificationSender, SentNotification, WebhookNotificationSender,
};
