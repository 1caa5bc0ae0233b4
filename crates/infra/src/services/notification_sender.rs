use campus_scheduler_domain::{ClassSession, ReminderKind, ID};
use reqwest::Client;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Mutex;

/// Delivers a single reminder to a single recipient. Which channel carries
/// the message (email, chat, push) is routing inside the delivery service,
/// not a scheduler decision.
#[async_trait::async_trait]
pub trait INotificationSender: Send + Sync {
    async fn send(
        &self,
        recipient_id: &ID,
        kind: ReminderKind,
        session: &ClassSession,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReminderNotificationDTO {
    recipient_id: ID,
    kind: ReminderKind,
    class_session_id: ID,
    live_class_id: ID,
    scheduled_at: i64,
    is_free: bool,
}

/// Posts each reminder to the platform's delivery webhook, authenticated
/// with a shared key header
pub struct WebhookNotificationSender {
    url: String,
    key: String,
    client: Client,
}

impl WebhookNotificationSender {
    pub fn new(url: String, key: String) -> Self {
        Self {
            url,
            key,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl INotificationSender for WebhookNotificationSender {
    async fn send(
        &self,
        recipient_id: &ID,
        kind: ReminderKind,
        session: &ClassSession,
    ) -> anyhow::Result<()> {
        let body = ReminderNotificationDTO {
            recipient_id: recipient_id.clone(),
            kind,
            class_session_id: session.id.clone(),
            live_class_id: session.live_class_id.clone(),
            scheduled_at: session.scheduled_at,
            is_free: session.is_free,
        };
        self.client
            .post(&self.url)
            .header("campus-webhook-key", &self.key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub recipient_id: ID,
    pub kind: ReminderKind,
    pub class_session_id: ID,
}

/// Sender that records deliveries instead of performing them, used in
/// tests. Individual recipients can be marked as failing to exercise the
/// per-recipient error paths.
pub struct InMemoryNotificationSender {
    sent: Mutex<Vec<SentNotification>>,
    failing_recipients: Mutex<HashSet<String>>,
}

impl InMemoryNotificationSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_recipients: Mutex::new(HashSet::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_for(&self, recipient_id: &ID) {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(recipient_id.as_string());
    }

    pub fn recover(&self, recipient_id: &ID) {
        self.failing_recipients
            .lock()
            .unwrap()
            .remove(&recipient_id.as_string());
    }
}

#[async_trait::async_trait]
impl INotificationSender for InMemoryNotificationSender {
    async fn send(
        &self,
        recipient_id: &ID,
        kind: ReminderKind,
        session: &ClassSession,
    ) -> anyhow::Result<()> {
        if self
            .failing_recipients
            .lock()
            .unwrap()
            .contains(&recipient_id.as_string())
        {
            return Err(anyhow::Error::msg("Notification channel unavailable"));
        }
        self.sent.lock().unwrap().push(SentNotification {
            recipient_id: recipient_id.clone(),
            kind,
            class_session_id: session.id.clone(),
        });
        Ok(())
    }
}
