use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use shared_utils::PeriodicTask;

use crate::models::{NotificationError, NotificationsSnapshot};
use crate::services::client::NniaNotificationsClient;

pub const RELOAD_INTERVAL: Duration = Duration::from_secs(20);

/// Keeps one client's notification snapshot fresh on a fixed cadence.
///
/// A failed reload keeps the previous snapshot; the loop itself never
/// stops on error.
pub struct NotificationFeed {
    client: Arc<NniaNotificationsClient>,
    client_id: String,
    interval: Duration,
}

impl NotificationFeed {
    pub fn new(client: Arc<NniaNotificationsClient>, client_id: &str) -> Self {
        Self::with_interval(client, client_id, RELOAD_INTERVAL)
    }

    pub fn with_interval(
        client: Arc<NniaNotificationsClient>,
        client_id: &str,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            client_id: client_id.to_string(),
            interval,
        }
    }

    pub async fn start(self) -> NotificationFeedHandle {
        info!("Starting notification feed for client {}", self.client_id);

        let (tx, rx) = watch::channel(NotificationsSnapshot::default());
        let tx = Arc::new(tx);

        Self::reload_once(&self.client, &self.client_id, &tx).await;

        let client = Arc::clone(&self.client);
        let client_id = self.client_id.clone();
        let sender = Arc::clone(&tx);

        let task = PeriodicTask::spawn("notifications", self.interval, move || {
            let client = Arc::clone(&client);
            let client_id = client_id.clone();
            let tx = Arc::clone(&sender);
            async move {
                NotificationFeed::reload_once(&client, &client_id, &tx).await;
            }
        });

        NotificationFeedHandle {
            client: self.client,
            receiver: rx,
            sender: tx,
            task,
        }
    }

    async fn reload_once(
        client: &NniaNotificationsClient,
        client_id: &str,
        tx: &watch::Sender<NotificationsSnapshot>,
    ) {
        match client.fetch_notifications(client_id).await {
            Ok(list) => {
                let _ = tx.send(NotificationsSnapshot::from_list(list));
            }
            Err(e) => {
                warn!(
                    "Failed to reload notifications for client {}: {}",
                    client_id, e
                );
            }
        }
    }
}

pub struct NotificationFeedHandle {
    client: Arc<NniaNotificationsClient>,
    receiver: watch::Receiver<NotificationsSnapshot>,
    sender: Arc<watch::Sender<NotificationsSnapshot>>,
    task: PeriodicTask,
}

impl NotificationFeedHandle {
    pub fn latest(&self) -> NotificationsSnapshot {
        self.receiver.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationsSnapshot> {
        self.receiver.clone()
    }

    /// Mark a notification read on the backend, then flip the local copy
    /// so the badge updates without waiting for the next reload.
    pub async fn mark_as_read(&self, notification_id: Uuid) -> Result<(), NotificationError> {
        self.client.mark_read(notification_id).await?;

        self.sender.send_modify(|snapshot| {
            if let Some(notification) = snapshot
                .notifications
                .iter_mut()
                .find(|n| n.id == notification_id)
            {
                notification.read = true;
            }
            snapshot.unread_count = snapshot.notifications.iter().filter(|n| !n.read).count();
        });

        Ok(())
    }

    pub async fn stop(self) {
        self.task.stop().await;
    }
}
