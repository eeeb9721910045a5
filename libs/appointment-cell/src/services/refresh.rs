use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use clock_cell::{ClockService, ReferenceClock};
use shared_utils::PeriodicTask;

use crate::models::Appointment;
use crate::services::client::NniaAppointmentsClient;
use crate::services::filter::upcoming_appointments;

/// Dashboard preview cadence and size.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(20);
pub const PREVIEW_LIMIT: usize = 2;

/// Keeps a "next pending appointments" preview fresh for one client.
///
/// The reference clock is resolved once when the feed starts and reused
/// for every cycle; only the appointment list is re-fetched. A failed
/// fetch keeps the previous preview in place.
pub struct UpcomingFeed {
    clock: Arc<ClockService>,
    appointments: Arc<NniaAppointmentsClient>,
    client_id: String,
    limit: usize,
    interval: Duration,
}

impl UpcomingFeed {
    pub fn new(
        clock: Arc<ClockService>,
        appointments: Arc<NniaAppointmentsClient>,
        client_id: &str,
    ) -> Self {
        Self::with_settings(clock, appointments, client_id, PREVIEW_LIMIT, REFRESH_INTERVAL)
    }

    pub fn with_settings(
        clock: Arc<ClockService>,
        appointments: Arc<NniaAppointmentsClient>,
        client_id: &str,
        limit: usize,
        interval: Duration,
    ) -> Self {
        Self {
            clock,
            appointments,
            client_id: client_id.to_string(),
            limit,
            interval,
        }
    }

    /// Resolve the clock, publish an initial preview, then refresh on the
    /// configured cadence until the handle is stopped.
    pub async fn start(self) -> UpcomingFeedHandle {
        let reference = self.clock.resolve().await;
        info!(
            "Starting upcoming-appointments feed for client {} (reference {} via {})",
            self.client_id, reference.instant, reference.source
        );

        let (tx, rx) = watch::channel(Vec::new());
        let tx = Arc::new(tx);

        Self::refresh_once(
            &self.appointments,
            &self.client_id,
            reference.instant,
            self.limit,
            &tx,
        )
        .await;

        let appointments = Arc::clone(&self.appointments);
        let client_id = self.client_id.clone();
        let instant = reference.instant;
        let limit = self.limit;

        let task = PeriodicTask::spawn("upcoming-appointments", self.interval, move || {
            let appointments = Arc::clone(&appointments);
            let client_id = client_id.clone();
            let tx = Arc::clone(&tx);
            async move {
                UpcomingFeed::refresh_once(&appointments, &client_id, instant, limit, &tx).await;
            }
        });

        UpcomingFeedHandle {
            receiver: rx,
            reference,
            task,
        }
    }

    async fn refresh_once(
        appointments: &NniaAppointmentsClient,
        client_id: &str,
        reference: DateTime<Utc>,
        limit: usize,
        tx: &watch::Sender<Vec<Appointment>>,
    ) {
        match appointments.fetch_appointments(client_id).await {
            Ok(list) => {
                let preview = upcoming_appointments(&list, reference, limit);
                let _ = tx.send(preview);
            }
            Err(e) => {
                warn!(
                    "Failed to refresh upcoming appointments for client {}: {}",
                    client_id, e
                );
            }
        }
    }
}

pub struct UpcomingFeedHandle {
    receiver: watch::Receiver<Vec<Appointment>>,
    reference: ReferenceClock,
    task: PeriodicTask,
}

impl UpcomingFeedHandle {
    /// Latest published preview.
    pub fn latest(&self) -> Vec<Appointment> {
        self.receiver.borrow().clone()
    }

    /// Receiver for callers that want change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Appointment>> {
        self.receiver.clone()
    }

    /// The reference clock this feed filters against.
    pub fn reference(&self) -> &ReferenceClock {
        &self.reference
    }

    /// Stop the periodic refresh and wait for the loop to exit.
    pub async fn stop(self) {
        self.task.stop().await;
    }
}
