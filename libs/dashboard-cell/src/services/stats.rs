use std::sync::Arc;

use tracing::debug;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{DashboardError, DashboardStats};

/// Closed share of all tickets as a rounded percentage.
pub fn resolution_rate(closed_tickets: i64, total_tickets: i64) -> i64 {
    if total_tickets <= 0 {
        return 0;
    }
    ((closed_tickets as f64 / total_tickets as f64) * 100.0).round() as i64
}

/// Aggregates the dashboard activity counters from Supabase.
pub struct StatsService {
    supabase: Arc<SupabaseClient>,
}

impl StatsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Count-only queries; no row payloads cross the wire. The caller's
    /// bearer token is forwarded so row-level security applies.
    pub async fn dashboard_stats(
        &self,
        client_id: &str,
        auth_token: Option<&str>,
    ) -> Result<DashboardStats, DashboardError> {
        debug!("Aggregating dashboard stats for client {}", client_id);

        let total_conversations = self
            .count(&format!("/rest/v1/messages?client_id=eq.{}", client_id), auth_token)
            .await?;

        let total_tickets = self
            .count(&format!("/rest/v1/tickets?client_id=eq.{}", client_id), auth_token)
            .await?;

        let open_tickets = self
            .count(
                &format!("/rest/v1/tickets?client_id=eq.{}&status=eq.open", client_id),
                auth_token,
            )
            .await?;

        let closed_tickets = self
            .count(
                &format!("/rest/v1/tickets?client_id=eq.{}&status=eq.closed", client_id),
                auth_token,
            )
            .await?;

        Ok(DashboardStats {
            total_conversations,
            open_tickets,
            closed_tickets,
            total_tickets,
            // TODO: count distinct customers once messages rows carry a customer id
            total_customers: 0,
            resolution_rate: resolution_rate(closed_tickets, total_tickets),
        })
    }

    async fn count(&self, path: &str, auth_token: Option<&str>) -> Result<i64, DashboardError> {
        self.supabase
            .count(path, auth_token)
            .await
            .map_err(|e| DashboardError::DatabaseError(e.to_string()))
    }
}
