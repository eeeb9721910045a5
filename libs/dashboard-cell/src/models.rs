use serde::{Deserialize, Serialize};

/// Activity summary rendered at the top of the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_conversations: i64,
    pub open_tickets: i64,
    pub closed_tickets: i64,
    pub total_tickets: i64,
    pub total_customers: i64,
    /// Closed share of all tickets, rounded percentage. 0 when there are
    /// no tickets.
    pub resolution_rate: i64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
