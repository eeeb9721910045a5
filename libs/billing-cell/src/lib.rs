pub mod catalog;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use catalog::*;
pub use handlers::BillingState;
pub use models::*;
pub use router::billing_routes;
pub use services::*;
