use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub nnia_api_url: String,
    pub payments_backend_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub default_client_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            nnia_api_url: env::var("NNIA_API_URL")
                .unwrap_or_else(|_| {
                    warn!("NNIA_API_URL not set, using default");
                    "http://localhost:3001".to_string()
                }),
            payments_backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| {
                    warn!("BACKEND_URL not set, using empty value");
                    String::new()
                }),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            default_client_id: env::var("NNIA_CLIENT_ID").ok(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    pub fn is_billing_configured(&self) -> bool {
        !self.payments_backend_url.is_empty()
    }
}
