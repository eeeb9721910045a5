use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            );
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(auth_token);

        let mut req = self
            .client
            .request(method, &url)
            .headers(headers)
            .timeout(REQUEST_TIMEOUT);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Exact row count for a PostgREST path, without fetching rows.
    ///
    /// PostgREST reports the total after the slash of the `content-range`
    /// header when asked with `Prefer: count=exact`.
    pub async fn count(&self, path: &str, auth_token: Option<&str>) -> Result<i64> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Counting rows at {}", url);

        let mut headers = self.get_headers(auth_token);
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));
        headers.insert("Range", HeaderValue::from_static("0-0"));

        let response = self
            .client
            .request(Method::HEAD, &url)
            .headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Count request failed with status {}", status));
        }

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| anyhow!("Count response missing content-range header"))?;

        let total = content_range
            .rsplit('/')
            .next()
            .ok_or_else(|| anyhow!("Malformed content-range: {}", content_range))?;

        if total == "*" {
            return Ok(0);
        }

        total
            .parse::<i64>()
            .map_err(|_| anyhow!("Malformed content-range: {}", content_range))
    }

    /// Fetch at most one row. PostgREST returns filtered selects as arrays;
    /// an empty array means no match rather than an error.
    pub async fn select_single<T>(&self, path: &str, auth_token: Option<&str>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut rows: Vec<T> = self.request(Method::GET, path, auth_token, None).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.remove(0)))
    }

    /// Insert a row and return the stored representation.
    pub async fn insert_returning<T>(
        &self,
        path: &str,
        auth_token: Option<&str>,
        body: Value,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Inserting row at {}", url);

        let mut headers = self.get_headers(auth_token);
        headers.insert(
            "Prefer",
            HeaderValue::from_static("return=representation"),
        );

        let response = self
            .client
            .request(Method::POST, &url)
            .headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Insert error ({}): {}", status, error_text);
            return Err(anyhow!("Insert failed ({}): {}", status, error_text));
        }

        let mut rows = response.json::<Vec<T>>().await?;
        if rows.is_empty() {
            return Err(anyhow!("Insert returned no representation"));
        }
        Ok(rows.remove(0))
    }

    /// Patch matching rows. PostgREST answers 204 with no body unless a
    /// representation is requested, so nothing is parsed here.
    pub async fn update(&self, path: &str, auth_token: Option<&str>, body: Value) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Updating rows at {}", url);

        let response = self
            .client
            .request(Method::PATCH, &url)
            .headers(self.get_headers(auth_token))
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Update error ({}): {}", status, error_text);
            return Err(anyhow!("Update failed ({}): {}", status, error_text));
        }

        Ok(())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
