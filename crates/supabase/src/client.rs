//! REST client for pulling source tables.

use etl_core::{Error, Result};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{error, info};

use crate::config::SupabaseConfig;

/// Source tables pulled on every run.
pub const EVENTS_TABLE: &str = "analytics_events";
pub const DAILY_USAGE_TABLE: &str = "daily_tool_usage";
pub const SESSION_ANALYSIS_TABLE: &str = "session_analysis";

/// Raw rows from one extraction pass over all source tables.
#[derive(Debug, Default)]
pub struct SourceData {
    pub events: Vec<Value>,
    pub daily_usage: Vec<Value>,
    /// Extracted for parity with the source contract; the transformation
    /// does not consume it.
    pub session_analysis: Vec<Value>,
}

/// Bearer-authenticated client for the Supabase REST API.
pub struct SupabaseClient {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    /// Creates a client. Missing credentials are a fatal startup
    /// condition for the adapter.
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        if config.url.is_empty() || config.service_key.is_empty() {
            return Err(Error::config(
                "SUPABASE_URL and SUPABASE_SERVICE_KEY must be set",
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    /// Fetches up to `limit` rows from one source table.
    ///
    /// Anything other than an HTTP 200 with a JSON array body yields an
    /// empty row set plus a logged error.
    pub async fn fetch(&self, table: &str, limit: u32) -> Vec<Value> {
        let url = format!("{}/rest/v1/{}", self.config.url.trim_end_matches('/'), table);

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .query(&[("limit", limit.to_string())])
            .send()
            .await;

        match response {
            Ok(resp) if resp.status() == StatusCode::OK => match resp.json::<Vec<Value>>().await {
                Ok(rows) => {
                    info!(table, rows = rows.len(), "extracted source table");
                    rows
                }
                Err(e) => {
                    error!(table, error = %e, "failed to decode source response");
                    Vec::new()
                }
            },
            Ok(resp) => {
                error!(table, status = %resp.status(), "source returned non-200 status");
                Vec::new()
            }
            Err(e) => {
                error!(table, error = %e, "source request failed");
                Vec::new()
            }
        }
    }

    /// Pulls every source table once.
    pub async fn extract_all(&self) -> SourceData {
        let limit = self.config.row_limit;
        SourceData {
            events: self.fetch(EVENTS_TABLE, limit).await,
            daily_usage: self.fetch(DAILY_USAGE_TABLE, limit).await,
            session_analysis: self.fetch(SESSION_ANALYSIS_TABLE, limit).await,
        }
    }
}
