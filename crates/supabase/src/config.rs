//! Supabase source configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the Supabase REST endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Service-role key, sent as both `apikey` and bearer token
    #[serde(default)]
    pub service_key: String,
    /// Per-table row limit for extraction
    #[serde(default = "default_row_limit")]
    pub row_limit: u32,
}

fn default_row_limit() -> u32 {
    2000
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_key: String::new(),
            row_limit: default_row_limit(),
        }
    }
}
