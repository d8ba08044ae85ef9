//! Dashboard star-schema ETL pipeline.
//!
//! Pulls raw product-usage events from Supabase, builds a dimensional
//! model (4 dimensions, 2 fact tables), and loads it into a DuckDB file
//! ready for BI tooling.

use anyhow::{Context, Result};
use tracing::{info, warn};

use etl_core::records;
use star_model::{build_star_schema, load_star_schema};
use supabase_source::{SupabaseClient, SupabaseConfig};
use warehouse::{reports, schema, Warehouse};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    /// Destination database file, queried directly by BI tools.
    #[serde(default = "default_database_path")]
    database_path: String,

    #[serde(default)]
    supabase: SupabaseConfig,
}

fn default_database_path() -> String {
    "data/dashboard_analytics.duckdb".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            supabase: SupabaseConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_tracing_from_env();

    info!("Starting dashboard ETL v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let source =
        SupabaseClient::new(config.supabase.clone()).context("source adapter startup failed")?;

    // Extract. Per-table failures have already degraded to empty row
    // sets inside the adapter.
    let data = source.extract_all().await;
    let events = records::decode_events(&data.events);
    let daily = records::decode_daily(&data.daily_usage);

    // Without events or daily aggregates there are no facts to build;
    // abort before any schema change.
    if events.is_empty() {
        return Err(etl_core::Error::MissingInput(supabase_source::client::EVENTS_TABLE).into());
    }
    if daily.is_empty() {
        return Err(
            etl_core::Error::MissingInput(supabase_source::client::DAILY_USAGE_TABLE).into(),
        );
    }

    // The warehouse handle lives for the rest of the run and closes on
    // return, success or not.
    let warehouse = Warehouse::open(&config.database_path)?;
    schema::init_schema(&warehouse)?;

    let star = build_star_schema(&events, &daily);
    let report = load_star_schema(&warehouse, star);

    info!(
        tools = report.tools,
        time_slots = report.time_slots,
        sessions = report.sessions,
        event_types = report.event_types,
        analytics = report.analytics,
        daily_kpis = report.daily_kpis,
        "load complete"
    );
    if !report.all_succeeded() {
        warn!(tables = ?report.failed_tables, "some tables failed to load");
    }

    log_dashboard_summary(&warehouse)?;

    info!(
        database = %config.database_path,
        "ETL complete; connect BI tooling to the database file"
    );
    Ok(())
}

/// Load configuration from defaults, optional file, and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("ETL")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // The source credentials are conventionally set via these two
    // variables; honor them over the prefixed form.
    if let Ok(url) = std::env::var("SUPABASE_URL") {
        config.supabase.url = url;
    }
    if let Ok(key) = std::env::var("SUPABASE_SERVICE_KEY") {
        config.supabase.service_key = key;
    }

    Ok(config)
}

/// Run the dashboard queries and log their results as the run summary.
fn log_dashboard_summary(warehouse: &Warehouse) -> Result<()> {
    let totals = reports::platform_totals(warehouse)?;
    info!(
        total_events = totals.total_events,
        total_uploads = totals.total_uploads,
        total_processing = totals.total_processing,
        total_downloads = totals.total_downloads,
        total_sessions = totals.total_sessions,
        active_tools = totals.active_tools,
        avg_conversion_rate = totals.avg_conversion_rate,
        "platform totals"
    );

    for tool in reports::top_tools(warehouse, 5)? {
        info!(
            tool = %tool.tool,
            downloads = tool.downloads,
            uploads = tool.uploads,
            conversion_rate = tool.conversion_rate,
            sessions = tool.sessions,
            "top tool"
        );
    }

    for day in reports::recent_daily_trends(warehouse, 7)? {
        info!(
            date = %day.date_label,
            downloads = day.downloads,
            uploads = day.uploads,
            processing = day.processing,
            "daily trend"
        );
    }

    Ok(())
}
