// Configuration loading
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub storage: StorageSettings,
    pub query: QuerySettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the persisted state blob.
    pub dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QuerySettings {
    /// Seconds before a cached query result is eligible for refetch.
    pub stale_after_secs: u64,
    pub page_size: usize,
    /// How many records the synthetic provider generates per range.
    pub record_count: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            stale_after_secs: 60,
            page_size: 100,
            record_count: 500,
        }
    }
}

/// Load configuration from `config/dashboard.toml`, falling back to defaults
/// when the file is absent.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
