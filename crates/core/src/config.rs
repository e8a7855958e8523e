use serde::{Deserialize, Serialize};

/// Root application configuration. Loaded from environment variables
/// with the prefix `MARKETING_PULSE__` and an optional TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub inputs: InputConfig,
    #[serde(default)]
    pub business: BusinessConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Where the four CSV sources are read from when no explicit path is given.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_google_path")]
    pub google: String,
    #[serde(default = "default_facebook_path")]
    pub facebook: String,
    #[serde(default = "default_tiktok_path")]
    pub tiktok: String,
    #[serde(default = "default_business_path")]
    pub business: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// Normalized name of the orders-count column.
    #[serde(default = "default_orders_column")]
    pub orders_column: String,
    /// Tried in order when `orders_column` is absent from the business table.
    #[serde(default = "default_orders_fallbacks")]
    pub orders_fallbacks: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportingConfig {
    #[serde(default)]
    pub orders_scope: OrdersScope,
    /// Display-only row cap for the campaign leaderboard.
    #[serde(default)]
    pub leaderboard_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

/// Which business rows feed the `total_orders` KPI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdersScope {
    /// Every business row, regardless of the active date range.
    #[default]
    AllTime,
    /// Only business rows inside the active date range.
    DateRange,
}

impl std::str::FromStr for OrdersScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all_time" | "all" => Ok(Self::AllTime),
            "date_range" | "range" => Ok(Self::DateRange),
            other => Err(format!("unknown orders scope '{other}'")),
        }
    }
}

// Default functions
fn default_google_path() -> String {
    "data/google.csv".to_string()
}
fn default_facebook_path() -> String {
    "data/facebook.csv".to_string()
}
fn default_tiktok_path() -> String {
    "data/tiktok.csv".to_string()
}
fn default_business_path() -> String {
    "data/business.csv".to_string()
}
fn default_orders_column() -> String {
    "#_of_orders".to_string()
}
fn default_orders_fallbacks() -> Vec<String> {
    vec!["orders".to_string(), "orders_count".to_string()]
}
fn default_cache_max_entries() -> usize {
    8
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            google: default_google_path(),
            facebook: default_facebook_path(),
            tiktok: default_tiktok_path(),
            business: default_business_path(),
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            orders_column: default_orders_column(),
            orders_fallbacks: default_orders_fallbacks(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_max_entries(),
        }
    }
}

impl BusinessConfig {
    /// Candidate orders column names, configured name first.
    pub fn orders_candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.orders_column.as_str())
            .chain(self.orders_fallbacks.iter().map(String::as_str))
    }
}

impl AppConfig {
    /// Load configuration from environment variables and optional config file.
    pub fn load(file: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("MARKETING_PULSE")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("business.orders_fallbacks"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        tracing::debug!(file = ?file, "Configuration sources merged");
        Ok(config)
    }
}
