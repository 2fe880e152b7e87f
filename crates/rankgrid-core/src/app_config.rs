use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Ranked-search provider credential. Absence is only fatal once a search runs.
    pub serper_api_key: Option<String>,
    pub search_base_url: String,
    pub search_timeout_secs: u64,
    pub user_agent: String,
    pub default_country: String,
    pub default_language: String,
    /// Page-depth budget for the rank trackers.
    pub max_pages: u32,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub top_results_limit: usize,
    pub places_zoom: u8,
    pub geocoder_base_url: String,
    pub geocoder_cache_capacity: usize,
    pub usage_credits: Option<u64>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "serper_api_key",
                &self.serper_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("search_base_url", &self.search_base_url)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("default_country", &self.default_country)
            .field("default_language", &self.default_language)
            .field("max_pages", &self.max_pages)
            .field("batch_size", &self.batch_size)
            .field("batch_delay_ms", &self.batch_delay_ms)
            .field("top_results_limit", &self.top_results_limit)
            .field("places_zoom", &self.places_zoom)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_cache_capacity", &self.geocoder_cache_capacity)
            .field("usage_credits", &self.usage_credits)
            .finish()
    }
}
