use thiserror::Error;

/// Failures talking to the ranked-search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("malformed provider payload for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid search base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl SearchError {
    /// `true` for failures no amount of re-trying can fix: the call can never
    /// reach the provider as configured.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SearchError::MissingApiKey | SearchError::InvalidBaseUrl { .. }
        )
    }
}

/// Invalid grid geometry supplied by a caller.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("spacing must be a positive finite number, got {0}")]
    InvalidSpacing(f64),

    #[error("grid size must be an odd integer between 1 and {max}, got {0}", max = crate::grid::MAX_GRID_SIZE)]
    InvalidGridSize(u32),

    #[error("center ({latitude}, {longitude}) is outside the usable coordinate range")]
    InvalidCenter { latitude: f64, longitude: f64 },
}

/// Orchestration-level failures. Point-level failures never surface here;
/// they are recorded on the point's outcome instead.
#[derive(Debug, Error)]
pub enum GridSearchError {
    #[error("at least one selected grid point is required")]
    EmptyPoints,

    #[error("too many grid points: {count} submitted, at most {max} allowed")]
    TooManyPoints { count: usize, max: usize },

    #[error("keyword must not be blank")]
    BlankKeyword,

    #[error("target website must not be blank")]
    BlankTarget,

    #[error("search provider is not usable: {0}")]
    Configuration(#[source] SearchError),
}

impl GridSearchError {
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, GridSearchError::Configuration(_))
    }
}
