use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url}")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("GraphQL error for {context}: {message}")]
    GraphQl { context: String, message: String },

    #[error("invalid listing URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A page that still failed after the whole retry budget was spent.
    #[error("{source_name} {view} page {page} failed after {attempts} attempts: {cause}")]
    FetchFailure {
        source_name: String,
        view: String,
        page: u32,
        attempts: u32,
        #[source]
        cause: Box<ScraperError>,
    },
}
