use thiserror::Error;

/// A single card that could not be turned into a [`crate::types::MatchRecord`].
/// The record is dropped; its siblings are unaffected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing {side} team name")]
    MissingTeam { side: &'static str },
}

/// A fixtures page that was fetched but could not be read as match cards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("no match cards found on page")]
    NoMatchCards,

    #[error("page layout mismatch: {0}")]
    LayoutMismatch(String),

    #[error("invalid selector {selector}: {reason}")]
    Selector { selector: String, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Why one configured source contributed nothing to a batch.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("no sources configured")]
    NoSources,

    #[error("all {} sources failed: {}", .0.len(), join_failures(.0))]
    AllSourcesFailed(Vec<crate::batch::SourceFailure>),
}

fn join_failures(failures: &[crate::batch::SourceFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("at most {max} matches can be tracked, got {got}")]
    TooMany { max: usize, got: usize },

    #[error("no matches selected")]
    Empty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid timezone {0:?}")]
    Timezone(String),

    #[error("invalid source entry {0:?}, expected Name=url")]
    Source(String),
}
