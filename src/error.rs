use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be completed: connection failure, timeout,
    /// non-2xx status or a truncated body.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response was received but is not a listing page.
    #[error("unexpected response from {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::Client(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. })
    }
}
