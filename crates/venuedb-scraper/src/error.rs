use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("webdriver session could not be established: {0}")]
    Connect(#[from] fantoccini::error::NewSessionError),

    #[error("webdriver command failed: {0}")]
    Session(#[from] fantoccini::error::CmdError),

    #[error("invalid page for {url}: empty static content and no live session")]
    InvalidPage { url: String },

    #[error("snapshot write failed for {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
