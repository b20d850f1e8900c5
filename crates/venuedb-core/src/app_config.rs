use std::path::PathBuf;

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

/// Runtime configuration, loaded from `VENUEDB_*` environment variables.
///
/// Every knob has a default so a bare `venuedb scrape <url>` works against a
/// local chromedriver without any `.env` file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// WebDriver endpoint the browser session connects to.
    pub webdriver_url: String,
    pub browser_headless: bool,
    /// Seconds to let client-side rendering settle after navigation.
    pub page_settle_secs: u64,
    /// Upper bound for a single rendered-DOM field lookup.
    pub field_lookup_timeout_ms: u64,
    /// Request timeout for the no-browser static fetch path.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Where `scrape` writes its JSON array of records.
    pub output_path: PathBuf,
    /// Directory for raw-HTML debug snapshots; `None` disables snapshotting.
    pub debug_html_dir: Option<PathBuf>,
    pub targets_path: PathBuf,
}
