use thiserror::Error;

/// Errors raised while configuring or running a crawl
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("Navigation to {0} timed out")]
    Timeout(String),

    #[error("No WebDriver server reachable")]
    NoWebDriver,

    #[error("No seed URLs configured")]
    NoSeeds,
}

impl CrawlError {
    /// Whether the WebDriver session behind the error is gone and must be replaced
    pub fn is_session_lost(&self) -> bool {
        match self {
            CrawlError::Command(e) => {
                if e.is_invalid_session_id() || e.is_no_such_window() {
                    return true;
                }
                let message = e.to_string();
                message.contains("Unable to find session") || message.contains("invalid session id")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
