use crate::error::Result;
use crate::naming::FilenameStyle;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Seed used when neither the command line nor a config file names one
pub const DEFAULT_SEED_URL: &str = "https://lucas.lboro.ac.uk/pub-apx/f?p=303:1:::::P1_SEARCH_YEAR:24";

/// Configuration for a page dump crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URLs the frontier starts from
    #[serde(default = "default_seed_urls")]
    pub seed_urls: Vec<String>,

    /// Folder receiving one `.txt` file per visited page
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Run the navigation-suppressing script before capturing the body
    #[serde(default = "default_neutralize_navigation")]
    pub neutralize_navigation: bool,

    /// Number of workers, each with its own browser session
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Upper bound on requests admitted to the frontier (unbounded if unset)
    #[serde(default)]
    pub max_requests: Option<usize>,

    /// How many times a failed request is re-queued before it is dropped
    #[serde(default = "default_max_request_retries")]
    pub max_request_retries: u32,

    /// Time allowed for a single navigation
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Ask the browser to run without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Whether to follow links off the seed host
    #[serde(default)]
    pub allow_external: bool,

    /// Regex patterns for URLs to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// How URLs are turned into file names
    #[serde(default)]
    pub filename_style: FilenameStyle,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_urls: default_seed_urls(),
            output_dir: default_output_dir(),
            neutralize_navigation: default_neutralize_navigation(),
            max_concurrency: default_max_concurrency(),
            max_requests: None,
            max_request_retries: default_max_request_retries(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            allow_external: false,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            filename_style: FilenameStyle::default(),
        }
    }
}

impl CrawlConfig {
    /// Create a configuration starting from a single URL
    pub fn new(start_url: &str) -> Self {
        Self {
            seed_urls: vec![start_url.to_string()],
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_seed_urls() -> Vec<String> {
    vec![DEFAULT_SEED_URL.to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("page_texts")
}

fn default_neutralize_navigation() -> bool {
    true
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    4
}

fn default_max_request_retries() -> u32 {
    3
}

fn default_navigation_timeout_secs() -> u64 {
    60
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}
