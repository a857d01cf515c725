use clap::Parser;
use page_dump::{CrawlConfig, FilenameStyle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-dump")]
#[command(about = "Crawls a site in a headless browser and dumps every page body to a text file")]
#[command(version)]
pub struct Args {
    /// URLs to start crawling from (defaults to the configured seeds)
    pub seeds: Vec<String>,

    /// JSON configuration file; flags given here take precedence
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    /// Folder receiving the page dumps
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Capture pages as loaded, without the navigation-suppressing script
    #[arg(long)]
    pub no_neutralize: bool,

    /// Number of concurrent browser sessions
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Stop queuing links after this many requests
    #[arg(short, long)]
    pub max_requests: Option<usize>,

    /// Retries for a failed request before it is dropped
    #[arg(long)]
    pub retries: Option<u32>,

    /// Follow links to other hosts
    #[arg(long)]
    pub allow_external: bool,

    /// How URLs become file names
    #[arg(long, value_enum)]
    pub filenames: Option<FilenameStyle>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// WebDriver server address
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,
}

impl Args {
    /// Fold the command line over a base configuration
    pub fn apply(self, mut config: CrawlConfig) -> CrawlConfig {
        if !self.seeds.is_empty() {
            config.seed_urls = self.seeds;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if self.no_neutralize {
            config.neutralize_navigation = false;
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if self.max_requests.is_some() {
            config.max_requests = self.max_requests;
        }
        if let Some(retries) = self.retries {
            config.max_request_retries = retries;
        }
        if self.allow_external {
            config.allow_external = true;
        }
        if let Some(style) = self.filenames {
            config.filename_style = style;
        }
        if self.headed {
            config.headless = false;
        }
        if let Some(url) = self.webdriver_url.filter(|u| !u.is_empty()) {
            config.webdriver_url = url;
        }
        config
    }
}
