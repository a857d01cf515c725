pub mod browser;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod links;
pub mod naming;
pub mod neutralize;
pub mod results;
pub mod store;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::CrawlConfig;
pub use error::{CrawlError, Result};
pub use naming::FilenameStyle;
pub use results::CrawlSummary;

use std::time::Duration;

/// Crawl with a WebDriver-backed browser until the frontier is empty
pub async fn crawl(config: &CrawlConfig) -> Result<CrawlSummary> {
    let browser = browser::WebDriver::new(
        &config.webdriver_url,
        config.headless,
        Duration::from_secs(config.navigation_timeout_secs),
    );
    crawlers::web::run(config, browser).await
}
