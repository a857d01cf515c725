use crate::error::{CrawlError, Result};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// A loaded browser tab the page handler can act on
pub trait Page: Send {
    /// Navigate to `url` and wait for the load to finish
    fn goto(&mut self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// URL the tab ended up on, after redirects
    fn current_url(&mut self) -> impl Future<Output = Result<Url>> + Send;

    /// Run a script in the page, discarding its return value
    fn run_script(&mut self, script: &str) -> impl Future<Output = Result<()>> + Send;

    /// The rendered `innerHTML` of `<body>`
    fn body_html(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Release the underlying session
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Opens browser sessions for crawl workers
pub trait Browser: Send + Sync + 'static {
    type Page: Page + 'static;

    fn open_page(&self, worker_id: usize) -> impl Future<Output = Result<Self::Page>> + Send;
}

/// Sessions backed by a WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriver {
    webdriver_url: String,
    headless: bool,
    navigation_timeout: Duration,
}

impl WebDriver {
    pub fn new(webdriver_url: &str, headless: bool, navigation_timeout: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            headless,
            navigation_timeout,
        }
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu", "--no-sandbox"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }

    async fn connect(&self, url: &str) -> Result<Client> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        Ok(builder.connect(url).await?)
    }
}

impl Browser for WebDriver {
    type Page = WebDriverPage;

    async fn open_page(&self, worker_id: usize) -> Result<WebDriverPage> {
        match self.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!(
                    "Worker {} connected to WebDriver at {}",
                    worker_id,
                    self.webdriver_url
                );
                return Ok(WebDriverPage::new(client, self.navigation_timeout));
            }
            Err(e) => {
                ::log::error!(
                    "Worker {} failed to connect to WebDriver at {}: {}",
                    worker_id,
                    self.webdriver_url,
                    e
                );
            }
        }

        // If we couldn't connect, try with common alternative URLs
        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // geckodriver / Selenium default
            "http://127.0.0.1:4444",
        ];

        for url in fallback_urls.iter().filter(|u| **u != self.webdriver_url) {
            ::log::info!("Worker {} trying fallback WebDriver URL: {}", worker_id, url);
            if let Ok(client) = self.connect(url).await {
                ::log::debug!(
                    "Worker {} connected to fallback WebDriver at {}",
                    worker_id,
                    url
                );
                return Ok(WebDriverPage::new(client, self.navigation_timeout));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(CrawlError::NoWebDriver)
    }
}

/// A WebDriver session used as a single tab
pub struct WebDriverPage {
    client: Client,
    navigation_timeout: Duration,
}

impl WebDriverPage {
    fn new(client: Client, navigation_timeout: Duration) -> Self {
        Self {
            client,
            navigation_timeout,
        }
    }
}

impl Page for WebDriverPage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        match tokio::time::timeout(self.navigation_timeout, self.client.goto(url)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CrawlError::Timeout(url.to_string())),
        }
    }

    async fn current_url(&mut self) -> Result<Url> {
        Ok(self.client.current_url().await?)
    }

    async fn run_script(&mut self, script: &str) -> Result<()> {
        self.client.execute(script, Vec::new()).await?;
        Ok(())
    }

    async fn body_html(&mut self) -> Result<String> {
        let body = self.client.find(Locator::Css("body")).await?;
        Ok(body.html(true).await?)
    }

    async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}
