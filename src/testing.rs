//! In-memory browser used by the unit tests.

use crate::browser::{Browser, Page};
use crate::error::{CrawlError, Result};
use crate::neutralize::NEUTRALIZE_NAVIGATION_JS;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct FakeResponse {
    pub body: String,
    /// Body after the neutralization script ran, if it reveals anything
    pub revealed_body: Option<String>,
    /// Navigations that fail before one succeeds
    pub failures: u32,
    /// Where the page redirects to
    pub redirect: Option<String>,
    /// Loading the page panics the worker
    pub crashes: bool,
}

#[derive(Debug, Default)]
pub struct FakeLog {
    pub visits: HashMap<String, usize>,
    pub scripts: Vec<(String, String)>,
    pub sessions_opened: usize,
    pub sessions_closed: usize,
}

/// A tiny website served without a real browser
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    pages: Arc<Mutex<HashMap<String, FakeResponse>>>,
    pub log: Arc<Mutex<FakeLog>>,
    refuse_sessions: bool,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing_sessions() -> Self {
        Self {
            refuse_sessions: true,
            ..Self::default()
        }
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.with_response(
            url,
            FakeResponse {
                body: body.to_string(),
                ..FakeResponse::default()
            },
        )
    }

    pub fn with_response(self, url: &str, response: FakeResponse) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }

    pub fn visits(&self, url: &str) -> usize {
        self.log.lock().unwrap().visits.get(url).copied().unwrap_or(0)
    }

    pub fn total_visits(&self) -> usize {
        self.log.lock().unwrap().visits.values().sum()
    }
}

impl Browser for FakeSite {
    type Page = FakePage;

    async fn open_page(&self, _worker_id: usize) -> Result<FakePage> {
        if self.refuse_sessions {
            return Err(CrawlError::NoWebDriver);
        }
        self.log.lock().unwrap().sessions_opened += 1;
        Ok(FakePage {
            site: self.clone(),
            current: None,
            neutralized: false,
        })
    }
}

pub struct FakePage {
    site: FakeSite,
    current: Option<String>,
    neutralized: bool,
}

impl FakePage {
    /// A page already sitting on `url`, as the worker leaves it for the handler
    pub async fn loaded(site: &FakeSite, url: &str) -> FakePage {
        let mut page = site.open_page(0).await.unwrap();
        page.goto(url).await.unwrap();
        page
    }

    fn current_response(&self) -> Result<FakeResponse> {
        let url = self.current.clone().unwrap_or_default();
        self.site
            .pages
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .ok_or(CrawlError::Timeout(url))
    }
}

impl Page for FakePage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.neutralized = false;
        let mut pages = self.site.pages.lock().unwrap();
        let response = pages
            .get_mut(url)
            .ok_or_else(|| CrawlError::Timeout(url.to_string()))?;
        if response.crashes {
            drop(pages);
            panic!("browser crashed loading {url}");
        }
        if response.failures > 0 {
            response.failures -= 1;
            return Err(CrawlError::Timeout(url.to_string()));
        }
        let landed = response.redirect.clone().unwrap_or_else(|| url.to_string());
        drop(pages);

        *self
            .site
            .log
            .lock()
            .unwrap()
            .visits
            .entry(url.to_string())
            .or_default() += 1;
        self.current = Some(landed);
        Ok(())
    }

    async fn current_url(&mut self) -> Result<Url> {
        let current = self.current.clone().unwrap_or_default();
        Ok(Url::parse(&current)?)
    }

    async fn run_script(&mut self, script: &str) -> Result<()> {
        let current = self.current.clone().unwrap_or_default();
        self.site
            .log
            .lock()
            .unwrap()
            .scripts
            .push((current, script.to_string()));
        if script == NEUTRALIZE_NAVIGATION_JS {
            self.neutralized = true;
        }
        Ok(())
    }

    async fn body_html(&mut self) -> Result<String> {
        let response = self.current_response()?;
        match (self.neutralized, response.revealed_body) {
            (true, Some(revealed)) => Ok(revealed),
            _ => Ok(response.body),
        }
    }

    async fn close(self) {
        self.site.log.lock().unwrap().sessions_closed += 1;
    }
}
