use crate::browser::Page;
use crate::error::Result;
use crate::links;
use crate::neutralize;
use crate::store::PageStore;
use std::path::PathBuf;
use url::Url;

/// What the handler produced for one page
#[derive(Debug, Clone)]
pub struct CapturedPage {
    /// URL the page was requested under
    pub url: String,
    /// File the body was written to
    pub path: PathBuf,
    /// Size of the written body in bytes
    pub bytes: usize,
    /// Absolute links found in the body, in document order
    pub links: Vec<Url>,
}

/// Dumps the body of every loaded page to the store
#[derive(Debug, Clone)]
pub struct PageCapture {
    store: PageStore,
    neutralize_navigation: bool,
}

impl PageCapture {
    pub fn new(store: PageStore, neutralize_navigation: bool) -> Self {
        Self {
            store,
            neutralize_navigation,
        }
    }

    /// Capture a page the browser has already navigated to
    pub async fn handle<P: Page>(&self, page: &mut P, request_url: &str) -> Result<CapturedPage> {
        ::log::info!("Processing {} ...", request_url);

        // Links resolve against where the page landed, before any script can move it
        let base = match page.current_url().await {
            Ok(url) => url,
            Err(e) => {
                ::log::debug!("Could not read current URL of {}: {}", request_url, e);
                Url::parse(request_url)?
            }
        };

        if self.neutralize_navigation {
            neutralize::neutralize(page).await?;
        }

        let body = page.body_html().await?;
        let path = self.store.save(request_url, &body).await?;
        ::log::info!("Page content saved to {}", path.display());

        let links = links::absolute_links(&base, &body);
        ::log::debug!("Found {} links in {}", links.len(), request_url);

        Ok(CapturedPage {
            url: request_url.to_string(),
            path,
            bytes: body.len(),
            links,
        })
    }
}
