use crate::browser::{Browser, Page};
use crate::config::CrawlConfig;
use crate::crawlers::frontier::{CrawlRequest, Frontier, Lease};
use crate::crawlers::handler::{CapturedPage, PageCapture};
use crate::error::{CrawlError, Result};
use crate::filter::{UrlFilter, UrlFilterConfig};
use crate::results::{CrawlStats, CrawlSummary};
use crate::store::PageStore;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Runs a crawl to completion with the given browser and returns its summary.
///
/// The output folder is created up front, the seeds are queued, and a pool of
/// `max_concurrency` workers drains the frontier. Returns once the frontier is
/// empty and every worker has shut down.
pub async fn run<B: Browser>(config: &CrawlConfig, browser: B) -> Result<CrawlSummary> {
    let start_time = Instant::now();

    let seeds = parse_seeds(&config.seed_urls)?;
    let url_filter = Arc::new(create_url_filter(config, &seeds)?);

    let store = PageStore::open(&config.output_dir, config.filename_style).await?;
    let handler = Arc::new(PageCapture::new(store, config.neutralize_navigation));

    let frontier = Arc::new(Frontier::new(config.max_requests));
    // Seeds keep the exact text they were given; only their dedup key is normalized
    for (given, seed) in config.seed_urls.iter().zip(&seeds) {
        ::log::info!("Starting page dump crawl from: {}", given);
        frontier
            .push(given.clone(), url_filter.normalize_url(seed).to_string(), 0)
            .await;
    }

    let mut workers = spawn_workers(
        config.max_concurrency.max(1),
        Arc::new(browser),
        handler,
        Arc::clone(&frontier),
        url_filter,
        config.max_request_retries,
    );

    let mut stats = CrawlStats::default();
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(worker_stats) => stats += worker_stats,
            Err(e) => ::log::error!("Worker task ended abnormally: {}", e),
        }
    }

    let summary = CrawlSummary {
        stats,
        discovered: frontier.seen_count().await,
        elapsed_secs: start_time.elapsed().as_secs_f64(),
    };
    ::log::info!(
        "Crawl complete - {} pages saved, {} failed, {} retries, {} URLs discovered in {:.2} seconds",
        summary.stats.handled,
        summary.stats.failed,
        summary.stats.retried,
        summary.discovered,
        summary.elapsed_secs
    );
    Ok(summary)
}

fn parse_seeds(seed_urls: &[String]) -> Result<Vec<Url>> {
    if seed_urls.is_empty() {
        return Err(CrawlError::NoSeeds);
    }
    seed_urls
        .iter()
        .map(|s| Url::parse(s).map_err(CrawlError::from))
        .collect()
}

/// Creates the link scope: seed hosts, configured patterns, no static assets
fn create_url_filter(config: &CrawlConfig, seeds: &[Url]) -> Result<UrlFilter> {
    let filter_config = UrlFilterConfig::from_crawl_config(config, seeds);
    Ok(UrlFilter::new(filter_config)?)
}

/// Spawns the worker pool; each task resolves to the counters of its worker
fn spawn_workers<B: Browser>(
    num_workers: usize,
    browser: Arc<B>,
    handler: Arc<PageCapture>,
    frontier: Arc<Frontier>,
    url_filter: Arc<UrlFilter>,
    max_retries: u32,
) -> JoinSet<CrawlStats> {
    let mut workers = JoinSet::new();

    for worker_id in 0..num_workers {
        let browser = Arc::clone(&browser);
        let handler = Arc::clone(&handler);
        let frontier = Arc::clone(&frontier);
        let url_filter = Arc::clone(&url_filter);

        ::log::trace!("Spawning worker {}", worker_id);
        workers.spawn(async move {
            let stats = worker_processing_loop(
                worker_id,
                &*browser,
                &handler,
                &frontier,
                &url_filter,
                max_retries,
            )
            .await;
            ::log::debug!("Worker {} shutting down", worker_id);
            stats
        });
    }

    workers
}

/// Main processing loop for a worker
///
/// The browser session is opened on the first request and reused until the
/// frontier reports the crawl is over. A session that is lost gets replaced
/// on the next request.
async fn worker_processing_loop<B: Browser>(
    worker_id: usize,
    browser: &B,
    handler: &PageCapture,
    frontier: &Frontier,
    url_filter: &UrlFilter,
    max_retries: u32,
) -> CrawlStats {
    let mut stats = CrawlStats::default();
    let mut session: Option<B::Page> = None;

    while let Some(lease) = frontier.next().await {
        let request = lease.request();
        ::log::trace!(
            "Worker {} processing: {} (depth {}, retry {})",
            worker_id,
            request.url,
            request.depth,
            request.retries
        );

        let mut page = match session.take() {
            Some(page) => page,
            None => match browser.open_page(worker_id).await {
                Ok(page) => page,
                Err(e) => {
                    handle_failure(worker_id, lease, e, max_retries, &mut stats).await;
                    continue;
                }
            },
        };

        match visit(&mut page, handler, request).await {
            Ok(captured) => {
                session = Some(page);
                stats.handled += 1;
                stats.bytes_written += captured.bytes;
                enqueue_links(worker_id, &captured, request.depth, url_filter, frontier).await;
                lease.finish();
            }
            Err(e) => {
                if e.is_session_lost() {
                    ::log::warn!("Worker {} lost its browser session on {}", worker_id, request.url);
                    page.close().await;
                } else {
                    session = Some(page);
                }
                handle_failure(worker_id, lease, e, max_retries, &mut stats).await;
            }
        }
    }

    if let Some(page) = session {
        page.close().await;
    }

    ::log::debug!(
        "Worker {} completed processing loop - no more URLs to process",
        worker_id
    );
    stats
}

/// Navigates to the request URL and hands the loaded page to the handler
async fn visit<P: Page>(
    page: &mut P,
    handler: &PageCapture,
    request: &CrawlRequest,
) -> Result<CapturedPage> {
    page.goto(&request.url).await?;
    handler.handle(page, &request.url).await
}

/// Pushes the in-scope links of a captured page into the frontier
async fn enqueue_links(
    worker_id: usize,
    captured: &CapturedPage,
    depth: u32,
    url_filter: &UrlFilter,
    frontier: &Frontier,
) {
    let mut queued = 0;
    for link in &captured.links {
        if !url_filter.should_crawl(link) {
            ::log::trace!("URL filter rejected: {}", link);
            continue;
        }
        let normalized = url_filter.normalize_url(link).to_string();
        if frontier.push(normalized.clone(), normalized, depth + 1).await {
            queued += 1;
        }
    }
    ::log::debug!(
        "Worker {} queued {} of {} links from {}",
        worker_id,
        queued,
        captured.links.len(),
        captured.url
    );
}

/// Re-queues a failed request or drops it once its retries are used up
async fn handle_failure(
    worker_id: usize,
    lease: Lease<'_>,
    error: CrawlError,
    max_retries: u32,
    stats: &mut CrawlStats,
) {
    let request = lease.request();
    if request.retries < max_retries {
        ::log::warn!(
            "Worker {} failed on {} (attempt {}), retrying: {}",
            worker_id,
            request.url,
            request.retries + 1,
            error
        );
        stats.retried += 1;
        lease.retry().await;
    } else {
        ::log::error!(
            "Request {} failed {} times, giving up: {}",
            request.url,
            request.retries + 1,
            error
        );
        stats.failed += 1;
        lease.finish();
    }
}
