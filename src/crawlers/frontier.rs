use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify};

/// A URL waiting to be visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// URL as submitted; navigation and the output file name use it unchanged
    pub url: String,
    /// Normalized form used for de-duplication
    pub unique_key: String,
    /// Link hops from the seed that led here
    pub depth: u32,
    /// Failed attempts so far
    pub retries: u32,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>, unique_key: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            unique_key: unique_key.into(),
            depth,
            retries: 0,
        }
    }
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<CrawlRequest>,
    seen: HashSet<String>,
    cap_reached: bool,
}

/// Shared queue of pending requests with exact de-duplication.
///
/// [`Frontier::next`] hands out a [`Lease`]; the request counts as in flight
/// until the lease is finished, retried or dropped. Dropping covers a worker
/// that dies mid-request, so the crawl still ends. `next` returns `None` once
/// the queue is empty and nothing is in flight, since no further links can
/// show up after that.
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    // Outside the lock so a lease can release it from `Drop`
    in_flight: AtomicUsize,
    notify: Notify,
    max_requests: Option<usize>,
}

impl Frontier {
    pub fn new(max_requests: Option<usize>) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            in_flight: AtomicUsize::new(0),
            notify: Notify::new(),
            max_requests,
        }
    }

    /// Queue `url` unless its `unique_key` was seen before or the request cap
    /// is reached. Returns whether it was queued.
    pub async fn push(&self, url: String, unique_key: String, depth: u32) -> bool {
        let mut state = self.state.lock().await;

        if state.seen.contains(&unique_key) {
            ::log::trace!("Skipping already seen link: {}", url);
            return false;
        }
        if let Some(max) = self.max_requests {
            if state.seen.len() >= max {
                if !state.cap_reached {
                    ::log::info!("Reached the limit of {} requests, no more links are queued", max);
                    state.cap_reached = true;
                }
                return false;
            }
        }

        ::log::debug!("Queuing link for crawling: {}", url);
        state.seen.insert(unique_key.clone());
        state.queue.push_back(CrawlRequest::new(url, unique_key, depth));
        drop(state);

        self.notify.notify_waiters();
        true
    }

    /// Wait for the next request, or `None` when the crawl is finished
    pub async fn next(&self) -> Option<Lease<'_>> {
        loop {
            // Registered before the state check so a wakeup in between is not lost
            let notified = self.notify.notified();
            {
                let mut state = self.state.lock().await;
                if let Some(request) = state.queue.pop_front() {
                    self.in_flight.fetch_add(1, Ordering::SeqCst);
                    return Some(Lease {
                        frontier: self,
                        request,
                    });
                }
                if self.in_flight.load(Ordering::SeqCst) == 0 {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Number of unique URLs admitted so far
    pub async fn seen_count(&self) -> usize {
        self.state.lock().await.seen.len()
    }

    fn release(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}

/// An in-flight request; releases its slot in the frontier when dropped
#[derive(Debug)]
pub struct Lease<'a> {
    frontier: &'a Frontier,
    request: CrawlRequest,
}

impl Lease<'_> {
    pub fn request(&self) -> &CrawlRequest {
        &self.request
    }

    /// Mark the request as handled, successfully or not
    pub fn finish(self) {}

    /// Put the request back at the end of the queue with its retry count bumped
    pub async fn retry(self) {
        let mut request = self.request.clone();
        request.retries += 1;
        self.frontier.state.lock().await.queue.push_back(request);
        // Dropping `self` afterwards releases the slot with the retry already queued
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.frontier.release();
    }
}
