use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Counters kept by each worker and summed at the end of a crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Pages written to the output folder
    pub handled: usize,

    /// Requests dropped after exhausting their retries
    pub failed: usize,

    /// Failed attempts that were queued again
    pub retried: usize,

    /// Body bytes written
    pub bytes_written: usize,
}

impl AddAssign for CrawlStats {
    fn add_assign(&mut self, other: Self) {
        self.handled += other.handled;
        self.failed += other.failed;
        self.retried += other.retried;
        self.bytes_written += other.bytes_written;
    }
}

/// Outcome of a finished crawl
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSummary {
    #[serde(flatten)]
    pub stats: CrawlStats,

    /// Unique URLs admitted to the frontier
    pub discovered: usize,

    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_add_up() {
        let mut total = CrawlStats::default();
        total += CrawlStats {
            handled: 2,
            failed: 1,
            retried: 3,
            bytes_written: 100,
        };
        total += CrawlStats {
            handled: 1,
            bytes_written: 5,
            ..CrawlStats::default()
        };
        assert_eq!(
            total,
            CrawlStats {
                handled: 3,
                failed: 1,
                retried: 3,
                bytes_written: 105,
            }
        );
    }

    #[test]
    fn test_summary_serializes_flat() {
        let summary = CrawlSummary {
            stats: CrawlStats {
                handled: 1,
                ..CrawlStats::default()
            },
            discovered: 4,
            elapsed_secs: 1.5,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["handled"], 1);
        assert_eq!(json["discovered"], 4);
    }
}
