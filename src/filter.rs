use crate::config::CrawlConfig;
use regex::Regex;
use url::Url;

/// Static assets never worth dumping
const ASSET_PATTERN: &str = r"(?i)\.(jpg|jpeg|png|gif|css|js|ico|svg|woff|woff2|ttf|eot|pdf|zip)$";

/// Scope rules deciding which discovered links enter the frontier
#[derive(Debug, Clone, Default)]
pub struct UrlFilterConfig {
    /// Whether to follow links to other hosts
    pub allow_external: bool,

    /// Hosts links must stay on (ignored when `allow_external` is set)
    pub allowed_hosts: Vec<String>,

    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    pub exclude_patterns: Vec<String>,
}

impl UrlFilterConfig {
    /// Build the scope for a crawl: stay on the seed hosts and skip static assets
    pub fn from_crawl_config(config: &CrawlConfig, seeds: &[Url]) -> Self {
        let mut allowed_hosts: Vec<String> = seeds
            .iter()
            .filter_map(|u| u.host_str().map(str::to_string))
            .collect();
        allowed_hosts.sort();
        allowed_hosts.dedup();

        let mut exclude_patterns = vec![ASSET_PATTERN.to_string()];
        exclude_patterns.extend(config.exclude_patterns.iter().cloned());

        Self {
            allow_external: config.allow_external,
            allowed_hosts,
            include_patterns: config.include_patterns.clone(),
            exclude_patterns,
        }
    }
}

/// URL filter that uses regex patterns and host scope to determine which URLs to crawl
#[derive(Debug)]
pub struct UrlFilter {
    config: UrlFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter from configuration
    pub fn new(config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a URL should be crawled based on all filtering rules
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if !self.is_in_host_scope(url) {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|r| r.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|r| r.is_match(url_str))
    }

    fn is_in_host_scope(&self, url: &Url) -> bool {
        if self.config.allow_external {
            return true;
        }
        match url.host_str() {
            Some(host) => self.config.allowed_hosts.iter().any(|h| h == host),
            None => false,
        }
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}
