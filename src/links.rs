use scraper::{Html, Selector};
use url::Url;

/// Collects the raw `href` of every anchor in an HTML body fragment
pub fn extract_hrefs(body_html: &str) -> Vec<String> {
    let doc = Html::parse_fragment(body_html);

    let Ok(link_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let links = doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect::<Vec<String>>();

    ::log::debug!("Found {} anchors in body", links.len());
    links
}

/// Resolves every anchor in `body_html` against `page_url`, dropping ones that do not parse
pub fn absolute_links(page_url: &Url, body_html: &str) -> Vec<Url> {
    extract_hrefs(body_html)
        .iter()
        .filter_map(|href| page_url.join(href).ok())
        .collect()
}
