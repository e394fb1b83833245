//! Anchor extraction from fetched page HTML.
//!
//! Uses `scraper` for read-only parsing, which tolerates bare fragments
//! lacking document structure. Extraction never fails: a page the parser
//! cannot make sense of simply yields no links.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::urlnorm;

/// A candidate link found on a page, resolved to absolute canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub url: String,
    /// Trimmed anchor text, when the element had any.
    pub anchor_text: Option<String>,
}

/// Extract all crawlable links from `html`, resolved against `base_url`.
///
/// Hrefs that fail normalization (non-http schemes, `mailto:`,
/// `javascript:`, malformed) are dropped. Results are deduplicated by
/// canonical URL, keeping the first occurrence, so same-page anchor
/// variants collapse to one entry.
#[must_use]
pub fn extract_links(html: &str, base_url: &str) -> Vec<DiscoveredLink> {
    if url::Url::parse(base_url).is_err() {
        log::warn!(
            target: "mdcrawl::links",
            "unparsable base URL, treating page as linkless: {base_url}"
        );
        return Vec::new();
    }

    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(resolved) = urlnorm::normalize_against(href.trim(), base_url) else {
            continue;
        };
        if !seen.insert(resolved.clone()) {
            continue;
        }
        let text = element.text().collect::<String>();
        let text = text.trim();
        links.push(DiscoveredLink {
            url: resolved,
            anchor_text: (!text.is_empty()).then(|| text.to_string()),
        });
    }

    log::debug!(
        target: "mdcrawl::links",
        "found {} distinct links on {base_url}",
        links.len()
    );
    links
}
