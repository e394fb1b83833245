#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::anyhow;
use futures::FutureExt;
use futures::future::BoxFuture;
use mdcrawl::{FetchContext, FetchedPage, PageFetcher};

/// Route engine logs to the test harness when `RUST_LOG` is set.
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Render a minimal HTML page whose body is a list of `(href, anchor text)`
/// links.
pub fn page_with_links(links: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (href, text) in links {
        body.push_str(&format!("<a href=\"{href}\">{text}</a>\n"));
    }
    format!("<html><head><title>fixture</title></head><body>{body}</body></html>")
}

struct StoredPage {
    html: String,
    content_type: Option<String>,
}

/// In-memory site: a map from exact URL to canned page. Unknown URLs fail
/// the way a dead host would.
#[derive(Default)]
pub struct SiteFetcher {
    pages: HashMap<String, StoredPage>,
}

impl SiteFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(
            url.to_string(),
            StoredPage {
                html,
                content_type: Some("text/html; charset=utf-8".to_string()),
            },
        );
        self
    }

    pub fn page_with_type(mut self, url: &str, html: String, content_type: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            StoredPage {
                html,
                content_type: Some(content_type.to_string()),
            },
        );
        self
    }
}

impl PageFetcher for SiteFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        _ctx: FetchContext,
    ) -> BoxFuture<'a, anyhow::Result<FetchedPage>> {
        async move {
            let page = self
                .pages
                .get(url)
                .ok_or_else(|| anyhow!("connection refused: {url}"))?;
            Ok(FetchedPage {
                url: url.to_string(),
                html: page.html.clone(),
                title: Some("fixture".to_string()),
                markdown: None,
                method: Some("static".to_string()),
                content_type: page.content_type.clone(),
            })
        }
        .boxed()
    }
}
