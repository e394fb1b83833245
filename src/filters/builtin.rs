//! Built-in admission filters: URL glob patterns, host lists, content types.

use std::collections::HashSet;

use futures::FutureExt;
use futures::future::BoxFuture;
use regex::{Regex, RegexBuilder};

use super::{FilterContext, UrlFilter};
use crate::urlnorm;

/// Admits URLs matching any of a set of glob-style patterns.
///
/// `*` spans any run of characters, `?` matches exactly one; every other
/// regex metacharacter is escaped. Matching is case-insensitive and
/// anchored to the full URL. A blank pattern list admits everything.
pub struct UrlPatternFilter {
    patterns: Vec<Regex>,
}

impl UrlPatternFilter {
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            match RegexBuilder::new(&glob_to_regex(pattern))
                .case_insensitive(true)
                .build()
            {
                Ok(regex) => compiled.push(regex),
                Err(e) => log::warn!(
                    target: "mdcrawl::filters",
                    "skipping unusable URL pattern {pattern:?}: {e}"
                ),
            }
        }
        Self { patterns: compiled }
    }
}

/// Compile a glob into an anchored regex, once at construction time so the
/// hot path never compiles patterns.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(ch.encode_utf8(&mut [0u8; 4]))),
        }
    }
    out.push('$');
    out
}

impl UrlFilter for UrlPatternFilter {
    fn admit<'a>(&'a self, url: &'a str, _ctx: &'a FilterContext) -> BoxFuture<'a, bool> {
        let admitted =
            self.patterns.is_empty() || self.patterns.iter().any(|regex| regex.is_match(url));
        futures::future::ready(admitted).boxed()
    }
}

/// Admits or rejects URLs by hostname.
///
/// Hosts are lower-cased and trimmed at construction. A URL with an
/// unparsable host is rejected outright; a blocked host is rejected even
/// when it also appears on the allow-list; otherwise an empty allow-list
/// admits any host.
pub struct DomainFilter {
    allowed: HashSet<String>,
    blocked: HashSet<String>,
}

impl DomainFilter {
    #[must_use]
    pub fn new<I, S>(allowed: I, blocked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: normalize_hosts(allowed),
            blocked: normalize_hosts(blocked),
        }
    }
}

fn normalize_hosts<I, S>(hosts: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    hosts
        .into_iter()
        .map(|host| host.as_ref().trim().to_lowercase())
        .filter(|host| !host.is_empty())
        .collect()
}

impl UrlFilter for DomainFilter {
    fn admit<'a>(&'a self, url: &'a str, _ctx: &'a FilterContext) -> BoxFuture<'a, bool> {
        let admitted = match urlnorm::host_of(url) {
            None => false,
            Some(host) => {
                !self.blocked.contains(&host)
                    && (self.allowed.is_empty() || self.allowed.contains(&host))
            }
        };
        futures::future::ready(admitted).boxed()
    }
}

/// Admits pages whose content type contains one of the allowed substrings.
///
/// Candidates without a known content type (anything not yet fetched) are
/// admitted on the benefit of the doubt. An empty allowed list admits
/// everything.
pub struct ContentTypeFilter {
    allowed: Vec<String>,
}

impl ContentTypeFilter {
    #[must_use]
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|ct| ct.as_ref().trim().to_lowercase())
                .filter(|ct| !ct.is_empty())
                .collect(),
        }
    }
}

impl UrlFilter for ContentTypeFilter {
    fn admit<'a>(&'a self, _url: &'a str, ctx: &'a FilterContext) -> BoxFuture<'a, bool> {
        let admitted = self.allowed.is_empty()
            || match &ctx.content_type {
                None => true,
                Some(content_type) => {
                    let content_type = content_type.to_lowercase();
                    self.allowed.iter().any(|ct| content_type.contains(ct))
                }
            };
        futures::future::ready(admitted).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FilterContext {
        FilterContext {
            url: "https://example.com/".into(),
            seed_host: "example.com".into(),
            ..FilterContext::default()
        }
    }

    #[tokio::test]
    async fn pattern_filter_globs_and_anchors() {
        let filter = UrlPatternFilter::new(["https://example.com/docs/*"]);
        assert!(filter.admit("https://example.com/docs/intro", &ctx()).await);
        assert!(filter.admit("HTTPS://EXAMPLE.COM/DOCS/INTRO", &ctx()).await);
        assert!(!filter.admit("https://example.com/blog/post", &ctx()).await);
        // Anchored: a match must cover the whole URL.
        assert!(!filter.admit("prefix https://example.com/docs/x", &ctx()).await);
    }

    #[tokio::test]
    async fn pattern_filter_question_mark_is_single_char() {
        let filter = UrlPatternFilter::new(["https://example.com/p?"]);
        assert!(filter.admit("https://example.com/p1", &ctx()).await);
        assert!(!filter.admit("https://example.com/p12", &ctx()).await);
    }

    #[tokio::test]
    async fn pattern_filter_escapes_metacharacters() {
        let filter = UrlPatternFilter::new(["https://example.com/a.b"]);
        assert!(filter.admit("https://example.com/a.b", &ctx()).await);
        assert!(!filter.admit("https://example.com/aXb", &ctx()).await);
    }

    #[tokio::test]
    async fn blank_pattern_list_admits_everything() {
        let filter = UrlPatternFilter::new(["", "   "]);
        assert!(filter.admit("https://anything.test/", &ctx()).await);
    }

    #[tokio::test]
    async fn domain_filter_block_beats_allow() {
        let filter = DomainFilter::new(vec!["example.com"], vec!["example.com"]);
        assert!(!filter.admit("https://example.com/x", &ctx()).await);
    }

    #[tokio::test]
    async fn domain_filter_allow_list() {
        let filter = DomainFilter::new(vec![" Example.COM "], Vec::new());
        assert!(filter.admit("https://example.com/x", &ctx()).await);
        assert!(!filter.admit("https://other.test/x", &ctx()).await);
    }

    #[tokio::test]
    async fn domain_filter_empty_allow_admits_unblocked() {
        let filter = DomainFilter::new(Vec::<String>::new(), vec!["bad.test".to_string()]);
        assert!(filter.admit("https://good.test/", &ctx()).await);
        assert!(!filter.admit("https://bad.test/", &ctx()).await);
        assert!(!filter.admit("not-a-url", &ctx()).await);
    }

    #[tokio::test]
    async fn content_type_filter_substring_match() {
        let filter = ContentTypeFilter::new(["text/html"]);
        let mut context = ctx();
        context.content_type = Some("Text/HTML; charset=utf-8".into());
        assert!(filter.admit("https://example.com/", &context).await);
        context.content_type = Some("application/pdf".into());
        assert!(!filter.admit("https://example.com/", &context).await);
        // Unknown content type gets the benefit of the doubt.
        context.content_type = None;
        assert!(filter.admit("https://example.com/", &context).await);
    }

    #[tokio::test]
    async fn content_type_filter_empty_list_admits() {
        let filter = ContentTypeFilter::new(Vec::<String>::new());
        let mut context = ctx();
        context.content_type = Some("application/octet-stream".into());
        assert!(filter.admit("https://example.com/", &context).await);
    }
}
