//! URL canonicalization for crawl admission and deduplication.
//!
//! Every URL that enters the engine passes through here first: the seed,
//! extracted links, and snapshot contents on resume. Canonical form is an
//! absolute http(s) URL with the fragment stripped, so `/x` and `/x#frag`
//! collapse to a single frontier entry.

use url::Url;

/// Canonicalize an absolute URL.
///
/// Returns `None` for anything that fails to parse or whose scheme is not
/// `http`/`https`.
#[must_use]
pub fn normalize(raw: &str) -> Option<String> {
    let mut parsed = Url::parse(raw).ok()?;
    if !is_http(parsed.scheme()) {
        return None;
    }
    parsed.set_fragment(None);
    Some(parsed.into())
}

/// Canonicalize `raw` resolved against `base`.
///
/// Relative references are joined onto `base` before the scheme check, so
/// `mailto:` and `javascript:` hrefs are rejected while `/docs` resolves to
/// an absolute page URL.
#[must_use]
pub fn normalize_against(raw: &str, base: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    let mut joined = base.join(raw).ok()?;
    if !is_http(joined.scheme()) {
        return None;
    }
    joined.set_fragment(None);
    Some(joined.into())
}

/// Lower-cased host of an absolute URL, if it has one.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| host.to_ascii_lowercase())
}

fn is_http(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}
