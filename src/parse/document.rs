// src/parse/document.rs
// =============================================================================
// Shared helpers for the extractors: turning a body into a DOM, compiling
// selectors and resolving hrefs.
//
// A page "has no recognizable structure" when it is blank or parses into a
// document with no elements and no text. A well-formed page that simply has
// no matching links is not an error.
// =============================================================================

use crate::error::GrabError;
use scraper::{Html, Selector};
use url::Url;

/// Parses `body` (fetched from `page_url`) into a document.
pub(crate) fn parse_page(body: &str, page_url: &Url) -> Result<Html, GrabError> {
    if body.trim().is_empty() {
        return Err(GrabError::parse(page_url.as_str(), "empty document"));
    }

    let document = Html::parse_document(body);

    // html5ever always synthesizes <html><head><body>, look past those
    let any_element = selector(page_url, "body *")?;
    let has_elements = document.select(&any_element).next().is_some();
    let has_text = document.root_element().text().any(|t| !t.trim().is_empty());

    if !has_elements && !has_text {
        return Err(GrabError::parse(page_url.as_str(), "document has no content"));
    }

    Ok(document)
}

pub(crate) fn selector(page_url: &Url, css: &str) -> Result<Selector, GrabError> {
    Selector::parse(css)
        .map_err(|e| GrabError::parse(page_url.as_str(), format!("bad selector '{css}': {e}")))
}

/// Resolves a possibly-relative href to an absolute http(s) URL.
///
/// Fragments, mailto:, javascript: and friends come back as None.
pub(crate) fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}
