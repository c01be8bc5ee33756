// src/parse/images.rs
// =============================================================================
// Extracts image links for one resolution from a category listing page.
//
// A link belongs to a resolution when either:
// - its text spells the resolution ("2560x1440", "2560 x 1440"), or
// - the last segment of its URL contains the resolution as a whole token
//   ("nebula-wallpaper-2560x1440.jpg")
//
// Matching is by whole token, so "2560x1440" never matches "2560x1440x32"
// or "12560x1440". Only links to image files count: the site's
// "browse by resolution" menu links to HTML pages and is skipped.
//
// The same page may also carry a rel="next" link to the following listing
// page, which the grabber follows when --max-pages allows it.
// =============================================================================

use super::document::{parse_page, resolve_href, selector};
use crate::error::GrabError;
use crate::resolution::Resolution;
use scraper::Html;
use std::collections::HashSet;
use url::Url;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// What one listing page offers for a resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Matching image URLs, de-duplicated, in page order
    pub images: Vec<Url>,
    pub next_page: Option<Url>,
}

/// Parses a listing page once and extracts both the image links and the
/// next-page link.
pub fn extract_listing(html: &str, page_url: &Url, resolution: Resolution) -> Result<Listing, GrabError> {
    let document = parse_page(html, page_url)?;
    Ok(Listing {
        images: image_links(&document, page_url, resolution)?,
        next_page: next_page(&document, page_url)?,
    })
}

fn image_links(document: &Html, page_url: &Url, resolution: Resolution) -> Result<Vec<Url>, GrabError> {
    let anchors = selector(page_url, "a[href]")?;

    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for element in document.select(&anchors) {
        let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_href(page_url, href))
        else {
            continue;
        };

        if !is_image_file(&url) {
            continue;
        }

        let text: String = element.text().collect();
        if !(text_matches(&text, resolution) || url_matches(&url, resolution)) {
            continue;
        }

        if seen.insert(url.clone()) {
            images.push(url);
        }
    }

    Ok(images)
}

fn next_page(document: &Html, page_url: &Url) -> Result<Option<Url>, GrabError> {
    let next = selector(page_url, r#"a[rel~="next"][href], link[rel~="next"][href]"#)?;

    Ok(document
        .select(&next)
        .filter_map(|e| e.value().attr("href"))
        .filter_map(|href| resolve_href(page_url, href))
        .find(|url| url != page_url))
}

fn text_matches(text: &str, resolution: Resolution) -> bool {
    // "2560 x 1440" is written with spaces on some pages
    let squeezed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" x ", "x")
        .replace(" X ", "x");
    let found = tokens(&squeezed).any(|t| resolution.matches_token(t));
    found
}

fn url_matches(url: &Url, resolution: Resolution) -> bool {
    tokens(last_segment(url)).any(|t| resolution.matches_token(t))
}

fn is_image_file(url: &Url) -> bool {
    last_segment(url)
        .rsplit_once('.')
        .map_or(false, |(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn last_segment(url: &Url) -> &str {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("")
}

// Splits on anything that isn't a letter or digit; "x" stays inside tokens
fn tokens(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_alphanumeric()).filter(|t| !t.is_empty())
}
