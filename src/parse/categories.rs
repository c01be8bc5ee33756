// src/parse/categories.rs
// =============================================================================
// Extracts the category list from the site's front page.
//
// The front page carries a categories panel, roughly:
//
//   <ul class="side-panel categories">
//     <li><a href="/girls-desktop-wallpapers.html">Girls (1520)</a></li>
//     <li><a href="/space-desktop-wallpapers.html">Space</a></li>
//   </ul>
//
// Each anchor inside an element with class "categories" is one category. The
// link text is the name (minus an optional trailing wallpaper count) and the
// href is the listing page.
// =============================================================================

use super::document::{parse_page, resolve_href, selector};
use crate::error::GrabError;
use std::collections::HashSet;
use url::Url;

const CATEGORY_LINKS: &str = ".categories a[href]";

/// A wallpaper category and its listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: Url,
}

/// Returns the categories advertised on the front page, in page order.
///
/// Duplicate names keep their first occurrence. A page without a
/// categories panel yields an empty list.
pub fn extract_categories(html: &str, page_url: &Url) -> Result<Vec<Category>, GrabError> {
    let document = parse_page(html, page_url)?;
    let links = selector(page_url, CATEGORY_LINKS)?;

    let mut seen = HashSet::new();
    let mut categories = Vec::new();

    for element in document.select(&links) {
        let text: String = element.text().collect();
        let name = clean_name(&text);
        if name.is_empty() {
            continue;
        }

        let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_href(page_url, href))
        else {
            continue;
        };

        if seen.insert(name.to_lowercase()) {
            categories.push(Category { name, url });
        }
    }

    Ok(categories)
}

// "Girls (1520)" -> "Girls", whitespace collapsed
fn clean_name(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(open) = collapsed.rfind(" (") {
        let tail = &collapsed[open + 2..];
        if let Some(count) = tail.strip_suffix(')') {
            if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit() || b == b',') {
                return collapsed[..open].to_string();
            }
        }
    }

    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONT_PAGE: &str = r##"
        <html><body>
          <ul class="side-panel categories">
            <li><a href="/girls-desktop-wallpapers.html" title="Girls">Girls (1520)</a></li>
            <li><a href="/space-desktop-wallpapers.html">  Space </a></li>
            <li><a href="http://example.com/travel-desktop-wallpapers.html">Travel</a></li>
            <li><a href="#">   </a></li>
          </ul>
          <a href="/about.html">About</a>
        </body></html>
    "##;

    fn front() -> Url {
        Url::parse("http://example.com/").unwrap()
    }

    #[test]
    fn test_extracts_names_and_listing_urls() {
        let categories = extract_categories(FRONT_PAGE, &front()).unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Girls", "Space", "Travel"]);
        assert_eq!(
            categories[1].url.as_str(),
            "http://example.com/space-desktop-wallpapers.html"
        );
    }

    #[test]
    fn test_links_outside_panel_are_ignored() {
        let categories = extract_categories(FRONT_PAGE, &front()).unwrap();
        assert!(categories.iter().all(|c| c.name != "About"));
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let html = r#"<div class="categories">
            <a href="/a.html">Space</a><a href="/b.html">space</a>
        </div>"#;
        let categories = extract_categories(html, &front()).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].url.as_str(), "http://example.com/a.html");
    }

    #[test]
    fn test_page_without_panel_yields_nothing() {
        let html = "<html><body><p>maintenance</p></body></html>";
        assert!(extract_categories(html, &front()).unwrap().is_empty());
    }

    #[test]
    fn test_empty_page_is_a_parse_error() {
        assert!(extract_categories("", &front()).is_err());
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("Girls (1520)"), "Girls");
        assert_eq!(clean_name("Cars (1,024)"), "Cars");
        assert_eq!(clean_name("  Motors \n Bikes "), "Motors Bikes");
        assert_eq!(clean_name("Movies (Classic)"), "Movies (Classic)");
    }
}
