// src/parse/mod.rs
// =============================================================================
// This module pulls links out of the site's HTML pages.
//
// Submodules:
// - document: parsing a page and rejecting empty or unrecognizable bodies
// - categories: the category links on the front page
// - images: the per-resolution image links on a category listing
//
// We use the `scraper` crate (CSS selectors over an html5ever DOM) and the
// `url` crate to resolve relative hrefs against the page they came from.
// =============================================================================

mod categories;
mod document;
mod images;

pub use categories::{extract_categories, Category};
pub use images::{extract_listing, Listing};
