// src/grab/plan.rs
// =============================================================================
// Turns the front page categories into units of work.
//
// A unit is one (category, resolution) pair: one listing to walk and a set
// of images to download. Units are independent of each other, which is what
// lets the runner interleave them freely.
// =============================================================================

use crate::config::{Config, Layout};
use crate::parse::Category;
use crate::resolution::Resolution;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub category: Category,
    pub resolution: Resolution,
}

/// Keeps the categories the configuration asks for.
///
/// Matching is case-insensitive. Filters that match nothing on the front
/// page are logged.
pub fn select_categories(all: Vec<Category>, config: &Config) -> Vec<Category> {
    for filter in &config.categories {
        let wanted = filter.to_lowercase();
        if !all.iter().any(|c| c.name.to_lowercase() == wanted) {
            warn!(category = %filter, "no such category on the front page");
        }
    }

    all.into_iter()
        .filter(|c| config.wants_category(&c.name))
        .collect()
}

/// Every (category, resolution) pair, category-major.
pub fn plan_units(categories: &[Category], resolutions: impl IntoIterator<Item = Resolution> + Clone) -> Vec<Unit> {
    categories
        .iter()
        .flat_map(|category| {
            resolutions.clone().into_iter().map(move |resolution| Unit {
                category: category.clone(),
                resolution,
            })
        })
        .collect()
}

/// Directory the unit's images are written to.
pub fn unit_dir(config: &Config, unit: &Unit) -> PathBuf {
    match config.layout {
        Layout::Flat => config.output.clone(),
        Layout::Nested => config
            .output
            .join(slug(&unit.category.name))
            .join(unit.resolution.to_string()),
    }
}

// "Motors & Bikes" -> "motors-bikes"
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let out = out.trim_end_matches('-').to_string();

    if out.is_empty() {
        "uncategorized".to_string()
    } else {
        out
    }
}
