// src/grab/mod.rs
// =============================================================================
// This module runs the grabber: front page, category filter, listings,
// downloads.
//
// Submodules:
// - plan: category filtering and the (category, resolution) units
// - runner: the concurrent walk over all units
// - report: per-download and per-unit outcomes, and run totals
// =============================================================================

mod plan;
mod report;
mod runner;

pub use report::{RunReport, Summary};
#[cfg(test)]
pub use report::{DownloadResult, UnitReport};
pub use runner::grab;
