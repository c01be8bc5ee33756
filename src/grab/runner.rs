// src/grab/runner.rs
// =============================================================================
// Drives a whole run.
//
// How it works:
// 1. Fetch the front page and extract the categories
// 2. Keep the categories the user asked for
// 3. For every (category, resolution) unit, walk the listing pages and
//    collect the matching image links
// 4. Download every link
//
// Units run concurrently, and so do the downloads inside each unit. Every
// network call goes through the Fetcher's in-flight limit, so --jobs caps
// the total no matter how the work is nested. Everything runs on one
// thread: futures only yield at I/O.
//
// A failure is caught at the smallest unit that contains it. A bad
// download fails that download, a bad listing fails that unit, and nothing
// stops the other units.
//
// Rust concepts:
// - buffer_unordered: run up to N futures at once, yield results as they
//   finish (not in order)
// - Mutex<HashMap>: the only shared mutable state, one slot per destination
//   file. Downloads aiming at the same file take turns on the slot's async
//   lock, and once one of them saves the file the rest are skipped
// =============================================================================

use super::plan::{plan_units, select_categories, unit_dir, Unit};
use super::report::{DownloadResult, Failure, RunReport, UnitReport};
use crate::config::Config;
use crate::download::{download_to, file_name_from_url};
use crate::error::GrabError;
use crate::fetch::Fetcher;
use crate::parse::{extract_categories, extract_listing, Category, Listing};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, warn};
use url::Url;

/// Runs the grabber over the configured site.
pub async fn grab(config: &Config, fetcher: &Fetcher) -> RunReport {
    Grabber::new(config, fetcher).run().await
}

struct Grabber<'a> {
    config: &'a Config,
    fetcher: &'a Fetcher,
    /// true once a file has been saved at that path
    claimed: Mutex<HashMap<PathBuf, Arc<AsyncMutex<bool>>>>,
}

impl<'a> Grabber<'a> {
    fn new(config: &'a Config, fetcher: &'a Fetcher) -> Self {
        Self {
            config,
            fetcher,
            claimed: Mutex::new(HashMap::new()),
        }
    }

    async fn run(&self) -> RunReport {
        let site = &self.config.site;

        let categories = match self.list_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                error!(url = %site, error = %e, "cannot list categories");
                return RunReport::front_page_failed(&e);
            }
        };
        info!(found = categories.len(), "categories listed");

        let selected = select_categories(categories, self.config);
        debug!(categories = ?selected.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), "categories selected");

        let units = plan_units(&selected, self.config.resolutions.iter().copied());

        let units: Vec<UnitReport> = stream::iter(units)
            .map(move |unit| self.process_unit(unit))
            .buffer_unordered(self.config.jobs)
            .collect()
            .await;

        RunReport {
            front_page_error: None,
            categories: selected.into_iter().map(|c| c.name).collect(),
            units,
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>, GrabError> {
        let site = &self.config.site;
        let html = self.fetcher.get_text(site.as_str()).await?;
        extract_categories(&html, site)
    }

    async fn process_unit(&self, unit: Unit) -> UnitReport {
        let mut report = UnitReport {
            category: unit.category.name.clone(),
            resolution: unit.resolution.to_string(),
            pages: 0,
            error: None,
            downloads: Vec::new(),
        };

        let (links, pages) = match self.collect_links(&unit).await {
            Ok(found) => found,
            Err(e) => {
                warn!(category = %report.category, resolution = %report.resolution, error = %e, "listing failed");
                report.error = Some(Failure::from(&e));
                return report;
            }
        };
        report.pages = pages;

        info!(
            category = %report.category,
            resolution = %report.resolution,
            pages,
            images = links.len(),
            "listing processed"
        );

        if links.is_empty() {
            return report;
        }

        let dir = unit_dir(self.config, &unit);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            let e = GrabError::filesystem(&dir, e);
            warn!(category = %report.category, resolution = %report.resolution, error = %e, "cannot create directory");
            report.error = Some(Failure::from(&e));
            return report;
        }

        let dir = dir.as_path();
        report.downloads = stream::iter(links)
            .map(move |url| self.download_one(url, dir))
            .buffer_unordered(self.config.jobs)
            .collect()
            .await;

        report
    }

    /// Walks the unit's listing pages and returns (image links, pages read).
    ///
    /// Only a failure on the first page is an error. A later page that fails
    /// ends the walk with what was found so far.
    async fn collect_links(&self, unit: &Unit) -> Result<(Vec<Url>, usize), GrabError> {
        let mut links = Vec::new();
        let mut seen = HashSet::new();
        let mut visited = HashSet::new();
        let mut next = Some(unit.category.url.clone());
        let mut pages = 0;

        while let Some(page_url) = next.take() {
            if pages >= self.config.max_pages || !visited.insert(page_url.clone()) {
                break;
            }

            let listing = match self.fetch_listing(&page_url, unit).await {
                Ok(listing) => listing,
                Err(e) if pages == 0 => return Err(e),
                Err(e) => {
                    warn!(url = %page_url, error = %e, "stopping at failed listing page");
                    break;
                }
            };
            pages += 1;

            for url in listing.images {
                if seen.insert(url.clone()) {
                    links.push(url);
                }
            }
            next = listing.next_page;
        }

        Ok((links, pages))
    }

    async fn fetch_listing(&self, page_url: &Url, unit: &Unit) -> Result<Listing, GrabError> {
        let html = self.fetcher.get_text(page_url.as_str()).await?;
        extract_listing(&html, page_url, unit.resolution)
    }

    async fn download_one(&self, url: Url, dir: &Path) -> DownloadResult {
        let path = match file_name_from_url(&url) {
            Ok(name) => dir.join(name),
            Err(e) => {
                warn!(url = %url, error = %e, "download failed");
                return DownloadResult::failed(url.as_str(), &e);
            }
        };

        let slot = self.slot(&path);
        let mut taken = slot.lock().await;
        if *taken {
            warn!(url = %url, path = %path.display(), "file name already used in this run, skipping");
            return DownloadResult::skipped(url.as_str(), path, "file name already used in this run");
        }

        match download_to(self.fetcher, &url, &path).await {
            Ok(saved) => {
                *taken = true;
                info!(url = %url, path = %saved.path.display(), bytes = saved.bytes, "downloaded");
                DownloadResult::saved(url.as_str(), saved)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "download failed");
                DownloadResult::failed(url.as_str(), &e)
            }
        }
    }

    /// The slot guarding `path`. A failed download leaves it free for the
    /// next link with the same file name.
    fn slot(&self, path: &Path) -> Arc<AsyncMutex<bool>> {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(claimed.entry(path.to_path_buf()).or_default())
    }
}
