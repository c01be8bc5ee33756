// src/grab/report.rs
// =============================================================================
// What happened during a run.
//
// Nothing here is persisted. The report is printed as a summary at the end
// of the run, or serialized to JSON with --json.
// =============================================================================

use crate::download::SavedImage;
use crate::error::{ErrorKind, GrabError};
use serde::Serialize;
use std::path::PathBuf;

/// An error flattened into something printable and serializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&GrabError> for Failure {
    fn from(err: &GrabError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadStatus {
    Saved { path: PathBuf, bytes: u64 },
    /// Another download already claimed the same destination file
    Skipped { path: PathBuf, reason: String },
    Failed(Failure),
}

/// Outcome of downloading one image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    pub url: String,
    #[serde(flatten)]
    pub status: DownloadStatus,
}

impl DownloadResult {
    pub fn saved(url: impl Into<String>, saved: SavedImage) -> Self {
        Self {
            url: url.into(),
            status: DownloadStatus::Saved {
                path: saved.path,
                bytes: saved.bytes,
            },
        }
    }

    pub fn skipped(url: impl Into<String>, path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: DownloadStatus::Skipped {
                path,
                reason: reason.into(),
            },
        }
    }

    pub fn failed(url: impl Into<String>, err: &GrabError) -> Self {
        Self {
            url: url.into(),
            status: DownloadStatus::Failed(err.into()),
        }
    }
}

/// Outcome of one (category, resolution) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub category: String,
    pub resolution: String,
    /// Listing pages fetched successfully
    pub pages: usize,
    /// Set when the listing itself could not be fetched or parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Failure>,
    pub downloads: Vec<DownloadResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_page_error: Option<Failure>,
    /// Categories that survived the filter
    pub categories: Vec<String>,
    pub units: Vec<UnitReport>,
}

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failed_units: usize,
    pub bytes: u64,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.failed
    }
}

impl RunReport {
    pub fn front_page_failed(err: &GrabError) -> Self {
        Self {
            front_page_error: Some(err.into()),
            ..Self::default()
        }
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();

        for unit in &self.units {
            if unit.error.is_some() {
                summary.failed_units += 1;
            }
            for download in &unit.downloads {
                match &download.status {
                    DownloadStatus::Saved { bytes, .. } => {
                        summary.saved += 1;
                        summary.bytes += bytes;
                    }
                    DownloadStatus::Skipped { .. } => summary.skipped += 1,
                    DownloadStatus::Failed(_) => summary.failed += 1,
                }
            }
        }

        summary
    }

    /// True if the front page, any listing or any download failed.
    pub fn has_failures(&self) -> bool {
        let summary = self.summary();
        self.front_page_error.is_some() || summary.failed > 0 || summary.failed_units > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &Failure)> {
        let front = self
            .front_page_error
            .iter()
            .map(|f| ("front page", f));
        let units = self
            .units
            .iter()
            .filter_map(|u| u.error.as_ref().map(|f| (u.category.as_str(), f)));
        let downloads = self.units.iter().flat_map(|u| {
            u.downloads.iter().filter_map(|d| match &d.status {
                DownloadStatus::Failed(f) => Some((d.url.as_str(), f)),
                _ => None,
            })
        });

        front.chain(units).chain(downloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(downloads: Vec<DownloadResult>, error: Option<Failure>) -> UnitReport {
        UnitReport {
            category: "Space".to_string(),
            resolution: "2560x1440".to_string(),
            pages: 1,
            error,
            downloads,
        }
    }

    fn network_failure() -> GrabError {
        GrabError::HttpStatus {
            url: "http://example.com/b.jpg".to_string(),
            status: 503,
        }
    }

    #[test]
    fn test_summary_counts_each_status() {
        let report = RunReport {
            front_page_error: None,
            categories: vec!["Space".to_string()],
            units: vec![unit(
                vec![
                    DownloadResult::saved(
                        "http://example.com/a.jpg",
                        SavedImage {
                            path: PathBuf::from("a.jpg"),
                            bytes: 10,
                        },
                    ),
                    DownloadResult::failed("http://example.com/b.jpg", &network_failure()),
                    DownloadResult::skipped("http://example.com/x/a.jpg", PathBuf::from("a.jpg"), "duplicate"),
                ],
                None,
            )],
        };

        let summary = report.summary();
        assert_eq!(summary.saved, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.bytes, 10);
        assert_eq!(summary.total(), 3);
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_clean_run_has_no_failures() {
        let report = RunReport {
            categories: vec!["Space".to_string()],
            units: vec![unit(Vec::new(), None)],
            ..RunReport::default()
        };
        assert!(!report.has_failures());
    }

    #[test]
    fn test_failed_listing_counts_as_failure() {
        let err = GrabError::parse("http://example.com/space.html", "empty document");
        let report = RunReport {
            units: vec![unit(Vec::new(), Some((&err).into()))],
            ..RunReport::default()
        };
        assert_eq!(report.summary().failed_units, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_json_shape() {
        let result = DownloadResult::failed("http://example.com/b.jpg", &network_failure());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["url"], "http://example.com/b.jpg");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "network");
    }

    #[test]
    fn test_front_page_failure() {
        let report = RunReport::front_page_failed(&network_failure());
        assert!(report.has_failures());
        assert!(report.units.is_empty());
        assert_eq!(report.failures().next().unwrap().0, "front page");
    }
}
