// src/error.rs
// =============================================================================
// Error types for everything that can go wrong after the command line has
// been parsed.
//
// Argument errors never show up here: clap rejects bad input and exits
// before any network activity happens. Every error below is caught at the
// smallest unit of work (one page, one download) and logged, so a single
// failure never stops the rest of the run.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[source]: chains the underlying error so callers can inspect it
// =============================================================================

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching, parsing or saving content.
#[derive(Debug, Error)]
pub enum GrabError {
    /// Connection failed, the body could not be read, etc.
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The per-request timeout elapsed before the request completed.
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// The URL cannot be parsed or has no usable file name.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The page is empty or has no recognizable structure.
    #[error("cannot parse {url}: {reason}")]
    Parse { url: String, reason: String },

    /// Creating, writing or renaming a file failed.
    #[error("IO error writing {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse error categories, used in the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Parse,
    Filesystem,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Parse => "parse",
            Self::Filesystem => "filesystem",
        };
        f.write_str(name)
    }
}

impl GrabError {
    /// Wraps a reqwest error, telling timeouts apart from other failures.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    pub fn parse(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::InvalidUrl { .. } => ErrorKind::Network,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
        }
    }
}
