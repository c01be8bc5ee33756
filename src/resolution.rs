// src/resolution.rs
// =============================================================================
// A screen resolution such as "2560x1440".
//
// Resolutions are used twice: clap parses them from -r/--resolution, and the
// page parser uses them to decide whether a link belongs to the requested
// size. Both go through the same FromStr impl, so "2560x1440x32" is rejected
// on the command line for the same reason it never matches a link.
// =============================================================================

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pixel dimensions, written as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid resolution '{0}', expected WIDTHxHEIGHT (e.g. 2560x1440)")]
pub struct ResolutionError(String);

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when `token` spells exactly this resolution.
    ///
    /// A token with anything extra ("2560x1440x32", "12560x1440") is a
    /// different token, not a partial match.
    pub fn matches_token(&self, token: &str) -> bool {
        token.parse::<Resolution>().map_or(false, |r| r == *self)
    }
}

impl FromStr for Resolution {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolutionError(s.to_string());

        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;

        // u32::from_str accepts a leading '+', we don't
        if !is_digits(w) || !is_digits(h) {
            return Err(invalid());
        }

        let width: u32 = w.parse().map_err(|_| invalid())?;
        let height: u32 = h.parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self::new(width, height))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
