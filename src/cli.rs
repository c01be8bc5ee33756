// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Everything that can be wrong with the arguments is caught here, before any
// network activity:
// - -r/--resolution is required and must look like 2560x1440
// - -t/--timeout must be a positive number of seconds
// - -o/--output must be an existing directory
//
// clap prints the usage text and exits with a non-zero code on any of these.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - value_parser: a plain function that turns a &str into a typed value
// =============================================================================

use crate::config::Layout;
use crate::resolution::Resolution;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default front page the grabber starts from.
pub const DEFAULT_SITE: &str = "http://wallpaperswide.com/";

#[derive(Parser, Debug)]
#[command(
    name = "getwide",
    version,
    about = "WallpapersWide.com content grabber",
    long_about = "getwide lists the categories on a wallpaper site, picks the ones you ask for \
                  and downloads every wallpaper offered in the requested resolutions."
)]
pub struct Cli {
    /// Log verbosity; repeat for more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory to save files into (must already exist)
    #[arg(short, long, value_name = "PATH", default_value = ".", value_parser = parse_output_dir)]
    pub output: PathBuf,

    /// Only process this category; repeat for several (default: all)
    #[arg(short = 'c', long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Grab this resolution, e.g. 2560x1440; repeat for several
    #[arg(short = 'r', long = "resolution", value_name = "WxH", required = true)]
    pub resolutions: Vec<Resolution>,

    /// Per-request timeout in seconds (decimals allowed)
    #[arg(short, long, value_name = "SECONDS", default_value = "10", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Front page of the site to grab from
    #[arg(long, value_name = "URL", default_value = DEFAULT_SITE)]
    pub site: Url,

    /// Maximum number of network operations in flight at once
    #[arg(short = 'j', long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=64))]
    pub jobs: u8,

    /// Follow rel="next" links on category listings for up to this many pages
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: u32,

    /// How files are arranged in the output directory
    #[arg(long, value_enum, default_value_t = Layout::Flat)]
    pub layout: Layout,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Exit with code 1 if any download or listing failed
    #[arg(long)]
    pub strict: bool,
}

fn parse_output_dir(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("invalid output path given: '{raw}' is not an existing directory"))
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;

    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be a positive number of seconds, got '{raw}'"));
    }

    Duration::try_from_secs_f64(secs).map_err(|_| format!("timeout '{raw}' is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_missing_resolution_is_an_error() {
        let err = Cli::try_parse_from(["getwide"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["getwide", "-c", "Space"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["getwide", "-r", "2560x1440"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.output, PathBuf::from("."));
        assert!(cli.categories.is_empty());
        assert_eq!(cli.resolutions, vec![Resolution::new(2560, 1440)]);
        assert_eq!(cli.timeout, Duration::from_secs(10));
        assert_eq!(cli.site.as_str(), DEFAULT_SITE);
        assert_eq!(cli.jobs, 4);
        assert_eq!(cli.max_pages, 1);
        assert_eq!(cli.layout, Layout::Flat);
        assert!(!cli.json);
        assert!(!cli.strict);
    }

    #[test]
    fn test_repeatable_options() {
        let cli = Cli::try_parse_from([
            "getwide", "-vv", "-r", "2560x1440", "--resolution", "1920x1080", "-c", "Girls",
            "--category", "Space",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.resolutions.len(), 2);
        assert_eq!(cli.categories, vec!["Girls", "Space"]);
    }

    #[test]
    fn test_decimal_timeout() {
        let cli = Cli::try_parse_from(["getwide", "-r", "800x600", "-t", "2.5"]).unwrap();
        assert_eq!(cli.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        for bad in ["abc", "0", "-1", "inf", "1e300"] {
            let arg = format!("--timeout={bad}");
            let err = Cli::try_parse_from(["getwide", "-r", "800x600", arg.as_str()]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "timeout {bad:?}");
        }
    }

    #[test]
    fn test_bad_resolution_is_rejected() {
        let err = Cli::try_parse_from(["getwide", "-r", "2560x1440x32"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_output_must_be_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = Cli::try_parse_from(["getwide", "-r", "800x600", "-o", missing.to_str().unwrap()])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["getwide", "-r", "800x600", "-o", dir.path().to_str().unwrap()])
            .unwrap();
        assert_eq!(cli.output, dir.path());
    }

    #[test]
    fn test_help_exits_early() {
        let err = Cli::try_parse_from(["getwide", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_nested_layout_flag() {
        let cli = Cli::try_parse_from(["getwide", "-r", "800x600", "--layout", "nested"]).unwrap();
        assert_eq!(cli.layout, Layout::Nested);
    }
}
