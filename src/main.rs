// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap (bad input exits here)
// 2. Set up logging at the requested verbosity
// 3. Build the configuration and the shared HTTP client
// 4. Run the grabber and print what happened
// 5. Exit with the proper code
//
// Exit codes:
//   0 = run completed (individual failures are logged, not fatal)
//   1 = something failed and --strict was given
//   2 = bad arguments (from clap) or an unexpected internal error
//
// Rust concepts used:
// - async/await: every page and image is fetched concurrently
// - Result<T, E>: for error handling
// =============================================================================

mod cli;
mod config;
mod download;
mod error;
mod fetch;
mod grab;
mod parse;
mod resolution;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::Config;
use fetch::Fetcher;
use grab::{RunReport, Summary};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// A single-threaded runtime: all the concurrency comes from interleaving
// futures at I/O points, never from extra threads
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // Parse first, so --help and usage errors never touch logging or the network
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from(cli);
    debug!(verbose = config.verbosity, "arg --verbose");
    debug!(output = %config.output.display(), "arg --output");
    debug!(categories = ?config.categories, "arg --category");
    debug!(resolutions = ?config.resolutions.iter().map(ToString::to_string).collect::<Vec<_>>(), "arg --resolution");
    debug!(timeout = ?config.timeout, jobs = config.jobs, site = %config.site, "run settings");

    let fetcher = Fetcher::new(config.timeout, config.jobs)?;
    let report = grab::grab(&config, &fetcher).await;

    print_results(&report, config.json)?;

    Ok(exit_code(&report, config.strict))
}

// Failures only change the exit code under --strict
fn exit_code(report: &RunReport, strict: bool) -> i32 {
    if strict && report.has_failures() {
        1
    } else {
        0
    }
}

// 0 -> warnings and errors, 1 -> info, 2+ -> debug
// RUST_LOG wins over -v when it is set
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .init();
}

// Prints the report either as a summary or JSON
fn print_results(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    let summary: Summary = report.summary();

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("{:<60} {:<12} {}", "WHAT", "KIND", "MESSAGE");
        println!("{}", "=".repeat(100));
        for (what, failure) in failures {
            // Truncate long URLs for display
            let what = if what.chars().count() > 57 {
                format!("{}...", what.chars().take(57).collect::<String>())
            } else {
                what.to_string()
            };
            println!("{:<60} {:<12} {}", what, failure.kind.to_string(), failure.message);
        }
        println!();
    }

    println!("📊 Summary:");
    println!("   📂 Categories: {}", report.categories.len());
    println!("   ✅ Saved: {} ({} bytes)", summary.saved, summary.bytes);
    println!("   ⏭️  Skipped: {}", summary.skipped);
    println!("   ❌ Failed: {}", summary.failed);
    if summary.failed_units > 0 {
        println!("   ⚠️  Failed listings: {}", summary.failed_units);
    }
    println!("   📋 Total: {}", summary.total());
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::GrabError;
    use grab::{DownloadResult, UnitReport};

    fn front_page_down() -> RunReport {
        RunReport::front_page_failed(&GrabError::HttpStatus {
            url: "http://example.com/".to_string(),
            status: 503,
        })
    }

    fn download_failed() -> RunReport {
        let err = GrabError::HttpStatus {
            url: "http://example.com/a.jpg".to_string(),
            status: 500,
        };
        RunReport {
            categories: vec!["Space".to_string()],
            units: vec![UnitReport {
                category: "Space".to_string(),
                resolution: "2560x1440".to_string(),
                pages: 1,
                error: None,
                downloads: vec![DownloadResult::failed("http://example.com/a.jpg", &err)],
            }],
            ..RunReport::default()
        }
    }

    #[test]
    fn test_failures_exit_zero_by_default() {
        assert_eq!(exit_code(&download_failed(), false), 0);
        assert_eq!(exit_code(&front_page_down(), false), 0);
    }

    #[test]
    fn test_strict_turns_failures_into_exit_one() {
        assert_eq!(exit_code(&download_failed(), true), 1);
        assert_eq!(exit_code(&front_page_down(), true), 1);
    }

    #[test]
    fn test_clean_run_exits_zero_even_when_strict() {
        assert_eq!(exit_code(&RunReport::default(), true), 0);
        assert_eq!(exit_code(&RunReport::default(), false), 0);
    }
}
