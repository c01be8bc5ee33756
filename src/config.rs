// src/config.rs
// =============================================================================
// The run configuration.
//
// Built once from the parsed command line and only read afterwards. Every
// component gets a reference to it instead of looking at globals.
// =============================================================================

use crate::cli::Cli;
use crate::resolution::Resolution;
use clap::ValueEnum;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where downloaded files land inside the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Every file directly in the output directory
    Flat,
    /// <output>/<category>/<resolution>/<file>
    Nested,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub site: Url,
    pub output: PathBuf,
    pub verbosity: u8,
    /// Category name filters; empty means every category
    pub categories: BTreeSet<String>,
    /// Never empty, clap requires at least one -r
    pub resolutions: BTreeSet<Resolution>,
    pub timeout: Duration,
    pub jobs: usize,
    pub max_pages: usize,
    pub layout: Layout,
    pub json: bool,
    pub strict: bool,
}

impl Config {
    /// Configuration with defaults for everything but the site, output
    /// directory and resolutions.
    pub fn new(site: Url, output: impl Into<PathBuf>, resolutions: impl IntoIterator<Item = Resolution>) -> Self {
        Self {
            site,
            output: output.into(),
            verbosity: 0,
            categories: BTreeSet::new(),
            resolutions: resolutions.into_iter().collect(),
            timeout: Duration::from_secs(10),
            jobs: 4,
            max_pages: 1,
            layout: Layout::Flat,
            json: false,
            strict: false,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories
            .into_iter()
            .map(|c| Into::<String>::into(c).trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    /// Case-insensitive category filter check.
    pub fn wants_category(&self, name: &str) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        let name = name.trim().to_lowercase();
        self.categories.iter().any(|c| c.to_lowercase() == name)
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let mut config = Config::new(cli.site, cli.output, cli.resolutions).with_categories(cli.categories);
        config.verbosity = cli.verbose;
        config.timeout = cli.timeout;
        config.jobs = usize::from(cli.jobs);
        config.max_pages = cli.max_pages as usize;
        config.layout = cli.layout;
        config.json = cli.json;
        config.strict = cli.strict;
        config
    }
}
