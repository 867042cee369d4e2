//! Dashboard settings, read from an optional JSON file and command-line flags

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use crate::errors::Error;

/// Units expected per day when no target is configured
pub const DEFAULT_DAILY_TARGET: u32 = 200;
/// Units expected over the whole sheet when no target is configured
pub const DEFAULT_PERIOD_TARGET: u32 = 800;
/// Product lines broken out individually when none are configured
pub const DEFAULT_TRACKED_PRODUCTS: [&str; 3] = ["Chasis", "Cushion", "Headrest"];

/// How results are written to stdout
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// The full [`Summary`](crate::types::Summary) as JSON
    Json,
    /// One CSV row per tracked product
    Csv,
}

/// Where the sheet is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A Google Sheets link, either the edit link or an export link
    Sheet(Url),
    /// A CSV file on disk
    File(PathBuf),
}

impl FromStr for Source {
    type Err = Error;

    /// Links must point at `docs.google.com/spreadsheets`; anything that isn't a
    /// link is taken as a file path.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::InvalidSource("no source given".to_string()));
        }
        let lowered = value.to_lowercase();
        if !(lowered.starts_with("http://") || lowered.starts_with("https://")) {
            return Ok(Self::File(PathBuf::from(value)));
        }
        let url = Url::parse(value).map_err(|err| Error::InvalidSource(format!("{value}: {err}")))?;
        if url.host_str() != Some("docs.google.com") || !url.path().starts_with("/spreadsheets") {
            return Err(Error::InvalidSource(value.to_string()));
        }
        Ok(Self::Sheet(url))
    }
}

/// Command-line arguments. Anything given here overrides `--config`.
#[derive(Parser, Debug, Default)]
#[command(version, about = "Production dashboard for a Google Sheets CSV export")]
pub struct Args {
    /// Google Sheets link or path to a CSV file
    pub source: Option<String>,

    /// JSON file with targets, tracked products and defaults for the other flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output written after each load
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Reload every SECS seconds instead of loading once
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub watch: Option<u64>,
}

/// Everything a dashboard run can be told
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sheet link or CSV path
    pub source: Option<String>,
    /// Units expected on the latest day
    pub daily_target: Decimal,
    /// Units expected across the whole sheet
    pub period_target: Decimal,
    /// Product lines shown individually, in display order
    pub tracked_products: Vec<String>,
    /// Output written after each load
    pub output: OutputFormat,
    /// Reload interval in seconds; a single load when unset
    pub watch_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            daily_target: Decimal::from(DEFAULT_DAILY_TARGET),
            period_target: Decimal::from(DEFAULT_PERIOD_TARGET),
            tracked_products: DEFAULT_TRACKED_PRODUCTS
                .iter()
                .map(ToString::to_string)
                .collect(),
            output: OutputFormat::default(),
            watch_secs: None,
        }
    }
}

impl Config {
    /// Loads a JSON configuration file. Missing keys take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|err| Error::Config(format!("can't open {}: {err}", path.display())))?;
        serde_json::from_reader(BufReader::new(file)).map_err(Error::ConfigFile)
    }

    /// Builds the configuration from parsed command-line arguments, on top of
    /// the `--config` file when one is given.
    pub fn from_args(args: Args) -> Result<Self, Error> {
        let mut config = match &args.config {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        if args.source.is_some() {
            config.source = args.source;
        }
        if let Some(output) = args.format {
            config.output = output;
        }
        if args.watch.is_some() {
            config.watch_secs = args.watch;
        }
        if config.watch_secs == Some(0) {
            return Err(Error::Config("watch_secs must be at least 1 second".to_string()));
        }
        Ok(config)
    }

    /// Parses the configured source
    pub fn source(&self) -> Result<Source, Error> {
        self.source
            .as_deref()
            .ok_or_else(|| Error::InvalidSource("no sheet URL or CSV file given".to_string()))?
            .parse()
    }

    /// How long to wait between reloads, if reloading is enabled
    #[must_use]
    pub fn watch_interval(&self) -> Option<Duration> {
        self.watch_secs.map(Duration::from_secs)
    }
}
