//! # Runtime configuration
//!
//! Settings are resolved from command-line flags first, then environment
//! variables (a `.env` file in the working directory is loaded beforehand):
//!
//! - `MONGODB_URI`, `DATABASE_URL` or `MONGODB_URL`: MongoDB connection string
//! - `RUST_LOG`: log filter, defaults to `info`

use clap::ArgMatches;
use std::{env, str::FromStr};

use crate::errors::{Result, ViewerError};

pub const DEFAULT_DATABASE: &str = "taipan_benchmarks";
pub const DEFAULT_COLLECTION: &str = "cpu_benchmarks";

const URI_VARS: [&str; 3] = ["MONGODB_URI", "DATABASE_URL", "MONGODB_URL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(ViewerError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub cpu_model: Option<String>,
    pub format: OutputFormat,
}

impl Settings {
    /// Builds settings from the top-level matches and, when present, the
    /// matches of the `show` subcommand.
    pub fn from_matches(matches: &ArgMatches, show: Option<&ArgMatches>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let uri = match matches.get_one::<String>("uri") {
            Some(uri) => uri.clone(),
            None => uri_from_env(|name| env::var(name).ok())?,
        };

        let format = match show.and_then(|m| m.get_one::<String>("format")) {
            Some(format) => format.parse()?,
            None => OutputFormat::default(),
        };

        Ok(Self {
            uri,
            database: string_or(matches, "database", DEFAULT_DATABASE),
            collection: string_or(matches, "collection", DEFAULT_COLLECTION),
            cpu_model: show.and_then(|m| m.get_one::<String>("cpu-model").cloned()),
            format,
        })
    }
}

fn string_or(matches: &ArgMatches, id: &str, default: &str) -> String {
    matches
        .get_one::<String>(id)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// First non-empty connection string among the supported variables.
pub fn uri_from_env<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    URI_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
        .ok_or(ViewerError::MissingUri)
}
