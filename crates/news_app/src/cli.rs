use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use news_core::SettingsOverrides;
use news_engine::FetchSettings;
use news_logging::{LevelFilter, LogDestination};

use crate::settings::DEFAULT_SETTINGS_FILE;

/// Fetch the latest articles from the Guardian content API.
#[derive(Debug, Clone, Parser)]
#[command(name = "newsfeed", version, about)]
pub struct Cli {
    /// RON settings file; a missing file means defaults.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Search endpoint of the content API.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Search term.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Result ordering: newest, oldest or relevance.
    #[arg(long)]
    pub order_by: Option<String>,

    /// Number of articles per page.
    #[arg(long)]
    pub page_size: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long, default_value_t = 15)]
    pub connect_timeout_secs: u64,

    #[arg(long, default_value_t = 10)]
    pub read_timeout_secs: u64,

    /// Upper bound for the whole request.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Assume the network is up instead of probing the API host first.
    #[arg(long)]
    pub skip_connectivity_check: bool,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            endpoint: self.endpoint.clone(),
            search_term: self.query.clone(),
            order_by: self.order_by.clone(),
            page_size: self.page_size.clone(),
            api_key: self.api_key.clone(),
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            request_timeout: Duration::from_secs(self.timeout_secs),
            ..FetchSettings::default()
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}
