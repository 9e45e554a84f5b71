use std::fs;
use std::path::Path;

use news_core::SettingsOverrides;
use news_logging::{news_debug, news_info, news_warn};
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "newsfeed.ron";

/// On-disk preferences. Every field is optional; unset fields fall back to
/// the query defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    endpoint: Option<String>,
    search_term: Option<String>,
    order_by: Option<String>,
    page_size: Option<PageSize>,
    api_key: Option<String>,
}

/// Page size may be written either as a number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PageSize {
    Number(u32),
    Text(String),
}

impl From<SettingsFile> for SettingsOverrides {
    fn from(file: SettingsFile) -> Self {
        SettingsOverrides {
            endpoint: file.endpoint,
            search_term: file.search_term,
            order_by: file.order_by,
            page_size: file.page_size.map(|size| match size {
                PageSize::Number(n) => n.to_string(),
                PageSize::Text(text) => text,
            }),
            api_key: file.api_key,
        }
    }
}

/// Read preferences from `path`. Never fails: a missing, unreadable or
/// malformed file yields empty overrides.
pub fn load_settings(path: &Path) -> SettingsOverrides {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            news_debug!("No settings file at {:?}; using defaults", path);
            return SettingsOverrides::default();
        }
        Err(err) => {
            news_warn!("Failed to read settings from {:?}: {}", path, err);
            return SettingsOverrides::default();
        }
    };

    let file: SettingsFile = match ron::from_str(&content) {
        Ok(file) => file,
        Err(err) => {
            news_warn!("Failed to parse settings from {:?}: {}", path, err);
            return SettingsOverrides::default();
        }
    };

    news_info!("Loaded settings from {:?}", path);
    file.into()
}
