//! Request URL composition for the content-search API.

pub const DEFAULT_ENDPOINT: &str = "https://content.guardianapis.com/search";
pub const DEFAULT_SEARCH_TERM: &str = "LGBT";
pub const DEFAULT_ORDER_BY: &str = "newest";
pub const DEFAULT_PAGE_SIZE: &str = "10";
pub const DEFAULT_API_KEY: &str = "test";

/// Field-inclusion flag asking the API to attach byline data to each result.
const SHOW_FIELDS: &str = "byline";

/// Fully resolved query configuration for one pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySettings {
    pub endpoint: String,
    pub search_term: String,
    pub order_by: String,
    pub page_size: String,
    pub api_key: String,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            search_term: DEFAULT_SEARCH_TERM.to_string(),
            order_by: DEFAULT_ORDER_BY.to_string(),
            page_size: DEFAULT_PAGE_SIZE.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl QuerySettings {
    /// Query parameters in the order they are sent.
    pub fn params(&self) -> [(&'static str, &str); 5] {
        [
            ("q", self.search_term.as_str()),
            ("show-fields", SHOW_FIELDS),
            ("order-by", self.order_by.as_str()),
            ("page-size", self.page_size.as_str()),
            ("api-key", self.api_key.as_str()),
        ]
    }

    pub fn request_url(&self) -> String {
        build_request_url(&self.endpoint, &self.params())
    }
}

/// Partial configuration as read from user preferences or the command line.
///
/// Missing or blank values resolve to the documented defaults, so a request is
/// never built without its order-by and page-size parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub search_term: Option<String>,
    pub order_by: Option<String>,
    pub page_size: Option<String>,
    pub api_key: Option<String>,
}

impl SettingsOverrides {
    /// Layer `other` on top of `self`; values present in `other` win.
    pub fn merged_with(self, other: SettingsOverrides) -> SettingsOverrides {
        SettingsOverrides {
            endpoint: other.endpoint.or(self.endpoint),
            search_term: other.search_term.or(self.search_term),
            order_by: other.order_by.or(self.order_by),
            page_size: other.page_size.or(self.page_size),
            api_key: other.api_key.or(self.api_key),
        }
    }

    pub fn resolve(self) -> QuerySettings {
        let defaults = QuerySettings::default();
        QuerySettings {
            endpoint: pick(self.endpoint, defaults.endpoint),
            search_term: pick(self.search_term, defaults.search_term),
            order_by: pick(self.order_by, defaults.order_by),
            page_size: pick(self.page_size, defaults.page_size),
            api_key: pick(self.api_key, defaults.api_key),
        }
    }
}

fn pick(value: Option<String>, default: String) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Append `params` to `endpoint` as percent-encoded query components.
///
/// Pure string composition: the endpoint is not validated here, a malformed
/// endpoint surfaces later as an invalid-url fetch failure.
pub fn build_request_url(endpoint: &str, params: &[(&str, &str)]) -> String {
    let endpoint = endpoint.trim();
    if params.is_empty() {
        return endpoint.to_string();
    }

    let mut url = endpoint.trim_end_matches(['?', '&']).to_string();
    let mut separator = if url.contains('?') { '&' } else { '?' };

    for (name, value) in params {
        url.push(separator);
        url.push_str(&urlencoding::encode(name));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
        separator = '&';
    }
    url
}
