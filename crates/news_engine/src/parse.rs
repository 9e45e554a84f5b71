//! Extraction of article records from a content-search JSON response.
//!
//! Parsing never fails: a broken document produces an empty list plus a
//! [`ParseDiagnostic`] explaining why.

use news_core::ArticleRecord;
use news_logging::{news_debug, news_error, news_warn};
use serde_json::{Map, Value};

/// Separator the API uses when it embeds the byline in the headline.
const TITLE_BYLINE_SEPARATOR: &str = " | ";
/// Length of the `YYYY-MM-DD` prefix of an ISO-8601 timestamp.
const DATE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDiagnostic {
    /// The body is not valid JSON.
    MalformedJson(String),
    /// `response.results` is missing or not an array.
    MissingResults,
    /// A single result was skipped.
    EntryDropped { index: usize, reason: DropReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    NotAnObject,
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseReport {
    pub records: Vec<ArticleRecord>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParseReport {
    pub fn is_malformed(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, ParseDiagnostic::MalformedJson(_)))
    }
}

pub trait ResponseParser: Send + Sync {
    fn parse(&self, raw: Option<&str>) -> ParseReport;
}

/// Parser for the Guardian content API `search` response shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct GuardianResponseParser;

impl ResponseParser for GuardianResponseParser {
    fn parse(&self, raw: Option<&str>) -> ParseReport {
        parse_report(raw)
    }
}

/// Parse `raw` and return only the records.
pub fn parse_articles(raw: Option<&str>) -> Vec<ArticleRecord> {
    parse_report(raw).records
}

/// Parse `raw`, returning records in source order together with diagnostics.
pub fn parse_report(raw: Option<&str>) -> ParseReport {
    let mut report = ParseReport::default();
    let raw = match raw {
        Some(text) if !text.is_empty() => text,
        _ => return report,
    };

    let root: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            news_error!("Problem parsing the news JSON results: {}", err);
            report
                .diagnostics
                .push(ParseDiagnostic::MalformedJson(err.to_string()));
            return report;
        }
    };

    let Some(results) = root
        .get("response")
        .and_then(|response| response.get("results"))
        .and_then(Value::as_array)
    else {
        news_warn!("Response has no response.results array");
        report.diagnostics.push(ParseDiagnostic::MissingResults);
        return report;
    };

    report.records.reserve(results.len());
    for (index, item) in results.iter().enumerate() {
        match extract_record(item) {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                news_debug!("Dropping result {}: {:?}", index, reason);
                report
                    .diagnostics
                    .push(ParseDiagnostic::EntryDropped { index, reason });
            }
        }
    }
    report
}

fn extract_record(item: &Value) -> Result<ArticleRecord, DropReason> {
    let item = item.as_object().ok_or(DropReason::NotAnObject)?;

    let title = required_str(item, "webTitle")?;
    let title = match title.find(TITLE_BYLINE_SEPARATOR) {
        Some(pos) => &title[..pos],
        None => title,
    };
    let section = required_str(item, "sectionName")?;
    let url = required_str(item, "webUrl")?;

    let author = item
        .get("fields")
        .and_then(|fields| fields.get("byline"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let published_date: String = item
        .get("webPublicationDate")
        .and_then(Value::as_str)
        .map(|date| date.chars().take(DATE_LEN).collect())
        .unwrap_or_default();

    Ok(ArticleRecord::new(title, section, url, author, published_date))
}

fn required_str<'a>(
    item: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DropReason> {
    item.get(field)
        .and_then(Value::as_str)
        .ok_or(DropReason::MissingField(field))
}
