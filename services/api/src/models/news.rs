//! News models for the API client

use chrono::{DateTime, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend identifier of a news item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NewsId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NewsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsId::Number(n) => write!(f, "{}", n),
            NewsId::Text(s) => f.write_str(s),
        }
    }
}

/// News item model
///
/// Only `id` is required. Items with a missing or null field are kept so
/// one malformed entry does not fail the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: NewsId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Raw provider domain, e.g. "nytimes.com"
    #[serde(default)]
    pub source: Option<String>,
    /// Timestamp as sent by the backend
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Response for news listing
#[derive(Debug, Clone, Deserialize)]
pub struct NewsListResponse {
    pub results: Vec<NewsItem>,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

impl NewsItem {
    /// Title, or the empty string when the backend sent none
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Publish time in the viewer's timezone `tz`
    ///
    /// RFC 3339 timestamps carry their own offset. Naive timestamps are
    /// read as wall-clock time in `tz`.
    pub fn published_at_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let raw = self.published_at.as_deref()?.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(tz));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .and_then(|naive| tz.from_local_datetime(&naive).earliest())
    }

    /// Local calendar date of publication as `YYYY-MM-DD`
    pub fn published_date_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: fmt::Display,
    {
        self.published_at_in(tz)
            .map(|at| at.format("%Y-%m-%d").to_string())
    }

    /// Publish time for display, e.g. "15 Feb 2025 15:38"
    pub fn format_published_at_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: fmt::Display,
    {
        self.published_at_in(tz)
            .map(|at| at.format("%d %b %Y %H:%M").to_string())
    }
}

/// Human-facing news source label
///
/// Each label corresponds to exactly one backend domain. The table is fixed;
/// backend domains outside it have no label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLabel {
    NewYorkTimes,
    TheGuardian,
    NewsApi,
}

impl SourceLabel {
    /// All labels in display order
    pub const ALL: [SourceLabel; 3] = [
        SourceLabel::NewYorkTimes,
        SourceLabel::TheGuardian,
        SourceLabel::NewsApi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SourceLabel::NewYorkTimes => "New York Times",
            SourceLabel::TheGuardian => "The Guardian",
            SourceLabel::NewsApi => "NewsAPI",
        }
    }

    pub fn domain(self) -> &'static str {
        match self {
            SourceLabel::NewYorkTimes => "nytimes.com",
            SourceLabel::TheGuardian => "guardianapis.com",
            SourceLabel::NewsApi => "newsapi.org",
        }
    }

    /// Look up a label by its exact display text
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Look up a label by backend domain, ignoring case
    pub fn from_domain(domain: &str) -> Option<Self> {
        let domain = domain.to_lowercase();
        Self::ALL.into_iter().find(|s| s.domain() == domain)
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for text that names no known source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown news source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for SourceLabel {
    type Err = UnknownSource;

    /// Accepts either the display label or the backend domain
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .or_else(|| Self::from_domain(s))
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}
