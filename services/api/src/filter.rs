//! Client-side news filtering
//!
//! Narrows a fetched news collection by title, publish date and source. An
//! empty criterion matches every item, and the surviving items keep their
//! input order.

use chrono::{Local, TimeZone};
use std::fmt::Display;

use crate::models::news::{NewsItem, SourceLabel};

/// View-local filter inputs; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive title substring
    pub search_term: String,
    /// Local publish date as `YYYY-MM-DD`
    pub date_filter: String,
    /// Source display label, e.g. "The Guardian"
    pub source_filter: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date_filter = date.into();
        self
    }

    pub fn with_source(mut self, source: SourceLabel) -> Self {
        self.source_filter = source.label().to_string();
        self
    }

    /// Whether no criterion is set
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.date_filter.is_empty() && self.source_filter.is_empty()
    }
}

/// Filter `items` using the viewer's local timezone for dates
pub fn filter_news(items: &[NewsItem], criteria: &FilterCriteria) -> Vec<NewsItem> {
    filter_news_in(items, criteria, &Local)
}

/// Filter `items`, reading publish dates in `tz`
pub fn filter_news_in<Tz>(items: &[NewsItem], criteria: &FilterCriteria, tz: &Tz) -> Vec<NewsItem>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    items
        .iter()
        .filter(|item| matches(item, criteria, tz))
        .cloned()
        .collect()
}

/// Whether `item` satisfies every criterion
pub fn matches<Tz>(item: &NewsItem, criteria: &FilterCriteria, tz: &Tz) -> bool
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    matches_title(item, &criteria.search_term)
        && matches_date(item, &criteria.date_filter, tz)
        && matches_source(item, &criteria.source_filter)
}

pub fn matches_title(item: &NewsItem, search_term: &str) -> bool {
    item.title_or_empty()
        .to_lowercase()
        .contains(&search_term.to_lowercase())
}

pub fn matches_date<Tz>(item: &NewsItem, date_filter: &str, tz: &Tz) -> bool
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if date_filter.is_empty() {
        return true;
    }

    item.published_date_in(tz)
        .is_some_and(|date| date == date_filter)
}

/// Unknown labels and items without a source never match a set filter
pub fn matches_source(item: &NewsItem, source_filter: &str) -> bool {
    if source_filter.is_empty() {
        return true;
    }

    let Some(expected) = SourceLabel::from_label(source_filter) else {
        return false;
    };

    item.source
        .as_deref()
        .is_some_and(|source| source.to_lowercase() == expected.domain())
}
