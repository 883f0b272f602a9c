//! News view

use chrono::{Local, TimeZone};
use std::fmt::{Display, Write};
use tracing::{info, warn};

use api::filter::{FilterCriteria, filter_news, filter_news_in};
use api::models::news::NewsItem;
use auth::{GateDecision, guard_protected};

use super::{Entry, NEWS_FETCH_FAILED, NO_MATCHING_NEWS};
use crate::state::PortalState;

/// Fetched news with the view-local filter
#[derive(Debug, Clone, Default)]
pub struct NewsView {
    items: Vec<NewsItem>,
    criteria: FilterCriteria,
    banner: Option<String>,
}

impl NewsView {
    /// Enter the view and fetch the news
    ///
    /// Without a session nothing is fetched and the visitor is redirected
    /// to login.
    pub async fn enter(state: &PortalState) -> Entry<Self> {
        if let GateDecision::Redirect(view) = guard_protected(state.store.as_ref()) {
            return Entry::Redirected(view);
        }

        let mut view = Self::default();
        view.refresh(state).await;
        Entry::Entered(view)
    }

    /// Replace the collection with a fresh fetch
    ///
    /// On failure the collection is emptied and the banner is set.
    pub async fn refresh(&mut self, state: &PortalState) {
        self.banner = None;

        match state.gateway.list_news().await {
            Ok(items) => {
                info!("Fetched {} news items", items.len());
                self.items = items;
            }
            Err(e) => {
                warn!("Failed to fetch news: {}", e);
                self.items.clear();
                self.banner = Some(NEWS_FETCH_FAILED.to_string());
            }
        }
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Page-level error message
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Items passing the current filter, in the viewer's timezone
    pub fn visible(&self) -> Vec<NewsItem> {
        filter_news(&self.items, &self.criteria)
    }

    pub fn visible_in<Tz>(&self, tz: &Tz) -> Vec<NewsItem>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        filter_news_in(&self.items, &self.criteria, tz)
    }

    pub fn render(&self) -> String {
        self.render_in(&Local)
    }

    /// Plain-text rendering of the banner and the visible items
    pub fn render_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut out = String::new();
        if let Some(banner) = self.banner() {
            let _ = writeln!(out, "! {}", banner);
        }

        let visible = self.visible_in(tz);
        if visible.is_empty() {
            let _ = writeln!(out, "{}", NO_MATCHING_NEWS);
            return out;
        }

        for item in &visible {
            // Unparseable timestamps are shown as sent
            let published = item
                .format_published_at_in(tz)
                .or_else(|| item.published_at.clone())
                .unwrap_or_else(|| "-".to_string());

            let _ = writeln!(out, "{}", item.title_or_empty());
            let _ = writeln!(out, "  Published at: {}", published);
            let _ = writeln!(out, "  Source: {}", item.source.as_deref().unwrap_or("-"));
            let _ = writeln!(out, "  {}", item.url.as_deref().unwrap_or("-"));
            if let Some(image) = &item.image {
                let _ = writeln!(out, "  Image: {}", image);
            }
        }

        out
    }
}
