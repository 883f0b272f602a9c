//! Preferences view

use std::fmt::Write;

use api::models::news::SourceLabel;
use api::preferences::{PreferenceDraft, PreferenceReconciler, PreferenceState, SaveFailure};
use auth::{GateDecision, View, guard_protected};

use super::{Entry, PREFERENCES_LOAD_FAILED, PREFERENCES_SAVE_FAILED};
use crate::state::PortalState;

pub struct PreferencesView {
    reconciler: PreferenceReconciler,
    banner: Option<String>,
}

impl PreferencesView {
    /// Enter the view and load the saved preferences
    pub async fn enter(state: &PortalState) -> Entry<Self> {
        if let GateDecision::Redirect(view) = guard_protected(state.store.as_ref()) {
            return Entry::Redirected(view);
        }

        let mut view = Self {
            reconciler: PreferenceReconciler::new(state.gateway.clone()),
            banner: None,
        };
        view.reload().await;
        Entry::Entered(view)
    }

    /// Discard local edits and load again
    pub async fn reload(&mut self) {
        self.banner = match self.reconciler.load().await {
            PreferenceState::Error(_) => Some(PREFERENCES_LOAD_FAILED.to_string()),
            _ => None,
        };
    }

    pub fn state(&self) -> &PreferenceState {
        self.reconciler.state()
    }

    pub fn draft(&self) -> Option<&PreferenceDraft> {
        self.reconciler.draft()
    }

    pub fn draft_mut(&mut self) -> Option<&mut PreferenceDraft> {
        self.reconciler.draft_mut()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Save both categories; on success the next view is news
    ///
    /// On failure the edits stay in place for another attempt.
    pub async fn save(&mut self) -> Result<View, SaveFailure> {
        match self.reconciler.save().await {
            Ok(()) => {
                self.banner = None;
                Ok(View::News)
            }
            Err(failure) => {
                self.banner = Some(PREFERENCES_SAVE_FAILED.to_string());
                Err(failure)
            }
        }
    }

    /// Plain-text rendering of the banner and the current selections
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = self.banner() {
            let _ = writeln!(out, "! {}", banner);
        }

        let Some(draft) = self.draft() else {
            return out;
        };

        if let Some(failure) = draft.save_error() {
            let _ = writeln!(out, "  ({})", failure);
        }

        let _ = writeln!(out, "Default Sources");
        for source in SourceLabel::ALL {
            let mark = if draft.is_source_selected(source) { "x" } else { " " };
            let _ = writeln!(out, "  [{}] {}", mark, source);
        }
        // Saved labels outside the known table are kept as they are
        for other in draft
            .default_sources()
            .iter()
            .filter(|s| SourceLabel::from_label(s).is_none())
        {
            let _ = writeln!(out, "  [x] {}", other);
        }

        let _ = writeln!(out, "Default Authors");
        for author in draft.available_authors() {
            let mark = if draft.default_authors().contains(author) { "x" } else { " " };
            let _ = writeln!(out, "  [{}] {}", mark, author);
        }

        out
    }
}
