//! Preference reconciliation
//!
//! Loads the user's saved default sources and authors, together with the
//! selectable authors, into an editable draft and pushes the draft back on
//! save. There is no merging: a save overwrites both categories wholesale,
//! and the two categories are written by independent requests.

use thiserror::Error;
use tracing::{info, warn};

use crate::error::GatewayError;
use crate::gateway::SharedGateway;
use crate::models::news::SourceLabel;
use crate::models::preferences::{AuthorPreferences, SourcePreferences};

/// Why a save did not fully succeed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFailure {
    /// Save was requested before preferences were loaded
    #[error("preferences are not loaded")]
    NotReady,

    /// Default authors were saved, default sources were not
    #[error("default sources were not saved")]
    Sources,

    /// Default sources were saved, default authors were not
    #[error("default authors were not saved")]
    Authors,

    /// Neither category was saved
    #[error("default sources and default authors were not saved")]
    Both,
}

/// Rejected draft edit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Author is not available: {0}")]
    UnknownAuthor(String),
}

/// Editable local copy of the user's preferences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceDraft {
    available_authors: Vec<String>,
    default_sources: Vec<String>,
    default_authors: Vec<String>,
    save_error: Option<SaveFailure>,
}

impl PreferenceDraft {
    pub fn available_authors(&self) -> &[String] {
        &self.available_authors
    }

    pub fn default_sources(&self) -> &[String] {
        &self.default_sources
    }

    pub fn default_authors(&self) -> &[String] {
        &self.default_authors
    }

    /// Failure of the most recent save, if it failed
    pub fn save_error(&self) -> Option<SaveFailure> {
        self.save_error
    }

    pub fn is_source_selected(&self, source: SourceLabel) -> bool {
        self.default_sources.iter().any(|s| s == source.label())
    }

    pub fn select_source(&mut self, source: SourceLabel) {
        if !self.is_source_selected(source) {
            self.default_sources.push(source.label().to_string());
        }
    }

    pub fn deselect_source(&mut self, source: SourceLabel) {
        self.default_sources.retain(|s| s != source.label());
    }

    /// Replace the selected sources
    pub fn set_sources(&mut self, sources: impl IntoIterator<Item = SourceLabel>) {
        self.default_sources.clear();
        for source in sources {
            self.select_source(source);
        }
    }

    pub fn select_author(&mut self, author: &str) -> Result<(), EditError> {
        if !self.available_authors.iter().any(|a| a == author) {
            return Err(EditError::UnknownAuthor(author.to_string()));
        }
        if !self.default_authors.iter().any(|a| a == author) {
            self.default_authors.push(author.to_string());
        }
        Ok(())
    }

    pub fn deselect_author(&mut self, author: &str) {
        self.default_authors.retain(|a| a != author);
    }

    /// Replace the selected authors; on error the selection is unchanged
    pub fn set_authors<I, S>(&mut self, authors: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = self.clone();
        next.default_authors.clear();
        for author in authors {
            next.select_author(author.as_ref())?;
        }
        self.default_authors = next.default_authors;
        Ok(())
    }
}

/// Lifecycle of the preferences view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceState {
    /// Fetches in flight
    Loading,
    /// Draft populated and editable
    Ready(PreferenceDraft),
    /// A load request failed; nothing was kept
    Error(GatewayError),
    /// Both categories were written; the view is done
    Saved,
}

/// Drives the load-edit-save cycle against the gateway
pub struct PreferenceReconciler {
    gateway: SharedGateway,
    state: PreferenceState,
}

impl PreferenceReconciler {
    /// Create a reconciler in the `Loading` state
    pub fn new(gateway: SharedGateway) -> Self {
        Self {
            gateway,
            state: PreferenceState::Loading,
        }
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }

    pub fn draft(&self) -> Option<&PreferenceDraft> {
        match &self.state {
            PreferenceState::Ready(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut PreferenceDraft> {
        match &mut self.state {
            PreferenceState::Ready(draft) => Some(draft),
            _ => None,
        }
    }

    /// Fetch available authors and both saved categories
    ///
    /// The three requests are issued together. The state becomes `Ready`
    /// only if all of them succeed, otherwise `Error`.
    pub async fn load(&mut self) -> &PreferenceState {
        self.state = PreferenceState::Loading;
        info!("Loading preferences");

        let (authors, sources, author_prefs) = tokio::join!(
            self.gateway.list_authors(),
            self.gateway.get_source_prefs(),
            self.gateway.get_author_prefs(),
        );

        self.state = match (authors, sources, author_prefs) {
            (Ok(authors), Ok(sources), Ok(author_prefs)) => {
                info!(
                    "Preferences loaded: {} available authors, {} sources, {} authors",
                    authors.len(),
                    sources.default_sources.len(),
                    author_prefs.default_authors.len()
                );
                PreferenceState::Ready(PreferenceDraft {
                    available_authors: authors.into_iter().map(|a| a.author).collect(),
                    default_sources: sources.default_sources,
                    default_authors: author_prefs.default_authors,
                    save_error: None,
                })
            }
            (authors, sources, author_prefs) => {
                let error = [authors.err(), sources.err(), author_prefs.err()]
                    .into_iter()
                    .flatten()
                    .next()
                    .unwrap_or_else(|| GatewayError::request_failed("load_preferences", "unknown"));
                warn!("Failed to load preferences: {}", error);
                PreferenceState::Error(error)
            }
        };

        &self.state
    }

    /// Write both categories back
    ///
    /// On success the state becomes `Saved`. On failure the state stays
    /// `Ready` with the draft untouched and the failure recorded on it, so
    /// the same edits can be submitted again.
    pub async fn save(&mut self) -> Result<(), SaveFailure> {
        let Some(draft) = self.draft_mut() else {
            return Err(SaveFailure::NotReady);
        };
        draft.save_error = None;

        let sources = SourcePreferences {
            default_sources: draft.default_sources.clone(),
        };
        let authors = AuthorPreferences {
            default_authors: draft.default_authors.clone(),
        };

        let (sources_result, authors_result) = tokio::join!(
            self.gateway.set_source_prefs(&sources),
            self.gateway.set_author_prefs(&authors),
        );

        let failure = match (sources_result, authors_result) {
            (Ok(()), Ok(())) => None,
            (Err(e), Ok(())) => {
                warn!("Failed to save default sources: {}", e);
                Some(SaveFailure::Sources)
            }
            (Ok(()), Err(e)) => {
                warn!("Failed to save default authors: {}", e);
                Some(SaveFailure::Authors)
            }
            (Err(sources_err), Err(authors_err)) => {
                warn!(
                    "Failed to save preferences: {}; {}",
                    sources_err, authors_err
                );
                Some(SaveFailure::Both)
            }
        };

        match failure {
            None => {
                info!("Preferences saved");
                self.state = PreferenceState::Saved;
                Ok(())
            }
            Some(failure) => {
                if let Some(draft) = self.draft_mut() {
                    draft.save_error = Some(failure);
                }
                Err(failure)
            }
        }
    }
}
