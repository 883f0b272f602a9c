//! News backend client
//!
//! This crate holds the wire models of the news backend, the gateway that
//! talks to it, the client-side news filter and the preference reconciler.

pub mod error;
pub mod filter;
pub mod gateway;
pub mod models;
pub mod preferences;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{GatewayError, GatewayResult};
pub use filter::{FilterCriteria, filter_news, filter_news_in};
pub use gateway::{HttpGateway, NewsGateway, SharedGateway, spawn_scrape_trigger};
pub use models::news::{NewsItem, SourceLabel};
pub use preferences::{PreferenceDraft, PreferenceReconciler, PreferenceState, SaveFailure};
