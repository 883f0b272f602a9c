//! Preference models for the API client

use serde::{Deserialize, Deserializer, Serialize};

/// Entry of the available-authors reference list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorEntry {
    pub author: String,
}

/// Response for the available-authors listing
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorListResponse {
    pub results: Vec<AuthorEntry>,
}

/// Saved default sources, as source labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePreferences {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub default_sources: Vec<String>,
}

/// Saved default authors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPreferences {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub default_authors: Vec<String>,
}

// Users without saved preferences get `null` or no field at all
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
