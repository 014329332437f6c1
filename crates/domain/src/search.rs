//! Retrieval shapes shared between the chat core and the search collaborator.
//!
//! The core never executes a search; these types only describe what a
//! request asks the retrieval engine for and what comes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Enums
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Keyword,
    Semantic,
    #[default]
    Hybrid,
}

/// How strongly document recency weighs into ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecencyBias {
    NoDecay,
    BaseDecay,
    FavorRecent,
    /// Let the query analysis pick.
    #[default]
    Auto,
}

/// Whether retrieval runs for a message when the caller leaves it open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunSearchSetting {
    Always,
    Never,
    #[default]
    Auto,
}

/// Feedback a user can leave on a single retrieved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFeedbackKind {
    Endorse,
    Reject,
    Hide,
    Unhide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Web,
    File,
    Slack,
    Github,
    Confluence,
    Jira,
    GoogleDrive,
    Notion,
    Zendesk,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Filters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A key/value tag attached to indexed documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_key: String,
    pub tag_value: String,
}

/// A tag together with the source it was seen on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTag {
    #[serde(flatten)]
    pub tag: Tag,
    pub source: DocumentSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub tags: Vec<SourceTag>,
}

/// Filters the caller may constrain retrieval with.  All fields optional;
/// `None` means "do not filter on this axis".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseFilters {
    #[serde(default)]
    pub source_type: Option<Vec<DocumentSource>>,
    #[serde(default)]
    pub document_set: Option<Vec<String>>,
    #[serde(default)]
    pub time_cutoff: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

/// How much surrounding context each matched chunk is expanded with.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ChunkContext {
    #[serde(default)]
    pub chunks_above: u32,
    #[serde(default)]
    pub chunks_below: u32,
    /// Fetch the whole document instead of expanding chunks.
    #[serde(default)]
    pub full_doc: bool,
}

/// Per-request retrieval options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalDetails {
    #[serde(default)]
    pub run_search: RunSearchSetting,
    /// False for recorded/seeded flows where latency does not matter.
    #[serde(default = "d_true")]
    pub real_time: bool,
    #[serde(default)]
    pub filters: Option<BaseFilters>,
    #[serde(default)]
    pub enable_auto_detect_filters: Option<bool>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl Default for RetrievalDetails {
    fn default() -> Self {
        Self {
            run_search: RunSearchSetting::Auto,
            real_time: true,
            filters: None,
            enable_auto_detect_filters: None,
            offset: None,
            limit: None,
        }
    }
}

fn d_true() -> bool {
    true
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Retrieved documents
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One document as ranked by the retrieval engine.
///
/// `document_id` is the connector-assigned identifier and is opaque to the
/// chat core; citation maps point at the numeric db id instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDoc {
    pub document_id: String,
    pub semantic_identifier: String,
    pub link: Option<String>,
    pub blurb: String,
    pub source_type: DocumentSource,
    #[serde(default)]
    pub boost: i32,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Highlighted snippets, in rank order.
    #[serde(default)]
    pub match_highlights: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The document set associated with an assistant response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalDocs {
    pub top_documents: Vec<SearchDoc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_type_defaults_to_hybrid() {
        assert_eq!(SearchType::default(), SearchType::Hybrid);
        let parsed: SearchType = serde_json::from_str("\"keyword\"").unwrap();
        assert_eq!(parsed, SearchType::Keyword);
    }

    #[test]
    fn retrieval_details_defaults() {
        let details: RetrievalDetails = serde_json::from_str("{}").unwrap();
        assert_eq!(details.run_search, RunSearchSetting::Auto);
        assert!(details.real_time);
        assert!(details.filters.is_none());
    }

    #[test]
    fn source_tag_flattens() {
        let tag = SourceTag {
            tag: Tag {
                tag_key: "team".into(),
                tag_value: "infra".into(),
            },
            source: DocumentSource::Slack,
        };
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["tag_key"], "team");
        assert_eq!(json["source"], "slack");
    }
}
