//! Persona (assistant configuration) model.
//!
//! A persona bundles search behavior, prompts, document sets, and tool
//! configurations under a name.  Personas are either persisted and
//! referenced by id, or supplied inline as an ephemeral, request-scoped
//! definition — `PersonaSelector` makes that choice explicit.

use serde::{Deserialize, Serialize};

use crate::search::{RecencyBias, SearchType};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Nested collections
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A suggested opening message shown on an empty chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarterMessage {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub message: String,
}

/// A system/task prompt pair owned by a persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub system_prompt: String,
    #[serde(default)]
    pub task_prompt: String,
    #[serde(default = "d_true")]
    pub include_citations: bool,
    #[serde(default = "d_true")]
    pub datetime_aware: bool,
}

/// Reference to a persisted document set.  Order-irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSetRef {
    pub id: i64,
}

/// Tool attached to a persona.
///
/// Must carry either `in_code_tool_id` (a built-in implementation) or
/// `openapi_schema` (an out-of-band API description); the composer rejects
/// configs with neither or both.  A missing `display_name` defaults to the
/// tool's name at composition time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub in_code_tool_id: Option<i64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub openapi_schema: Option<serde_json::Value>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Persona
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub search_type: SearchType,
    /// Hint for how many chunks to feed the LLM; `None` uses the engine
    /// default.  Fractional values are allowed for partial-chunk budgets.
    #[serde(default)]
    pub num_chunks: Option<f64>,
    #[serde(default)]
    pub llm_relevance_filter: bool,
    #[serde(default)]
    pub llm_filter_extraction: bool,
    #[serde(default)]
    pub recency_bias: RecencyBias,
    #[serde(default)]
    pub llm_model_provider_override: Option<String>,
    #[serde(default)]
    pub llm_model_version_override: Option<String>,
    #[serde(default)]
    pub starter_messages: Option<Vec<StarterMessage>>,
    #[serde(default)]
    pub default_persona: bool,
    #[serde(default = "d_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub display_priority: Option<i32>,
    /// Soft-delete flag; deleted personas are kept addressable but never
    /// listed.
    #[serde(default)]
    pub deleted: bool,
    #[serde(default = "d_true")]
    pub is_public: bool,
    #[serde(default)]
    pub prompts: Vec<PromptConfig>,
    #[serde(default)]
    pub document_sets: Vec<DocumentSetRef>,
    #[serde(default)]
    pub tools: Vec<ToolConfig>,
}

fn d_true() -> bool {
    true
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request-scoped overrides
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Substitutes the LLM for a single request.  Never mutates the persona.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmOverride {
    #[serde(default)]
    pub model_provider: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Substitutes the system/task prompt for a single request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptOverride {
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub task_prompt: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Selector
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where a request's persona comes from.  The two variants are mutually
/// substitutable wherever a persona is required; the composer resolves the
/// selector exactly once per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersonaSelector {
    /// A persisted persona, referenced by id.
    Reference { persona_id: i64 },
    /// An ephemeral definition scoped to this request.
    Inline { config: PersonaConfig },
}
