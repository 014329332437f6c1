//! Wire request/response contracts.
//!
//! Field names are the wire contract; identifiers are integers and
//! timestamps serialize as ISO-8601 strings.  Requests that carry
//! cross-field invariants expose `validate(self)`, which returns the
//! request unchanged when valid and a named `Validation` error otherwise —
//! validation fully precedes any state mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::message::{FileDescriptor, MessageType, ToolCallResult};
use crate::persona::{LlmOverride, PersonaConfig, PromptOverride};
use crate::search::{
    BaseFilters, ChunkContext, RetrievalDetails, RetrievalDocs, SearchDoc, SearchFeedbackKind,
};
use crate::validation;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session lifecycle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Who can see a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SharedStatus {
    #[default]
    Private,
    Public,
    /// Shared with anyone holding the link.
    Link,
}

impl SharedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::Link => "link",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionCreationRequest {
    /// If not specified, the process default persona is used.
    #[serde(default)]
    pub persona_id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatSessionId {
    pub chat_session_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRenameRequest {
    pub chat_session_id: i64,
    /// `None` asks the core to regenerate a name.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameChatSessionResponse {
    /// Only really useful when the name was regenerated.
    pub new_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionUpdateRequest {
    pub sharing_status: SharedStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateChatSessionThreadRequest {
    pub chat_session_id: i64,
    pub new_alternate_model: String,
}

/// One row of the session list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionDetails {
    pub id: i64,
    pub name: String,
    pub persona_id: i64,
    pub time_created: String,
    pub shared_status: SharedStatus,
    pub folder_id: Option<i64>,
    #[serde(default)]
    pub current_alternate_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionsResponse {
    pub sessions: Vec<ChatSessionDetails>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message creation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Request to attach a new message to a session's tree.
///
/// Create a chat session and get its id before creating messages.
/// `parent_message_id = None` starts a new root, which is how the very
/// first turn itself can be branched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatMessageRequest {
    #[serde(flatten)]
    pub chunk_context: ChunkContext,
    /// Ephemeral persona definition, scoped to this request.
    #[serde(default)]
    pub persona_config: Option<PersonaConfig>,
    pub chat_session_id: i64,
    /// Primary key of the previous message in the tree.
    pub parent_message_id: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub file_descriptors: Vec<FileDescriptor>,
    /// `None` falls back to the session's prompt; 0 is the system default.
    #[serde(default)]
    pub prompt_id: Option<i64>,
    /// If provided, retrieval is skipped and these prior results are reused.
    #[serde(default)]
    pub search_doc_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub retrieval_options: Option<RetrievalDetails>,
    /// Exact search query to use; disables query rephrasing.
    #[serde(default)]
    pub query_override: Option<String>,
    #[serde(default)]
    pub llm_override: Option<LlmOverride>,
    #[serde(default)]
    pub prompt_override: Option<PromptOverride>,
    #[serde(default)]
    pub alternate_assistant_id: Option<i64>,
    /// Seeded chats: skip creating the user message and only generate the
    /// assistant answer.
    #[serde(default)]
    pub use_existing_user_message: bool,
}

impl CreateChatMessageRequest {
    /// Exactly one of `search_doc_ids` / `retrieval_options` must be set;
    /// both-absent and both-present are rejected.
    pub fn validate(self) -> Result<Self> {
        validation::exactly_one(
            "search_doc_ids_or_retrieval_options",
            self.search_doc_ids.is_some(),
            self.retrieval_options.is_some(),
        )?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageIdentifier {
    pub message_id: i64,
}

/// Full view of one message node, as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDetail {
    pub message_id: i64,
    pub parent_message: Option<i64>,
    pub latest_child_message: Option<i64>,
    pub message: String,
    pub rephrased_query: Option<String>,
    pub context_docs: Option<RetrievalDocs>,
    pub message_type: MessageType,
    /// Serializes as an ISO-8601 string.
    pub time_sent: DateTime<Utc>,
    pub alternate_assistant_id: Option<i64>,
    /// Citation number → db document id.
    pub citations: HashMap<i32, i64>,
    pub files: Vec<FileDescriptor>,
    pub tool_calls: Vec<ToolCallResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionDetailResponse {
    pub chat_session_id: i64,
    pub description: String,
    pub persona_id: i64,
    pub persona_name: String,
    pub messages: Vec<ChatMessageDetail>,
    pub time_created: DateTime<Utc>,
    pub shared_status: SharedStatus,
    pub current_alternate_model: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Feedback
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatFeedbackRequest {
    pub chat_message_id: i64,
    #[serde(default)]
    pub is_positive: Option<bool>,
    #[serde(default)]
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub predefined_feedback: Option<String>,
}

impl ChatFeedbackRequest {
    /// At least one of `is_positive` / `feedback_text` must be set.
    pub fn validate(self) -> Result<Self> {
        validation::at_least_one(
            "is_positive_or_feedback_text",
            self.is_positive.is_some(),
            self.feedback_text.is_some(),
        )?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFeedbackRequest {
    pub message_id: i64,
    pub document_id: String,
    pub document_rank: i32,
    pub click: bool,
    #[serde(default)]
    pub search_feedback: Option<SearchFeedbackKind>,
}

impl SearchFeedbackRequest {
    /// A non-click event must carry explicit feedback.
    pub fn validate(self) -> Result<Self> {
        validation::required_when(
            "click_or_search_feedback",
            !self.click,
            self.search_feedback.is_some(),
        )?;
        Ok(self)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pass-through query shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleQueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperResponse {
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub details: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryValidationResponse {
    pub reasoning: String,
    pub answerable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSearchRequest {
    pub query: String,
    #[serde(default)]
    pub filters: BaseFilters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSearchResponse {
    pub documents: Vec<SearchDoc>,
}

/// Terminal answer shape produced by the LLM collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: Option<String>,
}
