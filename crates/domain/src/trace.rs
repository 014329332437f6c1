use serde::Serialize;

/// Structured trace events emitted across all tidechat crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    SessionCreated {
        session_id: i64,
        persona_id: i64,
    },
    SessionRenamed {
        session_id: i64,
        /// True when the name was regenerated rather than caller-supplied.
        generated: bool,
    },
    SharingUpdated {
        session_id: i64,
        status: String,
    },
    ModelUpdated {
        session_id: i64,
        model: String,
    },
    SessionDeleted {
        session_id: i64,
    },
    NodeAttached {
        session_id: i64,
        node_id: i64,
        parent: Option<i64>,
        /// True when the parent already had a latest child (i.e. this
        /// attach created a sibling branch).
        branched: bool,
    },
    PersonaResolved {
        /// `"reference"` or `"inline"`.
        source: &'static str,
        persona_id: Option<i64>,
        tools: usize,
    },
    ChatFeedbackRecorded {
        message_id: i64,
        is_positive: Option<bool>,
    },
    SearchFeedbackRecorded {
        message_id: i64,
        document_id: String,
        click: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "tc_event");
    }
}
