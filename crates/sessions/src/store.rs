//! Chat session store.
//!
//! Owns every session and its message tree behind one `RwLock`.  The write
//! lock scope is the atomicity contract from the tree model: a node append
//! and the parent's latest-child pointer update always commit together, so
//! two concurrent branches can never silently drop each other's visibility.
//! All validation precedes mutation; a failed request leaves the state
//! untouched.
//!
//! Persists as a JSON snapshot under the configured state path.  Deep
//! storage is an external collaborator; this is only the ambient state
//! file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use tc_domain::config::ChatDefaults;
use tc_domain::error::{Error, Result};
use tc_domain::requests::{
    ChatFeedbackRequest, ChatMessageDetail, ChatSessionDetailResponse, ChatSessionDetails,
    SearchFeedbackRequest, SharedStatus,
};
use tc_domain::trace::TraceEvent;

use crate::naming::{SessionNamer, TruncatingNamer};
use crate::tree::{MessageNode, MessageTree, NewMessage};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One chat session: metadata plus the owned message tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub persona_id: i64,
    #[serde(default)]
    pub shared_status: SharedStatus,
    #[serde(default)]
    pub folder_id: Option<i64>,
    pub time_created: DateTime<Utc>,
    #[serde(default)]
    pub current_alternate_model: Option<String>,
    /// Soft-delete flag; deleted sessions reject every operation.
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub tree: MessageTree,
}

impl ChatSession {
    fn details(&self) -> ChatSessionDetails {
        ChatSessionDetails {
            id: self.id,
            name: self.name.clone(),
            persona_id: self.persona_id,
            time_created: self.time_created.to_rfc3339(),
            shared_status: self.shared_status,
            folder_id: self.folder_id,
            current_alternate_model: self.current_alternate_model.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    sessions: HashMap<i64, ChatSession>,
    next_session_id: i64,
    /// Message ids are minted store-wide so feedback can address a message
    /// without naming its session.
    next_message_id: i64,
    /// message id → owning session id.
    message_index: HashMap<i64, i64>,
}

impl StoreState {
    fn session(&self, session_id: i64) -> Result<&ChatSession> {
        self.sessions
            .get(&session_id)
            .filter(|s| !s.deleted)
            .ok_or_else(|| Error::NotFound(format!("chat session {session_id}")))
    }

    fn session_mut(&mut self, session_id: i64) -> Result<&mut ChatSession> {
        self.sessions
            .get_mut(&session_id)
            .filter(|s| !s.deleted)
            .ok_or_else(|| Error::NotFound(format!("chat session {session_id}")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ChatSessionStore {
    state: RwLock<StoreState>,
    namer: Box<dyn SessionNamer>,
    snapshot_path: Option<PathBuf>,
}

impl ChatSessionStore {
    /// In-memory store with the default truncating namer.
    pub fn in_memory(defaults: &ChatDefaults) -> Self {
        Self {
            state: RwLock::new(StoreState {
                next_session_id: 1,
                next_message_id: 1,
                ..Default::default()
            }),
            namer: Box::new(TruncatingNamer::new(defaults.generated_name_max_chars)),
            snapshot_path: None,
        }
    }

    /// Load or create the store snapshot at `state_path/<snapshot_file>`.
    pub fn open(state_path: &Path, defaults: &ChatDefaults) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(Error::Io)?;
        let snapshot_path = state_path.join(&defaults.snapshot_file);

        let state = if snapshot_path.exists() {
            let raw = std::fs::read_to_string(&snapshot_path).map_err(Error::Io)?;
            serde_json::from_str(&raw)?
        } else {
            StoreState {
                next_session_id: 1,
                next_message_id: 1,
                ..Default::default()
            }
        };

        tracing::info!(
            sessions = state.sessions.len(),
            path = %snapshot_path.display(),
            "chat session store loaded"
        );

        Ok(Self {
            state: RwLock::new(state),
            namer: Box::new(TruncatingNamer::new(defaults.generated_name_max_chars)),
            snapshot_path: Some(snapshot_path),
        })
    }

    /// Swap in a different naming collaborator.
    pub fn with_namer(mut self, namer: Box<dyn SessionNamer>) -> Self {
        self.namer = namer;
        self
    }

    // ── Session lifecycle ─────────────────────────────────────────────

    /// Create a session and return its id.
    pub fn create(&self, persona_id: i64, description: Option<String>) -> i64 {
        let mut state = self.state.write();
        let id = state.next_session_id;
        state.next_session_id += 1;

        state.sessions.insert(
            id,
            ChatSession {
                id,
                name: description.clone().unwrap_or_default(),
                description,
                persona_id,
                shared_status: SharedStatus::Private,
                folder_id: None,
                time_created: Utc::now(),
                current_alternate_model: None,
                deleted: false,
                tree: MessageTree::new(),
            },
        );

        TraceEvent::SessionCreated {
            session_id: id,
            persona_id,
        }
        .emit();

        id
    }

    /// Rename a session.  `None` regenerates a name through the configured
    /// namer.  Returns the effective name.
    pub fn rename(&self, session_id: i64, name: Option<String>) -> Result<String> {
        let mut state = self.state.write();
        let generated = name.is_none();

        // Regeneration reads the tree before the mutable borrow.
        let new_name = match name {
            Some(name) => name,
            None => self.namer.name_session(&state.session(session_id)?.tree),
        };

        let session = state.session_mut(session_id)?;
        session.name = new_name.clone();

        TraceEvent::SessionRenamed {
            session_id,
            generated,
        }
        .emit();

        Ok(new_name)
    }

    pub fn set_sharing_status(&self, session_id: i64, status: SharedStatus) -> Result<()> {
        let mut state = self.state.write();
        state.session_mut(session_id)?.shared_status = status;

        TraceEvent::SharingUpdated {
            session_id,
            status: status.as_str().into(),
        }
        .emit();
        Ok(())
    }

    pub fn set_alternate_model(&self, session_id: i64, model: String) -> Result<()> {
        let mut state = self.state.write();
        state.session_mut(session_id)?.current_alternate_model = Some(model.clone());

        TraceEvent::ModelUpdated { session_id, model }.emit();
        Ok(())
    }

    /// Soft-delete a session.  The tree stays in the snapshot but every
    /// operation on the session now fails with `NotFound`.
    pub fn delete(&self, session_id: i64) -> Result<()> {
        let mut state = self.state.write();
        state.session_mut(session_id)?.deleted = true;

        TraceEvent::SessionDeleted { session_id }.emit();
        Ok(())
    }

    /// Live sessions, newest first.
    pub fn list(&self) -> Vec<ChatSessionDetails> {
        let state = self.state.read();
        let mut rows: Vec<ChatSessionDetails> = state
            .sessions
            .values()
            .filter(|s| !s.deleted)
            .map(ChatSession::details)
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows
    }

    // ── Tree operations ───────────────────────────────────────────────

    /// Attach a message to a session's tree and return the new node id.
    ///
    /// `parent = None` starts a new root.  The append and the parent's
    /// latest-child pointer update happen inside one write-lock scope.
    pub fn attach_message(
        &self,
        session_id: i64,
        parent: Option<i64>,
        draft: NewMessage,
    ) -> Result<i64> {
        let mut state = self.state.write();

        // Validate before minting: the parent must already be in this tree.
        let session = state.session(session_id)?;
        let branched = match parent {
            Some(parent_id) => session.tree.latest_child_of(parent_id)?.is_some(),
            None => !session.tree.is_empty(),
        };

        let id = state.next_message_id;
        state.next_message_id += 1;

        let session = state.session_mut(session_id)?;
        session.tree.attach(parent, id, draft, Utc::now())?;
        state.message_index.insert(id, session_id);

        TraceEvent::NodeAttached {
            session_id,
            node_id: id,
            parent,
            branched,
        }
        .emit();

        Ok(id)
    }

    /// Optimistic attach: fails with `Conflict` when the parent's
    /// latest-child pointer no longer matches what the caller last saw.
    /// Callers retry once after re-reading.
    pub fn attach_after(
        &self,
        session_id: i64,
        parent_id: i64,
        expected_latest: Option<i64>,
        draft: NewMessage,
    ) -> Result<i64> {
        let mut state = self.state.write();

        let session = state.session(session_id)?;
        let current = session.tree.latest_child_of(parent_id)?;
        if current != expected_latest {
            return Err(Error::Conflict(format!(
                "latest child of message {parent_id} moved (expected {expected_latest:?}, found {current:?})"
            )));
        }

        let id = state.next_message_id;
        state.next_message_id += 1;

        let session = state.session_mut(session_id)?;
        session.tree.attach(Some(parent_id), id, draft, Utc::now())?;
        state.message_index.insert(id, session_id);

        TraceEvent::NodeAttached {
            session_id,
            node_id: id,
            parent: Some(parent_id),
            branched: expected_latest.is_some(),
        }
        .emit();

        Ok(id)
    }

    /// Default-rendered conversation path from the session's latest root.
    /// Empty for a session with no messages yet.
    pub fn path_to_latest(&self, session_id: i64) -> Result<Vec<MessageNode>> {
        let state = self.state.read();
        let session = state.session(session_id)?;
        match session.tree.latest_root() {
            Some(root) => Ok(session.tree.path_to_latest(root)?.cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    /// Conversation path from an explicit root.
    pub fn path_from_root(&self, session_id: i64, root_id: i64) -> Result<Vec<MessageNode>> {
        let state = self.state.read();
        let session = state.session(session_id)?;
        Ok(session.tree.path_to_latest(root_id)?.cloned().collect())
    }

    pub fn get_message(&self, session_id: i64, message_id: i64) -> Result<MessageNode> {
        let state = self.state.read();
        state
            .session(session_id)?
            .tree
            .get(message_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("message {message_id}")))
    }

    pub fn message_detail(&self, session_id: i64, message_id: i64) -> Result<ChatMessageDetail> {
        Ok(self.get_message(session_id, message_id)?.detail())
    }

    /// Which session owns a message, if any.
    pub fn session_of_message(&self, message_id: i64) -> Option<i64> {
        self.state.read().message_index.get(&message_id).copied()
    }

    /// Full session view for a client, messages along the default path.
    pub fn detail(
        &self,
        session_id: i64,
        persona_name: impl Into<String>,
    ) -> Result<ChatSessionDetailResponse> {
        let state = self.state.read();
        let session = state.session(session_id)?;

        let messages = match session.tree.latest_root() {
            Some(root) => session
                .tree
                .path_to_latest(root)?
                .map(MessageNode::detail)
                .collect(),
            None => Vec::new(),
        };

        Ok(ChatSessionDetailResponse {
            chat_session_id: session.id,
            description: session.description.clone().unwrap_or_default(),
            persona_id: session.persona_id,
            persona_name: persona_name.into(),
            messages,
            time_created: session.time_created,
            shared_status: session.shared_status,
            current_alternate_model: session.current_alternate_model.clone(),
        })
    }

    // ── Feedback ──────────────────────────────────────────────────────

    /// Validate and record chat feedback.  Recording downstream is the
    /// feedback collaborator's job; the core checks the invariants and
    /// that the message exists.
    pub fn record_chat_feedback(&self, request: ChatFeedbackRequest) -> Result<()> {
        let request = request.validate()?;

        let state = self.state.read();
        if !state.message_index.contains_key(&request.chat_message_id) {
            return Err(Error::NotFound(format!(
                "message {}",
                request.chat_message_id
            )));
        }

        TraceEvent::ChatFeedbackRecorded {
            message_id: request.chat_message_id,
            is_positive: request.is_positive,
        }
        .emit();
        Ok(())
    }

    /// Validate and record per-document search feedback.
    pub fn record_search_feedback(&self, request: SearchFeedbackRequest) -> Result<()> {
        let request = request.validate()?;

        let state = self.state.read();
        if !state.message_index.contains_key(&request.message_id) {
            return Err(Error::NotFound(format!("message {}", request.message_id)));
        }

        TraceEvent::SearchFeedbackRecorded {
            message_id: request.message_id,
            document_id: request.document_id.clone(),
            click: request.click,
        }
        .emit();
        Ok(())
    }

    // ── Persistence ───────────────────────────────────────────────────

    /// Persist the current state to the snapshot file.  A no-op for
    /// in-memory stores.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let state = self.state.read();
        let json = serde_json::to_string_pretty(&*state)?;
        std::fs::write(path, json).map_err(Error::Io)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.state.read().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().sessions.is_empty()
    }
}
