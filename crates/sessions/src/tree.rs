//! The branching message tree.
//!
//! A conversation is not a flat list: editing an earlier turn or re-asking
//! attaches a sibling under the same parent, and every parent keeps a
//! "latest child" pointer naming the branch rendered by default.  Nodes are
//! append-only and never relinked, so the tree is acyclic by construction
//! and no branch is ever deleted implicitly.
//!
//! Attaching with no parent starts a new root, which is how the very first
//! turn itself can be branched:
//!
//! ```text
//!        [First Message] [First Message Edit 1] [First Message Edit 2]
//!               |                  |
//!       [Second Message]  [Second Message of Edit 1 Branch]
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tc_domain::error::{Error, Result};
use tc_domain::message::{FileDescriptor, MessageType, ToolCallResult};
use tc_domain::requests::ChatMessageDetail;
use tc_domain::search::RetrievalDocs;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Nodes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Payload of a node before it is attached.  The tree assigns identity,
/// parent links, and the timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub message_type: MessageType,
    pub message: String,
    /// Query actually sent to retrieval, when rephrasing changed it.
    pub rephrased_query: Option<String>,
    pub files: Vec<FileDescriptor>,
    /// Absent for user messages.
    pub context_docs: Option<RetrievalDocs>,
    /// Citation number → db document id.  Keys are unique; integrity
    /// against `context_docs` is not checked here (see `MessageTree::attach`).
    pub citations: HashMap<i32, i64>,
    pub tool_calls: Vec<ToolCallResult>,
    pub alternate_assistant_id: Option<i64>,
}

impl NewMessage {
    fn bare(message_type: MessageType, text: impl Into<String>) -> Self {
        Self {
            message_type,
            message: text.into(),
            rephrased_query: None,
            files: Vec::new(),
            context_docs: None,
            citations: HashMap::new(),
            tool_calls: Vec::new(),
            alternate_assistant_id: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::bare(MessageType::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::bare(MessageType::Assistant, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::bare(MessageType::System, text)
    }
}

/// One attached message.  Immutable once created, except for
/// `latest_child`, which moves every time a new child is attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageNode {
    pub id: i64,
    /// `None` marks a root.
    pub parent: Option<i64>,
    /// The child currently rendered by default.  Siblings stay addressable.
    pub latest_child: Option<i64>,
    pub message_type: MessageType,
    pub message: String,
    pub rephrased_query: Option<String>,
    pub files: Vec<FileDescriptor>,
    pub context_docs: Option<RetrievalDocs>,
    pub citations: HashMap<i32, i64>,
    pub tool_calls: Vec<ToolCallResult>,
    pub time_sent: DateTime<Utc>,
    pub alternate_assistant_id: Option<i64>,
}

impl MessageNode {
    /// Project the node into its wire shape.
    pub fn detail(&self) -> ChatMessageDetail {
        ChatMessageDetail {
            message_id: self.id,
            parent_message: self.parent,
            latest_child_message: self.latest_child,
            message: self.message.clone(),
            rephrased_query: self.rephrased_query.clone(),
            context_docs: self.context_docs.clone(),
            message_type: self.message_type,
            time_sent: self.time_sent,
            alternate_assistant_id: self.alternate_assistant_id,
            citations: self.citations.clone(),
            files: self.files.clone(),
            tool_calls: self.tool_calls.clone(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tree
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageTree {
    nodes: HashMap<i64, MessageNode>,
    /// Root ids in attach order.
    roots: Vec<i64>,
    /// The root rendered by default — latest-child semantics at top level.
    latest_root: Option<i64>,
}

impl MessageTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new node under `parent`, or as a new root when `parent` is
    /// `None`.  Updates the parent's latest-child pointer in the same
    /// mutation; the caller's lock scope makes the pair atomic.
    ///
    /// The node's citation map is accepted structurally even when it
    /// references document ids absent from its own `context_docs`; citation
    /// integrity is the answer pipeline's concern, not the tree's.
    pub fn attach(
        &mut self,
        parent: Option<i64>,
        id: i64,
        draft: NewMessage,
        time_sent: DateTime<Utc>,
    ) -> Result<i64> {
        if self.nodes.contains_key(&id) {
            return Err(Error::Conflict(format!("message {id} already attached")));
        }

        if let Some(parent_id) = parent {
            if !self.nodes.contains_key(&parent_id) {
                return Err(Error::NotFound(format!("parent message {parent_id}")));
            }
        }

        self.nodes.insert(
            id,
            MessageNode {
                id,
                parent,
                latest_child: None,
                message_type: draft.message_type,
                message: draft.message,
                rephrased_query: draft.rephrased_query,
                files: draft.files,
                context_docs: draft.context_docs,
                citations: draft.citations,
                tool_calls: draft.tool_calls,
                time_sent,
                alternate_assistant_id: draft.alternate_assistant_id,
            },
        );

        match parent {
            Some(parent_id) => {
                // Checked above; the parent is present.
                if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                    parent_node.latest_child = Some(id);
                }
            }
            None => {
                self.roots.push(id);
                self.latest_root = Some(id);
            }
        }

        Ok(id)
    }

    /// Attach a sibling branch under an existing node.  Used both for
    /// "continue conversation" and "edit earlier turn and fork"; the only
    /// difference is which node the caller picks as parent.
    pub fn branch_from(
        &mut self,
        node_id: i64,
        id: i64,
        draft: NewMessage,
        time_sent: DateTime<Utc>,
    ) -> Result<i64> {
        self.attach(Some(node_id), id, draft, time_sent)
    }

    /// Walk from `root_id` following latest-child pointers to a leaf.
    ///
    /// Lazy and restartable: each call returns a fresh iterator, and two
    /// walks without an intervening attach yield identical sequences.
    pub fn path_to_latest(&self, root_id: i64) -> Result<PathToLatest<'_>> {
        if !self.nodes.contains_key(&root_id) {
            return Err(Error::NotFound(format!("message {root_id}")));
        }
        Ok(PathToLatest {
            tree: self,
            next: Some(root_id),
        })
    }

    pub fn get(&self, id: i64) -> Option<&MessageNode> {
        self.nodes.get(&id)
    }

    /// Current latest-child pointer of a node.
    pub fn latest_child_of(&self, id: i64) -> Result<Option<i64>> {
        self.nodes
            .get(&id)
            .map(|n| n.latest_child)
            .ok_or_else(|| Error::NotFound(format!("message {id}")))
    }

    pub fn roots(&self) -> &[i64] {
        &self.roots
    }

    pub fn latest_root(&self) -> Option<i64> {
        self.latest_root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over the default-rendered conversation path.
pub struct PathToLatest<'a> {
    tree: &'a MessageTree,
    next: Option<i64>,
}

impl<'a> Iterator for PathToLatest<'a> {
    type Item = &'a MessageNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.nodes.get(&self.next?)?;
        self.next = node.latest_child;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attach(tree: &mut MessageTree, parent: Option<i64>, id: i64, text: &str) -> i64 {
        tree.attach(parent, id, NewMessage::user(text), Utc::now())
            .unwrap()
    }

    fn path_texts(tree: &MessageTree, root: i64) -> Vec<String> {
        tree.path_to_latest(root)
            .unwrap()
            .map(|n| n.message.clone())
            .collect()
    }

    #[test]
    fn attach_extends_default_path() {
        let mut tree = MessageTree::new();
        let root = attach(&mut tree, None, 1, "hello");
        attach(&mut tree, Some(root), 2, "reply");
        assert_eq!(path_texts(&tree, root), vec!["hello", "reply"]);
    }

    #[test]
    fn unknown_parent_is_not_found() {
        let mut tree = MessageTree::new();
        let err = tree
            .attach(Some(99), 1, NewMessage::user("orphan"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(tree.is_empty());
    }

    #[test]
    fn branching_moves_latest_but_keeps_siblings() {
        let mut tree = MessageTree::new();
        let root = attach(&mut tree, None, 1, "q");
        let first = attach(&mut tree, Some(root), 2, "answer v1");
        attach(&mut tree, Some(first), 3, "followup");

        // Edit the answer: sibling branch under the same root.
        let second = tree
            .branch_from(root, 4, NewMessage::assistant("answer v2"), Utc::now())
            .unwrap();

        assert_eq!(path_texts(&tree, root), vec!["q", "answer v2"]);
        assert_eq!(tree.latest_child_of(root).unwrap(), Some(second));
        // The earlier branch subtree is untouched and addressable.
        assert_eq!(tree.get(first).unwrap().message, "answer v1");
        assert_eq!(tree.get(first).unwrap().latest_child, Some(3));
        assert_eq!(tree.get(3).unwrap().message, "followup");
    }

    #[test]
    fn first_turn_is_branchable_via_multiple_roots() {
        let mut tree = MessageTree::new();
        let a = attach(&mut tree, None, 1, "hello");
        attach(&mut tree, Some(a), 2, "reply");
        let b = attach(&mut tree, None, 3, "hello again");

        assert_eq!(tree.roots(), &[a, b]);
        assert_eq!(tree.latest_root(), Some(b));
        assert_eq!(path_texts(&tree, b), vec!["hello again"]);
        // The original conversation is still fully reachable.
        assert_eq!(path_texts(&tree, a), vec!["hello", "reply"]);
    }

    #[test]
    fn path_is_idempotent_between_attaches() {
        let mut tree = MessageTree::new();
        let root = attach(&mut tree, None, 1, "a");
        attach(&mut tree, Some(root), 2, "b");
        let first: Vec<i64> = tree.path_to_latest(root).unwrap().map(|n| n.id).collect();
        let second: Vec<i64> = tree.path_to_latest(root).unwrap().map(|n| n.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn path_iterator_is_lazy() {
        let mut tree = MessageTree::new();
        let root = attach(&mut tree, None, 1, "a");
        attach(&mut tree, Some(root), 2, "b");

        let mut walk = tree.path_to_latest(root).unwrap();
        assert_eq!(walk.next().unwrap().id, root);
        // Remaining nodes are only visited on demand.
        assert_eq!(walk.next().unwrap().id, 2);
        assert!(walk.next().is_none());
    }

    #[test]
    fn duplicate_id_is_a_conflict() {
        let mut tree = MessageTree::new();
        attach(&mut tree, None, 1, "a");
        let err = tree
            .attach(None, 1, NewMessage::user("dup"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn dangling_citation_is_accepted() {
        let mut tree = MessageTree::new();
        let root = attach(&mut tree, None, 1, "q");
        let mut draft = NewMessage::assistant("answer [1]");
        draft.citations.insert(1, 555); // no matching context doc
        let id = tree.attach(Some(root), 2, draft, Utc::now()).unwrap();
        assert_eq!(tree.get(id).unwrap().citations[&1], 555);
    }
}
