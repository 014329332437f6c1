//! Session naming seam.
//!
//! `rename` with no name asks for a regenerated one.  Real deployments
//! plug in a summarization collaborator here; the shipped default just
//! truncates the first user message on the default path.

use tc_domain::message::MessageType;

use crate::tree::MessageTree;

pub const DEFAULT_SESSION_NAME: &str = "New chat";

pub trait SessionNamer: Send + Sync {
    /// Produce a display name for a session from its current tree.
    fn name_session(&self, tree: &MessageTree) -> String;
}

/// Names a session after its first user message, capped at a character
/// count.
pub struct TruncatingNamer {
    max_chars: usize,
}

impl TruncatingNamer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl SessionNamer for TruncatingNamer {
    fn name_session(&self, tree: &MessageTree) -> String {
        let Some(root) = tree.latest_root() else {
            return DEFAULT_SESSION_NAME.into();
        };
        let Ok(path) = tree.path_to_latest(root) else {
            return DEFAULT_SESSION_NAME.into();
        };

        for node in path {
            if node.message_type == MessageType::User && !node.message.trim().is_empty() {
                return node.message.trim().chars().take(self.max_chars).collect();
            }
        }
        DEFAULT_SESSION_NAME.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NewMessage;
    use chrono::Utc;

    #[test]
    fn empty_tree_gets_default_name() {
        let namer = TruncatingNamer::new(60);
        assert_eq!(namer.name_session(&MessageTree::new()), DEFAULT_SESSION_NAME);
    }

    #[test]
    fn names_after_first_user_message() {
        let mut tree = MessageTree::new();
        tree.attach(None, 1, NewMessage::user("How do I rotate the API keys?"), Utc::now())
            .unwrap();
        tree.attach(Some(1), 2, NewMessage::assistant("Like this."), Utc::now())
            .unwrap();

        let namer = TruncatingNamer::new(60);
        assert_eq!(namer.name_session(&tree), "How do I rotate the API keys?");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let mut tree = MessageTree::new();
        tree.attach(None, 1, NewMessage::user("héllo wörld, this runs long"), Utc::now())
            .unwrap();

        let namer = TruncatingNamer::new(5);
        assert_eq!(namer.name_session(&tree), "héllo");
    }
}
