//! Chat sessions for tidechat.
//!
//! A session is the aggregate root owning one branching message tree plus
//! its metadata (name, sharing status, active model override).  The store
//! serializes all mutations of a session behind one write lock, which is
//! the atomicity boundary for "append node + update latest-child pointer".

pub mod naming;
pub mod store;
pub mod tree;

pub use naming::{SessionNamer, TruncatingNamer, DEFAULT_SESSION_NAME};
pub use store::{ChatSession, ChatSessionStore};
pub use tree::{MessageNode, MessageTree, NewMessage, PathToLatest};
