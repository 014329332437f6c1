//! End-to-end branching behavior over the session store.

use tc_domain::config::ChatDefaults;
use tc_domain::error::Error;
use tc_domain::requests::ChatFeedbackRequest;
use tc_sessions::{ChatSessionStore, NewMessage};

#[test]
fn branch_at_root_replaces_default_path_without_data_loss() {
    let store = ChatSessionStore::in_memory(&ChatDefaults::default());
    let session = store.create(0, None);

    // Hello -> reply.
    let root = store
        .attach_message(session, None, NewMessage::user("Hello"))
        .unwrap();
    let reply = store
        .attach_message(session, Some(root), NewMessage::assistant("reply"))
        .unwrap();

    let path: Vec<String> = store
        .path_from_root(session, root)
        .unwrap()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(path, vec!["Hello", "reply"]);

    // Branch again at the very first turn.
    let root2 = store
        .attach_message(session, None, NewMessage::user("Hello again"))
        .unwrap();

    let new_path: Vec<String> = store
        .path_to_latest(session)
        .unwrap()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(new_path, vec!["Hello again"]);

    // The original reply is still retrievable by its own id.
    let kept = store.get_message(session, reply).unwrap();
    assert_eq!(kept.message, "reply");
    assert_eq!(kept.parent, Some(root));

    // And the original root still renders its branch.
    let old_path: Vec<i64> = store
        .path_from_root(session, root)
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(old_path, vec![root, reply]);
    assert_ne!(root, root2);
}

#[test]
fn sibling_branches_leave_existing_subtrees_alone() {
    let store = ChatSessionStore::in_memory(&ChatDefaults::default());
    let session = store.create(0, None);

    let root = store
        .attach_message(session, None, NewMessage::user("q"))
        .unwrap();
    let v1 = store
        .attach_message(session, Some(root), NewMessage::assistant("v1"))
        .unwrap();
    let v1_followup = store
        .attach_message(session, Some(v1), NewMessage::user("more?"))
        .unwrap();

    let before = store.get_message(session, v1).unwrap();

    // Fork the answer.
    store
        .attach_message(session, Some(root), NewMessage::assistant("v2"))
        .unwrap();

    let after = store.get_message(session, v1).unwrap();
    assert_eq!(before.latest_child, after.latest_child);
    assert_eq!(after.latest_child, Some(v1_followup));
    assert_eq!(store.get_message(session, v1_followup).unwrap().message, "more?");
}

#[test]
fn empty_chat_feedback_is_rejected_with_named_rule() {
    let store = ChatSessionStore::in_memory(&ChatDefaults::default());
    let err = store
        .record_chat_feedback(ChatFeedbackRequest {
            chat_message_id: 5,
            is_positive: None,
            feedback_text: None,
            predefined_feedback: None,
        })
        .unwrap_err();
    match err {
        Error::Validation { rule, .. } => assert_eq!(rule, "is_positive_or_feedback_text"),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn snapshot_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let defaults = ChatDefaults::default();

    let session;
    let root;
    {
        let store = ChatSessionStore::open(dir.path(), &defaults).unwrap();
        session = store.create(3, Some("Budget review".into()));
        root = store
            .attach_message(session, None, NewMessage::user("Where did Q3 land?"))
            .unwrap();
        store
            .attach_message(session, Some(root), NewMessage::assistant("Over plan."))
            .unwrap();
        store.flush().unwrap();
    }

    let reloaded = ChatSessionStore::open(dir.path(), &defaults).unwrap();
    let rows = reloaded.list();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].persona_id, 3);

    let path = reloaded.path_to_latest(session).unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(path[0].id, root);

    // Id minting resumes past the snapshot.
    let next = reloaded
        .attach_message(session, Some(path[1].id), NewMessage::user("And Q4?"))
        .unwrap();
    assert!(next > path[1].id);
}
