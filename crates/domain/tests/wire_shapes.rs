//! Wire-contract checks: field names, integer ids, ISO-8601 timestamps.

use chrono::{TimeZone, Utc};
use std::collections::HashMap;

use tc_domain::message::MessageType;
use tc_domain::requests::{
    ChatMessageDetail, ChatSessionDetails, ChatSessionsResponse, SharedStatus,
};

#[test]
fn message_detail_time_sent_is_iso8601() {
    let detail = ChatMessageDetail {
        message_id: 12,
        parent_message: Some(11),
        latest_child_message: None,
        message: "the answer".into(),
        rephrased_query: Some("rephrased".into()),
        context_docs: None,
        message_type: MessageType::Assistant,
        time_sent: Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap(),
        alternate_assistant_id: None,
        citations: HashMap::from([(1, 44)]),
        files: Vec::new(),
        tool_calls: Vec::new(),
    };

    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["time_sent"], "2026-03-01T12:30:00Z");
    assert_eq!(json["message_id"], 12);
    assert_eq!(json["citations"]["1"], 44);
}

#[test]
fn message_detail_round_trips() {
    let json = r#"{
        "message_id": 1,
        "parent_message": null,
        "latest_child_message": 2,
        "message": "hello",
        "rephrased_query": null,
        "context_docs": null,
        "message_type": "user",
        "time_sent": "2026-03-01T12:30:00Z",
        "alternate_assistant_id": null,
        "citations": {},
        "files": [],
        "tool_calls": []
    }"#;
    let detail: ChatMessageDetail = serde_json::from_str(json).unwrap();
    assert_eq!(detail.message_type, MessageType::User);
    assert_eq!(detail.latest_child_message, Some(2));
}

#[test]
fn session_list_shape() {
    let resp = ChatSessionsResponse {
        sessions: vec![ChatSessionDetails {
            id: 1,
            name: "Quarterly report questions".into(),
            persona_id: 0,
            time_created: "2026-03-01T09:00:00Z".into(),
            shared_status: SharedStatus::Private,
            folder_id: None,
            current_alternate_model: Some("gpt-4o".into()),
        }],
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["sessions"][0]["shared_status"], "private");
    assert_eq!(json["sessions"][0]["current_alternate_model"], "gpt-4o");
}
