use serde::{Deserialize, Serialize};

/// Role of a message node in the conversation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    System,
    User,
    Assistant,
}

/// Kind of file attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatFileType {
    Image,
    Doc,
}

/// Reference to a file uploaded alongside a message.  The file store itself
/// is an external collaborator; only the descriptor travels with the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub file_type: ChatFileType,
    #[serde(default)]
    pub name: Option<String>,
}

/// Final result of one tool invocation during an assistant turn.
/// A node's tool calls preserve invocation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool_name: String,
    pub tool_args: serde_json::Value,
    pub tool_result: serde_json::Value,
}
