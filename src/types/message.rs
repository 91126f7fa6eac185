use serde::{Deserialize, Serialize};

use crate::types::constants::TYPING_TYPE;

/// Outbound chat message payload.
///
/// Serialized shape: `{ "content": "...", "parent_id": 7, "document_id": 3 }`
/// with both optional fields omitted when absent. `parent_id` threads the
/// message as a reply; `document_id` attaches a shared document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatPayload {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<u64>,
}

impl ChatPayload {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_id: None,
            document_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: u64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_document(mut self, document_id: u64) -> Self {
        self.document_id = Some(document_id);
        self
    }
}

/// Outbound typing indicator payload.
///
/// Serialized shape: `{ "type": "typing", "is_typing": true }`.
/// At-most-once semantics: never retried, never queued.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TypingPayload {
    #[serde(rename = "type")]
    kind: &'static str,
    pub is_typing: bool,
}

impl TypingPayload {
    pub fn new(is_typing: bool) -> Self {
        Self {
            kind: TYPING_TYPE,
            is_typing,
        }
    }
}
