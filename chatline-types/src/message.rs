use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Author of a timeline message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured payload of an image message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImageContent {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub alt: Option<String>,
}

/// Payload of a message, discriminated on the wire by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export)]
pub enum MessageContent {
    Text { content: String },
    Image { content: ImageContent },
}

impl MessageContent {
    /// Wire name of the variant, as carried in the `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            MessageContent::Text { .. } => "text",
            MessageContent::Image { .. } => "image",
        }
    }
}

/// A single entry of a conversation timeline.
///
/// Successive streamed chunks of the same logical message share one `id`.
/// A message carrying a `repository_id` is a checkpoint: it is tied to a
/// snapshot of generated code and is a valid rewind anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub repository_id: Option<String>,
    #[serde(flatten)]
    pub body: MessageContent,
}

impl Message {
    /// Create a text message
    pub fn text(id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            repository_id: None,
            body: MessageContent::Text {
                content: content.into(),
            },
        }
    }

    /// Create a user text message
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::text(id, MessageRole::User, content)
    }

    /// Create an assistant text message
    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::text(id, MessageRole::Assistant, content)
    }

    /// Create an image message
    pub fn image(id: impl Into<String>, role: MessageRole, content: ImageContent) -> Self {
        Self {
            id: id.into(),
            role,
            repository_id: None,
            body: MessageContent::Image { content },
        }
    }

    /// Attach a repository snapshot, turning the message into a checkpoint
    pub fn with_repository(mut self, repository_id: impl Into<String>) -> Self {
        self.repository_id = Some(repository_id.into());
        self
    }

    pub fn is_checkpoint(&self) -> bool {
        self.repository_id.is_some()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.body, MessageContent::Text { .. })
    }

    /// Text payload, if this is a text message
    pub fn text_content(&self) -> Option<&str> {
        match &self.body {
            MessageContent::Text { content } => Some(content),
            MessageContent::Image { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.body.kind()
    }
}
