use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Incoming chat request.
///
/// Every field is optional on the wire: a request without messages, or whose
/// last message has no text content, is still a valid request. Messages are
/// kept as raw JSON, only the text of the latest one is ever read.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChatRequest {
    #[serde(default, deserialize_with = "messages_or_empty")]
    pub(crate) messages: Vec<Value>,
}

impl ChatRequest {
    /// Role of the latest message, if it is a string.
    pub(crate) fn last_role(&self) -> Option<&str> {
        self.last_field("role")
    }

    /// Content of the latest message, if it is a string.
    ///
    /// Multi-part content, numbers and messages that are not objects all count as absent.
    pub(crate) fn last_content(&self) -> Option<&str> {
        self.last_field("content")
    }

    fn last_field(&self, name: &str) -> Option<&str> {
        self.messages.last()?.get(name)?.as_str()
    }
}

/// Anything other than an array is treated as no messages at all.
fn messages_or_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(messages) => Ok(messages),
        _ => Ok(Vec::new()),
    }
}

/// The one response shape the relay answers with, whichever collaborator produced the text.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) choices: Vec<Choice>,
}

impl ChatResponse {
    pub(crate) fn new(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ChoiceMessage {
                    content: content.into(),
                },
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Choice {
    pub(crate) message: ChoiceMessage,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChoiceMessage {
    pub(crate) content: String,
}
