use serde::Deserialize;

/// Response body of the Chat Completions API.
///
/// Everything is optional: a response without choices or content parses
/// fine and simply carries no text.
#[derive(Debug, Default, Deserialize)]
pub(super) struct CompletionResponse {
    #[serde(default)]
    pub(super) choices: Option<Vec<CompletionChoice>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CompletionChoice {
    #[serde(default)]
    pub(super) message: Option<CompletionChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CompletionChoiceMessage {
    #[serde(default)]
    pub(super) content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, if it has any.
    pub(super) fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .flatten()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
    }
}
