use serde::Serialize;

/// Request body for the Chat Completions API.
///
/// Only the fields the relay sends are modelled, as documented in the
/// [OpenAI API Reference](https://platform.openai.com/docs/api-reference/chat/create).
#[derive(Debug, Serialize)]
pub(super) struct CompletionRequest<'a> {
    /// ID of the model to use.
    pub(super) model: &'a str,

    /// The conversation sent to the model. The relay always sends a single user turn.
    pub(super) messages: Vec<CompletionMessage<'a>>,

    /// What sampling temperature to use, between 0 and 2.
    pub(super) temperature: f32,
}

#[derive(Debug, Serialize)]
pub(super) struct CompletionMessage<'a> {
    pub(super) role: &'static str,
    pub(super) content: &'a str,
}

impl<'a> CompletionRequest<'a> {
    pub(super) fn single_turn(model: &'a str, temperature: f32, prompt: &'a str) -> Self {
        Self {
            model,
            messages: vec![CompletionMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        }
    }
}
