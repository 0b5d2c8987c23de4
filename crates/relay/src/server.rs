use std::sync::Arc;

use config::RelayConfig;

use crate::{
    backend::BackendClient,
    clock::{TimeReply, TimeResponder},
    completion::CompletionClient,
    error::RelayError,
    intent::IntentDetector,
    messages::{ChatRequest, ChatResponse},
};

#[derive(Clone)]
pub(crate) struct RelayServer {
    shared: Arc<RelayServerInner>,
}

struct RelayServerInner {
    time: TimeResponder,
    backend: BackendClient,
}

impl RelayServer {
    pub fn new(config: &RelayConfig) -> crate::Result<Self> {
        let detector = IntentDetector::new(&config.intent.keywords).map_err(|e| {
            log::error!("Failed to compile time query keywords: {e}");
            RelayError::Internal(Some(format!("Invalid time query keywords: {e}")))
        })?;

        let completion = CompletionClient::new(&config.completion)?;
        let time = TimeResponder::new(detector, completion, &config.completion);
        let backend = BackendClient::new(&config.backend)?;

        Ok(Self {
            shared: Arc::new(RelayServerInner { time, backend }),
        })
    }

    /// Answers a chat request, either through the time path or the inference backend.
    pub async fn chat(&self, request: &ChatRequest) -> crate::Result<ChatResponse> {
        let content = request.last_content();

        match self.shared.time.respond(content).await {
            TimeReply::Answered(text) => {
                log::debug!("Time query answered by the completion API");
                return Ok(ChatResponse::new(text));
            }
            TimeReply::Failed(apology) => {
                log::debug!("Time query failed, answering with the fallback message");
                return Ok(ChatResponse::new(apology));
            }
            TimeReply::NoMatch => (),
        }

        let text = self.shared.backend.forward(content).await?;

        Ok(ChatResponse::new(text))
    }
}
