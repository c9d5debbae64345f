use async_trait::async_trait;
use bima_core::{AdapterError, ChatMessage, CompletionRequest, LanguageModel, Role};
use rig::client::CompletionClient;
use rig::completion::{Chat, Message};
use rig::providers::openai;
use tracing::debug;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u64 = 1000;

/// Chat completions through rig's OpenAI provider.
pub struct OpenAiModel {
    client: openai::Client,
    model: String,
}

impl OpenAiModel {
    pub fn new(api_key: &str, model: impl Into<String>) -> Self {
        Self {
            client: openai::Client::new(api_key),
            model: model.into(),
        }
    }
}

fn to_rig_message(msg: &ChatMessage) -> Message {
    match msg.role {
        Role::User => Message::user(msg.content.clone()),
        Role::Assistant => Message::assistant(msg.content.clone()),
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn complete(&self, request: CompletionRequest) -> bima_core::Result<String> {
        // The preamble differs per language, so the agent is built per call.
        let agent = self
            .client
            .agent(&self.model)
            .preamble(&request.system)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .build();

        let history: Vec<Message> = request.history.iter().map(to_rig_message).collect();
        debug!(model = %self.model, history_len = history.len(), "Calling OpenAI");

        agent
            .chat(&request.message, history)
            .await
            .map_err(|e| AdapterError::LanguageModel(e.to_string()))
    }
}

/// Stand-in used when no API key is configured; every call fails so callers
/// take their fallback path.
pub struct UnconfiguredModel;

#[async_trait]
impl LanguageModel for UnconfiguredModel {
    async fn complete(&self, _request: CompletionRequest) -> bima_core::Result<String> {
        Err(AdapterError::NotConfigured("OPENAI_API_KEY"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_model_fails() {
        let request = CompletionRequest {
            system: "system".to_string(),
            history: vec![],
            message: "hi".to_string(),
        };
        assert_eq!(
            UnconfiguredModel.complete(request).await,
            Err(AdapterError::NotConfigured("OPENAI_API_KEY"))
        );
    }
}
