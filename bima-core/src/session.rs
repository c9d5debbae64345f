//! Per-conversation transcript and state for the assistant chat.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::assistant::{Assistant, ChatMessage, Reply, Role};
use crate::error::{AdapterError, ValidationError};
use crate::language::Language;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    Idle,
    AwaitingResponse,
    Responded,
    Error,
}

/// One user's chat with the assistant.
///
/// `submit` takes `&mut self`, so a session never has more than one model call in
/// flight. Dropping a pending `submit` cancels the call and leaves the user turn
/// unanswered.
#[derive(Debug, Clone)]
pub struct ChatSession {
    language: Language,
    state: ChatState,
    turns: Vec<ConversationTurn>,
    last_error: Option<AdapterError>,
}

impl ChatSession {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            state: ChatState::Idle,
            turns: vec![ConversationTurn::new(Role::Assistant, language.greeting())],
            last_error: None,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    /// The model failure behind the most recent apology, cleared by the next submit.
    pub fn last_error(&self) -> Option<&AdapterError> {
        self.last_error.as_ref()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Prior turns in the shape the model expects.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .map(|turn| ChatMessage {
                role: turn.role,
                content: turn.text.clone(),
            })
            .collect()
    }

    /// Keeps the transcript and greets in the new language.
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        info!(from = %self.language, to = %language, "Chat language changed");
        self.language = language;
        self.turns
            .push(ConversationTurn::new(Role::Assistant, language.greeting()));
    }

    /// Send a user message. Model failures are answered with an apology turn;
    /// only an empty message is an error.
    pub async fn submit(
        &mut self,
        assistant: &Assistant,
        message: &str,
    ) -> Result<Reply, ValidationError> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        let history = self.history();
        self.turns.push(ConversationTurn::new(Role::User, message));
        self.state = ChatState::AwaitingResponse;
        self.last_error = None;

        let reply = match assistant.reply(message, self.language, &history).await {
            Ok(reply) => reply,
            Err(e) => {
                self.state = ChatState::Error;
                error!(error = %e, language = %self.language, "Assistant failed to respond");
                self.last_error = Some(e);
                Reply::apology(self.language)
            }
        };

        self.turns
            .push(ConversationTurn::new(Role::Assistant, reply.text.clone()));
        self.state = ChatState::Responded;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::testing::ScriptedModel;
    use std::sync::Arc;
    use std::time::Duration;

    fn assistant(model: Arc<ScriptedModel>) -> Assistant {
        Assistant::new(model, None, Duration::from_secs(1))
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = ChatSession::new(Language::Tamil);
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].role, Role::Assistant);
        assert_eq!(session.turns()[0].text, Language::Tamil.greeting());
    }

    #[tokio::test]
    async fn test_submit_appends_both_turns() {
        let model = Arc::new(ScriptedModel::answering("Look for lifetime renewability."));
        let bot = assistant(model.clone());
        let mut session = ChatSession::new(Language::English);

        let reply = session.submit(&bot, "What matters on renewal?").await.unwrap();
        assert_eq!(reply.text, "Look for lifetime renewability.");
        assert_eq!(session.state(), ChatState::Responded);
        assert_eq!(session.turns().len(), 3);
        assert_eq!(session.turns()[1].role, Role::User);
        assert_eq!(session.turns()[2].text, "Look for lifetime renewability.");

        // The greeting is history; the new message is not.
        let requests = model.requests.lock().unwrap();
        assert_eq!(requests[0].history.len(), 1);
        assert_eq!(requests[0].history[0].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_model_failure_yields_apology_turn() {
        let bot = assistant(Arc::new(ScriptedModel::failing()));
        let mut session = ChatSession::new(Language::Hindi);

        let reply = session.submit(&bot, "नमस्ते").await.unwrap();
        assert_eq!(reply.text, Language::Hindi.apology());
        assert_eq!(session.state(), ChatState::Responded);
        assert_eq!(session.turns().last().unwrap().text, Language::Hindi.apology());
        assert!(matches!(
            session.last_error(),
            Some(AdapterError::LanguageModel(_))
        ));
    }

    #[tokio::test]
    async fn test_successful_submit_clears_last_error() {
        let mut session = ChatSession::new(Language::English);
        session
            .submit(&assistant(Arc::new(ScriptedModel::failing())), "Hello")
            .await
            .unwrap();
        assert!(session.last_error().is_some());

        let bot = assistant(Arc::new(ScriptedModel::answering("Hi there.")));
        let reply = session.submit(&bot, "Hello again").await.unwrap();
        assert_eq!(reply.text, "Hi there.");
        assert_eq!(session.last_error(), None);
        assert_eq!(session.state(), ChatState::Responded);
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected_without_state_change() {
        let bot = assistant(Arc::new(ScriptedModel::answering("unused")));
        let mut session = ChatSession::new(Language::English);

        assert_eq!(
            session.submit(&bot, "   ").await,
            Err(ValidationError::EmptyMessage)
        );
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(session.turns().len(), 1);
    }

    #[test]
    fn test_language_switch_keeps_transcript() {
        let mut session = ChatSession::new(Language::English);
        session.set_language(Language::English);
        assert_eq!(session.turns().len(), 1);

        session.set_language(Language::Bengali);
        assert_eq!(session.language(), Language::Bengali);
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[0].text, Language::English.greeting());
        assert_eq!(session.turns()[1].text, Language::Bengali.greeting());
    }
}
