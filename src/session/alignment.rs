//! AlignmentRequester — turns collected answers into collaborator requests.
//!
//! The two request paths deliberately differ on failure: personality
//! alignment always yields text (falling back to a canned summary), idea
//! suggestions report the error to the caller.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::model::PersonalityResponses;
use super::prompts::{
    ALIGNMENT_SYSTEM_PROMPT, IDEAS_SYSTEM_PROMPT, build_prompt, fallback_summary,
    idea_user_message,
};
use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Result of a personality alignment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentOutcome {
    /// The collaborator answered.
    Generated { text: String },
    /// The collaborator failed; `text` is the canned summary.
    Fallback { text: String, reason: String },
}

impl AlignmentOutcome {
    /// The text shown to the user, whichever way it was produced.
    pub fn into_text(self) -> String {
        match self {
            Self::Generated { text } | Self::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Sends alignment and idea requests to the text-generation collaborator.
#[derive(Clone)]
pub struct AlignmentRequester {
    llm: Arc<dyn LlmProvider>,
    temperature: f32,
}

impl AlignmentRequester {
    pub fn new(llm: Arc<dyn LlmProvider>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Ask for a collaborative alignment summary. Never fails.
    pub async fn request_alignment(
        &self,
        responses: &PersonalityResponses,
        career_mode: bool,
    ) -> AlignmentOutcome {
        let messages = vec![
            ChatMessage::system(ALIGNMENT_SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(responses, career_mode)),
        ];

        match self.send(messages).await {
            Ok(text) => {
                info!(career_mode, chars = text.len(), "Alignment generated");
                AlignmentOutcome::Generated { text }
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(career_mode, error = %reason, "Alignment request failed, using fallback");
                AlignmentOutcome::Fallback {
                    text: fallback_summary(career_mode, &reason),
                    reason,
                }
            }
        }
    }

    /// Ask for idea or career suggestions. Errors are returned as-is.
    pub async fn request_idea_suggestions(
        &self,
        context: &str,
        goal_type: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        let messages = vec![
            ChatMessage::system(IDEAS_SYSTEM_PROMPT),
            ChatMessage::user(idea_user_message(context, goal_type, user_prompt)),
        ];

        self.send(messages).await.inspect_err(|e| {
            warn!(goal_type, error = %e, "Idea suggestion request failed");
        })
    }

    async fn send(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let request = CompletionRequest::new(messages).with_temperature(self.temperature);
        let response = self.llm.complete(request).await?;
        Ok(response.content)
    }
}
