//! SessionManager — owns live sessions and runs the composite user actions.
//!
//! Each session sits behind its own async mutex, so an action (including a
//! slow collaborator call) completes before the next action on the same
//! session starts. Sessions never share state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::info;
use uuid::Uuid;

use super::alignment::AlignmentRequester;
use super::collector::RawAnswers;
use super::model::{Cofounder, PersonalityResponses, SessionState, SharedUser, SkillsPassions};
use super::prompts::{goal_type, mode_caption};
use super::stage::Stage;
use crate::error::{Error, SessionError};

/// Progress reported once the personality test is completed.
pub const TEST_COMPLETE_PROGRESS: u32 = 25;

/// Name recorded for the local participant in `shared_users`.
pub const LOCAL_USER: &str = "You";

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub stage: Stage,
    pub progress: u8,
    pub career_focus_mode: bool,
    pub mode_caption: &'static str,
    pub responses: PersonalityResponses,
    pub alignment: String,
    pub skills_passions: SkillsPassions,
    pub ideas: Vec<String>,
    pub cofounders: Vec<Cofounder>,
    pub shared_users: Vec<SharedUser>,
    pub shared_user_count: usize,
    pub share_link: String,
    pub credentials_configured: bool,
    pub created_at: DateTime<Utc>,
}

/// Options for the manager that are not per-session.
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    pub share_base_url: String,
    pub credentials_configured: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            share_base_url: "https://collabalign.app".to_string(),
            credentials_configured: false,
        }
    }
}

/// Coordinates sessions: creation, user actions, collaborator calls, reset.
pub struct SessionManager {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<SessionState>>>>,
    requester: AlignmentRequester,
    options: ManagerOptions,
}

impl SessionManager {
    pub fn new(requester: AlignmentRequester, options: ManagerOptions) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            requester,
            options,
        }
    }

    pub fn requester(&self) -> &AlignmentRequester {
        &self.requester
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Start a new session at the welcome stage.
    pub async fn create_session(&self) -> SessionSnapshot {
        let state = SessionState::new();
        let snapshot = self.snapshot_of(&state);
        self.sessions
            .write()
            .await
            .insert(state.session_id, Arc::new(Mutex::new(state)));
        info!(session_id = %snapshot.session_id, "Session created");
        snapshot
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        let state = self.lock(id).await?;
        Ok(self.snapshot_of(&state))
    }

    pub async fn navigate(&self, id: Uuid, stage_name: &str) -> Result<SessionSnapshot, SessionError> {
        let mut state = self.lock(id).await?;
        state.navigate(stage_name)?;
        Ok(self.snapshot_of(&state))
    }

    pub async fn set_career_focus(
        &self,
        id: Uuid,
        enabled: bool,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut state = self.lock(id).await?;
        state.set_career_focus(enabled);
        Ok(self.snapshot_of(&state))
    }

    /// Submit the personality test, analyze it, share the result, and move
    /// on to the skills stage with progress pinned at 25%.
    ///
    /// Invalid answers are rejected before anything is written. The analysis
    /// itself cannot fail (it falls back to canned text).
    pub async fn complete_personality_test(
        &self,
        id: Uuid,
        raw_answers: &RawAnswers,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut state = self.lock(id).await?;
        let responses = state.submit_personality(raw_answers)?;

        let outcome = self
            .requester
            .request_alignment(&responses, state.career_focus_mode)
            .await;
        if outcome.is_fallback() {
            info!(session_id = %id, "Personality analysis ran offline");
        }

        let alignment = outcome.into_text();
        state.alignment = alignment.clone();
        state.shared_users.push(SharedUser {
            user: LOCAL_USER.to_string(),
            alignment,
        });
        state.advance_with_override(Stage::Skills, TEST_COMPLETE_PROGRESS)?;

        info!(session_id = %id, progress = state.compute_progress(), "Personality test completed");
        Ok(self.snapshot_of(&state))
    }

    pub async fn save_skills_passions(
        &self,
        id: Uuid,
        skills_text: &str,
        passions_text: &str,
        availability_text: &str,
        strengths_text: &str,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut state = self.lock(id).await?;
        state.save_skills_passions(skills_text, passions_text, availability_text, strengths_text);
        Ok(self.snapshot_of(&state))
    }

    pub async fn add_cofounder(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        notes: &str,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut state = self.lock(id).await?;
        state.add_cofounder(name, email, notes);
        Ok(self.snapshot_of(&state))
    }

    /// Ask the collaborator for suggestions and append them to `ideas`.
    ///
    /// `context` defaults to the saved skills and passions. On failure the
    /// error is returned and the session is left untouched.
    pub async fn generate_ideas(
        &self,
        id: Uuid,
        context: Option<&str>,
        user_prompt: &str,
    ) -> Result<SessionSnapshot, Error> {
        let mut state = self.lock(id).await?;
        let context = match context {
            Some(c) => c.to_string(),
            None => default_idea_context(&state.skills_passions),
        };
        let goal = goal_type(state.career_focus_mode);

        let idea = self
            .requester
            .request_idea_suggestions(&context, goal, user_prompt)
            .await?;
        state.append_idea(idea);

        info!(session_id = %id, ideas = state.ideas.len(), "Idea suggestions generated");
        Ok(self.snapshot_of(&state))
    }

    /// Replace the session with a fresh one. The old id stops resolving.
    ///
    /// The session table is not locked while waiting on the session itself.
    pub async fn reset(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(SessionError::NotFound(id))?;

        let mut state = session.clone().lock_owned().await;
        state.reset();
        let snapshot = self.snapshot_of(&state);
        drop(state);

        self.sessions
            .write()
            .await
            .insert(snapshot.session_id, session);
        Ok(snapshot)
    }

    /// Lock a session for the duration of one action.
    async fn lock(&self, id: Uuid) -> Result<OwnedMutexGuard<SessionState>, SessionError> {
        let session = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))?;
        let guard = session.lock_owned().await;
        // A reset may have replaced the state while we waited.
        if guard.session_id != id {
            return Err(SessionError::NotFound(id));
        }
        Ok(guard)
    }

    fn snapshot_of(&self, state: &SessionState) -> SessionSnapshot {
        SessionSnapshot {
            session_id: state.session_id,
            stage: state.stage,
            progress: state.compute_progress(),
            career_focus_mode: state.career_focus_mode,
            mode_caption: mode_caption(state.career_focus_mode),
            responses: state.responses.clone(),
            alignment: state.alignment.clone(),
            skills_passions: state.skills_passions.clone(),
            ideas: state.ideas.clone(),
            cofounders: state.cofounders.clone(),
            shared_users: state.shared_users.clone(),
            shared_user_count: state.shared_users.len(),
            share_link: format!("{}/{}", self.options.share_base_url, state.session_id),
            credentials_configured: self.options.credentials_configured,
            created_at: state.created_at,
        }
    }
}

/// Skills and passions as idea context; empty until something is saved.
fn default_idea_context(skills_passions: &SkillsPassions) -> String {
    if *skills_passions == SkillsPassions::default() {
        return String::new();
    }
    serde_json::to_string(skills_passions).unwrap_or_default()
}
