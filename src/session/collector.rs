//! Form input validation and normalization.
//!
//! Each operation either writes its whole record into the session or
//! returns an error and writes nothing.

use std::collections::BTreeMap;

use super::model::{
    ANSWER_MAX, ANSWER_MIN, Cofounder, PersonalityResponses, PersonalityTrait, SessionState,
    SkillsPassions,
};
use crate::error::SessionError;

/// Raw personality answers as submitted: trait name → integer.
pub type RawAnswers = BTreeMap<String, i64>;

impl PersonalityResponses {
    /// Validate a raw submission. All twelve traits must be present, no
    /// others, and every value must lie in `[1, 5]`.
    pub fn from_raw(raw: &RawAnswers) -> Result<Self, SessionError> {
        let unknown: Vec<String> = raw
            .keys()
            .filter(|name| PersonalityTrait::from_name(name).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(SessionError::UnknownTraits { fields: unknown });
        }

        let missing: Vec<String> = PersonalityTrait::ALL
            .iter()
            .filter(|t| !raw.contains_key(t.as_str()))
            .map(|t| t.as_str().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SessionError::MissingTraits { fields: missing });
        }

        let mut answers = BTreeMap::new();
        let mut out_of_range = Vec::new();
        for t in PersonalityTrait::ALL {
            let value = raw[t.as_str()];
            if (ANSWER_MIN..=ANSWER_MAX).contains(&value) {
                answers.insert(t, value as u8);
            } else {
                out_of_range.push(t.as_str().to_string());
            }
        }
        if !out_of_range.is_empty() {
            return Err(SessionError::OutOfRange {
                fields: out_of_range,
            });
        }

        Ok(Self::from_validated(answers))
    }
}

/// Split a comma-separated field: trim tokens, drop empties, keep order and
/// duplicates.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl SessionState {
    /// Validate and store a personality submission, replacing any earlier one.
    pub fn submit_personality(
        &mut self,
        raw_answers: &RawAnswers,
    ) -> Result<PersonalityResponses, SessionError> {
        let responses = PersonalityResponses::from_raw(raw_answers).inspect_err(|e| {
            tracing::info!(session_id = %self.session_id, error = %e, "Rejected personality submission");
        })?;
        self.responses = responses.clone();
        Ok(responses)
    }

    /// Store the skills assessment. Never fails.
    pub fn save_skills_passions(
        &mut self,
        skills_text: &str,
        passions_text: &str,
        availability_text: &str,
        strengths_text: &str,
    ) -> &SkillsPassions {
        self.skills_passions = SkillsPassions {
            skills: split_list(skills_text),
            passions: split_list(passions_text),
            availability: availability_text.trim().to_string(),
            strengths: strengths_text.trim().to_string(),
        };
        &self.skills_passions
    }

    /// Add a co-founder to the shortlist. Email format is not checked.
    pub fn add_cofounder(&mut self, name: &str, email: &str, notes: &str) -> &Cofounder {
        self.cofounders.push(Cofounder {
            name: name.to_string(),
            email: email.to_string(),
            notes: notes.to_string(),
        });
        &self.cofounders[self.cofounders.len() - 1]
    }

    /// Append generated idea text. Identical text is appended again.
    pub fn append_idea(&mut self, text: impl Into<String>) {
        self.ideas.push(text.into());
    }

    pub fn set_career_focus(&mut self, enabled: bool) {
        self.career_focus_mode = enabled;
    }
}
