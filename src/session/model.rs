//! Session data model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::Stage;

/// The twelve Likert-scale questions of the personality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
    PhysicsVibe,
    EconVibe,
    CollaborationPreference,
    PassionProbeCareers,
    RiskInTeams,
    AiAdaptability,
    GroupDynamics,
}

impl PersonalityTrait {
    pub const ALL: [PersonalityTrait; 12] = [
        Self::Openness,
        Self::Conscientiousness,
        Self::Extraversion,
        Self::Agreeableness,
        Self::Neuroticism,
        Self::PhysicsVibe,
        Self::EconVibe,
        Self::CollaborationPreference,
        Self::PassionProbeCareers,
        Self::RiskInTeams,
        Self::AiAdaptability,
        Self::GroupDynamics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openness => "openness",
            Self::Conscientiousness => "conscientiousness",
            Self::Extraversion => "extraversion",
            Self::Agreeableness => "agreeableness",
            Self::Neuroticism => "neuroticism",
            Self::PhysicsVibe => "physics_vibe",
            Self::EconVibe => "econ_vibe",
            Self::CollaborationPreference => "collaboration_preference",
            Self::PassionProbeCareers => "passion_probe_careers",
            Self::RiskInTeams => "risk_in_teams",
            Self::AiAdaptability => "ai_adaptability",
            Self::GroupDynamics => "group_dynamics",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for PersonalityTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowest accepted answer.
pub const ANSWER_MIN: i64 = 1;
/// Highest accepted answer.
pub const ANSWER_MAX: i64 = 5;

/// Validated personality answers, every value in `[1, 5]`.
///
/// Empty until the first successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonalityResponses(BTreeMap<PersonalityTrait, u8>);

impl PersonalityResponses {
    pub(crate) fn from_validated(answers: BTreeMap<PersonalityTrait, u8>) -> Self {
        Self(answers)
    }

    pub fn get(&self, personality_trait: PersonalityTrait) -> Option<u8> {
        self.0.get(&personality_trait).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonalityTrait, u8)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Render as `{openness: 3, conscientiousness: 4, ...}` for prompts.
    pub fn render(&self) -> String {
        let body = self
            .iter()
            .map(|(t, v)| format!("{t}: {v}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{body}}}")
    }
}

/// Free-text skills assessment, replaced wholesale on every save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsPassions {
    pub skills: Vec<String>,
    pub passions: Vec<String>,
    pub availability: String,
    pub strengths: String,
}

/// A potential co-founder on the shortlist. Fields are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cofounder {
    pub name: String,
    pub email: String,
    pub notes: String,
}

/// A participant's alignment result shared with the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedUser {
    pub user: String,
    pub alignment: String,
}

/// Everything one interactive session has collected.
///
/// Owned by exactly one session; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: Uuid,
    pub stage: Stage,
    pub responses: PersonalityResponses,
    /// Latest personality alignment text.
    pub alignment: String,
    pub skills_passions: SkillsPassions,
    pub ideas: Vec<String>,
    pub cofounders: Vec<Cofounder>,
    pub shared_users: Vec<SharedUser>,
    pub career_focus_mode: bool,
    /// 0 means "not set".
    pub progress_override: u8,
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            stage: Stage::default(),
            responses: PersonalityResponses::default(),
            alignment: String::new(),
            skills_passions: SkillsPassions::default(),
            ideas: Vec::new(),
            cofounders: Vec::new(),
            shared_users: Vec::new(),
            career_focus_mode: false,
            progress_override: 0,
            created_at: Utc::now(),
        }
    }

    /// Label used in prompts and fallback text.
    pub fn mode_label(&self) -> &'static str {
        mode_label(self.career_focus_mode)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// `Career` or `Startup`.
pub fn mode_label(career_mode: bool) -> &'static str {
    if career_mode { "Career" } else { "Startup" }
}
