//! Stage state machine — which screen the session is on and how far along
//! it reports itself.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::SessionState;
use crate::error::SessionError;

/// The stages of the guided flow, in display order.
///
/// Navigation may jump to any stage; the order only matters for progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Welcome,
    Test,
    Skills,
    Ideas,
    Cofounders,
}

impl Stage {
    /// Every stage, in order.
    pub const ALL: [Stage; 5] = [
        Stage::Welcome,
        Stage::Test,
        Stage::Skills,
        Stage::Ideas,
        Stage::Cofounders,
    ];

    /// 0-based position in [`Stage::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Welcome => 0,
            Self::Test => 1,
            Self::Skills => 2,
            Self::Ideas => 3,
            Self::Cofounders => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Test => "test",
            Self::Skills => "skills",
            Self::Ideas => "ideas",
            Self::Cofounders => "cofounders",
        }
    }

    /// Progress implied by position alone: 0 for the first stage, otherwise
    /// `round(index / (count - 1) * 100)`.
    pub fn derived_progress(&self) -> u8 {
        let i = self.index();
        if i == 0 {
            return 0;
        }
        let last = (Self::ALL.len() - 1) as f64;
        ((i as f64 / last) * 100.0).round() as u8
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| SessionError::InvalidStage(s.to_string()))
    }
}

impl SessionState {
    /// Jump to `stage_name`. Leaves any progress override in place.
    pub fn navigate(&mut self, stage_name: &str) -> Result<Stage, SessionError> {
        let stage: Stage = stage_name.parse()?;
        self.stage = stage;
        tracing::debug!(session_id = %self.session_id, %stage, "Navigated");
        Ok(stage)
    }

    /// Displayed progress: the override when nonzero, else the derived value.
    pub fn compute_progress(&self) -> u8 {
        if self.progress_override != 0 {
            self.progress_override
        } else {
            self.stage.derived_progress()
        }
    }

    /// Move to `next_stage` and pin the displayed progress in one step.
    pub fn advance_with_override(
        &mut self,
        next_stage: Stage,
        override_value: u32,
    ) -> Result<(), SessionError> {
        let value = u8::try_from(override_value)
            .ok()
            .filter(|v| *v <= 100)
            .ok_or(SessionError::InvalidProgress(override_value))?;
        self.stage = next_stage;
        self.progress_override = value;
        tracing::debug!(
            session_id = %self.session_id,
            stage = %next_stage,
            progress = value,
            "Advanced with progress override"
        );
        Ok(())
    }

    /// Throw everything away and start a fresh session under a new id.
    pub fn reset(&mut self) {
        let previous = self.session_id;
        *self = SessionState::new();
        tracing::info!(%previous, session_id = %self.session_id, "Session reset");
    }
}
