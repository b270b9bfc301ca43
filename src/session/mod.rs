//! Session core — one interactive run through the guided flow.
//!
//! A session walks the stages welcome → test → skills → ideas → cofounders
//! (in any order the user likes), collecting personality answers, skills and
//! passions, generated ideas and a co-founder shortlist. All state is held in
//! memory and discarded on reset.

pub mod alignment;
pub mod collector;
pub mod manager;
pub mod model;
pub mod prompts;
pub mod routes;
pub mod stage;

pub use alignment::{AlignmentOutcome, AlignmentRequester};
pub use collector::{RawAnswers, split_list};
pub use manager::{ManagerOptions, SessionManager, SessionSnapshot};
pub use model::{
    Cofounder, PersonalityResponses, PersonalityTrait, SessionState, SharedUser, SkillsPassions,
};
pub use routes::{SessionRouteState, session_routes};
pub use stage::Stage;
