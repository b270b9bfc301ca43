//! Prompt templates for the alignment and idea-suggestion requests.

use super::model::{PersonalityResponses, mode_label};

/// System persona for personality alignment.
pub const ALIGNMENT_SYSTEM_PROMPT: &str =
    "You are CollabAlign, an expert in collaborative personality synthesis.";

/// System persona for idea and career suggestions.
pub const IDEAS_SYSTEM_PROMPT: &str =
    "You are CollabAlign, an AI for collaborative idea/career alignment.";

const CAREER_CLAUSE: &str = "Emphasize jobs and roles over businesses. ";
const STARTUP_CLAUSE: &str = "Emphasize startup and project opportunities. ";

/// Build the personality-alignment instruction.
///
/// Exactly one of the career/startup clauses is included.
pub fn build_prompt(responses: &PersonalityResponses, career_mode: bool) -> String {
    let mut prompt = String::new();
    prompt.push_str("Diverse, inclusive lens. ");
    prompt.push_str("Analyze traits ");
    prompt.push_str(&responses.render());
    prompt.push_str(
        " for passion alignment. Map to collaboration opportunities \
         (e.g., high extraversion = great co-founder). ",
    );
    prompt.push_str(
        "Factor AI trends and unemployment-risk in the labor market for career resilience. ",
    );
    prompt.push_str(if career_mode {
        CAREER_CLAUSE
    } else {
        STARTUP_CLAUSE
    });
    prompt.push_str(
        "Output: 1) Short summary; 2) Bullet passion list aligned to teamwork and resilience.",
    );
    prompt
}

/// Canned alignment text used when the collaborator call fails.
pub fn fallback_summary(career_mode: bool, reason: &str) -> String {
    format!(
        "Summary: Collaborative profile generated.\n\n\
         - Passions: learning, building, teaming, community.\n\
         - Mode: {} resilience focus.\n\
         - Note: offline analysis due to error: {reason}",
        mode_label(career_mode)
    )
}

/// User message for the idea-suggestion request.
pub fn idea_user_message(context: &str, goal_type: &str, user_prompt: &str) -> String {
    format!("Context: {context}\nGoal type: {goal_type}\nPrompt: {user_prompt}")
}

/// Goal type label sent with idea requests.
pub fn goal_type(career_mode: bool) -> &'static str {
    if career_mode {
        "Career"
    } else {
        "Startup/Business"
    }
}

/// Human-readable mode caption for the ideas screen.
pub fn mode_caption(career_mode: bool) -> &'static str {
    if career_mode {
        "Career-focused (resilience, employability)"
    } else {
        "Business/Startup ideas"
    }
}
