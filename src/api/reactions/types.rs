use serde::{Deserialize, Serialize};
use uuid::Uuid;

use buddyscript_models::reactions::types::{
    ReactionAction,
    ReactionBreakdown,
    ReactionType,
    TargetType,
};

/// Reactions on a target as seen by the current user
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    pub reactions: ReactionBreakdown,
    pub total_reactions: usize,
    pub user_reaction: Option<ReactionType>,
}

impl ReactionSummary {
    pub fn new(reactions: ReactionBreakdown, current_user_id: &Uuid) -> Self {
        Self {
            total_reactions: reactions.total(),
            user_reaction: reactions.reaction_of(current_user_id),
            reactions,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionData {
    pub target_type: String,
    pub target_id: Uuid,
    pub reaction_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionTargetData {
    pub target_type: String,
    pub target_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReactions {
    pub target_type: TargetType,
    pub target_id: Uuid,
    #[serde(flatten)]
    pub summary: ReactionSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResult {
    pub action: &'static str,
    pub target_type: TargetType,
    pub target_id: Uuid,
    #[serde(flatten)]
    pub summary: ReactionSummary,
}

impl ReactionResult {
    pub fn message(action: &ReactionAction) -> &'static str {
        match action {
            ReactionAction::Added => "Reaction added",
            ReactionAction::Removed => "Reaction removed",
            ReactionAction::Updated => "Reaction updated",
        }
    }
}
