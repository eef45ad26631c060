use std::collections::HashMap;

use uuid::Uuid;

use buddyscript_utils::id::new_uuid;

use crate::database::{catch_unique_violation, DatabaseClient, DatabaseError};
use super::types::{
    DbReaction,
    ReactionAction,
    ReactionBreakdown,
    ReactionType,
    TargetType,
};

/// Toggles user's reaction on a target.
/// Same reaction type removes the reaction, another type replaces it.
pub async fn react(
    db_client: &mut impl DatabaseClient,
    user_id: &Uuid,
    target_type: &TargetType,
    target_id: &Uuid,
    reaction_type: &ReactionType,
) -> Result<ReactionAction, DatabaseError> {
    let transaction = db_client.transaction().await?;
    let maybe_row = transaction.query_opt(
        "
        SELECT reaction
        FROM reaction
        WHERE target_type = $1 AND target_id = $2 AND user_id = $3
        FOR UPDATE
        ",
        &[&target_type, &target_id, &user_id],
    ).await?;
    let maybe_reaction: Option<DbReaction> = match maybe_row {
        Some(row) => Some(row.try_get("reaction")?),
        None => None,
    };
    let action = match maybe_reaction {
        None => {
            let reaction_id = new_uuid();
            transaction.execute(
                "
                INSERT INTO reaction (
                    id,
                    target_type,
                    target_id,
                    user_id,
                    reaction_type
                )
                VALUES ($1, $2, $3, $4, $5)
                ",
                &[
                    &reaction_id,
                    &target_type,
                    &target_id,
                    &user_id,
                    &reaction_type,
                ],
            ).await.map_err(catch_unique_violation("reaction"))?;
            ReactionAction::Added
        },
        Some(reaction) if &reaction.reaction_type == reaction_type => {
            transaction.execute(
                "DELETE FROM reaction WHERE id = $1",
                &[&reaction.id],
            ).await?;
            ReactionAction::Removed
        },
        Some(reaction) => {
            transaction.execute(
                "
                UPDATE reaction
                SET reaction_type = $2, updated_at = CURRENT_TIMESTAMP
                WHERE id = $1
                ",
                &[&reaction.id, &reaction_type],
            ).await?;
            ReactionAction::Updated
        },
    };
    transaction.commit().await?;
    Ok(action)
}

pub async fn remove_reaction(
    db_client: &impl DatabaseClient,
    user_id: &Uuid,
    target_type: &TargetType,
    target_id: &Uuid,
) -> Result<(), DatabaseError> {
    let deleted_count = db_client.execute(
        "
        DELETE FROM reaction
        WHERE target_type = $1 AND target_id = $2 AND user_id = $3
        ",
        &[&target_type, &target_id, &user_id],
    ).await?;
    if deleted_count == 0 {
        return Err(DatabaseError::NotFound("reaction"));
    };
    Ok(())
}

/// Returns reaction breakdowns keyed by target ID.
/// Targets without reactions are not included.
pub async fn get_reaction_breakdowns(
    db_client: &impl DatabaseClient,
    target_type: &TargetType,
    target_ids: &[Uuid],
) -> Result<HashMap<Uuid, ReactionBreakdown>, DatabaseError> {
    let rows = db_client.query(
        "
        SELECT
            target_id,
            reaction_type,
            array_agg(user_id ORDER BY created_at) AS user_ids
        FROM reaction
        WHERE target_type = $1 AND target_id = ANY($2)
        GROUP BY target_id, reaction_type
        ",
        &[&target_type, &target_ids],
    ).await?;
    let mut breakdowns: HashMap<Uuid, ReactionBreakdown> = HashMap::new();
    for row in rows {
        let target_id: Uuid = row.try_get("target_id")?;
        let reaction_type: ReactionType = row.try_get("reaction_type")?;
        let user_ids: Vec<Uuid> = row.try_get("user_ids")?;
        breakdowns.entry(target_id)
            .or_default()
            .set_group(&reaction_type, user_ids);
    };
    Ok(breakdowns)
}

pub async fn get_reaction_breakdown(
    db_client: &impl DatabaseClient,
    target_type: &TargetType,
    target_id: &Uuid,
) -> Result<ReactionBreakdown, DatabaseError> {
    let mut breakdowns =
        get_reaction_breakdowns(db_client, target_type, &[*target_id]).await?;
    let breakdown = breakdowns.remove(target_id).unwrap_or_default();
    Ok(breakdown)
}
