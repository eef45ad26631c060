use std::str::FromStr;

use chrono::{DateTime, Utc};
use postgres_types::FromSql;
use serde::Serialize;
use uuid::Uuid;

use crate::database::{
    int_enum::int_enum_sql,
    DatabaseTypeError,
};

#[derive(thiserror::Error, Debug)]
#[error("invalid {0}")]
pub struct ParseError(&'static str);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReactionType {
    Like,
    Love,
    Haha,
    Care,
    Angry,
}

impl ReactionType {
    pub const ALL: [ReactionType; 5] = [
        Self::Like,
        Self::Love,
        Self::Haha,
        Self::Care,
        Self::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Love => "love",
            Self::Haha => "haha",
            Self::Care => "care",
            Self::Angry => "angry",
        }
    }
}

impl From<&ReactionType> for i16 {
    fn from(value: &ReactionType) -> i16 {
        match value {
            ReactionType::Like => 1,
            ReactionType::Love => 2,
            ReactionType::Haha => 3,
            ReactionType::Care => 4,
            ReactionType::Angry => 5,
        }
    }
}

impl TryFrom<i16> for ReactionType {
    type Error = DatabaseTypeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        let reaction_type = match value {
            1 => Self::Like,
            2 => Self::Love,
            3 => Self::Haha,
            4 => Self::Care,
            5 => Self::Angry,
            _ => return Err(DatabaseTypeError),
        };
        Ok(reaction_type)
    }
}

int_enum_sql!(ReactionType);

impl FromStr for ReactionType {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|reaction_type| reaction_type.as_str() == value)
            .ok_or(ParseError("reaction type"))
    }
}

impl Serialize for ReactionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: serde::Serializer
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetType {
    Post,
    Comment,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl From<&TargetType> for i16 {
    fn from(value: &TargetType) -> i16 {
        match value {
            TargetType::Post => 1,
            TargetType::Comment => 2,
        }
    }
}

impl TryFrom<i16> for TargetType {
    type Error = DatabaseTypeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        let target_type = match value {
            1 => Self::Post,
            2 => Self::Comment,
            _ => return Err(DatabaseTypeError),
        };
        Ok(target_type)
    }
}

int_enum_sql!(TargetType);

impl FromStr for TargetType {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let target_type = match value {
            "post" => Self::Post,
            "comment" => Self::Comment,
            _ => return Err(ParseError("target type")),
        };
        Ok(target_type)
    }
}

impl Serialize for TargetType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: serde::Serializer
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(FromSql)]
#[postgres(name = "reaction")]
pub struct DbReaction {
    pub id: Uuid,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub user_id: Uuid,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a react request
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReactionAction {
    Added,
    Removed,
    Updated,
}

impl ReactionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Updated => "updated",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionGroup {
    pub count: usize,
    pub user_ids: Vec<Uuid>,
}

/// Reactions on a single target, one group per reaction type
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReactionBreakdown {
    pub like: ReactionGroup,
    pub love: ReactionGroup,
    pub haha: ReactionGroup,
    pub care: ReactionGroup,
    pub angry: ReactionGroup,
}

impl ReactionBreakdown {
    fn group_mut(&mut self, reaction_type: &ReactionType) -> &mut ReactionGroup {
        match reaction_type {
            ReactionType::Like => &mut self.like,
            ReactionType::Love => &mut self.love,
            ReactionType::Haha => &mut self.haha,
            ReactionType::Care => &mut self.care,
            ReactionType::Angry => &mut self.angry,
        }
    }

    pub fn group(&self, reaction_type: &ReactionType) -> &ReactionGroup {
        match reaction_type {
            ReactionType::Like => &self.like,
            ReactionType::Love => &self.love,
            ReactionType::Haha => &self.haha,
            ReactionType::Care => &self.care,
            ReactionType::Angry => &self.angry,
        }
    }

    pub fn set_group(&mut self, reaction_type: &ReactionType, user_ids: Vec<Uuid>) {
        let group = self.group_mut(reaction_type);
        group.count = user_ids.len();
        group.user_ids = user_ids;
    }

    pub fn total(&self) -> usize {
        ReactionType::ALL.iter()
            .map(|reaction_type| self.group(reaction_type).count)
            .sum()
    }

    /// Reaction left by the given user, if any
    pub fn reaction_of(&self, user_id: &Uuid) -> Option<ReactionType> {
        ReactionType::ALL.into_iter()
            .find(|reaction_type| self.group(reaction_type).user_ids.contains(user_id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    #[test]
    fn test_reaction_type_from_str() {
        assert_eq!(ReactionType::from_str("haha").unwrap(), ReactionType::Haha);
        assert!(ReactionType::from_str("wow").is_err());
        assert!(ReactionType::from_str("Like").is_err());
        assert_eq!(TargetType::from_str("comment").unwrap(), TargetType::Comment);
        assert!(TargetType::from_str("user").is_err());
    }

    #[test]
    fn test_reaction_type_int_conversion() {
        for reaction_type in ReactionType::ALL {
            let value = i16::from(&reaction_type);
            assert_eq!(ReactionType::try_from(value).unwrap(), reaction_type);
        };
        assert!(ReactionType::try_from(0).is_err());
    }

    #[test]
    fn test_breakdown_empty() {
        let breakdown = ReactionBreakdown::default();
        assert_eq!(breakdown.total(), 0);
        assert_eq!(breakdown.reaction_of(&Uuid::new_v4()), None);
        let value = serde_json::to_value(&breakdown).unwrap();
        let empty_group = json!({ "count": 0, "userIds": [] });
        assert_eq!(value, json!({
            "like": empty_group,
            "love": empty_group,
            "haha": empty_group,
            "care": empty_group,
            "angry": empty_group,
        }));
    }

    #[test]
    fn test_breakdown_reaction_of() {
        let user_id = Uuid::new_v4();
        let mut breakdown = ReactionBreakdown::default();
        breakdown.set_group(&ReactionType::Love, vec![Uuid::new_v4(), user_id]);
        assert_eq!(breakdown.love.count, 2);
        assert_eq!(breakdown.total(), 2);
        assert_eq!(breakdown.reaction_of(&user_id), Some(ReactionType::Love));
    }
}
