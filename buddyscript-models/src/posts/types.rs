use std::str::FromStr;

use chrono::{DateTime, Utc};
use postgres_types::FromSql;
use uuid::Uuid;

use crate::database::{
    int_enum::int_enum_sql,
    DatabaseTypeError,
};
use crate::users::types::ImageRef;

#[derive(Clone, Debug, PartialEq)]
pub enum Visibility {
    Public,
    Private,
}

impl Default for Visibility {
    fn default() -> Self { Self::Public }
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl From<&Visibility> for i16 {
    fn from(value: &Visibility) -> i16 {
        match value {
            Visibility::Public => 1,
            Visibility::Private => 2,
        }
    }
}

impl TryFrom<i16> for Visibility {
    type Error = DatabaseTypeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        let visibility = match value {
            1 => Self::Public,
            2 => Self::Private,
            _ => return Err(DatabaseTypeError),
        };
        Ok(visibility)
    }
}

int_enum_sql!(Visibility);

#[derive(thiserror::Error, Debug)]
#[error("invalid visibility")]
pub struct VisibilityParseError;

impl FromStr for Visibility {
    type Err = VisibilityParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let visibility = match value {
            "public" => Self::Public,
            "private" => Self::Private,
            _ => return Err(VisibilityParseError),
        };
        Ok(visibility)
    }
}

#[derive(Clone, FromSql)]
#[postgres(name = "post")]
pub struct DbPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type Post = DbPost;

impl DbPost {
    pub fn image(&self) -> Option<ImageRef> {
        match (&self.image_url, &self.image_public_id) {
            (Some(url), Some(public_id)) => Some(ImageRef {
                url: url.clone(),
                public_id: public_id.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(feature = "test-utils")]
impl Default for Post {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            content: "".to_string(),
            image_url: None,
            image_public_id: None,
            visibility: Visibility::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Default)]
pub struct PostCreateData {
    pub content: String,
    pub image: Option<ImageRef>,
    pub visibility: Visibility,
}

#[derive(Default)]
pub struct PostUpdateData {
    pub content: Option<String>,
    pub image: Option<ImageRef>,
    pub visibility: Option<Visibility>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_from_str() {
        assert_eq!(Visibility::from_str("public").unwrap(), Visibility::Public);
        assert_eq!(Visibility::from_str("private").unwrap(), Visibility::Private);
        assert!(Visibility::from_str("friends").is_err());
    }

    #[test]
    fn test_visibility_int_conversion() {
        let value = i16::from(&Visibility::Private);
        assert_eq!(Visibility::try_from(value).unwrap(), Visibility::Private);
        assert!(Visibility::try_from(3).is_err());
    }
}
