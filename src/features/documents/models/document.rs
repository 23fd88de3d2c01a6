use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Document visibility tier matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "document_visibility", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Public,
    Student,
    Teacher,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [Visibility::Public, Visibility::Student, Visibility::Teacher];

    /// Bucket folder holding documents of this tier
    pub fn folder(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Student => "student",
            Visibility::Teacher => "teacher",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "PUBLIC"),
            Visibility::Student => write!(f, "STUDENT"),
            Visibility::Teacher => write!(f, "TEACHER"),
        }
    }
}

impl FromStr for Visibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_uppercase();
        Visibility::ALL
            .into_iter()
            .find(|visibility| visibility.to_string() == value)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid visibility '{}'. Expected one of PUBLIC, STUDENT, TEACHER",
                    s
                ))
            })
    }
}

/// Database model for a stored document
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub display_name: String,
    pub extension: String,
    pub visibility: Visibility,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_parse() {
        assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!(" teacher".parse::<Visibility>().unwrap(), Visibility::Teacher);
        assert!(matches!(
            "PRIVATE".parse::<Visibility>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_visibility_display_round_trips() {
        for visibility in Visibility::ALL {
            assert_eq!(visibility.to_string().parse::<Visibility>().unwrap(), visibility);
        }
    }
}
