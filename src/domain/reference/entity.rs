use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ordering::Positioned;
use crate::domain::DomainError;

/// Kinds of per-user reference lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    BandMemberRole,
    GuitarTuning,
    SectionType,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::BandMemberRole => "band_member_role",
            ReferenceKind::GuitarTuning => "guitar_tuning",
            ReferenceKind::SectionType => "section_type",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReferenceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "band_member_role" => Ok(ReferenceKind::BandMemberRole),
            "guitar_tuning" => Ok(ReferenceKind::GuitarTuning),
            "section_type" => Ok(ReferenceKind::SectionType),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown reference kind '{}'",
                other
            ))),
        }
    }
}

/// One entry of a user's reference list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: ReferenceKind,
    pub name: String,
    /// 0-based
    pub order: u32,
    pub created_at: DateTime<Utc>,
}

impl ReferenceItem {
    pub fn new(user_id: Uuid, kind: ReferenceKind, name: String, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            name,
            order,
            created_at: Utc::now(),
        }
    }
}

impl Positioned for ReferenceItem {
    fn id(&self) -> Uuid {
        self.id
    }

    fn position(&self) -> u32 {
        self.order
    }

    fn set_position(&mut self, position: u32) {
        self.order = position;
    }
}
