//! Entity structs for stored organizations and groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::GroupSource;
use crate::ids::{GroupId, OrganizationId};

/// Name given to every organization's built-in group.
pub const EVERYONE_GROUP_NAME: &str = "Everyone";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub source: GroupSource,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Whether this is its organization's built-in everyone group.
    #[must_use]
    pub fn is_everyone(&self) -> bool {
        self.id == GroupId::everyone(&self.organization_id)
    }
}
