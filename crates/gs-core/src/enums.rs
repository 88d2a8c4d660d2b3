//! Enums stored as TEXT columns.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// How a group came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSource {
    /// Created by an administrator.
    User,
    /// Created by group sync from identity provider claims.
    Oidc,
    /// The organization's built-in everyone group.
    Everyone,
}

impl GroupSource {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Oidc => "oidc",
            Self::Everyone => "everyone",
        }
    }
}

impl fmt::Display for GroupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "oidc" => Ok(Self::Oidc),
            "everyone" => Ok(Self::Everyone),
            other => Err(CoreError::UnknownVariant {
                kind: "group source",
                value: other.to_string(),
            }),
        }
    }
}
