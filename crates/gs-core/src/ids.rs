//! Typed identifiers and ID prefix constants.
//!
//! Generated IDs have the form `<prefix>-<8 hex chars>`, e.g. `grp-a3f8b2c1`.
//! User IDs come from the identity provider and are taken verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const PREFIX_ORGANIZATION: &str = "org";
pub const PREFIX_GROUP: &str = "grp";

/// All prefixes generated by the store.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_ORGANIZATION, PREFIX_GROUP];

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier, rejecting empty strings.
            ///
            /// # Errors
            ///
            /// Returns `CoreError::InvalidId` if `raw` is empty or only whitespace.
            pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(CoreError::InvalidId(format!(
                        "{} must not be empty",
                        stringify!($name)
                    )));
                }
                Ok(Self(raw))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable user identifier.
    UserId
);

string_id!(
    /// Organization identifier; the scope boundary for sync policy.
    OrganizationId
);

string_id!(
    /// Stable group identifier. Unique across all organizations.
    GroupId
);

impl GroupId {
    /// The ID of an organization's built-in everyone group.
    ///
    /// The everyone group shares its organization's ID.
    #[must_use]
    pub fn everyone(organization_id: &OrganizationId) -> Self {
        Self(organization_id.as_str().to_string())
    }
}
