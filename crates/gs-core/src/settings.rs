//! Per-organization group sync settings.
//!
//! Stored as JSON:
//!
//! ```json
//! {
//!   "field": "groups",
//!   "mapping": { "admins": ["grp-a3f8b2c1"] },
//!   "regex_filter": "^team-",
//!   "auto_create_missing_groups": false
//! }
//! ```

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ids::GroupId;

/// Group sync policy for one organization.
///
/// An empty `field` disables sync for the organization entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSyncSettings {
    /// Claim field holding the user's IDP groups.
    #[serde(default)]
    pub field: String,

    /// IDP group name -> internal group IDs. One name may map to many groups.
    #[serde(default)]
    pub mapping: BTreeMap<String, Vec<GroupId>>,

    /// Claim values not matching this pattern are ignored.
    #[serde(default, with = "regex_serde")]
    pub regex_filter: Option<Regex>,

    /// Create groups named by claims that do not exist yet.
    #[serde(default)]
    pub auto_create_missing_groups: bool,
}

impl GroupSyncSettings {
    /// Settings that read groups from `field` with no mapping or filter.
    #[must_use]
    pub fn with_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.field.is_empty()
    }

    /// Whether a raw claim value passes the configured filter.
    #[must_use]
    pub fn passes_filter(&self, value: &str) -> bool {
        self.regex_filter
            .as_ref()
            .is_none_or(|filter| filter.is_match(value))
    }
}

mod regex_serde {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Regex>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(re) => serializer.serialize_some(re.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Regex>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(pattern) if !pattern.is_empty() => Regex::new(&pattern)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
