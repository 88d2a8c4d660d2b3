//! Expected-vs-current membership diff under the ID-or-name equivalence.

use std::collections::BTreeSet;

use gs_core::identity::{ExistingGroup, ExpectedGroup, same_group};

/// Elements of `right` matching nothing in `left`, and elements of `left`
/// matching nothing in `right`, under `eq`.
///
/// Order within each side is preserved.
pub fn symmetric_difference_by<'a, 'b, A, B>(
    left: &'a [A],
    right: impl IntoIterator<Item = &'b B> + Clone,
    eq: impl Fn(&A, &B) -> bool,
) -> (Vec<&'b B>, Vec<&'a A>)
where
    B: 'b,
{
    let only_right = right
        .clone()
        .into_iter()
        .filter(|b| !left.iter().any(|a| eq(a, *b)))
        .collect();
    let only_left = left
        .iter()
        .filter(|a| !right.clone().into_iter().any(|b| eq(*a, b)))
        .collect();
    (only_right, only_left)
}

/// Membership changes needed in one organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    /// Expected groups the user is not in yet.
    pub to_add: Vec<ExpectedGroup>,
    /// Current groups the user is no longer expected to be in.
    pub to_remove: Vec<ExistingGroup>,
}

impl MembershipDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff the user's current groups in an organization against the expected set.
///
/// Groups on both sides are left alone, so diffing an already-synced
/// membership yields an empty result.
#[must_use]
pub fn diff_memberships(
    existing: &[ExistingGroup],
    expected: &BTreeSet<ExpectedGroup>,
) -> MembershipDiff {
    let (to_add, to_remove) = symmetric_difference_by(existing, expected, |a, b| same_group(a, b));
    MembershipDiff {
        to_add: to_add.into_iter().cloned().collect(),
        to_remove: to_remove.into_iter().cloned().collect(),
    }
}
