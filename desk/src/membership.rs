//! Organizer and participant reconciliation for event edits.
//!
//! An edit form shows the memberships already stored for the event and lets
//! the user add new rows. On submit both are merged into one list per kind,
//! keyed by user id.

use eventdesk_core::error::ValidationError;
use eventdesk_core::types::{Membership, PositionId, RoleId, UserId, UserProfile};
use std::collections::HashMap;

/// A membership row as entered in the form; blank ids mean "not filled in"
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipRow {
    /// Selected user
    pub user_id: UserId,
    /// Selected role
    pub role_id: RoleId,
    /// Selected position
    pub position_id: PositionId,
}

impl MembershipRow {
    /// Row with all three ids set
    #[must_use]
    pub fn new(
        user_id: impl Into<UserId>,
        role_id: impl Into<RoleId>,
        position_id: impl Into<PositionId>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            role_id: role_id.into(),
            position_id: position_id.into(),
        }
    }

    /// A row counts only when user, role and position are all filled in
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.user_id.is_blank() && !self.role_id.is_blank() && !self.position_id.is_blank()
    }

    fn to_membership(&self) -> Membership {
        Membership {
            user_id: self.user_id.clone(),
            role_id: self.role_id.clone(),
            position_id: self.position_id.clone(),
        }
    }
}

/// Result of merging stored memberships with new rows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// One membership per user, in first-seen order
    pub members: Vec<Membership>,
    /// Users entered more than once among the new rows, in the order found
    pub duplicates: Vec<UserId>,
}

impl Reconciled {
    /// Whether no membership survived
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Merge `existing` memberships with the new form `rows`
///
/// Stored records come first and a later stored record for the same user
/// replaces an earlier one. A complete new row replaces the stored record of
/// its user. When a user appears in several new rows, only the first is kept
/// and the user is listed in [`Reconciled::duplicates`]. Incomplete rows are
/// skipped.
#[must_use]
pub fn reconcile(existing: &[Membership], rows: &[MembershipRow]) -> Reconciled {
    let mut order: Vec<UserId> = Vec::new();
    let mut by_user: HashMap<UserId, Membership> = HashMap::new();

    let mut put = |membership: Membership| {
        if !by_user.contains_key(&membership.user_id) {
            order.push(membership.user_id.clone());
        }
        by_user.insert(membership.user_id.clone(), membership);
    };

    for membership in existing {
        put(membership.clone());
    }

    let mut entered: Vec<&UserId> = Vec::new();
    let mut duplicates = Vec::new();
    for row in rows.iter().filter(|row| row.is_complete()) {
        if entered.contains(&&row.user_id) {
            if !duplicates.contains(&row.user_id) {
                duplicates.push(row.user_id.clone());
            }
            continue;
        }
        entered.push(&row.user_id);
        put(row.to_membership());
    }

    let members = order
        .into_iter()
        .filter_map(|user_id| by_user.remove(&user_id))
        .collect();

    Reconciled { members, duplicates }
}

/// Whether a participant row's role can be chosen freely
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleEditability {
    /// Role imposed by the user's profile
    pub fixed_role_id: Option<RoleId>,
    /// Whether the row's role can be changed
    pub editable: bool,
}

/// Participants with a profile-level organizer role keep that role
#[must_use]
pub fn derive_role_editability(profile: &UserProfile) -> RoleEditability {
    match profile.organizer_role_id.as_ref().filter(|role| !role.is_blank()) {
        Some(role) => RoleEditability { fixed_role_id: Some(role.clone()), editable: false },
        None => RoleEditability { fixed_role_id: None, editable: true },
    }
}

/// A participant row whose role editability follows the selected user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantRow {
    row: MembershipRow,
    editability: RoleEditability,
}

impl Default for ParticipantRow {
    fn default() -> Self {
        Self {
            row: MembershipRow::default(),
            editability: RoleEditability { fixed_role_id: None, editable: true },
        }
    }
}

impl ParticipantRow {
    /// Empty, editable row
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the row's user and re-derive role editability
    ///
    /// A fixed role replaces the current role. Leaving a fixed role for an
    /// editable one clears the role so it has to be picked again.
    pub fn select_user(&mut self, profile: &UserProfile) {
        let editability = derive_role_editability(profile);
        match &editability.fixed_role_id {
            Some(role) => self.row.role_id = role.clone(),
            None if !self.editability.editable => self.row.role_id = RoleId::default(),
            None => {},
        }
        self.row.user_id = profile.user_id.clone();
        self.editability = editability;
    }

    /// Choose the row's role
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RoleLocked`] when the selected user's role
    /// comes from their profile.
    pub fn set_role(&mut self, role_id: impl Into<RoleId>) -> Result<(), ValidationError> {
        if !self.editability.editable {
            return Err(ValidationError::RoleLocked(self.row.user_id.clone()));
        }
        self.row.role_id = role_id.into();
        Ok(())
    }

    /// Choose the row's position
    pub fn set_position(&mut self, position_id: impl Into<PositionId>) {
        self.row.position_id = position_id.into();
    }

    /// Current editability
    #[must_use]
    pub const fn editability(&self) -> &RoleEditability {
        &self.editability
    }

    /// The row as entered
    #[must_use]
    pub const fn row(&self) -> &MembershipRow {
        &self.row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_row_overwrites_stored_record() {
        let existing = [Membership::new("u1", "r1", "p1"), Membership::new("u2", "r3", "p3")];
        let rows = [MembershipRow::new("u1", "r2", "p2")];

        let reconciled = reconcile(&existing, &rows);

        assert_eq!(
            reconciled.members,
            [Membership::new("u1", "r2", "p2"), Membership::new("u2", "r3", "p3")]
        );
        assert!(reconciled.duplicates.is_empty());
    }

    #[test]
    fn repeated_new_row_keeps_the_first() {
        let rows = [
            MembershipRow::new("u1", "r1", "p1"),
            MembershipRow::new("u1", "r9", "p9"),
            MembershipRow::new("u1", "r8", "p8"),
        ];

        let reconciled = reconcile(&[], &rows);

        assert_eq!(reconciled.members, [Membership::new("u1", "r1", "p1")]);
        assert_eq!(reconciled.duplicates, [UserId::new("u1")]);
    }

    #[test]
    fn later_stored_record_wins() {
        let existing = [Membership::new("u1", "r1", "p1"), Membership::new("u1", "r2", "p2")];
        assert_eq!(reconcile(&existing, &[]).members, [Membership::new("u1", "r2", "p2")]);
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let rows = [
            MembershipRow::new("u1", "", "p1"),
            MembershipRow::new("", "r1", "p1"),
            MembershipRow::new("u2", "r1", " "),
        ];
        assert!(reconcile(&[], &rows).is_empty());
    }

    #[test]
    fn incomplete_row_does_not_count_as_a_duplicate() {
        let rows = [MembershipRow::new("u1", "", ""), MembershipRow::new("u1", "r1", "p1")];

        let reconciled = reconcile(&[], &rows);

        assert_eq!(reconciled.members, [Membership::new("u1", "r1", "p1")]);
        assert!(reconciled.duplicates.is_empty());
    }

    #[test]
    fn profile_role_fixes_the_row() {
        let profile = UserProfile { user_id: "u1".into(), organizer_role_id: Some("lead".into()) };
        assert_eq!(
            derive_role_editability(&profile),
            RoleEditability { fixed_role_id: Some("lead".into()), editable: false }
        );

        let free = UserProfile { user_id: "u2".into(), organizer_role_id: None };
        assert!(derive_role_editability(&free).editable);
    }

    #[test]
    fn switching_users_re_derives_the_role() {
        let mut row = ParticipantRow::new();
        assert!(row.set_role("member").is_ok());
        assert_eq!(row.row().role_id.as_str(), "member");

        row.select_user(&UserProfile { user_id: "u1".into(), organizer_role_id: Some("lead".into()) });
        assert_eq!(row.row().role_id.as_str(), "lead");
        assert_eq!(row.set_role("member"), Err(ValidationError::RoleLocked("u1".into())));

        row.select_user(&UserProfile { user_id: "u2".into(), organizer_role_id: None });
        assert!(row.row().role_id.is_blank());
        assert!(row.set_role("member").is_ok());
        row.set_position("p1");
        assert!(row.row().is_complete());
    }
}
