//! Derived views over an attendee list.
//!
//! [`filter_and_sort`] never touches the list it is given: it returns borrowed
//! attendees in display order, so the same input and query always yield the
//! same view.

use crate::collation::CollationKey;
use eventdesk_core::types::{Attendee, UserId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Order of the attendee view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Display name, ascending
    #[default]
    Az,
    /// Display name, descending
    Za,
    /// Attending first, then by display name ascending
    Status,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Az => write!(f, "az"),
            Self::Za => write!(f, "za"),
            Self::Status => write!(f, "status"),
        }
    }
}

/// Which attendance flags a status sort reads
#[derive(Clone, Copy, Debug, Default)]
pub enum StatusSource<'a> {
    /// The flags as persisted on the backend
    #[default]
    Persisted,
    /// Unsaved flags from editing mode; attendees without a draft entry use
    /// their persisted flag
    Draft(&'a HashMap<UserId, bool>),
}

impl StatusSource<'_> {
    /// Attendance flag of `attendee` under this source
    #[must_use]
    pub fn is_attending(&self, attendee: &Attendee) -> bool {
        match self {
            Self::Persisted => attendee.is_attending,
            Self::Draft(draft) => draft
                .get(&attendee.user_id)
                .copied()
                .unwrap_or(attendee.is_attending),
        }
    }
}

/// Search term and sort order for an attendee view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttendeeQuery {
    /// Case-insensitive substring; blank means no filtering
    pub search: String,
    /// Order of the result
    pub sort: SortKey,
}

impl AttendeeQuery {
    /// Query with no search term
    #[must_use]
    pub fn new(sort: SortKey) -> Self {
        Self { search: String::new(), sort }
    }

    /// Set the search term
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

/// Name shown for an attendee
///
/// `"{last} {first}"` trimmed, else the username, else a placeholder built
/// from the first eight characters of the user id.
#[must_use]
pub fn display_name(attendee: &Attendee) -> String {
    let full = format!(
        "{} {}",
        attendee.last_name.as_deref().unwrap_or_default(),
        attendee.first_name.as_deref().unwrap_or_default()
    );
    let full = full.trim();
    if !full.is_empty() {
        return full.to_string();
    }

    match attendee.username.as_deref().map(str::trim) {
        Some(username) if !username.is_empty() => username.to_string(),
        _ => {
            let short: String = attendee.user_id.as_str().chars().take(8).collect();
            format!("User {short}")
        },
    }
}

fn matches(attendee: &Attendee, name: &str, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(name)
        || attendee.username.as_deref().is_some_and(contains)
        || attendee.student_code.as_deref().is_some_and(contains)
}

/// Filter `attendees` by `query.search` and order them by `query.sort`
///
/// `source` is only consulted for [`SortKey::Status`]. Attendees whose sort
/// keys are equal keep their input order.
#[must_use]
pub fn filter_and_sort<'a>(
    attendees: &'a [Attendee],
    query: &AttendeeQuery,
    source: StatusSource<'_>,
) -> Vec<&'a Attendee> {
    let needle = query.search.trim().to_lowercase();

    let mut rows: Vec<(&Attendee, CollationKey)> = attendees
        .iter()
        .filter_map(|attendee| {
            let name = display_name(attendee);
            (needle.is_empty() || matches(attendee, &name, &needle))
                .then(|| (attendee, CollationKey::new(&name)))
        })
        .collect();

    match query.sort {
        SortKey::Az => rows.sort_by(|(_, a), (_, b)| a.cmp(b)),
        SortKey::Za => rows.sort_by(|(_, a), (_, b)| b.cmp(a)),
        SortKey::Status => rows.sort_by(|(a, key_a), (b, key_b)| {
            match (source.is_attending(a), source.is_attending(b)) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => key_a.cmp(key_b),
            }
        }),
    }

    rows.into_iter().map(|(attendee, _)| attendee).collect()
}
