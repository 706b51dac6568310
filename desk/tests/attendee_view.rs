//! Filtering and ordering attendee lists.

use eventdesk::collation::compare;
use eventdesk::{display_name, filter_and_sort, AttendeeQuery, SortKey, StatusSource};
use eventdesk_core::types::Attendee;
use proptest::prelude::*;
use std::cmp::Ordering;

fn names(view: &[&Attendee]) -> Vec<String> {
    view.iter().map(|attendee| display_name(attendee)).collect()
}

fn pair() -> Vec<Attendee> {
    vec![
        Attendee::new("u2").with_name("Trần", "Bình"),
        Attendee::new("u1").with_name("Nguyễn", "An"),
    ]
}

#[test]
fn search_matches_whole_substrings_only() {
    let attendees = pair();
    let query = AttendeeQuery::default().with_search("an");

    let view = filter_and_sort(&attendees, &query, StatusSource::Persisted);

    assert_eq!(names(&view), ["Nguyễn An"]);
}

#[test]
fn az_uses_vietnamese_order() {
    let attendees = pair();

    let view = filter_and_sort(&attendees, &AttendeeQuery::new(SortKey::Az), StatusSource::Persisted);

    assert_eq!(names(&view), ["Nguyễn An", "Trần Bình"]);
}

#[test]
fn modified_letters_sort_after_their_base() {
    let attendees: Vec<Attendee> = ["Ư", "U", "Ơ", "Ô", "O", "Đ", "D", "Â", "Ă", "A"]
        .iter()
        .enumerate()
        .map(|(n, last)| Attendee::new(format!("u{n}")).with_name(last, ""))
        .collect();

    let view = filter_and_sort(&attendees, &AttendeeQuery::new(SortKey::Az), StatusSource::Persisted);

    assert_eq!(names(&view), ["A", "Ă", "Â", "D", "Đ", "O", "Ô", "Ơ", "U", "Ư"]);
}

#[test]
fn placeholder_names_take_part_in_search_and_sort() {
    let attendees = vec![
        Attendee::new("zz-000001"),
        Attendee::new("aa-000002").with_username("binh.tran"),
    ];

    let view = filter_and_sort(&attendees, &AttendeeQuery::new(SortKey::Az), StatusSource::Persisted);
    assert_eq!(names(&view), ["binh.tran", "User zz-00000"]);

    let query = AttendeeQuery::default().with_search("user zz");
    assert_eq!(filter_and_sort(&attendees, &query, StatusSource::Persisted).len(), 1);
}

const LAST_NAMES: &[&str] = &["Nguyễn", "Trần", "Lê", "Phạm", "Đặng", "Dương", "Ông", "Ưng", ""];
const FIRST_NAMES: &[&str] = &["An", "Bình", "Ánh", "Ân", "Hoa", "Hòa", "Hỏa", "Đức", ""];
const SEARCHES: &[&str] = &["", "  ", "an", "NG", "bình", "u1", "sv0", "hoa"];

fn attendee() -> impl Strategy<Value = Attendee> {
    (
        0..50u32,
        prop::sample::select(LAST_NAMES),
        prop::sample::select(FIRST_NAMES),
        any::<bool>(),
        prop::option::of("[a-z]{2,6}"),
        prop::option::of("sv0[0-9]{2}"),
    )
        .prop_map(|(n, last, first, attending, username, code)| {
            let mut attendee = Attendee::new(format!("u{n}")).with_name(last, first).attending(attending);
            attendee.username = username;
            attendee.student_code = code;
            attendee
        })
}

fn query() -> impl Strategy<Value = AttendeeQuery> {
    (
        prop::sample::select(SEARCHES),
        prop_oneof![Just(SortKey::Az), Just(SortKey::Za), Just(SortKey::Status)],
    )
        .prop_map(|(search, sort)| AttendeeQuery::new(sort).with_search(search))
}

proptest! {
    #[test]
    fn input_is_never_mutated(attendees in prop::collection::vec(attendee(), 0..20), query in query()) {
        let before = attendees.clone();
        let _ = filter_and_sort(&attendees, &query, StatusSource::Persisted);
        prop_assert_eq!(attendees, before);
    }

    #[test]
    fn view_is_idempotent(attendees in prop::collection::vec(attendee(), 0..20), query in query()) {
        let first: Vec<Attendee> = filter_and_sort(&attendees, &query, StatusSource::Persisted)
            .into_iter()
            .cloned()
            .collect();
        let second: Vec<Attendee> = filter_and_sort(&first, &query, StatusSource::Persisted)
            .into_iter()
            .cloned()
            .collect();
        prop_assert_eq!(second, first);
    }

    #[test]
    fn same_input_same_view(attendees in prop::collection::vec(attendee(), 0..20), query in query()) {
        let a = filter_and_sort(&attendees, &query, StatusSource::Persisted);
        let b = filter_and_sort(&attendees, &query, StatusSource::Persisted);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn az_view_is_ordered(attendees in prop::collection::vec(attendee(), 0..20)) {
        let view = filter_and_sort(&attendees, &AttendeeQuery::new(SortKey::Az), StatusSource::Persisted);
        let names = names(&view);
        for window in names.windows(2) {
            prop_assert_ne!(compare(&window[0], &window[1]), Ordering::Greater);
        }
    }

    #[test]
    fn status_view_puts_attending_first(attendees in prop::collection::vec(attendee(), 0..20)) {
        let view = filter_and_sort(&attendees, &AttendeeQuery::new(SortKey::Status), StatusSource::Persisted);
        let flags: Vec<bool> = view.iter().map(|a| a.is_attending).collect();
        let attending = flags.iter().filter(|flag| **flag).count();
        prop_assert!(flags[..attending].iter().all(|flag| *flag));
    }

    #[test]
    fn blank_search_keeps_everyone(attendees in prop::collection::vec(attendee(), 0..20)) {
        let query = AttendeeQuery::new(SortKey::Za).with_search("   ");
        prop_assert_eq!(filter_and_sort(&attendees, &query, StatusSource::Persisted).len(), attendees.len());
    }
}
