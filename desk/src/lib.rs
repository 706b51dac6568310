//! # eventdesk
//!
//! Client-side logic of the event-management desk: registering for events,
//! leaving them one at a time or in batches, keeping attendance sheets,
//! editing event memberships and the administrator's review and account
//! actions.
//!
//! Every flow receives its collaborators through an environment struct
//! ([`RegistrationEnvironment`], [`DeskEnvironment`]) holding the backend
//! ([`EventsApi`](eventdesk_core::environment::EventsApi)), the toast sink
//! ([`Notifier`](eventdesk_core::environment::Notifier)) and, where needed,
//! the signed-in user's [`LedgerHandle`]. Nothing is global, so tests build
//! isolated instances with the mocks from `eventdesk-testing`.
//!
//! # Architecture
//!
//! ```text
//!   view ──► ConfirmationStore ──(confirmed intent)──► DeskPerformer
//!                                                        │
//!            ┌───────────────────────┬──────────────────┤
//!            ▼                       ▼                  ▼
//!   RegistrationEnvironment    DeskEnvironment     AttendanceBook
//!   (ledger, batch, single)    (admin, edits)      (sheet, drafts)
//!            │                       │                  │
//!            └───────────────────────┴──────────────────┘
//!                                    │
//!                               EventsApi
//! ```
//!
//! # Key Rules
//!
//! - Batch unregistration dispatches every request at once and never stops on
//!   the first failure; the ledger changes only for accepted ids.
//! - Attendance flags change locally only after the backend accepted them.
//! - Consequential actions run only after the confirmation dialog is idle
//!   again.
//! - Attendee views are derived; the loaded list is never reordered.

#![forbid(unsafe_code)]

pub mod admin;
pub mod attendance;
pub mod attendees;
pub mod batch;
pub mod collation;
pub mod confirmation;
pub mod environment;
pub mod error;
pub mod event_update;
pub mod intent;
pub mod ledger;
pub mod membership;
pub mod registration;
pub mod scope;

pub use attendance::{AttendanceBook, SaveOutcome};
pub use attendees::{display_name, filter_and_sort, AttendeeQuery, SortKey, StatusSource};
pub use batch::{BatchOutcome, FailedUnregistration};
pub use confirmation::{
    confirmation_store, ConfirmationAction, ConfirmationEnvironment, ConfirmationReducer,
    ConfirmationRequest, ConfirmationState, ConfirmationStore,
};
pub use environment::DeskEnvironment;
pub use error::{DeskError, Result};
pub use event_update::{prepare_update, EventEdit, PreparedUpdate};
pub use intent::{DeskIntent, DeskPerformer};
pub use ledger::{Change, LedgerHandle, RegistrationLedger, RegistrationStatus, UpdateState};
pub use membership::{
    derive_role_editability, reconcile, MembershipRow, ParticipantRow, Reconciled,
    RoleEditability,
};
pub use registration::RegistrationEnvironment;
pub use scope::ViewScope;
