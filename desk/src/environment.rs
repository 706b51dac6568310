//! Dependencies shared by the event-scoped and account-scoped flows.

use eventdesk_core::environment::{EventsApi, Notifier};
use std::sync::Arc;

/// Backend and toast sink, without registration state
///
/// Used by attendance, event editing and administration flows, which do not
/// need the signed-in user's ledger.
#[derive(Clone)]
pub struct DeskEnvironment {
    /// Backend
    pub api: Arc<dyn EventsApi>,
    /// Toast sink
    pub notifier: Arc<dyn Notifier>,
}

impl DeskEnvironment {
    /// Creates a new `DeskEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn EventsApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }
}
