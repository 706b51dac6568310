//! # eventdesk Testing
//!
//! Testing utilities and helpers for eventdesk.
//!
//! This crate provides:
//! - Mock implementations of the environment traits ([`MockEventsApi`], [`RecordingNotifier`])
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Effect assertions and a tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use eventdesk_testing::{MockEventsApi, RecordingNotifier};
//!
//! #[tokio::test]
//! async fn failing_ids_stay_registered() {
//!     let api = Arc::new(MockEventsApi::new());
//!     api.fail_event("e2", ApiError::Network("timeout".into()));
//!     let notifier = Arc::new(RecordingNotifier::new());
//!     // ... run the flow, then inspect api.calls() and notifier.messages()
//! }
//! ```

pub mod mocks;
pub mod reducer_test;

pub use mocks::{ApiCall, MockEventsApi, RecordingNotifier};
pub use reducer_test::{assertions, ReducerTest};

/// Install a `tracing` subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventdesk=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
