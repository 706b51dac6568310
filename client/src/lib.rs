//! # eventdesk HTTP Client
//!
//! `reqwest` implementation of [`EventsApi`](eventdesk_core::environment::EventsApi)
//! for the event-management REST backend.
//!
//! ## Example
//!
//! ```no_run
//! use eventdesk_client::HttpEventsApi;
//! use eventdesk_core::environment::EventsApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Base URL from EVENTDESK_API_URL, token from EVENTDESK_TOKEN
//!     let api = HttpEventsApi::from_env()?;
//!
//!     for event in api.fetch_approved_events().await? {
//!         println!("{} {}", event.id, event.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Bearer authentication through a pluggable [`TokenSource`](eventdesk_core::environment::TokenSource)
//! - Server `message` fields surfaced as human-readable failure reasons
//! - Environment-driven configuration with sensible defaults

pub mod client;
pub mod config;
pub mod error;
pub mod token;
mod wire;

// Re-export main types for convenience
pub use client::HttpEventsApi;
pub use config::ClientConfig;
pub use error::ConfigError;
pub use token::{EnvToken, StaticToken};
