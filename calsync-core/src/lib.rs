//! Core types for calsync.
//!
//! This crate provides the provider-neutral pieces shared by the provider
//! crates and the webhook server:
//! - `CalendarEvent` and `EventTime`, the canonical event shape
//! - `sync_tag`, the marker that keeps copied events from being synced again
//! - `destination`, the static list of calendars events fan out to
//! - `settings`, configuration loaded once at startup

pub mod destination;
pub mod error;
pub mod event;
pub mod settings;
pub mod sync_tag;

pub use destination::{DestinationConfig, DestinationRegistry, ProviderKind};
pub use error::{CalSyncError, CalSyncResult};
pub use event::{CalendarEvent, EventTime};
