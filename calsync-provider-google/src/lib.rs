//! calsync-provider-google - Google Calendar support for calsync
//!
//! Talks to the Calendar v3 REST API with an OAuth access token that is
//! refreshed in place when it expires, and converts between Google's event
//! shape and calsync's canonical `CalendarEvent`.

pub mod client;
pub mod convert;
pub mod session;
pub mod types;

pub use client::{GoogleCalendarApi, GoogleClient};
pub use convert::{FromGoogle, ToGoogle, copy_google_event};
pub use session::{GoogleCredentials, Session};
pub use types::{GoogleEvent, GoogleEventDateTime, ListEventsOptions};
