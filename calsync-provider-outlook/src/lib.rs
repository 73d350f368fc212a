//! calsync-provider-outlook - Microsoft Outlook calendar support for calsync
//!
//! Reads and creates events through Microsoft Graph, parses Graph change
//! notifications, and converts between Graph's event shape and calsync's
//! canonical `CalendarEvent`.

pub mod client;
pub mod convert;
pub mod types;

pub use client::{GraphClient, OutlookCalendarApi};
pub use convert::{FromOutlook, ToOutlook, copy_outlook_event};
pub use types::{
    BodyType, ChangeNotification, ChangeNotificationCollection, DateTimeTimeZone, ItemBody,
    OutlookEvent,
};
