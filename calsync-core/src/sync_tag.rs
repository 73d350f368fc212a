//! The sync tag marks events that were created by calsync.
//!
//! Every copy calsync writes to a destination calendar carries [`SYNC_TAG`]
//! in its description or body. When a provider notifies us about that copy,
//! the tag is what stops it from being fanned out again. There is no other
//! dedup store.

/// Marker appended to the description/body of every synced copy.
pub const SYNC_TAG: &str = "[SyncedByMyApp]";

/// Returns true if `text` was written by a previous sync.
pub fn is_synced(text: &str) -> bool {
    text.contains(SYNC_TAG)
}

/// Same as [`is_synced`], treating missing text as empty.
pub fn is_synced_opt(text: Option<&str>) -> bool {
    text.is_some_and(is_synced)
}

/// Append the tag to a description, separated by a blank line.
///
/// Existing content is never replaced, and an empty description still gets
/// the leading blank line (`"\n\n[SyncedByMyApp]"`).
pub fn tag_text(text: Option<&str>) -> String {
    format!("{}\n\n{}", text.unwrap_or_default(), SYNC_TAG)
}
