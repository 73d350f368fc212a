//! The sync pipeline: notification handlers, translation and fan-out.

pub mod dispatcher;
pub mod google;
pub mod outlook;
pub mod translate;

#[cfg(test)]
pub(crate) mod testing;

use crate::sync::dispatcher::DispatchReport;

/// What handling one notification led to.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The provider had no event to look at
    NoEvent,
    /// The event is a copy calsync made, so it was not propagated
    AlreadySynced,
    /// The event was fanned out; see the report for per-destination results
    Dispatched(DispatchReport),
}

impl SyncOutcome {
    pub fn has_failures(&self) -> bool {
        match self {
            SyncOutcome::Dispatched(report) => report.has_failures(),
            SyncOutcome::NoEvent | SyncOutcome::AlreadySynced => false,
        }
    }
}
