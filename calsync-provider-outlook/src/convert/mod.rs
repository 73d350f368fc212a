mod from_outlook;
mod to_outlook;

pub use from_outlook::FromOutlook;
pub use to_outlook::{ToOutlook, copy_outlook_event};
