mod return_record;

pub use return_record::{ReturnReason, ReturnTimelineEntry, ReturnWithProduct};
