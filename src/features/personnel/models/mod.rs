mod personnel;

pub use personnel::{Personnel, PersonnelStats};
