mod incident;

pub use incident::{Incident, IncidentStatus, IncidentType};
