pub mod evolution;
pub mod schedules;
pub mod experiment;
