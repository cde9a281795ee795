pub mod mode;
pub mod patient;
pub mod payload;
pub mod prescription;
pub mod usage;
