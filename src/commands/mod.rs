pub mod dashboard;
pub mod indicators;
pub mod signal;
