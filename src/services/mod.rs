pub mod overlap;
pub mod scheduler;
pub mod reservations;
pub mod catalog;
