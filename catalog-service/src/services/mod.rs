pub mod catalog;
pub mod reading;
pub mod simulator;
