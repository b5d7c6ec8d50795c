pub mod bank;
pub mod exam;
