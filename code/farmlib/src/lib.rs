pub mod advisory;
pub mod boards;
pub mod config;
pub mod crops;
pub mod dashboard;
pub mod prompt;
pub mod simulator;
pub mod store;
pub mod types;
