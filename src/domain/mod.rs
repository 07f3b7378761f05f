//! Core domain types and logic.

pub mod account;
pub mod bar;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod order;
pub mod registry;
pub mod retracement;
pub mod signal;
pub mod sizing;
pub mod strategy;
pub mod swing;
pub mod symbol;
pub mod trend;
pub mod universe;
