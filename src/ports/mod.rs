//! Port traits for everything the signal engine consumes from outside.

pub mod account_port;
pub mod config_port;
pub mod data_port;
pub mod execution_port;
pub mod symbol_port;
pub mod tick_port;
