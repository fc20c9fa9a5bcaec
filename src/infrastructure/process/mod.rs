//! External process execution

pub mod command_executor;
