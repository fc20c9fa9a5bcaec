//! CLI interface and result rendering

pub mod cli;
