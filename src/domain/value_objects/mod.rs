//! Domain value objects

pub mod command_spec;
pub mod workspace_kind;
