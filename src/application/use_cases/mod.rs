//! Application use cases

pub mod add_submodule;
pub mod list_submodules;
pub mod run_action;
