//! Git output parsing

pub mod submodule_status;
