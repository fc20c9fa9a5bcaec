//! External dependencies and I/O: filesystem inspection, process
//! execution, and git plumbing

pub mod filesystem;
pub mod git;
pub mod process;
