//! # operatem - multi-workspace orchestration
//!
//! `operatem` drives repositories that aggregate several independently
//! versioned sub-projects: linked external repositories under a
//! `submodules/` root and local packages under a `packages/` root. It
//! discovers each sub-project's technology kind, translates logical
//! actions ("install", "run build") into the right tool invocation for
//! that kind, and runs them across all (or one) workspace, sequentially
//! or concurrently.
//!
//! ## Quick start
//!
//! ```bash
//! operatem install
//! operatem run build --workspace brand
//! operatem run test --parallel
//! operatem submodules list
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: workspace entities and value objects
//! - [`application`]: the action translation table and use cases
//! - [`infrastructure`]: filesystem inspection, process execution, git
//!   output parsing
//! - [`presentation`]: CLI interface and result rendering
//!
//! The core returns an [`ExecutionReport`] with one result per targeted
//! workspace, in targeting order; failures of a single workspace never
//! abort its siblings, and the CLI maps the overall status to the process
//! exit code.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use crate::application::use_cases::run_action::{
    ActionResult, ExecutionMode, ExecutionReport, OverallStatus,
};
pub use crate::domain::entities::workspace::{Workspace, WorkspaceOrigin};
pub use crate::domain::value_objects::workspace_kind::WorkspaceKind;
