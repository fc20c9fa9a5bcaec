//! Filesystem-facing components: classification, discovery, configuration

pub mod classifier;
pub mod config_store;
pub mod discovery;
