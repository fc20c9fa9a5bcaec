//! Application services

pub mod action_map;
