//! Use cases and application services

pub mod services;
pub mod use_cases;
