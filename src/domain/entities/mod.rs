//! Domain entities

pub mod workspace;
