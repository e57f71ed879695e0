// gittools shared type definitions
// Each submodule defines types used across the crate.

pub mod enabled_set;
pub mod errors;
pub mod message;
pub mod repository;
pub mod settings;
pub mod tool;
pub mod usage;
