// Shared type definitions
// Each submodule defines types used across the crate.

pub mod cookie;
pub mod errors;
pub mod history;
pub mod settings;
