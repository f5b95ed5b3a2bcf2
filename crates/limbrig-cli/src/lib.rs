//! Limbrig CLI library.
//!
//! This crate provides the functionality behind the `limbrig` binary:
//! skeleton and config loading, the limb arguments shared by every command,
//! and the `build`, `validate` and `inspect` commands.

pub mod commands;
pub mod input;
pub mod json_output;
