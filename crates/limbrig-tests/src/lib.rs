//! Limbrig End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the limb generator:
//!
//! - Generation: skeleton description -> rig subtree
//! - Errors: every failure kind, and what each leaves in the scene
//! - Properties: chain layout, volume preservation and mirroring
//! - CLI: the command entry points over temporary skeleton files
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p limbrig-tests
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{verify_determinism, DeterminismResult};
pub use fixtures::{arm_skeleton, build_limb, leg_skeleton, SkeletonFile};
