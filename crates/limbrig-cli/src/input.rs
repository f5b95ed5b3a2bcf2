//! Input loading for CLI commands.
//!
//! Every command reads a skeleton description and a limb request; `build`
//! and `inspect` also read an optional build config.

use anyhow::{Context, Result};
use clap::Args;
use limbrig_graph::{load_skeleton, SceneGraph};
use limbrig_spec::{BuildConfig, LimbRequest, SkeletonDesc};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Limb arguments shared by all commands.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct LimbArgs {
    /// Path to the skeleton description (JSON)
    #[arg(short, long)]
    pub skeleton: String,

    /// Limb type tag (Arm or Leg)
    #[arg(short = 't', long = "limb-type")]
    pub limb_type: String,

    /// Deforming joints on the upper segment
    #[arg(long, allow_negative_numbers = true)]
    pub upper: i64,

    /// Deforming joints on the lower segment
    #[arg(long, allow_negative_numbers = true)]
    pub lower: i64,

    /// Radius of the control joints
    #[arg(long, allow_negative_numbers = true)]
    pub radius: f64,
}

impl LimbArgs {
    /// Returns the unchecked limb request.
    pub fn request(&self) -> LimbRequest {
        LimbRequest::new(self.limb_type.clone(), self.upper, self.lower, self.radius)
    }
}

/// Reads and parses a skeleton description file.
pub fn load_skeleton_file(path: &Path) -> Result<SkeletonDesc> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read skeleton file: {}", path.display()))?;
    let desc = SkeletonDesc::from_json(&json)
        .with_context(|| format!("Failed to parse skeleton file: {}", path.display()))?;
    debug!(
        path = %path.display(),
        joints = desc.joints.len(),
        "skeleton description loaded"
    );
    Ok(desc)
}

/// Loads a skeleton description into a fresh in-memory scene.
pub fn load_scene(path: &Path) -> Result<SceneGraph> {
    let desc = load_skeleton_file(path)?;
    load_skeleton(&desc).with_context(|| format!("Invalid skeleton: {}", path.display()))
}

/// Loads the build config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    let config = BuildConfig::load(path).with_context(|| match path {
        Some(p) => format!("Failed to load config file: {}", p.display()),
        None => "Invalid default config".to_string(),
    })?;
    debug!(curve_spans = config.curve_spans, "build config loaded");
    Ok(config)
}
