//! CLI command implementations

pub mod build;
pub mod inspect;
pub mod validate;

use anyhow::Result;
use colored::Colorize;
use limbrig_graph::{BendyLimb, LimbBuilder, RigError, SceneGraph};
use limbrig_spec::BuildConfig;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::input::{load_config, load_scene, LimbArgs};
use crate::json_output::JsonOutput;

/// A scene with a freshly built limb in it.
#[derive(Debug)]
pub struct BuildSession {
    pub scene: SceneGraph,
    pub limb: BendyLimb,
    pub config: BuildConfig,
}

/// Loads the skeleton and config and builds the limb.
///
/// Rig failures stay downcastable to [`RigError`].
pub fn build_session(args: &LimbArgs, config_path: Option<&str>) -> Result<BuildSession> {
    let config = load_config(config_path.map(Path::new))?;
    let mut scene = load_scene(Path::new(&args.skeleton))?;
    let limb = LimbBuilder::with_config(config.clone()).build(&mut scene, &args.request())?;
    Ok(BuildSession {
        scene,
        limb,
        config,
    })
}

/// Reports a rig failure and turns it into exit code 1.
///
/// Errors that are not rig errors (unreadable files, bad JSON) are returned
/// to `main`, which prints them the same way for every command.
pub(crate) fn report_failure<T: Serialize>(
    err: anyhow::Error,
    json: bool,
) -> Result<ExitCode> {
    let Some(rig) = err.downcast_ref::<RigError>() else {
        return Err(err);
    };
    if json {
        print_json(&JsonOutput::<T>::failed(rig))?;
    } else {
        eprintln!("{} [{}]: {}", "error".red().bold(), rig.code(), rig);
    }
    Ok(ExitCode::from(1))
}

pub(crate) fn print_json<T: Serialize>(output: &JsonOutput<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}
