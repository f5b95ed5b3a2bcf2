//! Validate command implementation
//!
//! Runs the checks a build performs before creating anything: selection
//! count, node types, limb type, joint counts and radius.

use anyhow::Result;
use colored::Colorize;
use limbrig_graph::{validate_request, SceneHost};
use std::path::Path;
use std::process::ExitCode;

use super::{print_json, report_failure};
use crate::input::{load_scene, LimbArgs};
use crate::json_output::{JsonOutput, ValidateResult};

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if a build would pass its preconditions, 1 otherwise
pub fn run(args: &LimbArgs, json_output: bool) -> Result<ExitCode> {
    if !json_output {
        println!("{} {}", "Validating:".cyan().bold(), args.skeleton);
    }

    let result = check(args);
    let result = match result {
        Ok(result) => result,
        Err(err) => return report_failure::<ValidateResult>(err, json_output),
    };

    if json_output {
        print_json(&JsonOutput::ok(result))?;
    } else {
        println!(
            "  {} {} / {} joints",
            result.limb_type, result.upper_joint_count, result.lower_joint_count
        );
        println!("  {}", result.selection.join(" -> ").dimmed());
        println!("{} preconditions hold", "Valid:".green().bold());
    }
    Ok(ExitCode::SUCCESS)
}

/// Checks a limb request against a skeleton without building anything.
pub fn check(args: &LimbArgs) -> Result<ValidateResult> {
    let scene = load_scene(Path::new(&args.skeleton))?;
    let (params, joints) = validate_request(&scene, &args.request())?;
    let selection = joints
        .iter()
        .map(|&joint| scene.name(joint).map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ValidateResult {
        limb_type: params.limb_type,
        upper_joint_count: params.upper_joint_count,
        lower_joint_count: params.lower_joint_count,
        selection,
    })
}
