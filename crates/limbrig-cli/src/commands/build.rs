//! Build command implementation
//!
//! Builds a bendy limb on the selection of a skeleton description, prints the
//! build report and optionally writes the subtree manifest.

use anyhow::{Context, Result};
use colored::Colorize;
use limbrig_graph::{BuildReport, RigError};
use std::fs;
use std::process::ExitCode;
use tracing::info;

use super::{build_session, print_json, report_failure, BuildSession};
use crate::input::LimbArgs;
use crate::json_output::{BuildResult, JsonOutput};

/// Run the build command
///
/// # Arguments
/// * `args` - Skeleton path and limb request
/// * `config` - Optional build config file
/// * `output` - Optional path for the subtree manifest JSON
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if the limb was built, 1 otherwise
pub fn run(
    args: &LimbArgs,
    config: Option<&str>,
    output: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if !json_output {
        println!(
            "{} {} on {}",
            "Building:".cyan().bold(),
            args.limb_type,
            args.skeleton
        );
    }

    let session = match build_session(args, config) {
        Ok(session) => session,
        Err(err) => return report_failure::<BuildResult>(err, json_output),
    };
    let report = build_report(&session)?;

    if let Some(path) = output {
        write_manifest(&session, path)?;
    }

    if json_output {
        print_json(&JsonOutput::ok(BuildResult {
            report,
            manifest_path: output.map(str::to_string),
        }))?;
    } else {
        print_report(&session, &report, output);
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds the report of a session's limb.
pub fn build_report(session: &BuildSession) -> Result<BuildReport> {
    let manifest = session
        .scene
        .subtree_manifest(session.limb.top_group)
        .map_err(RigError::from)?;
    let report = BuildReport::new(&session.scene, &session.limb, &manifest)?;
    Ok(report)
}

/// Writes the subtree manifest of a session's limb.
pub fn write_manifest(session: &BuildSession, path: &str) -> Result<()> {
    let manifest = session
        .scene
        .subtree_manifest(session.limb.top_group)
        .map_err(RigError::from)?;
    let json = manifest
        .to_json_pretty()
        .context("Failed to serialize subtree manifest")?;
    fs::write(path, json).with_context(|| format!("Failed to write manifest: {}", path))?;
    info!(path, nodes = manifest.nodes.len(), "manifest written");
    Ok(())
}

fn print_report(session: &BuildSession, report: &BuildReport, output: Option<&str>) {
    for segment in &report.segments {
        println!(
            "  {:<6} {} joints, length {:.3}, spacing {:.3} ({:?})",
            segment.segment.as_str(),
            segment.joint_count,
            segment.resting_length.abs(),
            segment.spacing.abs(),
            segment.direction,
        );
        println!("         {}", segment.skin_joints.join(" -> ").dimmed());
    }
    for half_bone in &report.half_bones {
        println!("  {:<6} {}", "half".dimmed(), half_bone.joint);
    }

    println!(
        "{} {} nodes, {} connections",
        "Graph:".dimmed(),
        report.node_total(),
        report.connection_count
    );
    println!("{} {}", "Hash:".dimmed(), report.graph_hash);
    if let Some(path) = output {
        println!("{} {}", "Manifest:".dimmed(), path);
    }
    for message in session.scene.messages() {
        println!("{} {}", "Success:".green().bold(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn skeleton() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "joints": [
                    { "name": "L_shoulder", "translate": [5, 140, 0], "stretch_ratio": 1.0 },
                    { "name": "L_elbow", "parent": "L_shoulder", "translate": [0, 12, 0] },
                    { "name": "L_wrist", "parent": "L_elbow", "translate": [0, 10, 0] }
                ],
                "master_scale": { "name": "main_CTRL", "scale": 1.0 },
                "selection": ["L_shoulder", "L_elbow", "L_wrist"]
            }"#,
        )
        .unwrap();
        file
    }

    fn args(path: &std::path::Path, limb_type: &str) -> LimbArgs {
        LimbArgs {
            skeleton: path.to_string_lossy().into_owned(),
            limb_type: limb_type.to_string(),
            upper: 4,
            lower: 3,
            radius: 1.5,
        }
    }

    #[test]
    fn test_build_writes_manifest() {
        let file = skeleton();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("manifest.json");
        let out = out.to_str().unwrap();

        let code = run(&args(file.path(), "Arm"), None, Some(out), true).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(manifest["root"], "L_Arm_IkSpline_limb_OFFSET");
    }

    #[test]
    fn test_rig_error_exits_with_one() {
        let file = skeleton();
        let code = run(&args(file.path(), "Tail"), None, None, true).unwrap();
        assert_eq!(code, ExitCode::from(1));
    }

    #[test]
    fn test_missing_skeleton_is_an_error() {
        let result = run(
            &args(std::path::Path::new("/nonexistent.json"), "Arm"),
            None,
            None,
            true,
        );
        assert!(result.is_err());
    }
}
