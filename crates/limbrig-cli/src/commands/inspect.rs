//! Inspect command implementation
//!
//! Builds a limb, overrides its external signals and prints the live
//! translateY and scaleX of every skin joint.

use anyhow::Result;
use colored::Colorize;
use limbrig_graph::{Attr, Axis, ConventionSignals, RigResult, SceneHost, SignalProvider, Value};
use limbrig_spec::Segment;
use std::process::ExitCode;
use tracing::debug;

use super::{build_session, print_json, report_failure, BuildSession};
use crate::input::LimbArgs;
use crate::json_output::{InspectResult, JointSample, JsonOutput};

/// Signal overrides applied after the build.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalOverrides {
    /// Stretch ratio of the FK root.
    pub stretch: Option<f64>,
    /// Master uniform scale.
    pub scale: Option<f64>,
}

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 if the limb was built and evaluated, 1 otherwise
pub fn run(
    args: &LimbArgs,
    config: Option<&str>,
    overrides: SignalOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    let result = build_session(args, config).and_then(|mut session| {
        inspect(&mut session, overrides).map_err(anyhow::Error::from)
    });
    let result = match result {
        Ok(result) => result,
        Err(err) => return report_failure::<InspectResult>(err, json_output),
    };

    if json_output {
        print_json(&JsonOutput::ok(result))?;
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} stretch {:.3}, master scale {:.3}",
        "Signals:".cyan().bold(),
        result.stretch_ratio,
        result.master_scale
    );
    for segment in Segment::ALL {
        println!("  {}", segment.as_str().bold());
        for joint in result.joints.iter().filter(|j| j.segment == segment) {
            println!(
                "    {:<24} ty {:>9.4}  sx {:>7.4}",
                joint.name, joint.translate_y, joint.scale_x
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Applies the overrides and evaluates every skin joint of the session's limb.
pub fn inspect(session: &mut BuildSession, overrides: SignalOverrides) -> RigResult<InspectResult> {
    let signals = ConventionSignals::from_config(&session.config);
    let scene = &mut session.scene;
    let stretch_plug = signals.stretch_ratio(&*scene, session.limb.record.fk_root)?;
    let scale_plug = signals.master_scale(&*scene)?;

    if let Some(stretch) = overrides.stretch {
        scene.set_attr(stretch_plug, Value::Float(stretch))?;
    }
    if let Some(scale) = overrides.scale {
        scene.set_attr(scale_plug, Value::Float(scale))?;
    }
    debug!(?overrides, "signals overridden");

    let mut joints = Vec::new();
    for segment in Segment::ALL {
        for joint in session.limb.segment(segment).chain.joints() {
            joints.push(JointSample {
                segment,
                name: scene.name(joint)?.to_string(),
                translate_y: scene.evaluate(joint.plug(Attr::Translate(Axis::Y)))?,
                scale_x: scene.evaluate(joint.plug(Attr::Scale(Axis::X)))?,
            });
        }
    }

    Ok(InspectResult {
        stretch_ratio: scene.evaluate(stretch_plug)?,
        master_scale: scene.evaluate(scale_plug)?,
        joints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_session;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn session() -> (NamedTempFile, BuildSession) {
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
        let args = LimbArgs {
            skeleton: file.path().to_string_lossy().into_owned(),
            limb_type: "Arm".to_string(),
            upper: 4,
            lower: 3,
            radius: 1.5,
        };
        let session = build_session(&args, None).unwrap();
        (file, session)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rest_values() {
        let (_file, mut session) = session();
        let result = inspect(&mut session, SignalOverrides::default()).unwrap();
        assert_eq!(result.joints.len(), 6 + 5);

        let upper: Vec<&JointSample> = result
            .joints
            .iter()
            .filter(|j| j.segment == Segment::Upper)
            .collect();
        assert_eq!(upper[0].name, "L_upperArm_01_notSKIN");
        assert!(close(upper[2].translate_y, 3.0));
        assert!(upper[1..5].iter().all(|j| close(j.scale_x, 1.0)));
    }

    #[test]
    fn test_stretch_and_scale_overrides() {
        let (_file, mut session) = session();
        let overrides = SignalOverrides {
            stretch: Some(4.0),
            scale: Some(2.0),
        };
        let result = inspect(&mut session, overrides).unwrap();
        assert!(close(result.stretch_ratio, 4.0));
        assert!(close(result.master_scale, 2.0));

        let deforming = &result.joints[1..5];
        assert!(deforming.iter().all(|j| close(j.scale_x, 0.5)));
        assert!(close(deforming[1].translate_y, 1.5));
    }
}
