//! Transform model of the in-memory scene.
//!
//! A local transform is applied in the order scale -> rotate -> translate.
//! World matrices are full affine matrices so non-uniform scale survives
//! composition; decomposition recovers the closest rotation.

use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, UnitQuaternion, Vector3};

const EPSILON: f64 = 1e-9;

/// Local transform of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub translation: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
    /// When false the node ignores its parent and local space is world space.
    pub inherits: bool,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl LocalTransform {
    #[must_use]
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            inherits: true,
        }
    }

    /// Creates a transform from a translation and XYZ euler angles in degrees.
    #[must_use]
    pub fn from_translate_rotate(translate: [f64; 3], rotate_degrees: [f64; 3]) -> Self {
        Self {
            translation: Vector3::from(translate),
            rotation: rotation_from_degrees(rotate_degrees),
            ..Self::identity()
        }
    }

    /// Affine matrix of this transform.
    #[must_use]
    pub fn matrix(&self) -> Matrix4<f64> {
        compose(&self.translation, &self.rotation, &self.scale)
    }

    /// Replaces translation, rotation and scale with a decomposed matrix.
    pub fn set_matrix(&mut self, matrix: &Matrix4<f64>) {
        let (translation, rotation, scale) = decompose(matrix);
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
    }

    /// XYZ euler angles in degrees.
    #[must_use]
    pub fn rotate_degrees(&self) -> [f64; 3] {
        let (x, y, z) = self.rotation.euler_angles();
        [x.to_degrees(), y.to_degrees(), z.to_degrees()]
    }

    /// Sets one euler channel, keeping the other two.
    pub fn set_rotate_degrees(&mut self, axis: usize, degrees: f64) {
        let mut angles = self.rotate_degrees();
        angles[axis] = degrees;
        self.rotation = rotation_from_degrees(angles);
    }

    /// Resets to identity, keeping the inherit flag.
    pub fn reset(&mut self) {
        *self = Self {
            inherits: self.inherits,
            ..Self::identity()
        };
    }
}

/// Rotation from XYZ euler angles in degrees (X applied first).
#[must_use]
pub fn rotation_from_degrees(degrees: [f64; 3]) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(
        degrees[0].to_radians(),
        degrees[1].to_radians(),
        degrees[2].to_radians(),
    )
}

/// Builds an affine matrix from translation, rotation and scale.
#[must_use]
pub fn compose(
    translation: &Vector3<f64>,
    rotation: &UnitQuaternion<f64>,
    scale: &Vector3<f64>,
) -> Matrix4<f64> {
    let linear = rotation.to_rotation_matrix().into_inner() * Matrix3::from_diagonal(scale);
    let mut m = linear.to_homogeneous();
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
    m
}

/// Splits an affine matrix into translation, rotation and per-axis scale.
#[must_use]
pub fn decompose(m: &Matrix4<f64>) -> (Vector3<f64>, UnitQuaternion<f64>, Vector3<f64>) {
    let translation = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    let mut linear: Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();

    let mut scale = Vector3::new(
        linear.column(0).norm(),
        linear.column(1).norm(),
        linear.column(2).norm(),
    );
    if linear.determinant() < 0.0 {
        scale.x = -scale.x;
    }
    for i in 0..3 {
        if scale[i].abs() > EPSILON {
            let s = scale[i];
            linear.column_mut(i).unscale_mut(s);
        }
    }

    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(&linear));
    (translation, rotation, scale)
}

/// World-space position of a matrix.
#[must_use]
pub fn position(m: &Matrix4<f64>) -> Point3<f64> {
    Point3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Average of several rotations, blended pairwise with equal weights.
///
/// Blending takes the shortest arc; antipodal pairs keep the running result.
#[must_use]
pub fn blend_rotations(rotations: &[UnitQuaternion<f64>]) -> UnitQuaternion<f64> {
    let mut iter = rotations.iter();
    let Some(first) = iter.next() else {
        return UnitQuaternion::identity();
    };
    let mut blended = *first;
    for (i, rotation) in iter.enumerate() {
        let t = 1.0 / (i as f64 + 2.0);
        if let Some(next) = blended.try_slerp(rotation, t, EPSILON) {
            blended = next;
        }
    }
    blended
}

/// World rotation that points `aim` at `direction` with `up` leaning toward `world_up`.
///
/// Returns `None` when the direction is zero or parallel to the world-up vector.
#[must_use]
pub fn aim_rotation(
    direction: &Vector3<f64>,
    world_up: &Vector3<f64>,
    aim: &Vector3<f64>,
    up: &Vector3<f64>,
) -> Option<UnitQuaternion<f64>> {
    let world_frame = orthonormal_frame(direction, world_up)?;
    let local_frame = orthonormal_frame(aim, up)?;
    let matrix = world_frame * local_frame.transpose();
    Some(UnitQuaternion::from_rotation_matrix(
        &Rotation3::from_matrix_unchecked(matrix),
    ))
}

fn orthonormal_frame(primary: &Vector3<f64>, secondary: &Vector3<f64>) -> Option<Matrix3<f64>> {
    let a = primary.try_normalize(EPSILON)?;
    let c = a.cross(secondary).try_normalize(EPSILON)?;
    let b = c.cross(&a);
    Some(Matrix3::from_columns(&[a, b, c]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_vec_eq(a: &Vector3<f64>, b: &Vector3<f64>) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_compose_decompose() {
        let t = Vector3::new(1.0, 2.0, 3.0);
        let r = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let s = Vector3::new(2.0, 1.0, 0.5);
        let (t2, r2, s2) = decompose(&compose(&t, &r, &s));
        assert_vec_eq(&t, &t2);
        assert_vec_eq(&s, &s2);
        assert!(r.angle_to(&r2) < 1e-9);
    }

    #[test]
    fn test_euler_channels() {
        let mut local = LocalTransform::from_translate_rotate([0.0; 3], [0.0, 0.0, 90.0]);
        let p = local.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-9);

        local.set_rotate_degrees(0, 30.0);
        let angles = local.rotate_degrees();
        assert!((angles[0] - 30.0).abs() < 1e-9);
        assert!((angles[2] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_rotations() {
        let a = UnitQuaternion::identity();
        let b = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let mid = blend_rotations(&[a, b]);
        assert!((mid.angle() - FRAC_PI_2 / 2.0).abs() < 1e-9);
        assert_eq!(blend_rotations(&[]), UnitQuaternion::identity());
    }

    #[test]
    fn test_aim_rotation() {
        // Point local +Y at world +X, local +X leaning toward world +Z.
        let rotation = aim_rotation(
            &Vector3::new(5.0, 0.0, 0.0),
            &Vector3::z(),
            &Vector3::y(),
            &Vector3::x(),
        )
        .unwrap();
        assert_vec_eq(&(rotation * Vector3::y()), &Vector3::x());
        assert_vec_eq(&(rotation * Vector3::x()), &Vector3::z());

        assert!(aim_rotation(&Vector3::zeros(), &Vector3::z(), &Vector3::y(), &Vector3::x()).is_none());
        assert!(aim_rotation(&Vector3::z(), &Vector3::z(), &Vector3::y(), &Vector3::x()).is_none());
    }
}
