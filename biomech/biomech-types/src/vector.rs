//! Stateless 3D vector primitives used by every measurement.
//!
//! All functions are pure. The only guarded path is normalization of
//! near-zero vectors, which returns the zero vector instead of `NaN`.

use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Magnitude below which a vector is treated as zero.
pub const NORMALIZE_EPSILON: f64 = 1e-8;

/// Normalizes `v`, returning the zero vector when `|v| < 1e-8`.
///
/// # Example
///
/// ```
/// use biomech_types::vector::normalize;
/// use nalgebra::Vector3;
///
/// let n = normalize(Vector3::new(3.0, 0.0, 4.0));
/// assert!((n.norm() - 1.0).abs() < 1e-12);
///
/// let z = normalize(Vector3::new(1e-12, 0.0, 0.0));
/// assert_eq!(z, Vector3::zeros());
/// ```
#[must_use]
pub fn normalize(v: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm < NORMALIZE_EPSILON {
        return Vector3::zeros();
    }
    v / norm
}

/// Normalizes `v`, or returns `None` when it is too short to carry a direction.
#[must_use]
pub fn try_normalize(v: Vector3<f64>) -> Option<Vector3<f64>> {
    v.try_normalize(NORMALIZE_EPSILON)
}

/// Dot product.
#[must_use]
pub fn dot(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b)
}

/// Cross product.
#[must_use]
pub fn cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    (a + b) * 0.5
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
///
/// Both inputs are normalized and the dot product is clamped to `[-1, 1]`
/// before `acos`, so exactly parallel or antiparallel inputs never yield
/// `NaN`. A zero-length input normalizes to zero and yields `90.0`.
///
/// # Example
///
/// ```
/// use biomech_types::vector::angle_between;
/// use nalgebra::Vector3;
///
/// let a = Vector3::new(1.0, 0.0, 0.0);
/// assert!((angle_between(&a, &Vector3::new(0.0, 2.0, 0.0)) - 90.0).abs() < 1e-9);
/// assert!((angle_between(&a, &(-a)) - 180.0).abs() < 1e-9);
/// assert!(!angle_between(&a, &(a * 3.0)).is_nan());
/// ```
#[must_use]
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let a = normalize(*a);
    let b = normalize(*b);
    a.dot(&b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Signed angle in degrees from `a` to `b` measured about `axis`.
///
/// Both vectors are first projected onto the plane perpendicular to `axis`.
/// Positive angles follow the right-hand rule. Returns `0.0` when either
/// projection collapses.
#[must_use]
pub fn signed_angle_about_axis(a: &Vector3<f64>, b: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    let n = normalize(*axis);
    let pa = normalize(project_onto_plane(a, &n));
    let pb = normalize(project_onto_plane(b, &n));
    if pa == Vector3::zeros() || pb == Vector3::zeros() {
        return 0.0;
    }
    let sin = n.dot(&pa.cross(&pb));
    let cos = pa.dot(&pb);
    sin.atan2(cos).to_degrees()
}

/// Removes the component of `v` along the plane normal: `v - (v·n̂)n̂`.
///
/// The normal is normalized first. This must be applied to limb vectors
/// before every clinical angle so camera perspective does not leak into
/// the measurement.
///
/// # Example
///
/// ```
/// use biomech_types::vector::project_onto_plane;
/// use nalgebra::Vector3;
///
/// let v = Vector3::new(1.0, 2.0, 3.0);
/// let p = project_onto_plane(&v, &Vector3::new(0.0, 0.0, 10.0));
/// assert_eq!(p, Vector3::new(1.0, 2.0, 0.0));
/// ```
#[must_use]
pub fn project_onto_plane(v: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    let n = normalize(*normal);
    v - n * v.dot(&n)
}

/// Rotates `v` about `axis` by `angle_deg` degrees (right-hand rule).
///
/// A zero axis leaves `v` unchanged.
#[must_use]
pub fn rotate_about_axis(v: &Vector3<f64>, axis: &Vector3<f64>, angle_deg: f64) -> Vector3<f64> {
    match try_normalize(*axis) {
        Some(a) => {
            let rotation = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(a), angle_deg.to_radians());
            rotation * v
        }
        None => *v,
    }
}

/// Builds a right-handed orthonormal basis from a primary axis and a
/// secondary reference.
///
/// `primary` becomes the returned `y`. `lateral_hint` only needs to be
/// roughly lateral; it is orthogonalized against `y`. Returns `(x, y, z)`
/// with `x = y × lateral`, `z = x × y`, or `None` when the two inputs are
/// (anti)parallel or either is zero.
#[must_use]
pub fn orthonormal_basis(
    primary: &Vector3<f64>,
    lateral_hint: &Vector3<f64>,
) -> Option<(Vector3<f64>, Vector3<f64>, Vector3<f64>)> {
    let y = try_normalize(*primary)?;
    let x = try_normalize(y.cross(lateral_hint))?;
    let z = x.cross(&y);
    Some((x, y, z))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn normalize_guards_zero() {
        assert_eq!(normalize(Vector3::zeros()), Vector3::zeros());
        assert_eq!(normalize(Vector3::new(1e-9, 0.0, 0.0)), Vector3::zeros());
        assert!(try_normalize(Vector3::zeros()).is_none());
    }

    #[test]
    fn angle_between_exact_parallel() {
        let a = Vector3::new(0.3, -0.2, 0.9);
        assert_relative_eq!(angle_between(&a, &a), 0.0, epsilon = 1e-6);
        assert_relative_eq!(angle_between(&a, &(-a)), 180.0, epsilon = 1e-6);
    }

    #[test]
    fn angle_between_zero_vector() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let angle = angle_between(&a, &Vector3::zeros());
        assert!(!angle.is_nan());
        assert_relative_eq!(angle, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn signed_angle_direction() {
        let x = Vector3::x();
        let z = Vector3::z();
        // Rotating x toward -z about +y is a positive rotation.
        assert_relative_eq!(
            signed_angle_about_axis(&x, &(-z), &Vector3::y()),
            90.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            signed_angle_about_axis(&x, &z, &Vector3::y()),
            -90.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn projection_removes_normal_component() {
        let v = Vector3::new(2.0, 5.0, -1.0);
        let n = Vector3::new(0.0, 3.0, 0.0);
        let p = project_onto_plane(&v, &n);
        assert_relative_eq!(p.dot(&n), 0.0, epsilon = 1e-12);
        assert_relative_eq!(p, Vector3::new(2.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate_about_axis(&Vector3::x(), &Vector3::y(), 90.0);
        assert_relative_eq!(r, -Vector3::z(), epsilon = 1e-12);
        assert_eq!(rotate_about_axis(&Vector3::x(), &Vector3::zeros(), 45.0), Vector3::x());
    }

    #[test]
    fn basis_is_right_handed() {
        let (x, y, z) = orthonormal_basis(&Vector3::new(0.1, 2.0, 0.0), &Vector3::z()).unwrap();
        assert_relative_eq!(x.cross(&y), z, epsilon = 1e-12);
        assert!(orthonormal_basis(&Vector3::y(), &Vector3::y()).is_none());
    }

    proptest! {
        #[test]
        fn angle_between_never_nan(
            a in prop::array::uniform3(-10.0..10.0f64),
            b in prop::array::uniform3(-10.0..10.0f64),
            scale in -5.0..5.0f64,
        ) {
            let a = Vector3::from(a);
            let b = Vector3::from(b);
            let angle = angle_between(&a, &b);
            prop_assert!(!angle.is_nan());
            prop_assert!((0.0..=180.0).contains(&angle));
            let parallel = angle_between(&a, &(a * scale));
            prop_assert!(!parallel.is_nan());
        }

        #[test]
        fn projection_is_orthogonal_to_normal(
            v in prop::array::uniform3(-10.0..10.0f64),
            n in prop::array::uniform3(-10.0..10.0f64),
        ) {
            let n = Vector3::from(n);
            prop_assume!(n.norm() > 1e-3);
            let p = project_onto_plane(&Vector3::from(v), &n);
            prop_assert!(p.dot(&n.normalize()).abs() < 1e-9);
        }
    }
}
