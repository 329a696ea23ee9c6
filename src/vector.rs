use nalgebra::{Point3, Vector3};

pub type Vec3 = Vector3<f64>;
pub type Point = Point3<f64>;

/// Unit vector pointing along `v`, or `None` when `v` has zero length.
pub fn try_unit(v: &Vec3) -> Option<Vec3> {
    let length = v.norm();
    if length > 0.0 {
        Some(v / length)
    } else {
        None
    }
}

/// Mirrors `v` around `n`. `n` does not need to be normalized, the result scales with it.
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    2.0 * n.dot(v) * n - v
}
