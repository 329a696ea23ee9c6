use crate::material::Material;
use crate::ray::{Interval, Ray};
use crate::vector::Point;

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Point, radius: f64, material: Material) -> Self {
        Sphere { center, radius, material }
    }

    /// Both parametric distances at which `ray` crosses the surface, unordered.
    ///
    /// Returns `None` when the ray misses, and for a zero-length direction,
    /// which has no meaningful solution.
    pub fn intersect(&self, ray: &Ray) -> Option<(f64, f64)> {
        let oc = ray.origin - self.center;
        let k1 = ray.direction.dot(&ray.direction);
        if k1 == 0.0 {
            return None;
        }
        let k2 = 2.0 * oc.dot(&ray.direction);
        let k3 = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = k2 * k2 - 4.0 * k1 * k3;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        Some(((-k2 + sqrtd) / (2.0 * k1), (-k2 - sqrtd) / (2.0 * k1)))
    }

    /// Nearest root lying strictly inside `interval`.
    pub fn nearest(&self, ray: &Ray, interval: Interval) -> Option<f64> {
        let (t1, t2) = self.intersect(ray)?;
        [t1, t2].into_iter()
            .filter(|t| interval.surrounds(*t))
            .reduce(f64::min)
    }
}
