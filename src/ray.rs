use crate::object::Sphere;
use crate::vector::{Point, Vec3};

#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Point, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }
}

/// Open interval of parametric distances `(min, max)`. Both ends are excluded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Interval { min, max }
    }

    /// Interval with no upper bound.
    pub const fn above(min: f64) -> Self {
        Interval::new(min, f64::INFINITY)
    }

    pub fn surrounds(&self, t: f64) -> bool {
        self.min < t && t < self.max
    }

    pub fn is_empty(&self) -> bool {
        !(self.min < self.max)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Hit<'s> {
    pub sphere: &'s Sphere,
    /// Position of `sphere` in the scene's sphere list.
    pub index: usize,
    pub t: f64,
}
