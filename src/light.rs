use crate::ray::Interval;
use crate::vector::{Point, Vec3};

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Ambient { intensity: f64 },
    Point { intensity: f64, position: Point },
    /// Light arriving from infinitely far away. `direction` points from the
    /// surface towards the light.
    Directional { intensity: f64, direction: Vec3 },
}

/// Where a shadow ray has to look for occluders, seen from one surface point.
pub struct Incidence {
    /// Vector from the surface point towards the light. Not normalized.
    pub to_light: Vec3,
    /// Parametric range of the shadow ray in which an occluder blocks the light.
    pub shadow_range: Interval,
}

impl Light {
    pub fn ambient(intensity: f64) -> Light {
        Light::Ambient { intensity }
    }

    pub fn point(intensity: f64, position: Point) -> Light {
        Light::Point { intensity, position }
    }

    pub fn directional(intensity: f64, direction: Vec3) -> Light {
        Light::Directional { intensity, direction }
    }

    pub fn intensity(&self) -> f64 {
        match self {
            Light::Ambient { intensity }
            | Light::Point { intensity, .. }
            | Light::Directional { intensity, .. } => *intensity,
        }
    }

    /// `None` for ambient light, which comes from everywhere and casts no shadow.
    pub fn incidence(&self, point: &Point, shadow_epsilon: f64) -> Option<Incidence> {
        match self {
            Light::Ambient { .. } => None,
            // the light sits at t = 1 along `to_light`
            Light::Point { position, .. } => Some(Incidence {
                to_light: position - point,
                shadow_range: Interval::new(shadow_epsilon, 1.0),
            }),
            Light::Directional { direction, .. } => Some(Incidence {
                to_light: *direction,
                shadow_range: Interval::above(shadow_epsilon),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use super::*;

    #[test]
    fn point_light_incidence_depends_on_surface_point() {
        let light = Light::point(0.6, point![2.0, 1.0, 0.0]);
        let incidence = light.incidence(&point![0.0, 0.0, 3.0], 1e-4).unwrap();
        assert_eq!(incidence.to_light, vector![2.0, 1.0, -3.0]);
        assert_eq!(incidence.shadow_range, Interval::new(1e-4, 1.0));
    }

    #[test]
    fn directional_light_ignores_surface_point() {
        let light = Light::directional(0.2, vector![1.0, 4.0, 4.0]);
        let a = light.incidence(&point![0.0, 0.0, 3.0], 1e-4).unwrap();
        let b = light.incidence(&point![9.0, -2.0, 7.0], 1e-4).unwrap();
        assert_eq!(a.to_light, b.to_light);
        assert_eq!(a.shadow_range.max, f64::INFINITY);
    }

    #[test]
    fn ambient_has_no_incidence() {
        let light = Light::ambient(0.2);
        assert!(light.incidence(&Point::origin(), 1e-4).is_none());
        assert_eq!(light.intensity(), 0.2);
    }
}
