use float_ord::FloatOrd;
use nalgebra::{point, vector};

use crate::light::Light;
use crate::material::Material;
use crate::object::Sphere;
use crate::picture::Color;
use crate::ray::{Hit, Interval, Ray};

/// Static set of spheres and lights. Order of `spheres` decides ties between equally near hits.
#[derive(Clone, Debug)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub lights: Vec<Light>,
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new(Color::WHITE)
    }
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Scene {
            spheres: Vec::new(),
            lights: Vec::new(),
            background,
        }
    }

    pub fn with_sphere(mut self, sphere: Sphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    /// Red, blue and green spheres resting on a huge yellow one, under one light of each kind.
    pub fn reference() -> Self {
        Scene::new(Color::WHITE)
            .with_sphere(Sphere::new(point![0.0, -1.0, 3.0], 1.0, Material::new(Color::RED, 500, 0.2)))
            .with_sphere(Sphere::new(point![2.0, 0.0, 4.0], 1.0, Material::new(Color::BLUE, 500, 0.3)))
            .with_sphere(Sphere::new(point![-2.0, 0.0, 4.0], 1.0, Material::new(Color::GREEN, 10, 0.4)))
            .with_sphere(Sphere::new(point![0.0, -5001.0, 0.0], 5000.0, Material::new(Color::YELLOW, 1000, 0.5)))
            .with_light(Light::ambient(0.2))
            .with_light(Light::point(0.6, point![2.0, 1.0, 0.0]))
            .with_light(Light::directional(0.2, vector![1.0, 4.0, 4.0]))
    }

    /// Nearest sphere hit strictly inside `interval`.
    ///
    /// `min_by_key` keeps the first of several equal minimums, so the earlier sphere wins ties.
    pub fn closest_intersection(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        self.spheres.iter()
            .enumerate()
            .filter_map(|(index, sphere)| {
                sphere.nearest(ray, interval).map(|t| Hit { sphere, index, t })
            })
            .min_by_key(|hit| FloatOrd(hit.t))
    }

    pub fn is_occluded(&self, ray: &Ray, interval: Interval) -> bool {
        self.spheres.iter().any(|sphere| sphere.nearest(ray, interval).is_some())
    }
}
