use crate::light::Light;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::vector::{reflect, Point, Vec3};

/// Scalar light intensity reaching `point`, summed over every light in the scene.
///
/// Point and directional lights contribute a diffuse term and, when `specular`
/// is set, a Phong highlight. Both are dropped entirely when a sphere lies
/// between `point` and the light. The result is not clamped.
pub fn compute_lighting(
    scene: &Scene,
    point: &Point,
    normal: &Vec3,
    view: &Vec3,
    specular: Option<i32>,
    shadow_epsilon: f64,
) -> f64 {
    let length_n = normal.norm();
    let length_v = view.norm();
    debug_assert!(length_n > 0.0, "zero-length surface normal at {point}");
    debug_assert!(length_v > 0.0, "zero-length view vector at {point}");

    let mut intensity = 0.0;
    for light in &scene.lights {
        let Some(incidence) = light.incidence(point, shadow_epsilon) else {
            intensity += light.intensity();
            continue;
        };
        if length_n == 0.0 {
            continue;
        }

        let to_light = incidence.to_light;
        let shadow_ray = Ray::new(*point, to_light);
        if scene.is_occluded(&shadow_ray, incidence.shadow_range) {
            continue;
        }

        intensity += diffuse(light, normal, length_n, &to_light);
        if let Some(exponent) = specular {
            if length_v > 0.0 {
                intensity += highlight(light, normal, view, length_v, &to_light, exponent);
            }
        }
    }
    intensity
}

fn diffuse(light: &Light, normal: &Vec3, length_n: f64, to_light: &Vec3) -> f64 {
    let n_dot_l = normal.dot(to_light);
    if n_dot_l > 0.0 {
        light.intensity() * n_dot_l / (length_n * to_light.norm())
    } else {
        0.0
    }
}

fn highlight(light: &Light, normal: &Vec3, view: &Vec3, length_v: f64, to_light: &Vec3, exponent: i32) -> f64 {
    let r = reflect(to_light, normal);
    let r_dot_v = r.dot(view);
    if r_dot_v > 0.0 {
        light.intensity() * (r_dot_v / (r.norm() * length_v)).powi(exponent)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use crate::material::Material;
    use crate::object::Sphere;
    use crate::picture::Color;

    use super::*;

    const EPSILON: f64 = 1e-4;

    #[test]
    fn ambient_only_ignores_geometry() {
        let scene = Scene::default()
            .with_light(Light::ambient(0.2))
            .with_light(Light::ambient(0.3));
        for (normal, view) in [
            (vector![0.0, 1.0, 0.0], vector![0.0, 0.0, -1.0]),
            (vector![1.0, 0.0, 0.0], vector![0.3, -0.2, 0.9]),
        ] {
            let i = compute_lighting(&scene, &Point::origin(), &normal, &view, Some(100), EPSILON);
            assert_eq!(i, 0.5);
        }
    }

    #[test]
    fn diffuse_follows_cosine() {
        let scene = Scene::default().with_light(Light::directional(0.5, vector![1.0, 1.0, 0.0]));
        let i = compute_lighting(&scene, &Point::origin(), &vector![0.0, 1.0, 0.0], &vector![0.0, 0.0, 1.0], None, EPSILON);
        assert!((i - 0.5 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn light_behind_surface_adds_nothing() {
        let scene = Scene::default().with_light(Light::point(0.7, point![0.0, -5.0, 0.0]));
        let i = compute_lighting(&scene, &Point::origin(), &vector![0.0, 1.0, 0.0], &vector![0.0, 1.0, 0.0], Some(10), EPSILON);
        assert_eq!(i, 0.0);
    }

    #[test]
    fn specular_peaks_along_mirror_direction() {
        let scene = Scene::default().with_light(Light::point(0.6, point![1.0, 1.0, 0.0]));
        let normal = vector![0.0, 1.0, 0.0];
        // viewer exactly on the mirrored side: diffuse 0.6 / sqrt(2) plus full 0.6 highlight
        let view = vector![-1.0, 1.0, 0.0];
        let shiny = compute_lighting(&scene, &Point::origin(), &normal, &view, Some(50), EPSILON);
        let matte = compute_lighting(&scene, &Point::origin(), &normal, &view, None, EPSILON);
        assert!((matte - 0.6 / 2f64.sqrt()).abs() < 1e-12);
        assert!((shiny - matte - 0.6).abs() < 1e-12);
    }

    #[test]
    fn occluder_casts_hard_shadow() {
        let light = Light::point(0.6, point![0.0, 10.0, 0.0]);
        let lit = Scene::default().with_light(Light::ambient(0.2)).with_light(light);
        let shadowed = lit.clone()
            .with_sphere(Sphere::new(point![0.0, 5.0, 0.0], 1.0, Material::matte(Color::RED)));
        let normal = vector![0.0, 1.0, 0.0];
        let view = vector![0.0, 1.0, 0.0];

        let i = compute_lighting(&lit, &Point::origin(), &normal, &view, Some(10), EPSILON);
        assert!((i - (0.2 + 0.6 + 0.6)).abs() < 1e-12);
        let i = compute_lighting(&shadowed, &Point::origin(), &normal, &view, Some(10), EPSILON);
        assert_eq!(i, 0.2);
    }

    #[test]
    fn sphere_beyond_point_light_does_not_shadow() {
        let scene = Scene::default()
            .with_light(Light::point(0.6, point![0.0, 10.0, 0.0]))
            .with_sphere(Sphere::new(point![0.0, 20.0, 0.0], 1.0, Material::matte(Color::RED)));
        let i = compute_lighting(&scene, &Point::origin(), &vector![0.0, 1.0, 0.0], &vector![1.0, 0.0, 0.0], None, EPSILON);
        assert_eq!(i, 0.6);
    }

    #[test]
    fn any_sphere_along_directional_light_shadows() {
        let scene = Scene::default()
            .with_light(Light::directional(0.6, vector![0.0, 1.0, 0.0]))
            .with_sphere(Sphere::new(point![0.0, 20.0, 0.0], 1.0, Material::matte(Color::RED)));
        let i = compute_lighting(&scene, &Point::origin(), &vector![0.0, 1.0, 0.0], &vector![1.0, 0.0, 0.0], None, EPSILON);
        assert_eq!(i, 0.0);
    }
}
