use nalgebra::{Rotation3, vector, Vector3};

use crate::ray::Ray;
use crate::settings::RenderSettings;
use crate::vector::{Point, Vec3};

/// Direction through the viewport for a pixel in centered, y-up canvas coordinates.
pub fn canvas_to_viewport(
    pixel_x: i64,
    pixel_y: i64,
    canvas_width: u32,
    canvas_height: u32,
    viewport_size: f64,
    projection_distance: f64,
) -> Vec3 {
    vector![
        pixel_x as f64 * viewport_size / canvas_width as f64,
        pixel_y as f64 * viewport_size / canvas_height as f64,
        projection_distance
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(Point::origin())
    }
}

impl Camera {
    pub fn new(position: Point) -> Self {
        Camera {
            position,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw) *
            Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch) *
            Rotation3::from_axis_angle(&Vector3::z_axis(), self.roll)
    }

    fn is_axis_aligned(&self) -> bool {
        self.roll == 0.0 && self.pitch == 0.0 && self.yaw == 0.0
    }

    /// Ray from the camera through pixel `(pixel_x, pixel_y)` of the canvas.
    pub fn primary_ray(&self, pixel_x: i64, pixel_y: i64, settings: &RenderSettings) -> Ray {
        let direction = canvas_to_viewport(
            pixel_x,
            pixel_y,
            settings.width,
            settings.height,
            settings.viewport_size,
            settings.projection_distance,
        );
        // skip the matrix product so unrotated rays stay bit-exact
        let direction = if self.is_axis_aligned() {
            direction
        } else {
            self.rotation() * direction
        };
        Ray::new(self.position, direction)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use nalgebra::point;

    use super::*;

    #[test]
    fn center_pixel_looks_down_z() {
        assert_eq!(canvas_to_viewport(0, 0, 600, 600, 1.0, 1.0), vector![0.0, 0.0, 1.0]);
    }

    #[test]
    fn viewport_mapping_is_linear() {
        let v = canvas_to_viewport(150, -300, 600, 300, 2.0, 3.0);
        assert_eq!(v, vector![0.5, -2.0, 3.0]);
    }

    #[test]
    fn default_camera_sits_at_origin() {
        let settings = RenderSettings::default();
        let ray = Camera::default().primary_ray(300, -150, &settings);
        assert_eq!(ray.origin, Point::origin());
        assert_eq!(ray.direction, vector![0.5, -0.25, 1.0]);
    }

    #[test]
    fn yaw_rotates_view_direction() {
        let settings = RenderSettings::default();
        let camera = Camera { yaw: FRAC_PI_2, ..Camera::new(point![1.0, 2.0, 3.0]) };
        let ray = camera.primary_ray(0, 0, &settings);
        assert_eq!(ray.origin, point![1.0, 2.0, 3.0]);
        assert!((ray.direction - vector![1.0, 0.0, 0.0]).norm() < 1e-12);
    }
}
