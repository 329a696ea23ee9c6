use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::error::RenderError;
use crate::lighting::compute_lighting;
use crate::picture::{Color, Framebuffer, RGBA8, screen_to_canvas};
use crate::ray::{Interval, Ray};
use crate::scene::Scene;
use crate::settings::RenderSettings;
use crate::vector::{reflect, try_unit};

/// Color seen along `ray`, considering hits strictly inside `interval`.
///
/// With `depth > 0`, reflective surfaces blend in what their mirrored ray sees,
/// down to `depth` bounces.
pub fn trace_ray(scene: &Scene, ray: &Ray, interval: Interval, depth: u32, settings: &RenderSettings) -> Color {
    let Some(hit) = scene.closest_intersection(ray, interval) else {
        return scene.background;
    };

    let point = ray.at(hit.t);
    let view = -ray.direction;
    let normal = try_unit(&(point - hit.sphere.center));
    debug_assert!(normal.is_some(), "hit point coincides with sphere center {}", hit.sphere.center);
    let Some(normal) = normal else {
        return Color::BLACK;
    };

    let material = &hit.sphere.material;
    let intensity = compute_lighting(scene, &point, &normal, &view, material.specular, settings.shadow_epsilon);
    let local = material.color * intensity;

    if depth == 0 || !material.is_reflective() {
        return local;
    }

    let mirrored = Ray::new(point, reflect(&view, &normal));
    let reflected = trace_ray(scene, &mirrored, settings.secondary_range(), depth - 1, settings);
    local * (1.0 - material.reflective) + reflected * material.reflective
}

/// Final 8-bit color of one canvas pixel, in centered y-up coordinates.
pub fn render_pixel(scene: &Scene, camera: &Camera, settings: &RenderSettings, pixel_x: i64, pixel_y: i64) -> RGBA8 {
    let ray = camera.primary_ray(pixel_x, pixel_y, settings);
    trace_ray(scene, &ray, settings.primary_range(), settings.reflection_depth, settings).into()
}

fn check_frame(framebuffer: &Framebuffer, settings: &RenderSettings) -> Result<(), RenderError> {
    settings.validate()?;
    if framebuffer.size() != settings.size() {
        return Err(RenderError::FramebufferSize {
            expected: settings.size(),
            actual: framebuffer.size(),
        });
    }
    Ok(())
}

fn render_row(scene: &Scene, camera: &Camera, settings: &RenderSettings, y: u32, row: &mut [RGBA8]) {
    for (x, pixel) in row.iter_mut().enumerate() {
        let (pixel_x, pixel_y) = screen_to_canvas(x as u32, y, settings.width, settings.height);
        *pixel = render_pixel(scene, camera, settings, pixel_x, pixel_y);
    }
}

/// Overwrites every pixel of `framebuffer`. Rows are rendered in parallel.
pub fn render_frame(scene: &Scene, camera: &Camera, settings: &RenderSettings, framebuffer: &mut Framebuffer) -> Result<(), RenderError> {
    check_frame(framebuffer, settings)?;
    debug!(target: "render", "Rendering {}x{} frame, {} spheres, {} lights", settings.width, settings.height, scene.spheres.len(), scene.lights.len());

    framebuffer.par_rows_mut()
        .for_each(|(y, row)| render_row(scene, camera, settings, y, row));
    Ok(())
}

/// Like [`render_frame`], but stops picking up new scanlines once `cancel` is set.
///
/// Returns [`RenderError::Cancelled`] if any row was skipped; the framebuffer is then partially stale.
pub fn render_frame_cancellable(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    framebuffer: &mut Framebuffer,
    cancel: &AtomicBool,
) -> Result<(), RenderError> {
    check_frame(framebuffer, settings)?;

    framebuffer.par_rows_mut()
        .for_each(|(y, row)| {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            render_row(scene, camera, settings, y, row);
        });

    if cancel.load(Ordering::Relaxed) {
        trace!(target: "render", "Frame abandoned");
        return Err(RenderError::Cancelled);
    }
    Ok(())
}

/// Renders into a freshly allocated framebuffer.
pub fn render(scene: &Scene, camera: &Camera, settings: &RenderSettings) -> Result<Framebuffer, RenderError> {
    settings.validate()?;
    let mut framebuffer = Framebuffer::filled(settings.size(), RGBA8::default());
    render_frame(scene, camera, settings, &mut framebuffer)?;
    Ok(framebuffer)
}
