//! Whitted-style ray tracer for scenes made of spheres.
//!
//! Renders ambient, point and directional lighting with Phong highlights, hard
//! shadows and optional mirror reflections into a [`picture::Framebuffer`]. The
//! renderer is a pure function of scene, camera and [`settings::RenderSettings`];
//! presenting the result is left to the caller.

pub mod camera;
pub mod error;
pub mod light;
pub mod lighting;
pub mod material;
pub mod object;
pub mod picture;
pub mod ray;
pub mod render;
pub mod scene;
pub mod settings;
pub mod vector;
