//! Interactive window for the sphere ray tracer.
//!
//! A worker thread re-renders the reference scene about 60 times a second and
//! hands each finished picture to the GPU presenter. Escape or closing the
//! window quits, the mouse wheel looks around.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{JoinHandle, sleep, spawn};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, MouseScrollDelta, VirtualKeyCode, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use whitted::camera::Camera;
use whitted::error::RenderError;
use whitted::picture::{Framebuffer, RGBA8};
use whitted::render::render_frame_cancellable;
use whitted::scene::Scene;
use whitted::settings::RenderSettings;

use crate::gpu::{Frame, Gpu, Renderer};

mod gpu;

const CANVAS_WIDTH: u32 = 600;
const CANVAS_HEIGHT: u32 = 600;
const REFLECTION_DEPTH: u32 = 3;
const FRAME_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);
const LOOK_SENSITIVITY: f64 = 0.005;

#[derive(Clone)]
struct State {
    camera: Camera,
    scene: Arc<Scene>,
    settings: RenderSettings,
}

/// Sleeps until the next tick of a fixed-rate clock. Falls back to "now" when a frame overran.
struct FrameClock {
    next: Instant,
}

impl FrameClock {
    fn new() -> Self {
        FrameClock { next: Instant::now() + FRAME_INTERVAL }
    }

    fn tick(&mut self) {
        let now = Instant::now();
        if self.next > now {
            sleep(self.next - now);
            self.next += FRAME_INTERVAL;
        } else {
            self.next = now + FRAME_INTERVAL;
        }
    }
}

fn spawn_worker(frame: &Arc<Mutex<Frame<RGBA8>>>, state: Arc<Mutex<State>>, cancel: Arc<AtomicBool>) -> JoinHandle<()> {
    let frame = Arc::downgrade(frame);
    let size = state.lock().expect("state lock").settings.size();
    let mut picture = Framebuffer::filled(size, RGBA8::WHITE);
    let mut clock = FrameClock::new();

    info!(target: "app", "Spawning worker thread");
    spawn(move || {
        while let Some(frame) = frame.upgrade() {
            let state = state.lock().expect("state lock").clone();

            let start = Instant::now();
            match render_frame_cancellable(&state.scene, &state.camera, &state.settings, &mut picture, &cancel) {
                Ok(()) => {
                    frame.lock().expect("frame submission lock").submit(&picture);
                    debug!(target: "app", "Frame rendered in {:?}", start.elapsed());
                }
                Err(RenderError::Cancelled) => break,
                Err(err) => {
                    error!(target: "app", "Render failed: {}", err);
                    break;
                }
            }
            drop(frame);
            clock.tick();
        }
        info!(target: "app", "Worker stopping");
    })
}

fn main() {
    env_logger::builder().target(env_logger::Target::Stdout).init();

    let settings = RenderSettings::default()
        .with_size(CANVAS_WIDTH, CANVAS_HEIGHT)
        .with_reflection_depth(REFLECTION_DEPTH);
    if let Err(err) = settings.validate() {
        error!(target: "app", "{}", err);
        return;
    }

    let event_loop = EventLoop::new();

    let window = WindowBuilder::new()
        .with_title("whitted")
        .with_inner_size(PhysicalSize::new(CANVAS_WIDTH, CANVAS_HEIGHT))
        .with_resizable(false)
        .build(&event_loop)
        .expect("window");

    let mut renderer = smol::block_on(async {
        let gpu = Gpu::new().await;
        let surface = gpu.surface(&window);

        let size = window.inner_size();
        Renderer::new(gpu, surface, (size.width, size.height), settings.size())
    });

    let state = Arc::new(Mutex::new(State {
        camera: Camera::default(),
        scene: Arc::new(Scene::reference()),
        settings,
    }));
    let cancel = Arc::new(AtomicBool::new(false));

    spawn_worker(&renderer.frame(), state.clone(), cancel.clone());

    let mut next_present = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::RedrawRequested(window_id) if window.id() == window_id => {
                renderer.render();
            }
            Event::MainEventsCleared => {
                let now = Instant::now();
                if now >= next_present {
                    window.request_redraw();
                    next_present = now + FRAME_INTERVAL;
                }
                control_flow.set_wait_until(next_present);
            }
            Event::WindowEvent { event, window_id } if window.id() == window_id => match event {
                WindowEvent::Resized(size) => {
                    renderer.surface_resize((size.width, size.height));
                }
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input: KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(VirtualKeyCode::Escape),
                        ..
                    },
                    ..
                } => {
                    info!(target: "app", "Quit requested");
                    cancel.store(true, Ordering::Relaxed);
                    control_flow.set_exit();
                }
                WindowEvent::MouseWheel { delta: MouseScrollDelta::PixelDelta(position), .. } => {
                    let mut state = state.lock().expect("state write lock");
                    state.camera.yaw += position.x * LOOK_SENSITIVITY;
                    state.camera.pitch += position.y * LOOK_SENSITIVITY;
                }
                _ => {}
            }
            Event::LoopDestroyed => {
                cancel.store(true, Ordering::Relaxed);
            }
            _ => {}
        }
    });
}
