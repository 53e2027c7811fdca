//! Windowed viewer.
//!
//! Controls:
//!
//! | Input | Action |
//! |-------|--------|
//! | Space | Toggle assembled / dispersed (manual control only) |
//! | G | Start or stop pointer-simulated gesture control |
//! | Left drag | Orbit the camera (manual control only) |
//! | Scroll | Zoom |
//! | P | Pause: the tree, rotation and camera freeze |
//! | Escape | Quit |
//!
//! Under gesture control the pointer stands in for a tracked hand: holding
//! the left button is a pinch, and horizontal position steers the rotation.

use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton as WinitMouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::clock::FrameClock;
use crate::controller::Mode;
use crate::error::ViewerError;
use crate::gesture::{GestureProducer, PinchClassifier, PointerInput, PointerSource};
use crate::gpu::Renderer;
use crate::input::{Input, KeyCode, MouseButton};
use crate::scene::Scene;

/// Viewer start-up options.
#[derive(Clone, Debug, Default)]
pub struct ViewerOptions {
    /// Start under gesture control.
    pub gesture: bool,
}

/// Open a window and run `scene` until it is closed.
pub fn run(scene: Scene, options: ViewerOptions) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut viewer = Viewer::new(scene, options);
    event_loop.run_app(&mut viewer)?;

    match viewer.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Running gesture producer plus the channel feeding it pointer events.
struct GestureLink {
    producer: GestureProducer,
    pointer: Sender<PointerInput>,
}

impl GestureLink {
    fn forward(&self, input: PointerInput) {
        if self.pointer.send(input).is_err() {
            log::debug!("Gesture producer no longer listening");
        }
    }

    /// Hang up the pointer channel, then join the producer.
    ///
    /// The disconnect wakes the source's blocking poll at once, so the join
    /// does not wait out the poll timeout.
    fn close(self) {
        let GestureLink { producer, pointer } = self;
        drop(pointer);
        producer.stop();
    }
}

struct Viewer {
    scene: Scene,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    input: Input,
    clock: FrameClock,
    gesture: Option<GestureLink>,
    start_with_gesture: bool,
    shown_mode: Option<Mode>,
    error: Option<ViewerError>,
}

impl Viewer {
    fn new(scene: Scene, options: ViewerOptions) -> Self {
        Self {
            scene,
            window: None,
            renderer: None,
            input: Input::new(),
            clock: FrameClock::new(),
            gesture: None,
            start_with_gesture: options.gesture,
            shown_mode: None,
            error: None,
        }
    }

    fn start_gesture(&mut self) {
        if self.gesture.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let classifier = PinchClassifier::from_config(self.scene.config());
        match GestureProducer::spawn(PointerSource::new(rx, classifier)) {
            Ok(producer) => {
                self.scene.attach_gesture(producer.feed());
                self.gesture = Some(GestureLink {
                    producer,
                    pointer: tx,
                });
            }
            Err(e) => log::error!("Failed to start gesture producer: {}", e),
        }
    }

    fn stop_gesture(&mut self) {
        if let Some(link) = self.gesture.take() {
            self.scene.detach_gesture();
            link.close();
        }
    }

    fn forward_pointer(&self, event: &WindowEvent) {
        let Some(link) = &self.gesture else {
            return;
        };
        match event {
            WindowEvent::CursorMoved { .. } => {
                if let Some(cursor) = self.input.cursor_fraction() {
                    link.forward(PointerInput::Moved { x: cursor.x });
                }
            }
            WindowEvent::MouseInput {
                state,
                button: WinitMouseButton::Left,
                ..
            } => link.forward(match state {
                ElementState::Pressed => PointerInput::Pressed,
                ElementState::Released => PointerInput::Released,
            }),
            WindowEvent::CursorLeft { .. } => link.forward(PointerInput::Left),
            _ => {}
        }
    }

    fn handle_keys(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
        }
        if self.input.key_pressed(KeyCode::P) {
            self.clock.toggle_pause();
            self.scene.set_paused(self.clock.is_paused());
        }
        if self.input.key_pressed(KeyCode::G) {
            if self.gesture.is_some() {
                self.stop_gesture();
            } else {
                self.start_gesture();
            }
        }
        if self.input.key_pressed(KeyCode::Space) {
            if self.scene.is_gesture_driven() {
                log::debug!("Ignoring manual toggle under gesture control");
            } else {
                self.scene.toggle_mode();
            }
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.handle_keys(event_loop);

        let dt = self.clock.tick();
        self.scene.advance(dt);

        let gesture_driven = self.scene.is_gesture_driven();
        if let Some(renderer) = &mut self.renderer {
            let camera = &mut renderer.camera;
            if !gesture_driven && self.input.mouse_held(MouseButton::Left) {
                let drag = self.input.mouse_delta();
                camera.orbit(drag.x, drag.y);
            } else if !gesture_driven {
                camera.auto_rotate(dt);
            }
            camera.zoom(self.input.scroll_delta());

            renderer.tick(dt);
            self.scene.submit_to(renderer);
        }

        self.update_title();
        self.input.begin_frame();
    }

    fn update_title(&mut self) {
        let mode = self.scene.mode();
        if self.shown_mode == Some(mode) {
            return;
        }
        if let Some(window) = &self.window {
            let label = match mode {
                Mode::Assembled => "assembled",
                Mode::Dispersed => "dispersed",
            };
            window.set_title(&format!("treemorph ({})", label));
        }
        self.shown_mode = Some(mode);
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("treemorph")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let capacities: Vec<_> = self
            .scene
            .groups()
            .iter()
            .map(|g| (g.kind(), g.len()))
            .collect();
        match pollster::block_on(Renderer::new(Arc::clone(&window), &capacities)) {
            Ok(renderer) => {
                let size = window.inner_size();
                self.input.set_window_size(size.width, size.height);
                self.renderer = Some(renderer);
            }
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        }
        window.request_redraw();
        self.window = Some(window);

        if self.start_with_gesture {
            self.start_gesture();
        }
        log::info!("Viewer started");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);
        self.forward_pointer(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input
                    .set_window_size(physical_size.width, physical_size.height);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.stop_gesture();
        log::info!("Viewer closed after {} frames", self.clock.frame());
    }
}
