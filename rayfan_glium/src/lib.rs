use core::array;

use gl::{backend::glutin::DisplayCreationError, glutin};

use glutin::{dpi, event_loop, window};
use num_traits::AsPrimitive;
use rayfan::{nalgebra::SVector, Lift, Scene};

mod controls;
mod render;

use render::SceneRenderer;

pub use controls::LiftController;
pub use glium as gl;
pub use rayfan;

#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Vertex {
    pub position: [f32; 2],
}

gl::implement_vertex!(Vertex, position);

impl<S: AsPrimitive<f32>> From<SVector<S, 2>> for Vertex {
    fn from(v: SVector<S, 2>) -> Self {
        Self {
            position: array::from_fn(|i| v[i].as_()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Display(#[from] DisplayCreationError),
    #[error(transparent)]
    Program(#[from] gl::ProgramCreationError),
    #[error(transparent)]
    Buffer(#[from] gl::vertex::BufferCreationError),
    #[error(transparent)]
    Draw(#[from] gl::DrawError),
    #[error(transparent)]
    SwapBuffers(#[from] gl::SwapBuffersError),
}

/// Colors used to draw a scene, in RGBA.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Palette {
    pub background: [f32; 4],
    pub emitter: [f32; 4],
    pub rays: [f32; 4],
    pub markers: [f32; 4],
    pub mirrors: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [0., 0., 0., 1.],
            // yellow
            emitter: [0.99, 0.98, 0., 1.],
            // green
            rays: [0., 0.89, 0.19, 1.],
            markers: [0., 0.89, 0.19, 1.],
            // light gray
            mirrors: [0.78, 0.78, 0.78, 1.],
        }
    }
}

/// A handle for the window used to run scenes in.
pub struct SimulationWindow {
    events_loop: event_loop::EventLoop<()>,
    display: gl::Display,
}

impl SimulationWindow {
    pub const CONTROLS_HINT: &'static str = "Up/Down to move the lift, R to reset, Esc to quit";

    /// Create a new window to run scenes in from a `winit`
    /// [`WindowBuilder`](window::WindowBuilder) and a [`glutin::ContextBuilder`].
    #[inline]
    pub fn new<T: glutin::ContextCurrentState>(
        wb: window::WindowBuilder,
        cb: glutin::ContextBuilder<T>,
    ) -> Result<Self, DisplayCreationError> {
        let events_loop = event_loop::EventLoop::default();
        gl::Display::new(wb, cb, &events_loop).map(|display| Self {
            events_loop,
            display,
        })
    }

    /// A vsync'ed, non-resizable window, the size of `scene`'s viewport, titled after it.
    pub fn for_scene(scene: &Scene) -> Result<Self, DisplayCreationError> {
        let window = Self::new(
            window::WindowBuilder::new()
                .with_inner_size(dpi::LogicalSize::new(
                    scene.viewport.width,
                    scene.viewport.height,
                ))
                .with_resizable(false)
                .with_title(format!("{} ({})", scene.title, Self::CONTROLS_HINT)),
            glutin::ContextBuilder::new()
                .with_vsync(true)
                .with_multisampling(1 << 2),
        )?;

        log::info!(
            "created a {}x{} window for {:?}",
            scene.viewport.width,
            scene.viewport.height,
            scene.title,
        );

        Ok(window)
    }

    /// Runs `lift` until the window is closed.
    ///
    /// Only returns if setting up the renderer failed. Errors occurring
    /// later on are logged and end the event loop (and the process).
    pub fn run(self, lift: Lift, palette: Palette) -> Result<(), RenderError> {
        let Self {
            events_loop,
            display,
        } = self;

        let renderer = SceneRenderer::new(&display, lift.scene(), palette)?;

        renderer.run(lift, display, events_loop)
    }
}

/// Opens a window for `scene` and runs it with the default palette.
pub fn run_scene(scene: Scene) -> Result<(), RenderError> {
    SimulationWindow::for_scene(&scene)?.run(Lift::new(scene), Palette::default())
}
