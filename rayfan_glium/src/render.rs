use std::time::Instant;

use super::*;

use gl::{
    glutin::event::{self, ElementState, VirtualKeyCode},
    index::{NoIndices, PrimitiveType},
    uniforms::Uniforms,
    Surface,
};
use rayfan::{nalgebra::Orthographic3, Frame, LineKind, Primitive, Vector};

const VERTEX_SHADER_SRC: &str = r"
    #version 140

    in vec2 position;
    uniform mat4 projection;

    void main() {
        gl_Position = projection * vec4(position, 0.0, 1.0);
    }
";

const FRAGMENT_SHADER_SRC: &str = r"
    #version 140

    uniform vec4 color_vec;

    out vec4 color;

    void main() {
        color = color_vec;
    }
";

/// Turns each point into a small cross. `half_extent` is given in clip space.
const MARKER_GEOMETRY_SHADER_SRC: &str = r"
    #version 330

    layout (points) in;
    layout (line_strip, max_vertices = 4) out;

    uniform vec2 half_extent;

    void main() {
        vec4 pos = gl_in[0].gl_Position;

        vec4 t1 = vec4(half_extent, 0.0, 0.0);

        gl_Position = pos + t1;
        EmitVertex();

        gl_Position = pos - t1;
        EmitVertex();
        EndPrimitive();

        vec4 t2 = vec4(half_extent.x, -half_extent.y, 0.0, 0.0);

        gl_Position = pos + t2;
        EmitVertex();

        gl_Position = pos - t2;
        EmitVertex();
        EndPrimitive();
    }
";

/// Vertices of one frame, grouped by how they are drawn.
#[derive(Default)]
struct FrameVertices {
    rays: Vec<Vertex>,
    mirrors: Vec<Vertex>,
    markers: Vec<Vertex>,
    /// Two triangles per rectangle
    rects: Vec<Vertex>,
}

impl FrameVertices {
    fn clear(&mut self) {
        self.rays.clear();
        self.mirrors.clear();
        self.markers.clear();
        self.rects.clear();
    }

    fn extend_from(&mut self, primitives: &[Primitive]) {
        for primitive in primitives {
            match *primitive {
                Primitive::Line { start, end, kind } => {
                    let list = match kind {
                        LineKind::Mirror => &mut self.mirrors,
                        LineKind::Incident | LineKind::Reflected | LineKind::Escaped => {
                            &mut self.rays
                        }
                    };
                    list.extend([start, end].map(Vertex::from));
                }
                Primitive::Marker { pos } => self.markers.push(pos.into()),
                Primitive::Rect { pos, size } => {
                    let [a, b, c, d] = [
                        pos,
                        pos + Vector::new(size.x, 0.),
                        pos + Vector::new(0., size.y),
                        pos + size,
                    ]
                    .map(Vertex::from);

                    self.rects.extend([a, b, c, b, d, c]);
                }
            }
        }
    }
}

pub(crate) struct SceneRenderer {
    program: gl::Program,
    marker_program: gl::Program,
    projection: [[f32; 4]; 4],
    /// Half the size of a hit marker, in clip space
    marker_half_extent: [f32; 2],
    mirror_thickness: f32,
    palette: Palette,
    scratch: FrameVertices,
}

impl SceneRenderer {
    pub(crate) fn new(
        display: &gl::Display,
        scene: &Scene,
        palette: Palette,
    ) -> Result<Self, gl::ProgramCreationError> {
        let program =
            gl::Program::from_source(display, VERTEX_SHADER_SRC, FRAGMENT_SHADER_SRC, None)?;

        let marker_program = gl::Program::from_source(
            display,
            VERTEX_SHADER_SRC,
            FRAGMENT_SHADER_SRC,
            Some(MARKER_GEOMETRY_SHADER_SRC),
        )?;

        let width: f32 = scene.viewport.width.as_();
        let height: f32 = scene.viewport.height.as_();
        let radius: f32 = scene.draw.marker_radius.as_();

        // screen coordinates: y = 0 at the top
        let projection = Orthographic3::new(0., width, height, 0., -1., 1.)
            .to_homogeneous()
            .into();

        Ok(Self {
            program,
            marker_program,
            projection,
            marker_half_extent: [2. * radius / width, 2. * radius / height],
            mirror_thickness: scene.draw.mirror_thickness.as_(),
            palette,
            scratch: FrameVertices::default(),
        })
    }

    pub(crate) fn run(
        mut self,
        mut lift: Lift,
        display: gl::Display,
        events_loop: event_loop::EventLoop<()>,
    ) -> ! {
        use event_loop::ControlFlow;

        let mut controller = LiftController::new();
        let mut last_render_time = Instant::now();

        events_loop.run(move |ev, _, control_flow| match ev {
            event::Event::WindowEvent { event, .. } => match event {
                event::WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                event::WindowEvent::KeyboardInput { input, .. } => {
                    if let Some(keycode) = input.virtual_keycode {
                        if keycode == VirtualKeyCode::Escape
                            && input.state == ElementState::Pressed
                        {
                            *control_flow = ControlFlow::Exit;
                        } else {
                            controller.process_keyboard(keycode, input.state);
                        }
                    }
                }
                _ => {}
            },
            event::Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = (now - last_render_time).as_secs_f64();
                last_render_time = now;

                if controller.take_reset() {
                    lift.reset();
                }

                let frame = lift.step(dt, controller.intent());

                if let Err(e) = self.render(&display, &frame) {
                    log::error!("failed to render frame: {e}");
                    *control_flow = ControlFlow::Exit;
                }
            }
            event::Event::MainEventsCleared => display.gl_window().window().request_redraw(),
            _ => (),
        })
    }

    fn render(&mut self, display: &gl::Display, frame: &Frame) -> Result<(), RenderError> {
        self.scratch.clear();
        self.scratch.extend_from(&frame.primitives);

        let mut target = display.draw();

        let [r, g, b, a] = self.palette.background;
        target.clear_color(r, g, b, a);

        // always finish the frame, even if a draw call failed
        let drawn = self.draw_all(display, &mut target);
        target.finish()?;
        drawn
    }

    fn draw_all(&self, display: &gl::Display, target: &mut gl::Frame) -> Result<(), RenderError> {
        let params = gl::DrawParameters {
            blend: gl::Blend::alpha_blending(),
            ..Default::default()
        };

        let mirror_params = gl::DrawParameters {
            line_width: Some(self.mirror_thickness),
            ..params.clone()
        };

        let FrameVertices {
            rays,
            mirrors,
            markers,
            rects,
        } = &self.scratch;

        let projection = self.projection;
        let palette = &self.palette;

        let groups = [
            (
                rects,
                PrimitiveType::TrianglesList,
                &self.program,
                &params,
                palette.emitter,
            ),
            (
                rays,
                PrimitiveType::LinesList,
                &self.program,
                &params,
                palette.rays,
            ),
            (
                mirrors,
                PrimitiveType::LinesList,
                &self.program,
                &mirror_params,
                palette.mirrors,
            ),
        ];

        for (vertices, primitives, program, params, color) in groups {
            if vertices.is_empty() {
                continue;
            }

            let buffer = gl::VertexBuffer::new(display, vertices)?;

            draw(
                target,
                &buffer,
                primitives,
                program,
                &gl::uniform! {
                    projection: projection,
                    color_vec: color,
                },
                params,
            )?;
        }

        if !markers.is_empty() {
            let buffer = gl::VertexBuffer::new(display, markers)?;

            draw(
                target,
                &buffer,
                PrimitiveType::Points,
                &self.marker_program,
                &gl::uniform! {
                    projection: projection,
                    color_vec: palette.markers,
                    half_extent: self.marker_half_extent,
                },
                &params,
            )?;
        }

        Ok(())
    }
}

fn draw(
    target: &mut gl::Frame,
    buffer: &gl::VertexBuffer<Vertex>,
    primitives: PrimitiveType,
    program: &gl::Program,
    uniforms: &impl Uniforms,
    params: &gl::DrawParameters,
) -> Result<(), gl::DrawError> {
    target.draw(buffer, NoIndices(primitives), program, uniforms, params)
}
