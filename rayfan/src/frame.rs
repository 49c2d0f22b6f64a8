use super::*;

/// The size of the area the simulation takes place in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: Float,
    pub height: Float,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.,
            height: 600.,
        }
    }
}

/// Which way the user wants the emitter to move during a frame.
///
/// Both directions may be asserted at once, their effects then cancel out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
}

impl MoveIntent {
    pub const NONE: Self = Self {
        up: false,
        down: false,
    };
    pub const UP: Self = Self {
        up: true,
        down: false,
    };
    pub const DOWN: Self = Self {
        up: false,
        down: true,
    };
}

/// The box rays are cast from. It can only move vertically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emitter {
    /// Top-left corner
    pub pos: Vector,
    /// `(width, height)`
    pub size: Vector,
    /// Vertical speed, in units per second
    pub speed: Float,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::left_centered(&Viewport::default())
    }
}

impl Emitter {
    pub const DEFAULT_SIZE: Float = 50.;
    pub const DEFAULT_SPEED: Float = 300.;
    pub const DEFAULT_X: Float = 100.;

    #[inline]
    #[must_use]
    pub fn new(pos: impl Into<Vector>, size: impl Into<Vector>, speed: Float) -> Self {
        Self {
            pos: pos.into(),
            size: size.into(),
            speed,
        }
    }

    /// A default-sized emitter, near the left edge of `viewport`, vertically centered.
    #[must_use]
    pub fn left_centered(viewport: &Viewport) -> Self {
        let size = Self::DEFAULT_SIZE;
        Self::new(
            [Self::DEFAULT_X, (viewport.height - size) * 0.5],
            [size, size],
            Self::DEFAULT_SPEED,
        )
    }

    /// Where rays are cast from: the middle of the right edge.
    #[inline]
    #[must_use]
    pub fn cast_origin(&self) -> Vector {
        Vector::new(self.pos.x + self.size.x, self.pos.y + self.size.y * 0.5)
    }

    /// The largest allowed value of `self.pos.y` in `viewport`.
    #[inline]
    #[must_use]
    pub fn max_y(&self, viewport: &Viewport) -> Float {
        (viewport.height - self.size.y).max(0.)
    }

    /// Moves `self` by `speed * dt` in the direction(s) of `intent`, then keeps it inside `viewport`.
    pub fn update(&mut self, intent: &MoveIntent, dt: Float, viewport: &Viewport) {
        let step = self.speed * dt;

        if intent.up {
            self.pos.y -= step;
        }

        if intent.down {
            self.pos.y += step;
        }

        self.clamp_into(viewport);
    }

    /// Clamps the vertical position into `[0, viewport.height - height]`.
    #[inline]
    pub fn clamp_into(&mut self, viewport: &Viewport) {
        self.pos.y = self.pos.y.clamp(0., self.max_y(viewport));
    }
}

/// Presentation constants. These have no geometric meaning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawParams {
    /// Length of the line drawn along a reflected ray
    pub reflected_length: Float,
    /// Length of the line drawn along a ray that hits nothing
    pub escape_length: Float,
    pub marker_radius: Float,
    pub mirror_thickness: Float,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            reflected_length: 300.,
            escape_length: 800.,
            marker_radius: 3.,
            mirror_thickness: 4.,
        }
    }
}

/// Everything that stays constant during a session.
///
/// `emitter` is only the starting state of the emitter, see [`Lift`].
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub title: String,
    pub viewport: Viewport,
    pub emitter: Emitter,
    /// In declaration order, which is used to break ties.
    pub mirrors: Vec<Segment>,
    pub fan: FanParams,
    pub draw: DrawParams,
}

impl Default for Scene {
    fn default() -> Self {
        Self::single_mirror()
    }
}

impl Scene {
    pub const MIRROR_A: [Float; 2] = [600., 150.];
    pub const MIRROR_B: [Float; 2] = [700., 300.];
    pub const MIRROR_C: [Float; 2] = [600., 450.];
    pub const MIRROR_D: [Float; 2] = [700., 350.];

    /// A scene using the default viewport, emitter and presentation constants.
    #[must_use]
    pub fn new(title: impl Into<String>, mirrors: Vec<Segment>, fan: FanParams) -> Self {
        let viewport = Viewport::default();
        Self {
            title: title.into(),
            viewport,
            emitter: Emitter::left_centered(&viewport),
            mirrors,
            fan,
            draw: DrawParams::default(),
        }
    }

    /// One mirror, 12 rays spread over 90°.
    #[must_use]
    pub fn single_mirror() -> Self {
        Self::new(
            "Lift + Multi-Ray Reflection",
            vec![Segment::new(Self::MIRROR_A, Self::MIRROR_B)],
            FanParams::new(12, 90.),
        )
    }

    /// Two mirrors, 10 rays spread over 90°.
    #[must_use]
    pub fn double_mirror() -> Self {
        Self::new(
            "Lift + Multi-Mirror Ray Reflection",
            vec![
                Segment::new(Self::MIRROR_A, Self::MIRROR_B),
                Segment::new(Self::MIRROR_C, Self::MIRROR_D),
            ],
            FanParams::new(10, 90.),
        )
    }

    /// Indices of the mirrors no ray can ever hit.
    pub fn degenerate_mirrors(&self) -> impl Iterator<Item = usize> + '_ {
        self.mirrors
            .iter()
            .enumerate()
            .filter_map(|(i, mirror)| mirror.is_degenerate().then_some(i))
    }
}

/// A ray of a fan, and where it first lands, if anywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayTrace {
    pub ray: Ray,
    pub hit: Option<Hit>,
}

impl RayTrace {
    /// The ray leaving the hit point, if any.
    #[inline]
    #[must_use]
    pub fn reflected(&self) -> Option<Ray> {
        self.hit.map(|hit| hit.reflected(&self.ray))
    }

    /// If `self` hit: the incident line, the reflected line and a marker on the hit point.
    ///
    /// Otherwise: one long line along the ray.
    pub fn append_primitives(&self, params: &DrawParams, list: &mut DrawList) {
        let origin = self.ray.pos;

        match self.hit {
            Some(hit) => {
                let reflected = hit.reflected(&self.ray);
                list.line(origin, hit.point, LineKind::Incident);
                list.line(
                    hit.point,
                    reflected.at(params.reflected_length),
                    LineKind::Reflected,
                );
                list.push(Primitive::Marker { pos: hit.point });
            }
            None => list.line(
                origin,
                self.ray.at(params.escape_length),
                LineKind::Escaped,
            ),
        }
    }
}

/// Casts `fan` from `origin`, and resolves the nearest hit of each ray against `mirrors`.
#[must_use]
pub fn trace_fan(
    origin: impl Into<Vector>,
    fan: &FanParams,
    mirrors: &(impl Mirror + ?Sized),
) -> Vec<RayTrace> {
    fan.generate(origin)
        .into_iter()
        .map(|ray| RayTrace {
            ray,
            hit: mirrors.closest_hit(&ray),
        })
        .collect()
}

/// The output of one [`Lift::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// One entry per ray, in fan order
    pub traces: Vec<RayTrace>,
    /// The emitter first, then every ray, then the mirrors
    pub primitives: Vec<Primitive>,
}

impl Frame {
    #[inline]
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.traces.iter().filter(|trace| trace.hit.is_some()).count()
    }
}

/// Runs a [`Scene`], frame by frame. Owns the only mutable state: the emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct Lift {
    scene: Scene,
    emitter: Emitter,
}

impl Lift {
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        for i in scene.degenerate_mirrors() {
            log::warn!("mirror {i} has coincident endpoints, no ray will ever hit it");
        }

        let mut emitter = scene.emitter;
        emitter.clamp_into(&scene.viewport);

        Self { scene, emitter }
    }

    #[inline]
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    #[must_use]
    pub const fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Puts the emitter back to where the scene started it.
    pub fn reset(&mut self) {
        self.emitter = self.scene.emitter;
        self.emitter.clamp_into(&self.scene.viewport);
    }

    /// Moves the emitter, then traces a full fan from its new position.
    ///
    /// `dt` is the time elapsed since the previous frame, in seconds.
    pub fn step(&mut self, dt: Float, intent: MoveIntent) -> Frame {
        let Scene {
            viewport,
            mirrors,
            fan,
            draw,
            ..
        } = &self.scene;

        self.emitter.update(&intent, dt, viewport);

        let traces = trace_fan(self.emitter.cast_origin(), fan, mirrors.as_slice());

        // emitter + up to 3 per ray + mirrors
        let mut list = DrawList::with_capacity(1 + 3 * traces.len() + mirrors.len());

        self.emitter.append_primitives(&mut list);
        traces
            .iter()
            .for_each(|trace| trace.append_primitives(draw, &mut list));
        mirrors.append_primitives(&mut list);

        let frame = Frame {
            traces,
            primitives: list.into_inner(),
        };

        log::trace!(
            "emitter at y = {:.1}: {} rays, {} hits",
            self.emitter.pos.y,
            frame.traces.len(),
            frame.hit_count(),
        );

        frame
    }
}
