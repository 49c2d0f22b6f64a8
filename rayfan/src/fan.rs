use super::*;

/// How a fan of rays is spread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanParams {
    /// Number of rays cast. Zero casts nothing.
    pub ray_count: usize,
    /// Angle, in degrees, between the first and the last ray, centered on the forward (+x) axis.
    pub span_degrees: Float,
}

impl Default for FanParams {
    fn default() -> Self {
        Self {
            ray_count: 12,
            span_degrees: 90.,
        }
    }
}

impl FanParams {
    /// Upper bound on `ray_count` accepted from configuration.
    pub const MAX_RAY_COUNT: usize = 1 << 16;

    #[inline]
    #[must_use]
    pub const fn new(ray_count: usize, span_degrees: Float) -> Self {
        Self {
            ray_count,
            span_degrees,
        }
    }

    /// The angle, in radians, of each ray, evenly spaced from `-span / 2` to `span / 2`, both included.
    ///
    /// A single ray always points straight ahead (angle `0`).
    pub fn angles(&self) -> impl Iterator<Item = Float> {
        let n = self.ray_count;
        let span = self.span_degrees.to_radians();
        let half_span = span * 0.5;

        (0..n).map(move |i| {
            if n == 1 {
                0.
            } else {
                -half_span + span * i as Float / (n - 1) as Float
            }
        })
    }

    /// The unit direction of each ray, in the same order as [`Self::angles`]
    pub fn directions(&self) -> impl Iterator<Item = Vector> {
        self.angles().map(math::angle_dir)
    }

    /// Casts this fan from `origin`
    #[must_use]
    pub fn generate(&self, origin: impl Into<Vector>) -> Vec<Ray> {
        let pos = origin.into();
        self.directions().map(|dir| Ray::new(pos, dir)).collect()
    }
}

/// Returns `ray_count` rays starting at `origin`, evenly spread over `span_degrees`.
///
/// See [`FanParams::angles`].
#[inline]
#[must_use]
pub fn generate_fan(origin: impl Into<Vector>, span_degrees: Float, ray_count: usize) -> Vec<Ray> {
    FanParams::new(ray_count, span_degrees).generate(origin)
}
