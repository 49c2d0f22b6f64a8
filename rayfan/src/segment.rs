use super::*;

/// Below this (absolute) value, the 2D cross product of a ray's direction and a
/// segment's direction is considered to be zero, and the two considered parallel.
pub const PARALLEL_EPSILON: Float = 1e-6;

/// Parameters of the point where a ray crosses a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentIntersection {
    /// Distance along the ray's direction: the point is `origin + t * dir`
    pub t: Float,
    /// Position along the segment: the point is `p1 + u * (p2 - p1)`
    pub u: Float,
}

/// Intersects the ray starting at `origin`, directed by `dir`, with the segment `[p1, p2]`.
///
/// Solves `origin + t * dir = p1 + u * (p2 - p1)` for `t` and `u`.
///
/// Returns `None` if:
/// - the directions are (nearly) parallel, collinear overlap included, or one of them is degenerate,
/// - the crossing is not strictly ahead of `origin` (`t <= 0`),
/// - the crossing lands outside the segment (`u` not in `[0, 1]`, endpoints count as inside).
#[inline]
#[must_use]
pub fn intersect(
    origin: &Vector,
    dir: &Vector,
    p1: &Vector,
    p2: &Vector,
) -> Option<SegmentIntersection> {
    let v = p2 - p1;
    let denom = math::cross(dir, &v);

    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let w = p1 - origin;
    let t = math::cross(&w, &v) / denom;
    let u = math::cross(&w, dir) / denom;

    (t > 0. && (0. ..=1.).contains(&u)).then_some(SegmentIntersection { t, u })
}

/// A finite, line segment-shaped mirror.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    p1: Vector,
    p2: Vector,
    /// Computed once, at creation
    normal: Vector,
}

impl Segment {
    /// Creates a mirror from its two endpoints.
    ///
    /// This never fails. If the endpoints (nearly) coincide, the mirror
    /// is degenerate: its normal is zero and no ray will ever hit it.
    #[inline]
    #[must_use]
    pub fn new(p1: impl Into<Vector>, p2: impl Into<Vector>) -> Self {
        let (p1, p2) = (p1.into(), p2.into());

        Self {
            p1,
            p2,
            normal: math::normalize(&math::perpendicular(&(p2 - p1))),
        }
    }

    /// Like [`Self::new`], but returns `None` if the mirror would be degenerate.
    #[inline]
    #[must_use]
    pub fn try_new(p1: impl Into<Vector>, p2: impl Into<Vector>) -> Option<Self> {
        let segment = Self::new(p1, p2);
        (!segment.is_degenerate()).then_some(segment)
    }

    #[inline]
    #[must_use]
    pub const fn p1(&self) -> &Vector {
        &self.p1
    }

    #[inline]
    #[must_use]
    pub const fn p2(&self) -> &Vector {
        &self.p2
    }

    /// The unit normal, `p2 - p1` rotated by 90° then normalized.
    ///
    /// Zero if `self` is degenerate.
    #[inline]
    #[must_use]
    pub const fn normal(&self) -> &Vector {
        &self.normal
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> Vector {
        self.p2 - self.p1
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> Float {
        self.direction().norm()
    }

    /// Whether unit-length rays can never hit this segment, because it is too short.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length() < PARALLEL_EPSILON
    }

    /// Returns the point at position `u` along this segment.
    #[inline]
    #[must_use]
    pub fn at(&self, u: Float) -> Vector {
        self.p1 + self.direction() * u
    }

    #[inline]
    #[must_use]
    pub fn intersection(&self, ray: &Ray) -> Option<SegmentIntersection> {
        intersect(&ray.pos, &ray.dir, &self.p1, &self.p2)
    }
}

impl<U> From<[U; 2]> for Segment
where
    Vector: From<U>,
{
    #[inline]
    fn from([p1, p2]: [U; 2]) -> Self {
        Self::new(Vector::from(p1), Vector::from(p2))
    }
}

impl Mirror for Segment {
    #[inline]
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        self.intersection(ray)
            .map(|SegmentIntersection { t, u }| Hit {
                dist: t,
                u,
                point: ray.at(t),
                normal: self.normal,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_rotated_direction() {
        let s = Segment::new([600., 150.], [700., 300.]);
        let n = s.normal();
        assert!((n.norm() - 1.).abs() < 1e-12);
        assert!(math::dot(n, &s.direction()).abs() < 1e-9);
        // (dy, -dx) = (150, -100)
        assert!(n.x > 0. && n.y < 0.);
    }

    #[test]
    fn degenerate_segment() {
        let s = Segment::new([3., 3.], [3., 3.]);
        assert!(s.is_degenerate());
        assert_eq!(*s.normal(), Vector::zeros());
        assert!(Segment::try_new([3., 3.], [3., 3.]).is_none());

        let ray = Ray::new([0., 3.], [1., 0.]);
        assert_eq!(s.closest_hit(&ray), None);
    }

    #[test]
    fn from_array() {
        let s = Segment::from([[0., 0.], [0., 2.]]);
        assert_eq!(*s.p2(), Vector::new(0., 2.));
        assert_eq!(s.at(0.5), Vector::new(0., 1.));
        assert_eq!(s.length(), 2.);
    }

    #[test]
    fn hit_carries_precomputed_normal() {
        let s = Segment::new([5., -5.], [5., 5.]);
        let ray = Ray::new([0., 0.], [1., 0.]);
        let hit = s.closest_hit(&ray).unwrap();
        assert_eq!(hit.point, Vector::new(5., 0.));
        assert_eq!(hit.normal, *s.normal());
    }
}
