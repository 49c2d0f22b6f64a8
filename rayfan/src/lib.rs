use std::{rc::Rc, sync::Arc};

pub use nalgebra;

use nalgebra::Vector2;

mod draw;
mod fan;
mod frame;
pub mod math;
mod segment;

pub use draw::*;
pub use fan::*;
pub use frame::*;
pub use segment::*;

pub type Float = f64;

/// A point, or a direction, in screen space (+x to the right, +y downward).
pub type Vector = Vector2<Float>;

/// A light ray, represented as a half-line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line
    pub pos: Vector,
    /// The direction of the half-line.
    ///
    /// Expected to be of unit length. A zero direction is tolerated
    /// and describes a ray that never moves and never hits anything.
    pub dir: Vector,
}

impl Ray {
    /// Creates a ray without normalizing `dir`.
    #[inline]
    #[must_use]
    pub fn new(pos: impl Into<Vector>, dir: impl Into<Vector>) -> Self {
        Self {
            pos: pos.into(),
            dir: dir.into(),
        }
    }

    /// Creates a ray, normalizing `dir` with [`math::normalize`].
    #[inline]
    #[must_use]
    pub fn new_normalize(pos: impl Into<Vector>, dir: impl Into<Vector>) -> Self {
        Self::new(pos, math::normalize(&dir.into()))
    }

    /// Get the point at distance `t` (can be negative) from the ray's origin
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Vector {
        self.pos + self.dir * t
    }

    /// Returns the closest hit between `self` and `mirror`, if any.
    #[inline]
    #[must_use]
    pub fn closest_hit(&self, mirror: &(impl Mirror + ?Sized)) -> Option<Hit> {
        mirror.closest_hit(self)
    }
}

/// A valid intersection between a ray and a mirror.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// The ray parameter `t`: `ray.at(dist) == point`. Always strictly positive.
    pub dist: Float,
    /// Position of the hit along the mirror, in `[0, 1]`
    pub u: Float,
    pub point: Vector,
    /// The normal of the mirror that was hit, as computed when the mirror was created.
    pub normal: Vector,
}

impl Hit {
    /// The ray leaving `self.point` after `ray` bounced off the mirror.
    #[inline]
    #[must_use]
    pub fn reflected(&self, ray: &Ray) -> Ray {
        Ray::new(self.point, math::reflect(&ray.dir, &self.normal))
    }
}

/// Picks the hit with the smallest distance.
///
/// Hits are scanned in order and a later hit only replaces the current
/// best one if it is strictly closer, so, on ties, the first one wins.
#[inline]
#[must_use]
pub fn closest(hits: impl IntoIterator<Item = Hit>) -> Option<Hit> {
    hits.into_iter().fold(None, |best, hit| match best {
        Some(best) if best.dist <= hit.dist => Some(best),
        _ => Some(hit),
    })
}

/// The core trait of this library: something rays can bounce off.
///
/// Collections of mirrors are mirrors themselves, they report the
/// closest hit among their elements, using declaration order to break ties.
pub trait Mirror {
    /// Returns the closest hit between `ray` and `self`, strictly ahead of `ray.pos`.
    ///
    /// Returns `None` if `ray` doesn't hit `self`.
    fn closest_hit(&self, ray: &Ray) -> Option<Hit>;
}

impl<T: Mirror> Mirror for [T] {
    #[inline]
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        closest(self.iter().filter_map(|mirror| mirror.closest_hit(ray)))
    }
}

impl<T: Mirror, const N: usize> Mirror for [T; N] {
    #[inline]
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        self.as_slice().closest_hit(ray)
    }
}

impl<T: Mirror> Mirror for Vec<T> {
    #[inline]
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        self.as_slice().closest_hit(ray)
    }
}

// No blanket impl over `Deref`: it would forbid downstream impls for other smart pointers.

impl<T: Mirror + ?Sized> Mirror for Box<T> {
    #[inline]
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        self.as_ref().closest_hit(ray)
    }
}

impl<T: Mirror + ?Sized> Mirror for Arc<T> {
    #[inline]
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        self.as_ref().closest_hit(ray)
    }
}

impl<T: Mirror + ?Sized> Mirror for Rc<T> {
    #[inline]
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        self.as_ref().closest_hit(ray)
    }
}

impl<T: Mirror + ?Sized> Mirror for &T {
    #[inline]
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        (**self).closest_hit(ray)
    }
}

/// Returns the nearest hit between `ray` and `mirrors`.
///
/// Mirrors are queried in declaration order, and on exact ties in distance,
/// the first declared mirror wins. The normal in the returned [`Hit`] is that of the winning mirror.
#[inline]
#[must_use]
pub fn resolve_nearest(ray: &Ray, mirrors: &[Segment]) -> Option<Hit> {
    mirrors.closest_hit(ray)
}
