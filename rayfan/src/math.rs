//! Stateless 2D vector helpers.

use super::*;

/// The standard dot product.
#[inline]
#[must_use]
pub fn dot(a: &Vector, b: &Vector) -> Float {
    a.dot(b)
}

/// The 2D cross product, i. e. the determinant of the `[a, b]` matrix.
#[inline]
#[must_use]
pub fn cross(a: &Vector, b: &Vector) -> Float {
    a.x * b.y - a.y * b.x
}

/// Returns `v / |v|`, or the zero vector if `v` is exactly zero.
#[inline]
#[must_use]
pub fn normalize(v: &Vector) -> Vector {
    v.try_normalize(0.).unwrap_or_else(Vector::zeros)
}

/// Reflect `d` w.r.t. the line whose normal is `n`.
///
/// `n` must be of unit length for the result to be meaningful.
#[inline]
#[must_use]
pub fn reflect(d: &Vector, n: &Vector) -> Vector {
    d - n * (2. * dot(d, n))
}

/// `v` rotated by 90°, as `(v.y, -v.x)`.
#[inline]
#[must_use]
pub fn perpendicular(v: &Vector) -> Vector {
    Vector::new(v.y, -v.x)
}

/// The unit vector at `angle` radians from the +x axis (clockwise on screen, since +y points down).
#[inline]
#[must_use]
pub fn angle_dir(angle: Float) -> Vector {
    normalize(&Vector::new(angle.cos(), angle.sin()))
}
