use super::*;

/// What a line drawn on screen stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// From the cast origin to a hit point
    Incident,
    /// From a hit point, along the reflected direction
    Reflected,
    /// From the cast origin, for rays that hit nothing
    Escaped,
    Mirror,
}

/// Something the rendering collaborator knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Line {
        start: Vector,
        end: Vector,
        kind: LineKind,
    },
    /// Marks a hit point
    Marker { pos: Vector },
    /// An axis-aligned rectangle, anchored at its top-left corner
    Rect { pos: Vector, size: Vector },
}

/// A wrapper around a `Vec<Primitive>` that only allows pushing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList(Vec<Primitive>);

impl DrawList {
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    #[inline]
    pub fn push(&mut self, primitive: Primitive) {
        self.0.push(primitive);
    }

    #[inline]
    pub fn line(&mut self, start: Vector, end: Vector, kind: LineKind) {
        self.push(Primitive::Line { start, end, kind });
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<Primitive> {
        self.0
    }
}

/// Things that can be turned into [`Primitive`]s.
#[impl_trait_for_tuples::impl_for_tuples(16)]
pub trait Drawable {
    fn append_primitives(&self, list: &mut DrawList);
}

impl Drawable for Segment {
    fn append_primitives(&self, list: &mut DrawList) {
        list.line(*self.p1(), *self.p2(), LineKind::Mirror);
    }
}

impl Drawable for Emitter {
    fn append_primitives(&self, list: &mut DrawList) {
        list.push(Primitive::Rect {
            pos: self.pos,
            size: self.size,
        });
    }
}

impl<T: Drawable> Drawable for [T] {
    fn append_primitives(&self, list: &mut DrawList) {
        self.iter().for_each(|a| a.append_primitives(list));
    }
}

impl<T: Drawable, const N: usize> Drawable for [T; N] {
    fn append_primitives(&self, list: &mut DrawList) {
        self.as_slice().append_primitives(list);
    }
}

impl<T: Drawable> Drawable for Vec<T> {
    fn append_primitives(&self, list: &mut DrawList) {
        self.as_slice().append_primitives(list);
    }
}

impl<T: Drawable + ?Sized> Drawable for Box<T> {
    fn append_primitives(&self, list: &mut DrawList) {
        self.as_ref().append_primitives(list);
    }
}

impl<T: Drawable + ?Sized> Drawable for &T {
    fn append_primitives(&self, list: &mut DrawList) {
        (**self).append_primitives(list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuples_draw_in_order() {
        let emitter = Emitter::default();
        let mirrors = vec![
            Segment::new([1., 1.], [2., 2.]),
            Segment::new([3., 3.], [4., 4.]),
        ];

        let mut list = DrawList::default();
        (&emitter, &mirrors).append_primitives(&mut list);

        let primitives = list.into_inner();
        assert_eq!(primitives.len(), 3);
        assert!(matches!(primitives[0], Primitive::Rect { .. }));
        assert_eq!(
            primitives[2],
            Primitive::Line {
                start: Vector::new(3., 3.),
                end: Vector::new(4., 4.),
                kind: LineKind::Mirror,
            }
        );
    }
}
