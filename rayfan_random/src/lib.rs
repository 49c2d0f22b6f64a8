use rayfan::*;

use core::iter;
pub use rand;

pub trait Random: Sized {
    /// Generate a randomized value of this type, for the given `viewport`, using the provided `rng`
    ///
    /// This method must not fail. If creating a value is fallible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized), viewport: &Viewport) -> Self;
}

impl Random for Segment {
    /// A non-degenerate mirror, with both endpoints in the right half of `viewport`.
    fn random(rng: &mut (impl rand::Rng + ?Sized), viewport: &Viewport) -> Self {
        loop {
            let p1 = rand_point(rng, viewport);
            let p2 = rand_point(rng, viewport);

            if let Some(segment) = Segment::try_new(p1, p2) {
                break segment;
            }
        }
    }
}

impl Random for FanParams {
    fn random(rng: &mut (impl rand::Rng + ?Sized), _viewport: &Viewport) -> Self {
        const MIN_NUM_RAYS: usize = 1;
        const MAX_NUM_RAYS: usize = 32;

        Self::new(
            rng.gen_range(MIN_NUM_RAYS..=MAX_NUM_RAYS),
            rng.gen_range(10.0..=180.0),
        )
    }
}

impl Random for Scene {
    fn random(rng: &mut (impl rand::Rng + ?Sized), viewport: &Viewport) -> Self {
        const MIN_NUM_MIRRORS: usize = 1;
        const MAX_NUM_MIRRORS: usize = 8;
        let num_mirrors = rng.gen_range(MIN_NUM_MIRRORS..=MAX_NUM_MIRRORS);

        random_scene(rng, viewport, num_mirrors)
    }
}

/// A random scene with exactly `num_mirrors` mirrors.
pub fn random_scene(
    rng: &mut (impl rand::Rng + ?Sized),
    viewport: &Viewport,
    num_mirrors: usize,
) -> Scene {
    let mirrors = gen_rand_mirrors(num_mirrors, rng, viewport);
    let fan = FanParams::random(rng, viewport);

    let mut scene = Scene::new("Random mirrors", mirrors, fan);
    scene.viewport = *viewport;
    scene.emitter = Emitter::left_centered(viewport);
    scene
}

pub fn gen_rand_mirrors<T: Random>(
    n: usize,
    rng: &mut (impl rand::Rng + ?Sized),
    viewport: &Viewport,
) -> Vec<T> {
    iter::repeat_with(|| T::random(rng, viewport))
        .take(n)
        .collect()
}

/// A random point in the right half of `viewport`
pub fn rand_point(rng: &mut (impl rand::Rng + ?Sized), viewport: &Viewport) -> Vector {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly
    Vector::new(
        (rng.gen::<Float>() + 1.) * viewport.width * 0.5,
        rng.gen::<Float>() * viewport.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_scenes_are_valid() {
        let mut rng = StdRng::seed_from_u64(99);
        let viewport = Viewport::default();

        for _ in 0..100 {
            let scene = Scene::random(&mut rng, &viewport);

            assert!((1..=8).contains(&scene.mirrors.len()));
            assert!((1..=32).contains(&scene.fan.ray_count));
            assert!((10. ..=180.).contains(&scene.fan.span_degrees));
            assert_eq!(scene.degenerate_mirrors().count(), 0);

            for mirror in &scene.mirrors {
                for p in [mirror.p1(), mirror.p2()] {
                    assert!(p.x >= viewport.width * 0.5 && p.x <= viewport.width);
                    assert!(p.y >= 0. && p.y <= viewport.height);
                }
            }
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let viewport = Viewport::default();
        let a = random_scene(&mut StdRng::seed_from_u64(5), &viewport, 4);
        let b = random_scene(&mut StdRng::seed_from_u64(5), &viewport, 4);
        assert_eq!(a, b);
        assert_eq!(a.mirrors.len(), 4);
    }
}
