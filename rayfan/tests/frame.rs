use rand::{rngs::StdRng, Rng, SeedableRng};
use rayfan::{
    trace_fan, Emitter, FanParams, Float, LineKind, Lift, MoveIntent, Primitive, Scene, Segment,
    Vector, Viewport,
};

const E: Float = 1e-9;

fn assert_close(a: Float, b: Float) {
    assert!((a - b).abs() < E, "{a} != {b}");
}

#[test]
fn emitter_defaults() {
    let emitter = Emitter::default();
    assert_eq!(emitter.pos, Vector::new(100., 275.));
    assert_eq!(emitter.size, Vector::new(50., 50.));
    assert_eq!(emitter.cast_origin(), Vector::new(150., 300.));
}

#[test]
fn emitter_moves_at_speed() {
    let viewport = Viewport::default();
    let mut emitter = Emitter::default();

    emitter.update(&MoveIntent::UP, 0.1, &viewport);
    assert_close(emitter.pos.y, 245.);

    emitter.update(&MoveIntent::DOWN, 0.2, &viewport);
    assert_close(emitter.pos.y, 305.);

    emitter.update(&MoveIntent::NONE, 10., &viewport);
    assert_close(emitter.pos.y, 305.);

    // both keys held: no net movement
    let both = MoveIntent {
        up: true,
        down: true,
    };
    emitter.update(&both, 0.5, &viewport);
    assert_close(emitter.pos.y, 305.);
}

#[test]
fn emitter_is_clamped() {
    let viewport = Viewport::default();
    let mut emitter = Emitter::default();

    emitter.update(&MoveIntent::UP, 100., &viewport);
    assert_eq!(emitter.pos.y, 0.);

    emitter.update(&MoveIntent::DOWN, 100., &viewport);
    assert_eq!(emitter.pos.y, 550.);
}

#[test]
fn emitter_stays_in_bounds_under_random_input() {
    let mut rng = StdRng::seed_from_u64(1234);
    let viewport = Viewport {
        width: 800.,
        height: 600.,
    };
    let mut emitter = Emitter::default();

    for _ in 0..10_000 {
        let intent = MoveIntent {
            up: rng.gen(),
            down: rng.gen(),
        };
        emitter.update(&intent, rng.gen_range(0.0..0.5), &viewport);
        assert!((0. ..=viewport.height - emitter.size.y).contains(&emitter.pos.y));
    }
}

#[test]
fn emitter_taller_than_viewport_sticks_to_top() {
    let viewport = Viewport {
        width: 100.,
        height: 40.,
    };
    let mut emitter = Emitter::new([0., 10.], [10., 50.], 1.);
    emitter.update(&MoveIntent::DOWN, 1., &viewport);
    assert_eq!(emitter.pos.y, 0.);
}

#[test]
fn center_ray_hits_mirror_in_single_mirror_scene() {
    let scene = Scene::single_mirror();

    // raise the emitter so the horizontal ray crosses the A-B mirror at y = 200
    let origin = Vector::new(150., 200.);
    let traces = trace_fan(origin, &FanParams::new(1, 90.), &scene.mirrors);

    let hit = traces[0].hit.unwrap();
    assert_close(hit.point.y, 200.);
    // A = (600, 150), B = (700, 300): x = 600 + 100 * (50 / 150)
    assert_close(hit.point.x, 600. + 100. / 3.);
    assert_close(hit.u, 1. / 3.);
    assert_close(hit.dist, hit.point.x - 150.);

    let reflected = traces[0].reflected().unwrap();
    assert_close(reflected.dir.norm(), 1.);
    // the mirror faces the emitter, so the ray goes back toward it
    assert!(reflected.dir.x < 0.);
}

#[test]
fn frame_primitives_layout() {
    let mut lift = Lift::new(Scene::double_mirror());
    let frame = lift.step(0., MoveIntent::NONE);

    let scene = lift.scene();
    assert_eq!(frame.traces.len(), scene.fan.ray_count);

    let expected_len = 1 + 3 * frame.hit_count()
        + (frame.traces.len() - frame.hit_count())
        + scene.mirrors.len();
    assert_eq!(frame.primitives.len(), expected_len);

    assert_eq!(
        frame.primitives[0],
        Primitive::Rect {
            pos: lift.emitter().pos,
            size: lift.emitter().size,
        }
    );

    let mirror_lines = &frame.primitives[frame.primitives.len() - scene.mirrors.len()..];
    for (primitive, mirror) in mirror_lines.iter().zip(&scene.mirrors) {
        assert_eq!(
            *primitive,
            Primitive::Line {
                start: *mirror.p1(),
                end: *mirror.p2(),
                kind: LineKind::Mirror,
            }
        );
    }
}

#[test]
fn frame_lines_have_presentation_lengths() {
    let mut lift = Lift::new(Scene::double_mirror());
    let frame = lift.step(0., MoveIntent::NONE);
    let draw = lift.scene().draw;

    let mut hits = 0;
    let mut escapes = 0;

    for primitive in &frame.primitives {
        match *primitive {
            Primitive::Line {
                start,
                end,
                kind: LineKind::Reflected,
            } => {
                hits += 1;
                assert_close((end - start).norm(), draw.reflected_length);
            }
            Primitive::Line {
                start,
                end,
                kind: LineKind::Escaped,
            } => {
                escapes += 1;
                assert_eq!(start, lift.emitter().cast_origin());
                assert_close((end - start).norm(), draw.escape_length);
            }
            _ => (),
        }
    }

    assert_eq!(hits, frame.hit_count());
    assert_eq!(hits + escapes, frame.traces.len());
    assert!(hits > 0);
    assert!(escapes > 0);
}

#[test]
fn markers_follow_incident_lines() {
    let mut lift = Lift::new(Scene::single_mirror());
    let frame = lift.step(0., MoveIntent::NONE);

    for window in frame.primitives.windows(3) {
        if let [Primitive::Line {
            end,
            kind: LineKind::Incident,
            ..
        }, Primitive::Line {
            start,
            kind: LineKind::Reflected,
            ..
        }, Primitive::Marker { pos }] = window
        {
            assert_eq!(end, start);
            assert_eq!(start, pos);
        }
    }
}

#[test]
fn step_moves_before_tracing() {
    let mut lift = Lift::new(Scene::single_mirror());
    let frame = lift.step(0.5, MoveIntent::UP);

    assert_close(lift.emitter().pos.y, 275. - 150.);
    for trace in &frame.traces {
        assert_eq!(trace.ray.pos, lift.emitter().cast_origin());
    }

    lift.reset();
    assert_eq!(lift.emitter().pos.y, 275.);
}

#[test]
fn degenerate_mirror_is_silently_skipped() {
    let mut scene = Scene::single_mirror();
    scene.mirrors.insert(0, Segment::new([400., 300.], [400., 300.]));
    assert_eq!(scene.degenerate_mirrors().collect::<Vec<_>>(), [0]);

    let with = Lift::new(scene).step(0., MoveIntent::NONE).traces;
    let without = Lift::new(Scene::single_mirror())
        .step(0., MoveIntent::NONE)
        .traces;

    assert_eq!(with, without);
}

#[test]
fn presets() {
    let single = Scene::single_mirror();
    assert_eq!(single.mirrors.len(), 1);
    assert_eq!(single.fan, FanParams::new(12, 90.));

    let double = Scene::double_mirror();
    assert_eq!(double.mirrors.len(), 2);
    assert_eq!(double.fan, FanParams::new(10, 90.));
    assert_eq!(*double.mirrors[1].p1(), Vector::from(Scene::MIRROR_C));

    assert_eq!(Scene::default(), single);
}
