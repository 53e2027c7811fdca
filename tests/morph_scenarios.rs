//! End-to-end morph scenarios driven through the public scene API.

use std::f32::consts::PI;

use treemorph::prelude::*;
use treemorph::{LatestCell, Motion};

const DT: f32 = 1.0 / 60.0;

fn flat_config(initial_mode: Mode) -> SceneConfig {
    SceneConfig {
        initial_mode,
        assembly_offset: [0.0; 3],
        sway_amplitude: 0.0,
        ..Default::default()
    }
}

fn three_particle_scene() -> Scene {
    let assembled = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
    let dispersed = [
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(0.0, 10.0, 0.0),
        Vec3::new(0.0, 0.0, 10.0),
    ];
    let group =
        ParticleGroup::from_anchors(GroupKind::Foliage, Motion::linear(0.5), &assembled, &dispersed).unwrap();
    Scene::from_groups(flat_config(Mode::Dispersed), vec![group]).unwrap()
}

fn positions(scene: &Scene) -> Vec<Vec3> {
    scene.groups()[0].particles().iter().map(|p| p.pose.position).collect()
}

#[test]
fn three_particles_assemble_at_half_rate() {
    let mut scene = three_particle_scene();
    let start = positions(&scene);
    assert_eq!(start[0], Vec3::new(10.0, 0.0, 0.0));

    assert!(scene.set_mode(Mode::Assembled));
    scene.advance(DT);

    let group = &scene.groups()[0];
    for (i, p) in group.particles().iter().enumerate() {
        let expected = p.anchor_dispersed + (p.anchor_assembled - p.anchor_dispersed) * 0.5;
        assert_eq!(p.pose.position, expected, "particle {}", i);

        let shown = scene.snapshot()[i].transform.w_axis.truncate();
        assert!((shown - expected).length() < 1e-6);
    }

    // Remaining error halves every frame: 0.5^14 of the ~10 unit gap.
    for _ in 0..13 {
        scene.advance(DT);
    }
    for p in scene.groups()[0].particles() {
        assert!(p.pose.position.distance(p.anchor_assembled) < 1e-3);
    }
}

#[test]
fn error_halves_every_frame() {
    let mut scene = three_particle_scene();
    scene.set_mode(Mode::Assembled);

    let gap = |scene: &Scene| -> Vec<f32> {
        scene.groups()[0]
            .particles()
            .iter()
            .map(|p| p.pose.position.distance(p.anchor_assembled))
            .collect()
    };

    let mut before = gap(&scene);
    for _ in 0..10 {
        scene.advance(DT);
        let after = gap(&scene);
        for (b, a) in before.iter().zip(&after) {
            assert!((a - b * 0.5).abs() < 1e-4);
        }
        before = after;
    }
}

#[test]
fn repeated_set_mode_matches_single_call() {
    let config = SceneConfig {
        foliage_count: 120,
        ribbon_count: 60,
        ornament_count: 20,
        initial_mode: Mode::Dispersed,
        seed: Some(99),
        ..Default::default()
    };
    let mut once = Scene::new(config.clone()).unwrap();
    let mut twice = Scene::new(config).unwrap();

    assert!(once.set_mode(Mode::Assembled));
    assert!(twice.set_mode(Mode::Assembled));
    assert!(!twice.set_mode(Mode::Assembled));

    for _ in 0..30 {
        once.advance(DT);
        twice.advance(DT);
    }
    assert_eq!(once.snapshot(), twice.snapshot());
    assert_eq!(twice.controller().transitions(), 1);
}

#[test]
fn gesture_rotation_converges_geometrically() {
    let mut scene = three_particle_scene();
    scene.attach_gesture(LatestCell::shared());
    assert_eq!(scene.rotation(), 0.0);

    scene.set_rotation_target(PI).unwrap();
    scene.advance(DT);
    assert!((scene.rotation() - PI * 0.1).abs() < 1e-5);

    let mut error = PI - scene.rotation();
    for _ in 0..54 {
        scene.advance(DT);
        let next = PI - scene.rotation();
        assert!((next - error * 0.9).abs() < 1e-4);
        error = next;
    }
    assert!((scene.rotation() - PI).abs() < 1e-2);
}

#[test]
fn round_trip_returns_to_dispersed_anchors() {
    let config = SceneConfig {
        foliage_count: 200,
        ribbon_count: 80,
        ornament_count: 30,
        seed: Some(4),
        ..flat_config(Mode::Assembled)
    };
    let mut scene = Scene::new(config).unwrap();
    for _ in 0..400 {
        scene.advance(DT);
    }
    let star = scene.group(GroupKind::Centerpiece).unwrap().get(0).unwrap();
    assert!(star.pose.position.distance(star.anchor_assembled) < 1e-2);

    scene.set_mode(Mode::Dispersed);
    for _ in 0..600 {
        scene.advance(DT);
    }
    for group in scene.groups() {
        for p in group.particles() {
            assert!(
                p.pose.position.distance(p.anchor_dispersed) < 0.05,
                "{} particle still {} away",
                group.kind().name(),
                p.pose.position.distance(p.anchor_dispersed)
            );
        }
    }
}

#[test]
fn dispersing_never_overshoots() {
    let config = SceneConfig {
        foliage_count: 150,
        ribbon_count: 50,
        ornament_count: 20,
        seed: Some(8),
        ..flat_config(Mode::Assembled)
    };
    let mut scene = Scene::new(config).unwrap();
    for _ in 0..60 {
        scene.advance(DT);
    }

    scene.set_mode(Mode::Dispersed);
    let distances = |scene: &Scene| -> Vec<f32> {
        scene
            .groups()
            .iter()
            .flat_map(|g| g.particles().iter())
            .map(|p| p.pose.position.distance(p.anchor_dispersed))
            .collect()
    };
    let mut before = distances(&scene);
    for _ in 0..120 {
        scene.advance(DT);
        let after = distances(&scene);
        for (b, a) in before.iter().zip(&after) {
            assert!(*a <= *b + 1e-4);
        }
        before = after;
    }
}

#[test]
fn ornaments_shrink_while_dispersed() {
    let config = SceneConfig {
        foliage_count: 10,
        ribbon_count: 10,
        ornament_count: 10,
        seed: Some(12),
        ..flat_config(Mode::Assembled)
    };
    let mut scene = Scene::new(config).unwrap();
    for _ in 0..200 {
        scene.advance(DT);
    }
    for p in scene.group(GroupKind::Cubes).unwrap().particles() {
        assert!((p.pose.scale.x - p.scale_base).abs() < 1e-3);
    }

    scene.set_mode(Mode::Dispersed);
    for _ in 0..200 {
        scene.advance(DT);
    }
    for p in scene.group(GroupKind::Polyhedra).unwrap().particles() {
        assert!((p.pose.scale.x - p.scale_base * 0.5).abs() < 1e-3);
    }
}
