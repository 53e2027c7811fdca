//! Statistical checks on the anchor samplers and the easing step.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use treemorph::engine::blend_toward;
use treemorph::sampler;
use treemorph::Vec3;

const SAMPLES: usize = 20_000;

#[test]
fn sphere_radius_follows_volume_density() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let radius = 15.0;
    let mut bins = [0usize; 10];

    for _ in 0..SAMPLES {
        let p = sampler::sphere_point(&mut rng, radius);
        let r = p.length() / radius;
        assert!(r <= 1.0 + 1e-5, "sample outside sphere: {}", r);
        bins[((r * 10.0) as usize).min(9)] += 1;
    }

    // Mass inside radius r grows as r^3.
    for (b, &count) in bins.iter().enumerate() {
        let expected = ((b + 1).pow(3) - b.pow(3)) as f32 / 1000.0;
        let observed = count as f32 / SAMPLES as f32;
        assert!(
            (observed - expected).abs() < 0.015,
            "bin {}: observed {:.4}, expected {:.4}",
            b,
            observed,
            expected
        );
    }
}

#[test]
fn sphere_directions_are_isotropic() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut mean = Vec3::ZERO;
    let mut octants = [0usize; 8];

    for _ in 0..SAMPLES {
        let Some(dir) = sampler::sphere_point(&mut rng, 1.0).try_normalize() else {
            continue;
        };
        mean += dir;
        let octant = (dir.x > 0.0) as usize | ((dir.y > 0.0) as usize) << 1 | ((dir.z > 0.0) as usize) << 2;
        octants[octant] += 1;
    }
    mean /= SAMPLES as f32;

    assert!(mean.length() < 0.03, "directions biased toward {:?}", mean);
    for (i, &count) in octants.iter().enumerate() {
        let share = count as f32 / SAMPLES as f32;
        assert!((share - 0.125).abs() < 0.015, "octant {} holds {:.4}", i, share);
    }
}

#[test]
fn cone_heights_are_uniform() {
    let mut rng = SmallRng::seed_from_u64(31);
    let height = 9.0;
    let mut below_half = 0usize;
    let mut sum = 0.0f32;

    for _ in 0..SAMPLES {
        let (p, _) = sampler::cone_point(&mut rng, height, 3.5);
        sum += p.y;
        if p.y < height * 0.5 {
            below_half += 1;
        }
    }

    assert!((sum / SAMPLES as f32 - height * 0.5).abs() < 0.1);
    assert!((below_half as f32 / SAMPLES as f32 - 0.5).abs() < 0.015);
}

#[test]
fn spiral_rises_and_narrows() {
    let (height, radius, loops) = (9.0, 4.0, 6.0);
    let points: Vec<Vec3> = (0..=200)
        .map(|i| sampler::spiral_point(i as f32 / 200.0, height, radius, loops))
        .collect();

    assert!((points[0] - Vec3::new(radius, 0.0, 0.0)).length() < 1e-5);
    assert!((points[200] - Vec3::new(0.0, height, 0.0)).length() < 1e-4);

    for w in points.windows(2) {
        assert!(w[1].y > w[0].y);
        let r0 = Vec3::new(w[0].x, 0.0, w[0].z).length();
        let r1 = Vec3::new(w[1].x, 0.0, w[1].z).length();
        assert!(r1 < r0 + 1e-5);
    }
}

#[test]
fn srgb_decoding_endpoints() {
    assert_eq!(sampler::srgb_hex(0x000000), Vec3::ZERO);
    assert!((sampler::srgb_hex(0xFFFFFF) - Vec3::ONE).length() < 1e-6);
    // Mid grey decodes well below half intensity.
    let grey = sampler::srgb_hex(0x808080);
    assert!((grey.x - 0.2158).abs() < 1e-3);
}

fn vec3() -> impl Strategy<Value = Vec3> {
    (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn cone_points_stay_inside(seed in any::<u64>(), height in 0.5f32..20.0, radius in 0.1f32..10.0) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..64 {
            let (p, at_height) = sampler::cone_point(&mut rng, height, radius);
            prop_assert!(p.y >= 0.0 && p.y <= height);
            prop_assert!((at_height - sampler::cone_radius_at(p.y, height, radius)).abs() < 1e-4);
            prop_assert!(Vec3::new(p.x, 0.0, p.z).length() <= at_height + 1e-4);
        }
    }

    #[test]
    fn surface_points_sit_in_shell(seed in any::<u64>(), shell in 0.0f32..1.0) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..64 {
            let p = sampler::cone_surface_point(&mut rng, 9.0, 3.5, shell);
            let surface = sampler::cone_radius_at(p.y, 9.0, 3.5);
            let r = Vec3::new(p.x, 0.0, p.z).length();
            prop_assert!(r >= surface - 1e-4 && r <= surface + shell + 1e-4);
        }
    }

    #[test]
    fn sphere_points_stay_inside(seed in any::<u64>(), radius in 0.1f32..100.0) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..64 {
            prop_assert!(sampler::sphere_point(&mut rng, radius).length() <= radius * (1.0 + 1e-5));
        }
    }

    #[test]
    fn blend_never_overshoots(current in vec3(), dest in vec3(), k in 0.001f32..=1.0) {
        let before = current.distance(dest);
        let next = blend_toward(current, dest, k);
        let after = next.distance(dest);

        prop_assert!(after <= before + 1e-3);
        prop_assert!((after - before * (1.0 - k)).abs() < 1e-3);
        // The step stays on the segment between the two points.
        prop_assert!(current.distance(next) <= before + 1e-3);
    }

    #[test]
    fn repeated_blend_converges(current in vec3(), dest in vec3(), k in 0.05f32..=1.0) {
        let mut p = current;
        for _ in 0..400 {
            p = blend_toward(p, dest, k);
        }
        // (1 - 0.05)^400 is about 1.2e-9 of the starting gap.
        prop_assert!(p.distance(dest) < 1e-3);
    }
}
