//! Geometric distributions used to place particle anchors.
//!
//! Every function takes the random source as a parameter so callers (and
//! tests) decide whether the layout is reproducible:
//!
//! ```ignore
//! use rand::{rngs::SmallRng, SeedableRng};
//! use treemorph::sampler;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let dispersed = sampler::sphere_point(&mut rng, 15.0);
//! let (assembled, _) = sampler::cone_point(&mut rng, 9.0, 3.5);
//! ```

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Uniform point inside a sphere of the given radius, centered at origin.
///
/// The polar angle comes from `acos(2v - 1)` so directions are uniform over
/// solid angle, and the radius is the cube root of a uniform draw so density
/// is uniform in volume.
pub fn sphere_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let r = rng.gen::<f32>().cbrt() * radius;

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Radius of the cone cross-section at height `y`.
#[inline]
pub fn cone_radius_at(y: f32, height: f32, base_radius: f32) -> f32 {
    (1.0 - y / height) * base_radius
}

/// Point inside a cone standing on the Y axis, base at `y = 0`, apex at `height`.
///
/// Height is uniform along Y; within the cross-section the radius uses a
/// square-root draw for uniform areal density. Returns the point together with
/// the cross-section radius at its height.
pub fn cone_point<R: Rng + ?Sized>(rng: &mut R, height: f32, base_radius: f32) -> (Vec3, f32) {
    let y = rng.gen::<f32>() * height;
    let radius_at_height = cone_radius_at(y, height, base_radius);
    let angle = rng.gen::<f32>() * TAU;
    let r = rng.gen::<f32>().sqrt() * radius_at_height;

    (Vec3::new(angle.cos() * r, y, angle.sin() * r), radius_at_height)
}

/// Point on the lateral surface of the same cone, pushed outward by up to `shell`.
pub fn cone_surface_point<R: Rng + ?Sized>(
    rng: &mut R,
    height: f32,
    base_radius: f32,
    shell: f32,
) -> Vec3 {
    let y = rng.gen::<f32>() * height;
    let angle = rng.gen::<f32>() * TAU;
    let r = cone_radius_at(y, height, base_radius) + rng.gen::<f32>() * shell;

    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

/// Point on a helix that widens toward its base.
///
/// * `t` - position along the helix, `0` at the base and `1` at the top
/// * `loops` - number of full turns between base and top
pub fn spiral_point(t: f32, height: f32, base_radius: f32, loops: f32) -> Vec3 {
    let y = t * height;
    let radius = (1.0 - t) * base_radius;
    let angle = t * TAU * loops;

    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Decode a `0xRRGGBB` sRGB color into linear RGB.
pub fn srgb_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xFF) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_sphere_point_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            let p = sphere_point(&mut rng, 15.0);
            assert!(p.length() <= 15.0 + 1e-4);
        }
    }

    #[test]
    fn test_cone_point_inside_cross_section() {
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..1000 {
            let (p, radius_at_height) = cone_point(&mut rng, 9.0, 3.5);
            assert!(p.y >= 0.0 && p.y <= 9.0);
            let xz = Vec3::new(p.x, 0.0, p.z).length();
            assert!(xz <= radius_at_height + 1e-4);
            assert!((radius_at_height - cone_radius_at(p.y, 9.0, 3.5)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cone_surface_point_shell() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..1000 {
            let p = cone_surface_point(&mut rng, 9.0, 3.5, 0.2);
            let surface = cone_radius_at(p.y, 9.0, 3.5);
            let xz = Vec3::new(p.x, 0.0, p.z).length();
            assert!(xz >= surface - 1e-4);
            assert!(xz <= surface + 0.2 + 1e-4);
        }
    }

    #[test]
    fn test_spiral_endpoints() {
        let base = spiral_point(0.0, 9.0, 4.0, 6.0);
        assert!((base - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-5);

        let top = spiral_point(1.0, 9.0, 4.0, 6.0);
        assert!((top - Vec3::new(0.0, 9.0, 0.0)).length() < 1e-5);

        // Half way up a 6-loop helix has made exactly three turns.
        let mid = spiral_point(0.5, 9.0, 4.0, 6.0);
        assert!((mid - Vec3::new(2.0, 4.5, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_srgb_hex() {
        let white = srgb_hex(0xFFFFFF);
        assert!((white - Vec3::ONE).length() < 1e-5);

        let red = srgb_hex(0xFF0000);
        assert!((red.x - 1.0).abs() < 1e-5);
        assert!(red.y < 1e-6 && red.z < 1e-6);

        // Mid grey is darker in linear space.
        let grey = srgb_hex(0x808080);
        assert!(grey.x > 0.2 && grey.x < 0.23);
    }
}
