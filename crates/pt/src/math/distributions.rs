use glam::{Vec2, Vec3};
use rand::{distributions::Uniform, prelude::Distribution, Rng};

/// Uniform distribution over the unit disk
pub struct UniformUnitBall2;

impl Distribution<[f32; 2]> for UniformUnitBall2 {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f32; 2] {
        let uniform = Uniform::new(0., 1.);
        let phi = std::f32::consts::TAU * uniform.sample(rng);
        let r = f32::sqrt(uniform.sample(rng));
        let (s, c) = f32::sin_cos(phi);
        [r * c, r * s]
    }
}

/// Maps a unit direction onto equirectangular texture coordinates.
///
/// `theta = acos(y) / -π` and `phi = atan2(x, -z) / -π * 0.5` are both in [-1, 0],
/// they are wrapped into [0, 1( as a repeating sampler would. `v = 1` is straight up.
pub fn equirect_uv_from_direction(direction: Vec3) -> Vec2 {
    let theta = f32::acos(direction.y.clamp(-1.0, 1.0)) / -std::f32::consts::PI;
    let phi = f32::atan2(direction.x, -direction.z) / -std::f32::consts::PI * 0.5;

    Vec2::new(phi.rem_euclid(1.0), theta.rem_euclid(1.0))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn disk_samples_stay_in_disk() {
        let mut rng = crate::Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let [x, y] = UniformUnitBall2.sample(&mut rng);
            assert!(x * x + y * y <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn equirect_mapping() {
        let up = equirect_uv_from_direction(Vec3::Y);
        assert!((up.y - 0.0).abs() < 1e-6 || (up.y - 1.0).abs() < 1e-6);

        let horizon = equirect_uv_from_direction(Vec3::NEG_Z);
        assert!((horizon.y - 0.5).abs() < 1e-6);
        assert!(horizon.x.abs() < 1e-6);

        let down = equirect_uv_from_direction(Vec3::NEG_Y);
        assert!((down.y - 0.0).abs() < 1e-6);
    }
}
