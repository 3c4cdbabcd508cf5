//! Perlin gradient noise.

use crate::sampling::random_unit_vector;
use penumbra_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Default octave count for [`Perlin::turb`].
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Lattice noise generator: random unit gradients plus one shuffled
/// permutation table per axis. Immutable once built.
#[derive(Debug, Clone)]
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            ranvec,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smooth noise in roughly [-1, 1]. Zero on every integer lattice point.
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let frac = p - floor;

        let i = floor.x as i32;
        let j = floor.y as i32;
        let k = floor.z as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let x = self.perm_x[wrap(i + di as i32)];
                    let y = self.perm_y[wrap(j + dj as i32)];
                    let z = self.perm_z[wrap(k + dk as i32)];
                    *cell = self.ranvec[x ^ y ^ z];
                }
            }
        }

        perlin_interp(&c, frac)
    }

    /// Sum of `depth` octaves, each at double frequency and half weight.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

#[inline]
fn wrap(n: i32) -> usize {
    (n & (POINT_COUNT as i32 - 1)) as usize
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut p: Vec<usize> = (0..POINT_COUNT).collect();
    p.shuffle(rng);
    p
}

/// Trilinear blend of the corner gradients with Hermite smoothing.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f32 {
    let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);
    let mut accum = 0.0;

    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let corner = Vec3::new(i as f32, j as f32, k as f32);
                let weight_v = frac - corner;
                let blend = corner * smooth + (Vec3::ONE - corner) * (Vec3::ONE - smooth);
                accum += blend.x * blend.y * blend.z * gradient.dot(weight_v);
            }
        }
    }

    accum
}
