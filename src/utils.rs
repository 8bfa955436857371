use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Seeded RNG. A seed of 0 takes entropy from the OS instead.
pub fn create_rng(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}

/// Sample a vector w/ components drawn from the standard normal distribution.
pub fn rand_unit_vec<R: Rng>(size: usize, rng: R) -> Vec<f32> {
    rng.sample_iter(StandardNormal).take(size).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rand_unit_vec() {
        let v = rand_unit_vec(16, &mut create_rng(1));
        assert_eq!(v.len(), 16);

        // same seed, same draws
        let w = rand_unit_vec(16, &mut create_rng(1));
        assert_eq!(v, w);
    }
}
