use crate::dist::Metric;
use crate::DataPointSlice;
use ndarray::prelude::*;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One discrete hash output.
pub type HashPrimitive = u32;
/// Concatenated hash outputs of one table. Used as the bucket key.
pub type Signature = Vec<HashPrimitive>;

/// The similarity family a forest hashes for. Every family generates
/// randomized hash functions whose collision probability grows with the
/// similarity of the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashFamily {
    /// Signed random projections, locality-sensitive for the cosine similarity.
    Cosine,
    /// Coordinate sampling over binary/categorical vectors.
    Hamming,
    /// Min-wise permutation hashing over set-membership vectors.
    Jaccard,
}

impl HashFamily {
    /// Draw one fresh hash function for vectors of dimensionality `dim`.
    pub fn sample<R: Rng>(self, dim: usize, rng: &mut R) -> HashFunction {
        match self {
            HashFamily::Cosine => {
                let hyperplane: Array1<f32> = Array::random_using(dim, StandardNormal, rng);
                HashFunction::SignRandomProjection(SignRandomProjection { hyperplane })
            }
            HashFamily::Hamming => HashFunction::BitSample(BitSample {
                coordinate: rng.gen_range(0, dim),
            }),
            HashFamily::Jaccard => {
                let mut ranks: Vec<HashPrimitive> = (0..dim as HashPrimitive).collect();
                ranks.shuffle(rng);
                HashFunction::MinHash(MinHash { ranks })
            }
        }
    }

    /// The exact metric candidates of this family are re-ranked with,
    /// unless the caller overrides it.
    pub fn default_metric(self) -> Metric {
        match self {
            HashFamily::Cosine => Metric::Cosine,
            // Hamming vectors are set indicators, so the exact measure is Jaccard.
            HashFamily::Hamming | HashFamily::Jaccard => Metric::Jaccard,
        }
    }
}

/// One realized hash function. Parameters are drawn once by
/// [`HashFamily::sample`] and never mutated, so evaluation at build time
/// and query time goes through the identical instance.
///
/// A closed enum instead of a trait object: the family set is fixed and
/// evaluation sits on the hot query path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashFunction {
    SignRandomProjection(SignRandomProjection),
    BitSample(BitSample),
    MinHash(MinHash),
}

impl HashFunction {
    pub fn evaluate(&self, v: &DataPointSlice) -> HashPrimitive {
        match self {
            HashFunction::SignRandomProjection(h) => h.evaluate(v),
            HashFunction::BitSample(h) => h.evaluate(v),
            HashFunction::MinHash(h) => h.evaluate(v),
        }
    }
}

/// Also called SimHash. One random hyperplane leading to one bit of the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRandomProjection {
    /// Random direction vector w/ components drawn from N(0, 1).
    hyperplane: Array1<f32>,
}

impl SignRandomProjection {
    fn evaluate(&self, v: &DataPointSlice) -> HashPrimitive {
        if self.hyperplane.dot(&aview1(v)) >= 0.0 {
            1
        } else {
            0
        }
    }
}

/// Samples a single coordinate. Expects binary/categorical components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitSample {
    coordinate: usize,
}

impl BitSample {
    fn evaluate(&self, v: &DataPointSlice) -> HashPrimitive {
        v[self.coordinate] as HashPrimitive
    }
}

/// Min-wise hash: a random permutation of the coordinate universe, stored
/// as one rank per coordinate. The hash of a vector is the minimum rank
/// among its non-zero coordinates. Two sets agree on this value w/
/// probability equal to their Jaccard similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinHash {
    ranks: Vec<HashPrimitive>,
}

impl MinHash {
    fn evaluate(&self, v: &DataPointSlice) -> HashPrimitive {
        // empty sets collapse into a sentinel bucket one past the last rank
        let mut min = self.ranks.len() as HashPrimitive;
        for (i, &x) in v.iter().enumerate() {
            if x != 0.0 {
                let rank = self.ranks[i];
                if rank < min {
                    min = rank;
                }
            }
        }
        min
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::create_rng;

    #[test]
    fn test_srp_emits_single_bit() {
        let mut rng = create_rng(1);
        let f = HashFamily::Cosine.sample(8, &mut rng);
        let v = [1., -2., 0.5, 3., -1., 0., 2., 1.];
        let h = f.evaluate(&v);
        assert!(h <= 1);
        // fixed parameters, fixed output
        assert_eq!(h, f.evaluate(&v));
    }

    #[test]
    fn test_bit_sample_reads_coordinate() {
        let mut rng = create_rng(2);
        // dim 1 pins the sampled coordinate
        let f = HashFamily::Hamming.sample(1, &mut rng);
        assert_eq!(f.evaluate(&[1.]), 1);
        assert_eq!(f.evaluate(&[0.]), 0);
    }

    #[test]
    fn test_min_hash_ranks() {
        let mut rng = create_rng(3);
        let f = HashFamily::Jaccard.sample(6, &mut rng);

        // the empty set hashes to the sentinel rank
        assert_eq!(f.evaluate(&[0.; 6]), 6);
        // the full universe always attains rank 0
        assert_eq!(f.evaluate(&[1.; 6]), 0);
        // removing elements can only raise the minimum rank
        let h_sub = f.evaluate(&[0., 1., 0., 1., 0., 1.]);
        assert!(h_sub >= f.evaluate(&[1.; 6]));
        assert!(h_sub < 6);
    }
}
