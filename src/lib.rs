//! # lsh-forest (Locality Sensitive Hashing)
//!
//! Locality sensitive hashing can help retrieving Approximate Nearest Neighbors in sub-linear time.
//!
//! For more information on the subject see:
//! * [Introduction on LSH](http://people.csail.mit.edu/gregory/annbook/introduction.pdf)
//! * [Section 2. describes the hash families used in this crate](https://arxiv.org/pdf/1411.3787.pdf)
//!
//! ## Hashing implementations
//! * Signed Random Projections (cosine similarity)
//! * Coordinate sampling (Hamming similarity over binary vectors)
//! * Min-wise permutations (Jaccard similarity)
//!
//! ## Getting started
//!
//! ```rust
//! use lsh_forest::LshBuilder;
//! // 4 rows w/ dimension 3.
//! let corpus = vec![
//!     vec![1., 1.5, 2.],
//!     vec![2., 1.1, -0.3],
//!     vec![-1., -1., 1.],
//!     vec![0.9, 1.4, 2.1],
//! ];
//!
//! // Do one time expensive preprocessing.
//! let n_functions = 3;
//! let n_tables = 10;
//! let lsh = LshBuilder::new(n_functions, n_tables)
//!     .seed(12)
//!     .cosine(corpus)
//!     .unwrap();
//!
//! // Query in sub-linear time.
//! let query = vec![1.1, 1.2, 1.2];
//! let neighbors = lsh.find_neighbors(&[query], 2).unwrap();
//! assert!(neighbors[0].len() <= 2);
//! ```
//!
//! ## Seed
//! Random projections and permutations are used to generate the hash functions. The default
//! seeding of randomness is taken from the system. If you want to have reproducible outcomes,
//! you can set a manual seed.
//!
//! ```rust
//! # use lsh_forest::LshBuilder;
//! # let corpus = vec![vec![1., 1.5, 2.], vec![2., 1.1, -0.3]];
//! let lsh = LshBuilder::new(3, 10).seed(12).cosine(corpus).unwrap();
//! ```
//!
//! ## Calibration
//! The exact brute-force baseline and the recall evaluator quantify what the
//! approximation trades away, and the similarity-computation counter what it
//! saves.
//!
//! ```rust
//! use lsh_forest::{brute_force_neighbors, recall, LshBuilder, Metric};
//! # let corpus = vec![vec![1., 1.5], vec![2., 1.1], vec![-1., -1.], vec![0.9, 1.4]];
//! # let queries = vec![vec![1., 1.4]];
//! let lsh = LshBuilder::new(2, 20).seed(7).cosine(corpus.clone()).unwrap();
//!
//! let approx = lsh.find_neighbors(&queries, 2).unwrap();
//! let exact = brute_force_neighbors(&corpus, &queries, 2, Metric::Cosine).unwrap();
//! let fraction_recovered = recall(&approx, &exact).unwrap();
//!
//! // comparisons spent vs. the corpus.len() * queries.len() of brute force
//! let spent = lsh.similarity_computations();
//! # assert!(fraction_recovered <= 1.0);
//! # assert!(spent <= (corpus.len() * queries.len()) as u64);
//! ```
mod error;
mod hash;
mod lsh {
    pub mod lsh;
    mod test;
}
mod table;
pub mod dist;
pub mod stats;
pub mod utils;

pub use crate::lsh::lsh::{build_index, LshBuilder, LshForest};
pub use dist::{brute_force_neighbors, cosine_sim, jaccard_sim, Metric, Neighbor};
pub use error::Error;
pub use hash::{
    BitSample, HashFamily, HashFunction, HashPrimitive, MinHash, SignRandomProjection, Signature,
};
pub use stats::recall;
pub use table::{Bucket, Table};

pub type DataPoint = Vec<f32>;
pub type DataPointSlice = [f32];
pub type Result<T> = std::result::Result<T, Error>;
