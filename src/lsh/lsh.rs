use crate::dist::{rank_candidates, Metric, Neighbor};
use crate::hash::{HashFamily, Signature};
use crate::table::Table;
use crate::utils::create_rng;
use crate::{DataPoint, DataPointSlice, Error, Result};
use fnv::FnvHashSet as HashSet;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Configuration of an [`LshForest`]. Used in the builder pattern.
///
/// # Examples
///
/// ```
/// use lsh_forest::LshBuilder;
/// let corpus = vec![vec![2., 3., 4.], vec![-1., -1., 1.]];
/// let lsh = LshBuilder::new(5, 10).seed(1).cosine(corpus).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct LshBuilder {
    /// Number of hash functions per table. `K` in literature.
    n_functions: usize,
    /// Number of hash tables. `L` in literature.
    n_tables: usize,
    /// Seed for the hash functions. If 0, randomness is seeded from the OS.
    seed: u64,
    /// Re-ranking metric override. Defaults per hash family.
    metric: Option<Metric>,
}

impl LshBuilder {
    /// # Arguments
    ///
    /// * `n_functions` - Signature length. Every function adds one hashed value per table.
    /// * `n_tables` - Increases the chance of finding the closest neighbor, at a memory and query cost.
    pub fn new(n_functions: usize, n_tables: usize) -> Self {
        LshBuilder {
            n_functions,
            n_tables,
            seed: 0,
            metric: None,
        }
    }

    /// Set the seed of the RNGs. If 0, RNGs are seeded randomly.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the metric used for exact re-ranking of candidates.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Build a forest hashing w/ signed random projections.
    pub fn cosine(self, corpus: Vec<DataPoint>) -> Result<LshForest> {
        self.build(HashFamily::Cosine, corpus)
    }

    /// Build a forest hashing w/ sampled coordinates of binary vectors.
    pub fn hamming(self, corpus: Vec<DataPoint>) -> Result<LshForest> {
        self.build(HashFamily::Hamming, corpus)
    }

    /// Build a forest hashing w/ min-wise permutations.
    pub fn jaccard(self, corpus: Vec<DataPoint>) -> Result<LshForest> {
        self.build(HashFamily::Jaccard, corpus)
    }

    /// Ingest the corpus and build all tables.
    pub fn build(self, family: HashFamily, corpus: Vec<DataPoint>) -> Result<LshForest> {
        if self.n_tables < 1 || self.n_functions < 1 {
            return Err(Error::InvalidParameters(format!(
                "n_tables and n_functions must be at least 1, got {} and {}",
                self.n_tables, self.n_functions
            )));
        }
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let dim = corpus[0].len();
        if dim == 0 {
            return Err(Error::InvalidParameters(
                "corpus vectors have zero dimensionality".to_string(),
            ));
        }
        for v in &corpus {
            if v.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    got: v.len(),
                });
            }
        }

        // One seed per table, drawn up front: table construction can then run
        // in parallel without losing reproducibility, and a forest built with
        // more tables extends a smaller one as a prefix.
        let mut rng = create_rng(self.seed);
        let table_seeds: Vec<u64> = (0..self.n_tables).map(|_| rng.gen()).collect();

        let n_functions = self.n_functions;
        let tables: Vec<Table> = table_seeds
            .into_par_iter()
            .map(|table_seed| {
                let mut rng = SmallRng::seed_from_u64(table_seed);
                let functions = (0..n_functions)
                    .map(|_| family.sample(dim, &mut rng))
                    .collect();
                let mut table = Table::with_functions(functions);
                for (id, v) in corpus.iter().enumerate() {
                    table.insert(id as u32, v);
                }
                table
            })
            .collect();

        Ok(LshForest {
            n_tables: self.n_tables,
            n_functions,
            dim,
            family,
            metric: self.metric.unwrap_or_else(|| family.default_metric()),
            tables,
            corpus,
            sim_computations: AtomicU64::new(0),
        })
    }
}

/// Multi-table LSH index over a static corpus.
///
/// Built once by [`LshBuilder`] or [`build_index`]; tables and corpus are
/// immutable afterwards, queries are read-only.
pub struct LshForest {
    n_tables: usize,
    n_functions: usize,
    /// Dimensionality of corpus and query vectors.
    dim: usize,
    family: HashFamily,
    metric: Metric,
    tables: Vec<Table>,
    /// Tables store only ids; the vectors live here.
    corpus: Vec<DataPoint>,
    /// Exact similarity computations spent in `find_neighbors` so far.
    sim_computations: AtomicU64,
}

impl LshForest {
    fn validate_vec(&self, v: &DataPointSlice) -> Result<()> {
        if v.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                got: v.len(),
            });
        }
        Ok(())
    }

    /// Recompute the bucket key of `v` in the given table.
    pub fn signature(&self, v: &DataPointSlice, table_index: usize) -> Result<Signature> {
        self.validate_vec(v)?;
        let table = self
            .tables
            .get(table_index)
            .ok_or(Error::IndexOutOfRange {
                index: table_index,
                tables: self.n_tables,
            })?;
        Ok(table.signature(v))
    }

    fn bucket_union(&self, v: &DataPointSlice) -> HashSet<u32> {
        let mut union = HashSet::default();
        for table in &self.tables {
            let signature = table.signature(v);
            // an absent bucket is an expected outcome, not an error
            if let Some(bucket) = table.bucket(&signature) {
                union.extend(bucket.iter().copied());
            }
        }
        union
    }

    /// Union of the candidate ids sharing a bucket w/ `v` over all tables,
    /// without re-ranking. Sorted by id.
    pub fn query_bucket_ids(&self, v: &DataPointSlice) -> Result<Vec<u32>> {
        self.validate_vec(v)?;
        let mut ids: Vec<u32> = self.bucket_union(v).into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Approximate top-k neighbors for every query.
    ///
    /// Per query: one bucket lookup per table, the set union of the matching
    /// buckets, one exact similarity computation per candidate, then the
    /// candidates sorted by descending similarity (ties by ascending id) and
    /// truncated to `k`. An empty union yields an empty result.
    pub fn find_neighbors(&self, queries: &[DataPoint], k: usize) -> Result<Vec<Vec<Neighbor>>> {
        if k < 1 {
            return Err(Error::InvalidParameters("k must be at least 1".to_string()));
        }
        for q in queries {
            self.validate_vec(q)?;
        }

        // Every query carries its own computation count; the batch folds them
        // into the shared counter with a single atomic add.
        let per_query: Vec<(Vec<Neighbor>, u64)> = queries
            .par_iter()
            .map(|q| {
                let candidates = self.bucket_union(q);
                let n_computed = candidates.len() as u64;
                let mut scored: Vec<Neighbor> = candidates
                    .into_iter()
                    .map(|id| Neighbor {
                        id,
                        similarity: self.metric.similarity(q, &self.corpus[id as usize]),
                    })
                    .collect();
                rank_candidates(&mut scored, k);
                (scored, n_computed)
            })
            .collect();

        let mut results = Vec::with_capacity(per_query.len());
        let mut total = 0u64;
        for (neighbors, n_computed) in per_query {
            results.push(neighbors);
            total += n_computed;
        }
        self.sim_computations.fetch_add(total, Ordering::Relaxed);
        Ok(results)
    }

    /// Number of exact similarity computations spent in [`find_neighbors`]
    /// calls since construction. Compare against
    /// `corpus.len() * queries.len()` of the brute-force baseline.
    ///
    /// [`find_neighbors`]: LshForest::find_neighbors
    pub fn similarity_computations(&self) -> u64 {
        self.sim_computations.load(Ordering::Relaxed)
    }

    pub fn table(&self, table_index: usize) -> Result<&Table> {
        self.tables.get(table_index).ok_or(Error::IndexOutOfRange {
            index: table_index,
            tables: self.n_tables,
        })
    }

    /// The stored vector behind a neighbor id.
    pub fn get(&self, id: u32) -> Option<&DataPoint> {
        self.corpus.get(id as usize)
    }

    /// Number of corpus vectors.
    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n_tables(&self) -> usize {
        self.n_tables
    }

    pub fn n_functions(&self) -> usize {
        self.n_functions
    }

    pub fn family(&self) -> HashFamily {
        self.family
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Human-readable bucket statistics of all tables.
    pub fn describe(&self) -> String {
        let mut out = format!(
            "LshForest: {} tables, {} functions, {} vectors, dim {}\n",
            self.n_tables,
            self.n_functions,
            self.corpus.len(),
            self.dim
        );
        for (i, table) in self.tables.iter().enumerate() {
            if let Some((min, max, mean)) = table.bucket_stats() {
                out.push_str(&format!(
                    "table {}: {} buckets, sizes min: {}, max: {}, avg: {:.1}\n",
                    i,
                    table.n_buckets(),
                    min,
                    max,
                    mean
                ));
            }
        }
        out
    }
}

/// Flat construction interface.
///
/// # Arguments
///
/// * `corpus` - Vectors to index; ids are assigned by position.
/// * `n_tables` - Number of independent tables.
/// * `n_functions` - Number of hash functions concatenated per table.
/// * `family` - Similarity family the hash functions are drawn from.
/// * `seed` - `Some(seed)` for reproducible tables, `None` for OS entropy.
pub fn build_index(
    corpus: Vec<DataPoint>,
    n_tables: usize,
    n_functions: usize,
    family: HashFamily,
    seed: Option<u64>,
) -> Result<LshForest> {
    LshBuilder::new(n_functions, n_tables)
        .seed(seed.unwrap_or(0))
        .build(family, corpus)
}
