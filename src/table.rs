use crate::hash::{HashFunction, Signature};
use crate::DataPointSlice;
use fnv::{FnvHashMap as HashMap, FnvHashSet as HashSet};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

/// Bucket contains indexes into the corpus.
pub type Bucket = HashSet<u32>;

/// One bucket partition of the corpus, built from its own freshly sampled
/// set of hash functions. The function set is fixed after construction and
/// every corpus vector lands in exactly one bucket.
#[derive(Debug, Serialize, Deserialize)]
pub struct Table {
    functions: Vec<HashFunction>,
    buckets: HashMap<Signature, Bucket>,
}

impl Table {
    pub(crate) fn with_functions(functions: Vec<HashFunction>) -> Self {
        Table {
            functions,
            buckets: HashMap::default(),
        }
    }

    /// Concatenated hash outputs of `v`, in the fixed function order.
    pub fn signature(&self, v: &DataPointSlice) -> Signature {
        self.functions.iter().map(|f| f.evaluate(v)).collect()
    }

    pub(crate) fn insert(&mut self, idx: u32, v: &DataPointSlice) {
        let signature = self.signature(v);
        self.buckets
            .entry(signature)
            .or_insert_with(HashSet::default)
            .insert(idx);
    }

    /// The bucket stored under `signature`, if any vector hashed to it.
    pub fn bucket(&self, signature: &Signature) -> Option<&Bucket> {
        self.buckets.get(signature)
    }

    pub fn n_functions(&self) -> usize {
        self.functions.len()
    }

    /// Number of non-empty buckets.
    pub fn n_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &Bucket)> {
        self.buckets.iter()
    }

    /// (min, max, mean) bucket sizes, or `None` for an unbuilt table.
    pub(crate) fn bucket_stats(&self) -> Option<(usize, usize, f32)> {
        let (min, max) = match self.buckets.values().map(|b| b.len()).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(len) => (len, len),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let total: usize = self.buckets.values().map(|b| b.len()).sum();
        Some((min, max, total as f32 / self.buckets.len() as f32))
    }
}
