use crate::{DataPoint, DataPointSlice, Error, Result};
use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One scored hit: a corpus id and its exact similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: u32,
    pub similarity: f32,
}

/// Exact similarity measure used for re-ranking candidates and for the
/// brute-force baseline. The approximate search and the baseline must use
/// the same metric for a fair recall comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Cosine,
    Jaccard,
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cosine" => Ok(Metric::Cosine),
            "jaccard" => Ok(Metric::Jaccard),
            _ => Err(Error::UnsupportedMetric(s.to_string())),
        }
    }
}

impl Metric {
    pub fn similarity(self, a: &DataPointSlice, b: &DataPointSlice) -> f32 {
        match self {
            Metric::Cosine => cosine_sim(a, b),
            Metric::Jaccard => jaccard_sim(a, b),
        }
    }
}

/// L2 norm of a single vector.
pub fn l2_norm(x: &DataPointSlice) -> f32 {
    let x = aview1(x);
    x.dot(&x).sqrt()
}

/// Dot product between two vectors.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
pub fn inner_prod(a: &DataPointSlice, b: &DataPointSlice) -> f32 {
    aview1(a).dot(&aview1(b))
}

/// Cosine similarity between two vectors. Defined as 0 when either vector
/// has zero magnitude.
///
/// # Examples
///
/// ```
/// use lsh_forest::dist::cosine_sim;
/// let a = vec![1., -1.];
/// let b = vec![0.2, 1.2];
/// let sim = cosine_sim(&a, &b);
/// assert!(sim.abs() <= 1.);
/// ```
pub fn cosine_sim(a: &DataPointSlice, b: &DataPointSlice) -> f32 {
    let denom = l2_norm(a) * l2_norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    inner_prod(a, b) / denom
}

/// Jaccard similarity over the non-zero coordinates of two vectors.
/// Defined as 0 when the union is empty.
pub fn jaccard_sim(a: &DataPointSlice, b: &DataPointSlice) -> f32 {
    let mut intersection = 0usize;
    let mut union = 0usize;
    for (x, y) in a.iter().zip(b) {
        let in_a = *x != 0.0;
        let in_b = *y != 0.0;
        if in_a && in_b {
            intersection += 1;
        }
        if in_a || in_b {
            union += 1;
        }
    }
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Sort by descending similarity, ties broken by ascending id, and keep
/// the first `k`.
pub(crate) fn rank_candidates(scored: &mut Vec<Neighbor>, k: usize) {
    scored.sort_unstable_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.id.cmp(&b.id))
    });
    scored.truncate(k);
}

/// Exact top-k neighbors for every query by exhaustive comparison against
/// the full corpus. Ground truth for calibrating a forest; always costs
/// `corpus.len() * queries.len()` similarity computations.
pub fn brute_force_neighbors(
    corpus: &[DataPoint],
    queries: &[DataPoint],
    k: usize,
    metric: Metric,
) -> Result<Vec<Vec<Neighbor>>> {
    if k < 1 {
        return Err(Error::InvalidParameters("k must be at least 1".to_string()));
    }
    if corpus.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    let dim = corpus[0].len();
    for v in corpus.iter().chain(queries) {
        if v.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                got: v.len(),
            });
        }
    }

    Ok(queries
        .par_iter()
        .map(|q| {
            let mut scored: Vec<Neighbor> = corpus
                .iter()
                .enumerate()
                .map(|(id, v)| Neighbor {
                    id: id as u32,
                    similarity: metric.similarity(q, v),
                })
                .collect();
            rank_candidates(&mut scored, k);
            scored
        })
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cosine_sim() {
        assert!((cosine_sim(&[1., 2.], &[1., 2.]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_sim(&[1., 0.], &[0., 1.]), 0.0);
        // zero magnitude is not an error
        assert_eq!(cosine_sim(&[0., 0.], &[1., 1.]), 0.0);
    }

    #[test]
    fn test_jaccard_sim() {
        assert_eq!(jaccard_sim(&[1., 1., 0.], &[1., 0., 1.]), 1. / 3.);
        assert_eq!(jaccard_sim(&[1., 0.], &[0., 1.]), 0.0);
        assert_eq!(jaccard_sim(&[0., 0.], &[0., 0.]), 0.0);
    }

    #[test]
    fn test_metric_names() {
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert_eq!("jaccard".parse::<Metric>().unwrap(), Metric::Jaccard);
        assert!(matches!(
            "manhattan".parse::<Metric>(),
            Err(Error::UnsupportedMetric(_))
        ));
    }

    #[test]
    fn test_brute_force_ordering() {
        let corpus = vec![vec![1., 0.], vec![0., 1.], vec![1., 0.1]];
        let queries = vec![vec![1., 0.]];
        let results = brute_force_neighbors(&corpus, &queries, 2, Metric::Cosine).unwrap();

        let ids: Vec<u32> = results[0].iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert!(results[0][0].similarity >= results[0][1].similarity);
    }

    #[test]
    fn test_brute_force_tie_break() {
        // identical rows rank by ascending id
        let corpus = vec![vec![1., 0.], vec![1., 0.]];
        let queries = vec![vec![1., 0.]];
        let results = brute_force_neighbors(&corpus, &queries, 2, Metric::Cosine).unwrap();
        let ids: Vec<u32> = results[0].iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_brute_force_preconditions() {
        let corpus = vec![vec![1., 0.]];
        assert!(matches!(
            brute_force_neighbors(&corpus, &corpus, 0, Metric::Cosine),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            brute_force_neighbors(&[], &corpus, 1, Metric::Cosine),
            Err(Error::EmptyCorpus)
        ));
        assert!(matches!(
            brute_force_neighbors(&corpus, &[vec![1., 0., 0.]], 1, Metric::Cosine),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
