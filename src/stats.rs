use crate::dist::Neighbor;
use crate::{Error, Result};
use fnv::FnvHashSet;

/// Fraction of true top-k neighbors recovered by an approximate search,
/// averaged over queries. Only set membership counts; the order within a
/// result does not affect the score.
///
/// `exact` fixes `k` per query; an approximate result may be shorter (the
/// candidate set was smaller than `k`) but never longer.
///
/// # Examples
///
/// ```
/// use lsh_forest::{recall, Neighbor};
/// let exact = vec![vec![Neighbor { id: 0, similarity: 1.0 }]];
/// assert_eq!(recall(&exact, &exact).unwrap(), 1.0);
/// ```
pub fn recall(approx: &[Vec<Neighbor>], exact: &[Vec<Neighbor>]) -> Result<f32> {
    if approx.len() != exact.len() {
        return Err(Error::SizeMismatch {
            expected: exact.len(),
            got: approx.len(),
        });
    }
    if exact.is_empty() {
        return Err(Error::InvalidParameters(
            "recall needs at least one query result".to_string(),
        ));
    }

    let mut total = 0.0f32;
    for (approx_result, exact_result) in approx.iter().zip(exact) {
        if approx_result.len() > exact_result.len() {
            return Err(Error::SizeMismatch {
                expected: exact_result.len(),
                got: approx_result.len(),
            });
        }
        if exact_result.is_empty() {
            total += 1.0;
            continue;
        }
        let truth: FnvHashSet<u32> = exact_result.iter().map(|n| n.id).collect();
        let hits = approx_result.iter().filter(|n| truth.contains(&n.id)).count();
        total += hits as f32 / exact_result.len() as f32;
    }
    Ok(total / exact.len() as f32)
}

/// Collision probability of a single signed random projection for two
/// vectors w/ the given cosine similarity: `1 - acos(sim) / pi`.
pub fn srp_collision_prob(sim: f32) -> f32 {
    1.0 - sim.max(-1.0).min(1.0).acos() / std::f32::consts::PI
}

/// Return a true neighbor w/ probability 1 - δ.
///
/// # Arguments
/// * `delta` - Prob. of not returning the neighbor.
/// * `p1` - Collision probability of one hash function for that neighbor.
/// * `k` - Number of hash functions concatenated per table.
pub fn estimate_tables(delta: f64, p1: f64, k: usize) -> usize {
    (delta.ln() / (1. - p1.powf(k as f64)).ln()).round() as usize
}

#[cfg(test)]
mod test {
    use super::*;

    fn neighbors(ids: &[u32]) -> Vec<Neighbor> {
        ids.iter()
            .map(|&id| Neighbor {
                id,
                similarity: 1.0,
            })
            .collect()
    }

    #[test]
    fn test_recall_partial() {
        let approx = vec![neighbors(&[0]), neighbors(&[4, 5])];
        let exact = vec![neighbors(&[0, 1]), neighbors(&[4, 5])];
        // (1/2 + 2/2) / 2
        assert_eq!(recall(&approx, &exact).unwrap(), 0.75);
    }

    #[test]
    fn test_recall_ignores_order() {
        let approx = vec![neighbors(&[2, 1, 0])];
        let exact = vec![neighbors(&[0, 1, 2])];
        assert_eq!(recall(&approx, &exact).unwrap(), 1.0);
    }

    #[test]
    fn test_recall_mismatch() {
        let one = vec![neighbors(&[0])];
        let two = vec![neighbors(&[0]), neighbors(&[1])];
        assert!(matches!(
            recall(&one, &two),
            Err(Error::SizeMismatch { .. })
        ));

        // an approximate result longer than its exact counterpart
        let long = vec![neighbors(&[0, 1])];
        assert!(matches!(
            recall(&long, &one),
            Err(Error::SizeMismatch { .. })
        ));

        assert!(matches!(recall(&[], &[]), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn test_srp_collision_prob() {
        assert!((srp_collision_prob(1.0) - 1.0).abs() < 1e-6);
        assert!((srp_collision_prob(0.0) - 0.5).abs() < 1e-6);
        assert!(srp_collision_prob(-1.0).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_tables() {
        let delta = 0.2;
        let p1 = 0.6;
        let k = 5;
        assert_eq!(20, estimate_tables(delta, p1, k));
    }
}
