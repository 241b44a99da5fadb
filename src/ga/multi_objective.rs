//! Pareto utilities for reporting trade-offs between spring designs.
//!
//! The GA itself is single-objective; these functions filter its final
//! population into a genuinely non-dominated set for downstream consumers.
//!
//! - [`non_dominated_sort`]: fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: spread of solutions in objective space
//! - [`pareto_front`]: rank-0 members, thinned by crowding distance
//!
//! All objectives are **minimized**.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm:
//!   NSGA-II", IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use std::cmp::Ordering;

/// Result of non-dominated sorting.
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting.
///
/// Returns an empty result for empty input.
///
/// # Complexity
///
/// O(m · n²) for m objectives and n solutions
///
/// ```
/// use u_springopt::ga::multi_objective::non_dominated_sort;
///
/// // (mass, stress)
/// let objectives = vec![
///     vec![10.0, 300.0],
///     vec![14.0, 200.0],
///     vec![15.0, 350.0], // dominated by both
/// ];
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.fronts[0], vec![0, 1]);
/// assert_eq!(result.ranks[2], 1);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance(&objectives[i], &objectives[j]) {
                Some(Ordering::Less) => {
                    dominates[i].push(j);
                    domination_count[j] += 1;
                }
                Some(Ordering::Greater) => {
                    dominates[j].push(i);
                    domination_count[i] += 1;
                }
                _ => {}
            }
        }
    }

    let mut ranks = vec![0usize; n];
    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut fronts = Vec::new();

    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            for &j in &dominates[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len() + 1;
                    next.push(j);
                }
            }
        }
        fronts.push(current);
        current = next;
    }

    NondominatedSortResult { ranks, fronts }
}

/// `Less` if `a` dominates `b`, `Greater` if `b` dominates `a`, `None` if
/// neither does.
fn dominance(a: &[f64], b: &[f64]) -> Option<Ordering> {
    let mut a_better = false;
    let mut b_better = false;

    for (&va, &vb) in a.iter().zip(b) {
        if va < vb {
            a_better = true;
        } else if vb < va {
            b_better = true;
        }
    }

    match (a_better, b_better) {
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        _ => None,
    }
}

/// Crowding distance of each solution; boundary solutions get infinity.
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];
    let mut indices: Vec<usize> = (0..n).collect();

    for k in 0..m {
        indices.sort_by(|&a, &b| objectives[a][k].total_cmp(&objectives[b][k]));

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let range = objectives[indices[n - 1]][k] - objectives[indices[0]][k];
        if range > 0.0 {
            for w in indices.windows(3) {
                distances[w[1]] += (objectives[w[2]][k] - objectives[w[0]][k]) / range;
            }
        }
    }

    distances
}

/// Indices of the non-dominated solutions, at most `limit` of them.
///
/// When the front is larger than `limit`, the most isolated members (largest
/// crowding distance) are kept. Returned indices are in ascending order.
pub fn pareto_front(objectives: &[Vec<f64>], limit: usize) -> Vec<usize> {
    let sorted = non_dominated_sort(objectives);
    let Some(front) = sorted.fronts.into_iter().next() else {
        return Vec::new();
    };
    if front.len() <= limit {
        return front;
    }

    let front_objectives: Vec<Vec<f64>> = front.iter().map(|&i| objectives[i].clone()).collect();
    let distances = crowding_distance(&front_objectives);

    let mut order: Vec<usize> = (0..front.len()).collect();
    order.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));

    let mut kept: Vec<usize> = order[..limit].iter().map(|&k| front[k]).collect();
    kept.sort_unstable();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single() {
        assert!(non_dominated_sort(&[]).fronts.is_empty());
        let result = non_dominated_sort(&[vec![1.0, 2.0]]);
        assert_eq!(result.ranks, vec![0]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_clear_dominance_chain() {
        let objs = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]];
        let result = non_dominated_sort(&objs);
        assert_eq!(result.ranks, vec![0, 1, 2]);
        assert_eq!(result.fronts.len(), 3);
    }

    #[test]
    fn test_mixed_fronts() {
        let objs = vec![
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
            vec![4.0, 4.0], // dominated by [1]
            vec![6.0, 6.0], // dominated by [3]
        ];
        let result = non_dominated_sort(&objs);
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_identical_solutions_do_not_dominate() {
        let objs = vec![vec![2.0, 2.0]; 3];
        let result = non_dominated_sort(&objs);
        assert!(result.ranks.iter().all(|&r| r == 0));
    }

    #[test]
    fn test_crowding_boundaries_and_interior() {
        let objs = vec![
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![3.0, 1.0],
            vec![4.0, 0.0],
        ];
        let dist = crowding_distance(&objs);
        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());
        assert!((dist[1] - dist[2]).abs() < 1e-10);
        assert!((dist[2] - dist[3]).abs() < 1e-10);
    }

    #[test]
    fn test_crowding_zero_range_objective() {
        let objs = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let dist = crowding_distance(&objs);
        assert!(dist[1].is_finite());
    }

    #[test]
    fn test_pareto_front_filters_dominated() {
        let objs = vec![
            vec![1.0, 5.0],
            vec![4.0, 4.0],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
        ];
        assert_eq!(pareto_front(&objs, 10), vec![0, 2, 3]);
    }

    #[test]
    fn test_pareto_front_truncation_keeps_extremes() {
        let objs = vec![
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![1.1, 2.9],
            vec![2.0, 2.0],
            vec![4.0, 0.0],
        ];
        let kept = pareto_front(&objs, 3);
        assert_eq!(kept.len(), 3);
        assert!(kept.contains(&0));
        assert!(kept.contains(&4));
    }

    #[test]
    fn test_pareto_front_empty() {
        assert!(pareto_front(&[], 5).is_empty());
    }
}
