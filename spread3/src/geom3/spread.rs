//! Greedy spread selection. Starting from a set of already placed points, candidates are added
//! one at a time, each time picking the candidate that is best separated from everything placed
//! so far. This is a heuristic: the result is spread out, but it is not a globally optimal
//! max-min arrangement.

use crate::Point3;
use crate::common::points::{check_finite, dist, mean_point};
use crate::common::{IndexMask, PointKey};
use crate::errors::SpreadError;
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How to choose the first point when nothing has been placed yet. The separation score is a
/// product over the placed points, which is the same for every candidate when there are none,
/// so the first pick needs its own rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstPick {
    /// The candidate farthest from the centroid of all candidates, lowest index on ties
    #[default]
    FarthestFromCentroid,

    /// The first usable candidate in input order
    FirstCandidate,
}

/// Options for the spread selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
    pub first_pick: FirstPick,
}

/// Grow the `initial` points by `additional_steps` candidates using the default options. See
/// [`select_with`] for the full description.
///
/// # Examples
///
/// ```
/// use spread3::{select, Point3};
/// let candidates = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 0.0, 0.0),
///     Point3::new(5.0, 5.0, 0.0),
/// ];
/// let initial = vec![Point3::new(0.0, 0.0, 0.0)];
/// let result = select(&candidates, &initial, 1).unwrap();
/// assert_eq!(result, vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)]);
/// ```
pub fn select(
    candidates: &[Point3],
    initial: &[Point3],
    additional_steps: usize,
) -> Result<Vec<Point3>, SpreadError> {
    select_with(
        candidates,
        initial,
        additional_steps,
        &SelectOptions::default(),
    )
}

/// Grow the `initial` points by `additional_steps` candidates, each step appending the candidate
/// with the greatest separation score from the points placed so far.
///
/// The separation score of a candidate is the product of its distances to every placed point, so
/// a candidate close to any single placed point scores poorly no matter how far it is from the
/// others. A candidate only replaces the running best with a strictly greater score, so ties go to
/// the lowest candidate index. When a step's products leave the normal floating point range
/// (overflow to infinity on large point sets, or underflow toward zero), that step ranks the
/// candidates by the sum of the logarithms of their distances instead.
///
/// Candidates equal to a placed point (exact coordinate equality) are never picked, and repeated
/// candidate values are only used once. Each step scans every candidate against every placed
/// point, so the cost is O(steps × candidates × placed points).
///
/// # Arguments
///
/// * `candidates`: the pool of possible new points
/// * `initial`: the points already placed, returned unchanged at the front of the result
/// * `additional_steps`: the number of candidates to add
/// * `options`: how to make the first pick when `initial` is empty
///
/// returns: Result<Vec<OPoint<f64, Const<3>>>, SpreadError>, the initial points followed by the
/// selected candidates in the order they were picked. Fails with `InsufficientCandidates` if
/// there are fewer distinct unused candidates than `additional_steps`, and with
/// `InvalidParameter` if any coordinate is not finite.
pub fn select_with(
    candidates: &[Point3],
    initial: &[Point3],
    additional_steps: usize,
    options: &SelectOptions,
) -> Result<Vec<Point3>, SpreadError> {
    check_finite(candidates, "candidates")?;
    check_finite(initial, "initial")?;

    let mut placed = initial.to_vec();
    if additional_steps == 0 {
        return Ok(placed);
    }

    let mut usable = usable_candidates(candidates, initial);
    let available = usable.count();
    if available < additional_steps {
        return Err(SpreadError::InsufficientCandidates {
            required: additional_steps,
            available,
        });
    }

    debug!(
        "selecting {} of {} usable candidates against {} initial points",
        additional_steps,
        available,
        initial.len()
    );

    let target = initial.len() + additional_steps;
    placed.reserve(additional_steps);

    while placed.len() < target {
        let pick = if placed.is_empty() {
            first_pick(candidates, &usable, options.first_pick)
        } else {
            most_separated(candidates, &usable, &placed)
        };

        // The availability check above guarantees a pick on every step
        let i = pick.ok_or(SpreadError::InsufficientCandidates {
            required: additional_steps,
            available,
        })?;

        trace!("step {}: picked candidate {}", placed.len() - initial.len(), i);
        usable.set(i, false);
        placed.push(candidates[i]);
    }

    Ok(placed)
}

/// Mark the candidates which may be picked: those not equal to any initial point, and only the
/// first occurrence of each repeated value.
fn usable_candidates(candidates: &[Point3], initial: &[Point3]) -> IndexMask {
    let placed = initial.iter().map(PointKey::new).collect::<HashSet<_>>();
    let mut seen = HashSet::with_capacity(candidates.len());
    let mut usable = IndexMask::new(candidates.len(), false);

    for (i, c) in candidates.iter().enumerate() {
        let key = PointKey::new(c);
        if !placed.contains(&key) && seen.insert(key) {
            usable.set(i, true);
        }
    }

    usable
}

/// Product of distances from `p` to every placed point.
fn separation(p: &Point3, placed: &[Point3]) -> f64 {
    placed.iter().map(|o| dist(p, o)).product()
}

/// Log of the product of distances from `p` to every placed point.
fn log_separation(p: &Point3, placed: &[Point3]) -> f64 {
    placed.iter().map(|o| dist(p, o).ln()).sum()
}

/// Score every usable candidate with `score`, computed in parallel, `None` for the rest.
fn score_usable(
    candidates: &[Point3],
    usable: &IndexMask,
    placed: &[Point3],
    score: fn(&Point3, &[Point3]) -> f64,
) -> Vec<Option<f64>> {
    candidates
        .par_iter()
        .enumerate()
        .map(|(i, c)| usable.get(i).then(|| score(c, placed)))
        .collect()
}

/// Index of the usable candidate with the strictly greatest separation score, the first one
/// wins ties. Scores are computed in parallel but reduced in index order.
fn most_separated(candidates: &[Point3], usable: &IndexMask, placed: &[Point3]) -> Option<usize> {
    let products = score_usable(candidates, usable, placed, separation);
    if products.iter().flatten().all(|p| p.is_normal()) {
        return best_of(products.into_iter());
    }

    trace!("separation products out of range, ranking by log sums");
    let logs = score_usable(candidates, usable, placed, log_separation);
    best_of(logs.into_iter())
}

fn first_pick(candidates: &[Point3], usable: &IndexMask, rule: FirstPick) -> Option<usize> {
    match rule {
        FirstPick::FirstCandidate => (0..usable.len()).find(|&i| usable.get(i)),
        FirstPick::FarthestFromCentroid => {
            let center = mean_point(candidates);
            let scores = candidates
                .iter()
                .enumerate()
                .map(|(i, c)| usable.get(i).then(|| dist(c, &center)));
            best_of(scores)
        }
    }
}

/// Scan optional scores in order, keeping the first strictly greatest. The running best starts
/// unset, so the first present score is taken whatever its value.
fn best_of(scores: impl Iterator<Item = Option<f64>>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.enumerate() {
        if let Some(s) = score {
            if best.is_none_or(|(_, b)| s > b) {
                best = Some((i, s));
            }
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn random_points(seed: u64, n: usize) -> Vec<Point3> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                p(
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                )
            })
            .collect()
    }

    #[test]
    fn picks_farthest_from_single_obstacle() {
        let candidates = vec![p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(5.0, 5.0, 0.0)];
        let result = select(&candidates, &[p(0.0, 0.0, 0.0)], 1).unwrap();
        assert_eq!(result, vec![p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)]);
    }

    #[test]
    fn zero_steps_returns_initial() {
        let initial = vec![p(1.0, 2.0, 3.0), p(0.0, 0.0, 0.0)];
        let result = select(&[], &initial, 0).unwrap();
        assert_eq!(result, initial);
    }

    #[test]
    fn too_few_candidates_is_an_error() {
        let candidates = vec![p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        let result = select(&candidates, &[p(0.0, 0.0, 0.0)], 3);
        assert_eq!(
            result,
            Err(SpreadError::InsufficientCandidates {
                required: 3,
                available: 2
            })
        );
    }

    #[test]
    fn repeated_candidates_count_once() {
        let candidates = vec![p(1.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        let result = select(&candidates, &[p(0.0, 0.0, 0.0)], 2);
        assert_eq!(
            result,
            Err(SpreadError::InsufficientCandidates {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn candidates_equal_to_initial_are_not_usable() {
        let candidates = vec![p(0.0, 0.0, 0.0), p(-0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        let result = select(&candidates, &[p(0.0, 0.0, 0.0)], 2);
        assert_eq!(
            result,
            Err(SpreadError::InsufficientCandidates {
                required: 2,
                available: 1
            })
        );
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let candidates = vec![p(0.0, 1.0, 0.0), p(1.0, 0.0, 0.0), p(-1.0, 0.0, 0.0)];
        let result = select(&candidates, &[p(0.0, 0.0, 0.0)], 1).unwrap();
        assert_eq!(result[1], p(0.0, 1.0, 0.0));
    }

    #[test]
    fn equal_products_go_to_lowest_index() {
        // 4 * 6 and 2 * 12 are both exactly 24, while their log sums differ in the last bit
        let obstacles = vec![p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)];
        let candidates = vec![p(4.0, 0.0, 0.0), p(-2.0, 0.0, 0.0)];
        let result = select(&candidates, &obstacles, 1).unwrap();
        assert_eq!(result[2], candidates[0]);
    }

    #[test]
    fn equal_products_with_three_obstacles() {
        // 1 * 2 * 6 = 12 and 4 * 1 * 3 = 12 along the x axis
        let obstacles = vec![p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0), p(7.0, 0.0, 0.0)];
        let candidates = vec![p(1.0, 0.0, 0.0), p(4.0, 0.0, 0.0)];
        let result = select(&candidates, &obstacles, 1).unwrap();
        assert_eq!(result[3], candidates[0]);
    }

    #[test]
    fn product_not_minimum_distance() {
        // The second candidate has the larger product (20 * 30) but the first has the larger
        // minimum distance (about 21.6 to both obstacles)
        let obstacles = vec![p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)];
        let candidates = vec![p(5.0, 21.0, 0.0), p(-20.0, 0.0, 0.0)];
        let result = select(&candidates, &obstacles, 1).unwrap();
        assert_eq!(result[2], p(-20.0, 0.0, 0.0));
    }

    #[test]
    fn large_obstacle_sets_do_not_saturate() {
        // The products over 300 distances of ~1e6 are infinite for both candidates, so the
        // step falls back to log sums rather than treating them as tied
        let obstacles = (0..300)
            .map(|i| p(i as f64 * 1000.0, 0.0, 0.0))
            .collect::<Vec<_>>();
        let candidates = vec![p(0.0, 1e6, 0.0), p(0.0, 2e6, 0.0)];
        let result = select(&candidates, &obstacles, 1).unwrap();
        assert_eq!(result[300], p(0.0, 2e6, 0.0));
    }

    #[test_case(FirstPick::FarthestFromCentroid, 3; "farthest from centroid")]
    #[test_case(FirstPick::FirstCandidate, 0; "first candidate")]
    fn first_pick_with_no_initial(rule: FirstPick, expected: usize) {
        let candidates = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(10.0, 0.0, 0.0),
        ];
        let options = SelectOptions { first_pick: rule };
        let result = select_with(&candidates, &[], 1, &options).unwrap();
        assert_eq!(result, vec![candidates[expected]]);
    }

    #[test]
    fn second_pick_moves_away_from_first() {
        let candidates = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(10.0, 0.0, 0.0),
        ];
        let result = select(&candidates, &[], 2).unwrap();
        assert_eq!(result, vec![p(10.0, 0.0, 0.0), p(0.0, 0.0, 0.0)]);
    }

    #[test]
    fn result_keeps_initial_and_has_target_length() {
        let candidates = random_points(21, 200);
        let initial = random_points(22, 5);
        let result = select(&candidates, &initial, 12).unwrap();

        assert_eq!(result.len(), 17);
        assert_eq!(&result[..5], initial.as_slice());

        let picked = result[5..]
            .iter()
            .map(PointKey::new)
            .collect::<HashSet<_>>();
        assert_eq!(picked.len(), 12);
        for r in &result[5..] {
            assert!(candidates.contains(r));
            assert!(!initial.contains(r));
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let candidates = random_points(31, 300);
        let initial = random_points(32, 3);
        let a = select(&candidates, &initial, 20).unwrap();
        let b = select(&candidates, &initial, 20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn uses_every_candidate_when_asked() {
        let candidates = random_points(41, 10);
        let result = select(&candidates, &[p(0.0, 0.0, 0.0)], 10).unwrap();
        assert_eq!(result.len(), 11);
        for c in &candidates {
            assert!(result.contains(c));
        }
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let candidates = vec![p(0.0, f64::INFINITY, 0.0)];
        let result = select(&candidates, &[], 1);
        assert!(matches!(result, Err(SpreadError::InvalidParameter(_))));

        let result = select(&[p(1.0, 0.0, 0.0)], &[p(f64::NAN, 0.0, 0.0)], 1);
        assert!(matches!(result, Err(SpreadError::InvalidParameter(_))));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: SelectOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.first_pick, FirstPick::FarthestFromCentroid);

        let options: SelectOptions =
            serde_json::from_str(r#"{"first_pick": "first_candidate"}"#).unwrap();
        assert_eq!(options.first_pick, FirstPick::FirstCandidate);
    }
}
