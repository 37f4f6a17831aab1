//! Enumeration of waypoint orderings.
//!
//! Orderings are produced in lexicographic order of waypoint *indices*, so
//! ordering 0 always visits the waypoints in insertion order and the last
//! ordering visits them in reverse. The frontier breaks ties on the ordering
//! index, which makes this order part of the search's observable behaviour.

use waypath_core::Point;

/// Every chain `[spawn, permuted waypoints…, destination]`.
///
/// Returns exactly `k!` chains for `k` waypoints (one chain when there are
/// none). Duplicate waypoints are permuted by index, so they still yield
/// `k!` chains.
pub fn orderings(spawn: Point, waypoints: &[Point], destination: Point) -> Vec<Vec<Point>> {
    let mut idx: Vec<usize> = (0..waypoints.len()).collect();
    let mut chains = Vec::with_capacity(factorial(waypoints.len()).min(4096));
    loop {
        let mut chain = Vec::with_capacity(waypoints.len() + 2);
        chain.push(spawn);
        chain.extend(idx.iter().map(|&i| waypoints[i]));
        chain.push(destination);
        chains.push(chain);

        if !next_permutation(&mut idx) {
            break;
        }
    }
    chains
}

/// `k!`, saturating.
pub fn factorial(k: usize) -> usize {
    (1..=k).fold(1usize, |acc, n| acc.saturating_mul(n))
}

/// Rearrange `v` into the next lexicographically greater permutation.
///
/// Returns `false` (leaving `v` untouched) when `v` is already the last one.
fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const S: Point = Point::new(0, 0);
    const D: Point = Point::new(9, 9);

    #[test]
    fn no_waypoints_gives_single_chain() {
        assert_eq!(orderings(S, &[], D), vec![vec![S, D]]);
    }

    #[test]
    fn k_factorial_distinct_chains() {
        let wps: Vec<Point> = (1..=4).map(|i| Point::new(i, 0)).collect();
        let chains = orderings(S, &wps, D);
        assert_eq!(chains.len(), 24);

        let unique: HashSet<_> = chains.iter().cloned().collect();
        assert_eq!(unique.len(), 24);

        for chain in &chains {
            assert_eq!(chain.len(), wps.len() + 2);
            assert_eq!(chain[0], S);
            assert_eq!(chain[chain.len() - 1], D);
            let mut middle = chain[1..chain.len() - 1].to_vec();
            middle.sort();
            assert_eq!(middle, wps);
        }
    }

    #[test]
    fn order_is_lexicographic_by_index() {
        let a = Point::new(5, 0);
        let b = Point::new(1, 0);
        let c = Point::new(3, 0);
        let chains = orderings(S, &[a, b, c], D);
        let middles: Vec<Vec<Point>> = chains.iter().map(|ch| ch[1..4].to_vec()).collect();
        assert_eq!(
            middles,
            vec![
                vec![a, b, c],
                vec![a, c, b],
                vec![b, a, c],
                vec![b, c, a],
                vec![c, a, b],
                vec![c, b, a],
            ]
        );
    }

    #[test]
    fn duplicates_are_permuted_by_index() {
        let w = Point::new(2, 2);
        assert_eq!(orderings(S, &[w, w], D).len(), 2);
    }

    #[test]
    fn factorial_values() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(3), 6);
        assert_eq!(factorial(5), 120);
    }
}
