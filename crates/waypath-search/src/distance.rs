use waypath_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Sum of the Manhattan lengths of every leg of `chain`, in order.
pub fn chain_length(chain: &[Point]) -> i32 {
    chain.windows(2).map(|w| manhattan(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Point::new(1, 5);
        let b = Point::new(4, 1);
        assert_eq!(manhattan(a, b), 7);
        assert_eq!(manhattan(b, a), 7);
        assert_eq!(manhattan(a, a), 0);
    }

    #[test]
    fn chain_length_sums_legs() {
        let chain = [Point::new(0, 0), Point::new(3, 0), Point::new(3, 2)];
        assert_eq!(chain_length(&chain), 5);
        assert_eq!(chain_length(&chain[..1]), 0);
        assert_eq!(chain_length(&[]), 0);
    }
}
