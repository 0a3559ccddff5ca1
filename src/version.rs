//! Dotted server-version ordering.

use std::cmp::Ordering;

/// Compares two dotted version strings segment by segment. Missing segments
/// count as zero, so `"11"` and `"11.0.0"` are equal. Non-numeric segments
/// also count as zero.
pub(crate) fn compare_dotted(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.').map(segment);
    let mut right = b.split('.').map(segment);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let ord = l.unwrap_or(0).cmp(&r.unwrap_or(0));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn segment(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_with_trailing_zeros() {
        assert_eq!(compare_dotted("11", "11.0.0"), Ordering::Equal);
        assert_eq!(compare_dotted("10.0.0.0", "10.0"), Ordering::Equal);
    }

    #[test]
    fn orders_numerically_not_lexically() {
        assert_eq!(compare_dotted("10.2", "10.10"), Ordering::Less);
        assert_eq!(compare_dotted("11.0.1.95", "10.0.0.0"), Ordering::Greater);
        assert_eq!(compare_dotted("9.0.3", "10.0.0.0"), Ordering::Less);
    }

    #[test]
    fn garbage_segments_count_as_zero() {
        assert_eq!(compare_dotted("10.x", "10.0"), Ordering::Equal);
        assert_eq!(compare_dotted("", "0"), Ordering::Equal);
    }
}
