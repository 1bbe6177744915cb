//! Relative standing of one score among every completed score of a package.

/// `round(100 * count(score <= target) / count(all))`, or `None` for an empty
/// distribution.
///
/// `scores` is the raw list of completed totals, duplicates and repeat
/// attempts included. The target is expected to be part of it but the
/// formula does not depend on that.
#[must_use]
pub fn percentile(target: i64, scores: &[i64]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }
    let at_most = scores.iter().filter(|&&s| s <= target).count();
    // Integer half-up rounding of 100 * at_most / len.
    let pct = (200 * at_most + scores.len()) / (2 * scores.len());
    u8::try_from(pct.min(100)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_scores_at_or_below_target() {
        assert_eq!(percentile(700, &[500, 600, 700, 800]), Some(75));
        assert_eq!(percentile(500, &[500, 600, 700, 800]), Some(25));
    }

    #[test]
    fn maximum_score_is_100th_percentile() {
        assert_eq!(percentile(800, &[500, 600, 700, 800]), Some(100));
        assert_eq!(percentile(420, &[420]), Some(100));
        assert_eq!(percentile(420, &[420, 420, 420]), Some(100));
    }

    #[test]
    fn rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(percentile(1, &[1, 2, 3, 4, 5, 6, 7, 8]), Some(13));
        // 1/3 = 33.3%
        assert_eq!(percentile(1, &[1, 2, 3]), Some(33));
        // 2/3 = 66.7%
        assert_eq!(percentile(2, &[1, 2, 3]), Some(67));
    }

    #[test]
    fn empty_distribution_is_undefined() {
        assert_eq!(percentile(100, &[]), None);
    }

    #[test]
    fn stays_within_bounds() {
        let scores = [-5, 0, 17, 300, 550];
        for target in [-100, -5, 0, 100, 550, 10_000] {
            let p = percentile(target, &scores).unwrap();
            assert!(p <= 100);
        }
        assert_eq!(percentile(-100, &scores), Some(0));
    }
}
