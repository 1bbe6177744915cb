use serde::{Deserialize, Serialize};

/// Scalars summarising a user's completed scores, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub attempts: usize,
    pub average: f64,
    /// Least-squares slope per attempt divided by 100, clamped to [-1, 1].
    pub trend: f64,
    /// `max(0, 100 - population standard deviation)`.
    pub consistency: f64,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_history(scores: &[i64]) -> Option<HistorySummary> {
    if scores.is_empty() {
        return None;
    }
    let n = scores.len() as f64;
    let values: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
    let average = values.iter().sum::<f64>() / n;

    let variance = values.iter().map(|v| (v - average).powi(2)).sum::<f64>() / n;
    let consistency = (100.0 - variance.sqrt()).max(0.0);

    let trend = if scores.len() < 2 {
        0.0
    } else {
        let mean_x = (n - 1.0) / 2.0;
        let (num, den) = values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(num, den), (i, y)| {
                let dx = i as f64 - mean_x;
                (num + dx * (y - average), den + dx * dx)
            });
        (num / den / 100.0).clamp(-1.0, 1.0)
    };

    Some(HistorySummary {
        attempts: scores.len(),
        average,
        trend,
        consistency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_has_no_summary() {
        assert!(summarize_history(&[]).is_none());
    }

    #[test]
    fn single_attempt_has_flat_trend() {
        let s = summarize_history(&[420]).unwrap();
        assert_eq!(s.attempts, 1);
        assert_eq!(s.average, 420.0);
        assert_eq!(s.trend, 0.0);
        assert_eq!(s.consistency, 100.0);
    }

    #[test]
    fn rising_scores_have_positive_trend() {
        let s = summarize_history(&[300, 350, 400]).unwrap();
        assert!((s.trend - 0.5).abs() < 1e-9);
        assert!((s.average - 350.0).abs() < 1e-9);
        // stddev = sqrt(5000/3) ~ 40.82
        assert!((s.consistency - 59.18).abs() < 0.01);
    }

    #[test]
    fn wild_swings_floor_consistency_and_clamp_trend() {
        let s = summarize_history(&[0, 500]).unwrap();
        assert_eq!(s.consistency, 0.0);
        assert_eq!(s.trend, 1.0);
    }
}
