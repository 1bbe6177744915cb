use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassBand {
    Low,
    Medium,
    High,
}

impl PassBand {
    #[must_use]
    pub fn from_probability(probability: u8) -> Self {
        match probability {
            0..50 => Self::Low,
            50..75 => Self::Medium,
            _ => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassPrediction {
    pub probability: u8,
    pub band: PassBand,
}

/// Coarse passing-probability estimate.
///
/// `raw = average*0.55 + trend*20 + consistency*0.25`, then
/// `probability = clamp(round(raw / 6), 0, 100)`.
#[must_use]
pub fn predict_pass(average_score: f64, trend: f64, consistency: f64) -> PassPrediction {
    let raw = average_score * 0.55 + trend * 20.0 + consistency * 0.25;
    let scaled = (raw / 6.0).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let probability = if scaled.is_nan() {
        0
    } else {
        scaled.clamp(0.0, 100.0) as u8
    };
    PassPrediction {
        probability,
        band: PassBand::from_probability(probability),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_matches_weights() {
        // 400*0.55 + 0.5*20 + 80*0.25 = 220 + 10 + 20 = 250 -> 41.67 -> 42
        let p = predict_pass(400.0, 0.5, 80.0);
        assert_eq!(p.probability, 42);
        assert_eq!(p.band, PassBand::Low);
    }

    #[test]
    fn probability_is_clamped() {
        assert_eq!(predict_pass(10_000.0, 1.0, 100.0).probability, 100);
        assert_eq!(predict_pass(0.0, -1.0, 0.0).probability, 0);
        assert_eq!(predict_pass(f64::NAN, 0.0, 0.0).probability, 0);
    }

    #[test]
    fn bands_split_at_50_and_75() {
        assert_eq!(PassBand::from_probability(49), PassBand::Low);
        assert_eq!(PassBand::from_probability(50), PassBand::Medium);
        assert_eq!(PassBand::from_probability(74), PassBand::Medium);
        assert_eq!(PassBand::from_probability(75), PassBand::High);
        assert_eq!(predict_pass(800.0, 0.0, 40.0).band, PassBand::High);
    }
}
