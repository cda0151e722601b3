use crate::types::*;

/// Weight of the lobby median in the composite
pub const MEDIAN_WEIGHT: f64 = 0.33;
/// Weight of the top-N mean in the composite
pub const TOP_MEAN_WEIGHT: f64 = 0.67;
/// How many of the best players feed the top mean
pub const TOP_N: usize = 10;

/// Composite breakpoints between the piecewise segments
const BREAKPOINTS: [f64; 4] = [0.8, 1.1, 1.5, 2.0];

/// Score a lobby from every player's K/D (humans and bots)
///
/// An empty lobby scores 1 with a zeroed breakdown.
pub fn sweat_score(kds: &[f64], top_n: usize) -> SweatScore {
    if kds.is_empty() {
        return SweatScore {
            value: 1.0,
            composite: 0.0,
            median_kd: 0.0,
            top10_mean_kd: 0.0,
            rating: SweatRating::from_score(1.0),
        };
    }

    let mut sorted = kds.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let median_kd = median_of_sorted(&sorted);
    let top = &sorted[sorted.len().saturating_sub(top_n)..];
    let top10_mean_kd = mean(top);

    let (value, composite) = kd_to_sweat(median_kd, top10_mean_kd);
    SweatScore {
        value,
        composite,
        median_kd,
        top10_mean_kd,
        rating: SweatRating::from_score(value),
    }
}

/// Blend median and top mean into a composite, then map it onto 1-10
///
/// Returns `(sweat, composite)`.
pub fn kd_to_sweat(median: f64, top_mean: f64) -> (f64, f64) {
    let composite = MEDIAN_WEIGHT * median + TOP_MEAN_WEIGHT * top_mean;
    (composite_to_sweat(composite), composite)
}

/// Piecewise-linear map; "ultra sweaty" is reserved for stacked lobbies
pub fn composite_to_sweat(composite: f64) -> f64 {
    let [b0, b1, b2, b3] = BREAKPOINTS;
    let sweat = if composite < b0 {
        1.0 + (composite - 0.1) / 0.7 * 2.0
    } else if composite < b1 {
        3.0 + (composite - b0) / 0.3 * 3.0
    } else if composite < b2 {
        6.0 + (composite - b1) / 0.4 * 2.0
    } else if composite < b3 {
        8.0 + (composite - b2) / 0.5 * 2.0
    } else {
        10.0
    };
    round1(sweat).clamp(1.0, 10.0)
}

/// Median of an already sorted, non-empty slice
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Median of an unsorted slice, `None` when empty
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(median_of_sorted(&sorted))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Half away from zero, not banker's rounding
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lobby_scores_one() {
        let score = sweat_score(&[], TOP_N);
        assert_eq!(score.value, 1.0);
        assert_eq!(score.composite, 0.0);
        assert_eq!(score.median_kd, 0.0);
        assert_eq!(score.top10_mean_kd, 0.0);
        assert_eq!(score.rating, SweatRating::Chill);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_top_mean_uses_all_when_fewer_than_n() {
        let score = sweat_score(&[1.0, 2.0, 3.0], TOP_N);
        assert!((score.top10_mean_kd - 2.0).abs() < 1e-12);
        assert_eq!(score.median_kd, 2.0);
    }

    #[test]
    fn test_top_mean_takes_highest_n() {
        let mut kds = vec![0.5; 20];
        kds.extend(std::iter::repeat(2.0).take(10));
        let score = sweat_score(&kds, TOP_N);
        assert!((score.top10_mean_kd - 2.0).abs() < 1e-12);
        assert_eq!(score.median_kd, 0.5);
        assert!((score.composite - (0.33 * 0.5 + 0.67 * 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_segment_values() {
        // Left edges of each segment
        assert_eq!(composite_to_sweat(0.8), 3.0);
        assert_eq!(composite_to_sweat(1.1), 6.0);
        assert_eq!(composite_to_sweat(1.5), 8.0);
        assert_eq!(composite_to_sweat(2.0), 10.0);
        // Midpoints
        assert_eq!(composite_to_sweat(0.45), 2.0);
        assert_eq!(composite_to_sweat(0.95), 4.5);
        assert_eq!(composite_to_sweat(1.3), 7.0);
        assert_eq!(composite_to_sweat(1.75), 9.0);
    }

    #[test]
    fn test_sweat_clamped() {
        assert_eq!(composite_to_sweat(0.0), 1.0);
        assert_eq!(composite_to_sweat(-3.0), 1.0);
        assert_eq!(composite_to_sweat(50.0), 10.0);
    }

    #[test]
    fn test_sweat_always_in_range_and_one_decimal() {
        for i in 0..500 {
            let composite = i as f64 * 0.01;
            let sweat = composite_to_sweat(composite);
            assert!((1.0..=10.0).contains(&sweat));
            assert!(((sweat * 10.0).round() - sweat * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rating_follows_score() {
        let chill = sweat_score(&[0.3; 20], TOP_N);
        assert_eq!(chill.rating, SweatRating::Chill);

        let stacked = sweat_score(&[3.0; 20], TOP_N);
        assert_eq!(stacked.value, 10.0);
        assert_eq!(stacked.rating, SweatRating::UltraSweaty);
    }
}
