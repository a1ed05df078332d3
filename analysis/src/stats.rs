use itertools::Itertools;

/// descriptive statistics over one group of metric values
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Sample statistics over a group.
    /// The standard deviation uses one delta degree of freedom and is 0 for
    /// groups with fewer than two values. Returns `None` for an empty group.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            0.0
        } else {
            let variance = values
                .iter()
                .map(|value| (value - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64;

            variance.sqrt()
        };

        Some(Self {
            count,
            mean,
            std,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Linear interpolation quantile over an ascending-sorted slice.
/// `q` is clamped to `[0, 1]`; the slice must be non-empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;

    if low == high {
        sorted[low]
    } else {
        let weight = position - low as f64;

        sorted[low] * (1.0 - weight) + sorted[high] * weight
    }
}

/// box plot quartiles, whiskers clamped to the most extreme data point
/// within 1.5 IQR of the box (fliers are hidden, not drawn)
#[derive(Debug, Clone, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
}

impl Quartiles {
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let sorted = values.iter().copied().sorted_by(f64::total_cmp).collect_vec();
        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let fence = 1.5 * (q3 - q1);
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|value| *value >= q1 - fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|value| *value <= q3 + fence)
            .unwrap_or(q3);

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
        })
    }
}

/// trailing rolling mean with a minimum period of one value
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);

    values
        .iter()
        .enumerate()
        .map(|(index, _)| {
            let start = (index + 1).saturating_sub(window);
            let trailing = &values[start..=index];

            trailing.iter().sum::<f64>() / trailing.len() as f64
        })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_naive_recomputation() {
        let values = [4.0, 7.0, 13.0, 16.0];
        let summary = Summary::of(&values).unwrap();

        let mean = (4.0 + 7.0 + 13.0 + 16.0) / 4.0;
        let variance = values
            .iter()
            .map(|value| (value - mean) * (value - mean))
            .sum::<f64>()
            / 3.0;

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, mean);
        assert!((summary.std - variance.sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, 4.0);
        assert_eq!(summary.max, 16.0);
    }

    #[test]
    fn summary_of_empty_group_is_none() {
        assert_eq!(Summary::of(&[]), None);
    }

    #[test]
    fn single_value_has_zero_std() {
        let summary = Summary::of(&[5.0]).unwrap();

        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.mean, 5.0);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];

        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn quartiles_hide_fliers() {
        // 100.0 is far outside the 1.5 IQR fence of the rest
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let quartiles = Quartiles::of(&values).unwrap();

        assert!(quartiles.whisker_high < 100.0);
        assert!(quartiles.whisker_low >= 1.0);
        assert!(quartiles.q1 <= quartiles.median && quartiles.median <= quartiles.q3);
    }

    #[test]
    fn quartiles_of_uniform_group_collapse() {
        let quartiles = Quartiles::of(&[2.0, 2.0, 2.0]).unwrap();

        assert_eq!(quartiles.q1, 2.0);
        assert_eq!(quartiles.median, 2.0);
        assert_eq!(quartiles.q3, 2.0);
        assert_eq!(quartiles.whisker_low, 2.0);
        assert_eq!(quartiles.whisker_high, 2.0);
    }

    #[test]
    fn rolling_mean_uses_trailing_window() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);

        assert_eq!(means, vec![1.0, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn rolling_mean_with_short_prefix_averages_what_exists() {
        let means = rolling_mean(&[3.0, 9.0], 50);

        assert_eq!(means, vec![3.0, 6.0]);
    }
}
