//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first observation, then
//! EMA[i] = X[i]*k + EMA[i-1]*(1-k). Every point is valid; there is no warmup
//! window and no value depends on a later observation.

pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.is_empty() {
        return Vec::new();
    }

    let k = smoothing_factor(period);
    let mut smoothed = Vec::with_capacity(values.len());
    let mut ema = values[0];
    smoothed.push(ema);

    for &value in &values[1..] {
        ema = value * k + ema * (1.0 - k);
        smoothed.push(ema);
    }

    smoothed
}

pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_seed_is_first_observation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert_eq!(series.len(), 3);
        assert!((series[0] - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0], 3);

        let k = 2.0 / 4.0;
        let ema_1 = 20.0 * k + 10.0 * (1.0 - k);
        let ema_2 = 30.0 * k + ema_1 * (1.0 - k);
        let ema_3 = 40.0 * k + ema_2 * (1.0 - k);

        assert!((series[1] - ema_1).abs() < f64::EPSILON);
        assert!((series[2] - ema_2).abs() < f64::EPSILON);
        assert!((series[3] - ema_3).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_period_1_tracks_input() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 1);
        assert_eq!(series, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&[100.0; 8], 5);
        for v in series {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_no_look_ahead() {
        let full = calculate_ema(&[1.0, 5.0, 2.0, 8.0, 3.0], 4);
        let prefix = calculate_ema(&[1.0, 5.0, 2.0], 4);
        assert_eq!(&full[..3], prefix.as_slice());
    }

    #[test]
    fn ema_empty_values() {
        assert!(calculate_ema(&[], 3).is_empty());
    }

    #[test]
    fn ema_period_0() {
        assert!(calculate_ema(&[10.0, 20.0], 0).is_empty());
    }

    #[test]
    fn ema_smoothing_factor() {
        assert!((smoothing_factor(10) - 2.0 / 11.0).abs() < f64::EPSILON);
    }
}
