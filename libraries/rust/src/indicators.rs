use crate::schema::PriceBar;
use serde::Serialize;

/// 5, 20, 60 and 120 session lines.
pub const DEFAULT_WINDOWS: [usize; 4] = [5, 20, 60, 120];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverage {
    pub window: usize,
    /// Aligned with the bars; `None` until `window` closes are available.
    pub values: Vec<Option<f64>>,
}

/// Simple moving average over a rolling window.
pub fn moving_average(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut sum = 0.0;

    for (index, close) in closes.iter().enumerate() {
        sum += close;

        if index >= window {
            sum -= closes[index - window];
        }

        if index + 1 >= window {
            values.push(Some(sum / window as f64));
        } else {
            values.push(None);
        }
    }

    values
}

pub fn moving_averages(bars: &[PriceBar], windows: &[usize]) -> Vec<MovingAverage> {
    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();

    windows
        .iter()
        .map(|&window| MovingAverage {
            window,
            values: moving_average(&closes, window),
        })
        .collect()
}
