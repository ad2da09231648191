/// Ordinary-least-squares line fitted over `(index, value)` points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a line through `series` using positions `0..n` as x. Needs at least
/// two points.
pub fn fit_trend(series: &[f64]) -> Option<TrendLine> {
    if series.len() < 2 {
        return None;
    }
    let n = series.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (index, value) in series.iter().enumerate() {
        let x = index as f64;
        sum_x += x;
        sum_y += value;
        sum_xy += x * value;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(TrendLine { slope, intercept })
}

/// One-step-ahead forecast: the fitted trend evaluated at `x = n`.
///
/// An empty series forecasts 0 and a single point forecasts itself.
pub fn forecast_next(series: &[f64]) -> f64 {
    match series {
        [] => 0.0,
        [only] => *only,
        _ => fit_trend(series).map_or(0.0, |line| line.at(series.len() as f64)),
    }
}
