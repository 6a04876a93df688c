//! Moving-average kernels over plain `f64` series.
//!
//! Indicators wrap these with bar accessors; generators call them directly
//! for derived series (returns, MACD lines, composite signals).

/// Rolling arithmetic mean. A window containing a non-finite value yields NaN.
#[must_use]
pub fn sma_of(values: &[f64], period: usize) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];
    if period == 0 || len < period {
        return result;
    }

    let mut sum = 0.0;
    let mut bad = 0usize;
    for i in 0..len {
        let v = values[i];
        if v.is_finite() {
            sum += v;
        } else {
            bad += 1;
        }
        if i >= period {
            let old = values[i - period];
            if old.is_finite() {
                sum -= old;
            } else {
                bad -= 1;
            }
        }
        if i + 1 >= period && bad == 0 {
            result[i] = sum / period as f64;
        }
    }
    result
}

/// Exponential moving average with multiplier `2 / (period + 1)`.
///
/// Seeded with the SMA of the first `period` consecutive finite values, so the
/// first `period - 1` rows of that run are NaN. Later non-finite inputs carry
/// the previous value forward.
#[must_use]
pub fn ema_of(values: &[f64], period: usize) -> Vec<f64> {
    recursive_of(values, period, 2.0 / (period as f64 + 1.0))
}

/// Wilder smoothing (`alpha = 1 / period`), seeded like [`ema_of`].
#[must_use]
pub fn wilder_of(values: &[f64], period: usize) -> Vec<f64> {
    recursive_of(values, period, 1.0 / period as f64)
}

fn recursive_of(values: &[f64], period: usize, alpha: f64) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];
    if period == 0 {
        return result;
    }

    let Some(seed_end) = first_finite_run(values, period) else {
        return result;
    };
    let start = seed_end + 1 - period;
    let mut prev = values[start..=seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end] = prev;

    for i in (seed_end + 1)..len {
        let v = values[i];
        if v.is_finite() {
            prev = alpha * v + (1.0 - alpha) * prev;
        }
        result[i] = prev;
    }
    result
}

/// Index of the last element of the first run of `period` consecutive finite values.
fn first_finite_run(values: &[f64], period: usize) -> Option<usize> {
    let mut run = 0usize;
    for (i, v) in values.iter().enumerate() {
        if v.is_finite() {
            run += 1;
            if run == period {
                return Some(i);
            }
        } else {
            run = 0;
        }
    }
    None
}

/// Percent rate of change `(v[i] / v[i - period] - 1) * 100`; NaN on a zero base.
#[must_use]
pub fn roc_of(values: &[f64], period: usize) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];
    if period == 0 {
        return result;
    }
    for i in period..len {
        let base = values[i - period];
        if base != 0.0 && base.is_finite() && values[i].is_finite() {
            result[i] = (values[i] / base - 1.0) * 100.0;
        }
    }
    result
}

/// Wilder RSI on 0..100.
///
/// The first value sits at index `period` (one change per bar). A window with
/// no losses reads 100, a window with neither gains nor losses reads 50.
#[must_use]
pub fn rsi_of(values: &[f64], period: usize) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];
    if period == 0 || len <= period {
        return result;
    }

    let mut gains = vec![f64::NAN; len];
    let mut losses = vec![f64::NAN; len];
    for i in 1..len {
        let change = values[i] - values[i - 1];
        if change.is_finite() {
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }
    }

    let avg_gain = wilder_of(&gains, period);
    let avg_loss = wilder_of(&losses, period);
    for i in 0..len {
        let (g, l) = (avg_gain[i], avg_loss[i]);
        if !g.is_finite() || !l.is_finite() {
            continue;
        }
        result[i] = if l == 0.0 {
            if g == 0.0 { 50.0 } else { 100.0 }
        } else {
            100.0 - 100.0 / (1.0 + g / l)
        };
    }
    result
}
