//! Default supervised target.

/// Forward log return of `closes` over `horizon` bars.
///
/// Row `i` holds `ln(close[i + horizon] / close[i])`; the last `horizon` rows
/// and rows with a non-positive price are NaN.
#[must_use]
pub fn forward_log_return(closes: &[f64], horizon: usize) -> Vec<f64> {
    let n = closes.len();
    (0..n)
        .map(|i| match closes.get(i + horizon) {
            Some(&future) if closes[i] > 0.0 && future > 0.0 => (future / closes[i]).ln(),
            _ => f64::NAN,
        })
        .collect()
}
