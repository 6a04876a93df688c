//! Numeric helpers shared by the generators.
//!
//! Every helper returns NaN instead of dividing by zero or reading past the
//! input; none of them panic on short or degenerate data.

/// `num / den`, NaN when the denominator is zero or either side is non-finite.
#[inline]
#[must_use]
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 || !den.is_finite() || !num.is_finite() {
        f64::NAN
    } else {
        num / den
    }
}

/// One-bar log returns; the first row and non-positive prices are NaN.
#[must_use]
pub fn log_returns(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        let (prev, cur) = (values[i - 1], values[i]);
        if prev > 0.0 && cur > 0.0 {
            out[i] = (cur / prev).ln();
        }
    }
    out
}

/// Applies `f` to every full trailing window of `window` values.
///
/// Windows containing a non-finite value yield NaN without calling `f`.
#[must_use]
pub fn rolling_apply<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if window == 0 || len < window {
        return out;
    }
    for i in (window - 1)..len {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(|v| v.is_finite()) {
            out[i] = f(slice);
        }
    }
    out
}

/// Applies `f` to every full trailing window of two aligned series.
#[must_use]
pub fn rolling_apply_pair<F>(x: &[f64], y: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    let len = x.len().min(y.len());
    let mut out = vec![f64::NAN; x.len()];
    if window == 0 || len < window {
        return out;
    }
    for i in (window - 1)..len {
        let xs = &x[i + 1 - window..=i];
        let ys = &y[i + 1 - window..=i];
        if xs.iter().chain(ys).all(|v| v.is_finite()) {
            out[i] = f(xs, ys);
        }
    }
    out
}

/// Arithmetic mean; NaN for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1); NaN below two values.
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Linear-interpolation quantile of an ascending slice, `q` in [0, 1].
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Sorted copy of a window.
#[must_use]
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Central moments (m2, m3, m4) with population normalization.
#[must_use]
pub fn central_moments(values: &[f64]) -> (f64, f64, f64) {
    let m = mean(values);
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Pearson correlation; NaN when either side has zero variance.
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Replaces `±inf` with NaN in place. Returns true when anything changed.
pub fn sanitize_non_finite(values: &mut [f64]) -> bool {
    let mut changed = false;
    for v in values.iter_mut() {
        if v.is_infinite() {
            *v = f64::NAN;
            changed = true;
        }
    }
    changed
}

/// Formats a numeric parameter for use inside a column name (`2.5` -> `2_5`).
#[must_use]
pub fn param_tag(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}").replace(['.', '-'], "_")
    }
}
