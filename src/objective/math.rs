//! Numerically stable scalar helpers shared by the objectives.

/// Logistic sigmoid `1 / (1 + e^-x)`.
///
/// Never overflows: for negative `x` the equivalent `e^x / (1 + e^x)` is used.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^x)`, exact for large `|x|`.
#[inline]
pub fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

/// `ln(Σ e^v)` computed with the max-shift trick.
///
/// Returns `-inf` for an empty input or when every value is `-inf`, and
/// `+inf` if any value is `+inf`.
///
/// # Example
///
/// ```
/// use histboost::objective::math::logsumexp;
///
/// let v = [1000.0, 1000.0];
/// assert!((logsumexp(&v) - (1000.0 + 2f64.ln())).abs() < 1e-12);
/// assert_eq!(logsumexp(&[]), f64::NEG_INFINITY);
/// ```
pub fn logsumexp<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    let values = values.into_iter();
    let max = values.clone().fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    if max.is_infinite() {
        return max;
    }
    let sum: f64 = values.map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Write `softmax(values)` into `out`.
///
/// # Panics
///
/// Panics if `out.len() != values.len()`.
pub fn softmax_into(values: &[f64], out: &mut [f64]) {
    assert_eq!(values.len(), out.len(), "softmax output length mismatch");
    let lse = logsumexp(values);
    for (o, &v) in out.iter_mut().zip(values) {
        *o = (v - lse).exp();
    }
}
