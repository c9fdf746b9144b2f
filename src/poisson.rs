use crate::factorial::Factorial;

/// Probability of exactly `k` events under a Poisson process with rate `lambda`, evaluated in
/// log space. A rate that is not strictly positive and finite carries no mass.
#[inline]
pub fn univariate(k: u8, lambda: f64, factorial: &impl Factorial) -> f64 {
    if !(lambda > 0.0 && lambda.is_finite()) {
        return 0.0;
    }
    f64::exp(k as f64 * lambda.ln() - lambda - factorial.ln(k))
}
