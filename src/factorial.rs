pub trait Factorial {
    fn get(&self, n: u8) -> u128;

    /// Natural logarithm of `n!`.
    #[inline]
    fn ln(&self, n: u8) -> f64 {
        (self.get(n) as f64).ln()
    }
}

/// Largest `n` whose factorial fits into a `u128`.
pub const MAX_ARG: u8 = 34;

#[derive(Default)]
pub struct Calculator;

impl Factorial for Calculator {
    #[inline]
    fn get(&self, n: u8) -> u128 {
        assert!(n <= MAX_ARG, "{n}! overflows");
        (2..=n as u128).product()
    }
}

const MAX_ENTRIES: usize = MAX_ARG as usize + 1;

/// Precomputed factorials and their logarithms for `0..=34`, the largest range that fits
/// into a `u128`.
#[derive(Debug, Clone)]
pub struct Lookup {
    entries: [u128; MAX_ENTRIES],
    logs: [f64; MAX_ENTRIES],
}
impl Factorial for Lookup {
    #[inline]
    fn get(&self, n: u8) -> u128 {
        self.entries[n as usize]
    }

    #[inline]
    fn ln(&self, n: u8) -> f64 {
        self.logs[n as usize]
    }
}

impl Default for Lookup {
    fn default() -> Self {
        let mut entries = [1u128; MAX_ENTRIES];
        let mut logs = [0.0; MAX_ENTRIES];
        for i in 2..MAX_ENTRIES {
            entries[i] = i as u128 * entries[i - 1];
            logs[i] = logs[i - 1] + (i as f64).ln();
        }
        Self { entries, logs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    #[test]
    pub fn calculator() {
        test_impl(Calculator);
    }

    #[test]
    pub fn lookup() {
        test_impl(Lookup::default());
    }

    fn test_impl(f: impl Factorial) {
        assert_eq!(1, f.get(0));
        assert_eq!(1, f.get(1));
        assert_eq!(2, f.get(2));
        assert_eq!(6, f.get(3));
        assert_eq!(24, f.get(4));
        assert_eq!(3_628_800, f.get(10));
        assert_eq!(0.0, f.ln(0));
        assert_eq!(0.0, f.ln(1));
        assert_float_relative_eq!(24f64.ln(), f.ln(4), 1e-12);
        assert_float_relative_eq!(3_628_800f64.ln(), f.ln(10), 1e-12);
    }

    #[test]
    #[should_panic = "35! overflows"]
    fn calculator_overflow_panics() {
        Calculator.get(35);
    }
}
