//! Utilities for working with probabilities.

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn normalise(&mut self, target: f64) -> f64;
    fn scale(&mut self, factor: f64);
    fn fill_uniform(&mut self);
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Scales the elements so that they add up to `target`, returning the sum prior to scaling.
    /// A slice with no mass is left untouched.
    fn normalise(&mut self, target: f64) -> f64 {
        let sum = self.sum();
        if sum > 0.0 {
            self.scale(target / sum);
        }
        sum
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }

    fn fill_uniform(&mut self) {
        let share = 1.0 / self.len() as f64;
        for element in self {
            *element = share;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assert_slice_f64_relative;

    #[test]
    fn normalise() {
        let mut data = [0.05, 0.1, 0.15, 0.2];
        let sum = data.normalise(1.0);
        assert_eq!(0.5, sum);
        assert_slice_f64_relative(&[0.1, 0.2, 0.3, 0.4], &data, 1e-12);
    }

    #[test]
    fn normalise_zero_mass() {
        let mut data = [0.0, 0.0, 0.0];
        assert_eq!(0.0, data.normalise(1.0));
        assert_eq!([0.0, 0.0, 0.0], data);
    }

    #[test]
    fn fill_uniform() {
        let mut data = [0.0; 4];
        data.fill_uniform();
        assert_eq!([0.25; 4], data);
    }
}
