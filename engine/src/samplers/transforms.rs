//! Reference distribution transforms
//!
//! Each consumes normalized draws from the handle and applies a closed-form,
//! multiplicative or rejection method.

use super::Distribution;
use crate::handle::GeneratorHandle;

/// Continuous uniform on [a, b)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    pub a: f64,
    pub b: f64,
}

impl Uniform {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

impl Distribution for Uniform {
    const NAME: &'static str = "uniform";

    fn is_valid(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.a < self.b
    }

    fn params(&self) -> Vec<f64> {
        vec![self.a, self.b]
    }

    fn from_params(params: &[f64]) -> Option<Self> {
        match params {
            [a, b] => Some(Self::new(*a, *b)),
            _ => None,
        }
    }

    fn transform(&self, handle: &mut GeneratorHandle) -> f64 {
        let v = handle.draw_normalized();
        self.b * v + (1.0 - v) * self.a
    }
}

/// Exponential with rate `lambda`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    pub lambda: f64,
}

impl Exponential {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl Distribution for Exponential {
    const NAME: &'static str = "exponential";

    fn is_valid(&self) -> bool {
        self.lambda > 0.0 && self.lambda.is_finite()
    }

    fn params(&self) -> Vec<f64> {
        vec![self.lambda]
    }

    fn from_params(params: &[f64]) -> Option<Self> {
        match params {
            [lambda] => Some(Self::new(*lambda)),
            _ => None,
        }
    }

    fn transform(&self, handle: &mut GeneratorHandle) -> f64 {
        // 1 - u lies in (0, 1], so the log is finite
        -(1.0 - handle.draw_normalized()).ln() / self.lambda
    }
}

/// Triangular on [a, b] with mode c
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Triangular {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }
}

impl Distribution for Triangular {
    const NAME: &'static str = "triangular";

    fn is_valid(&self) -> bool {
        [self.a, self.b, self.c].iter().all(|p| p.is_finite())
            && self.a < self.b
            && self.a <= self.c
            && self.c <= self.b
    }

    fn params(&self) -> Vec<f64> {
        vec![self.a, self.b, self.c]
    }

    fn from_params(params: &[f64]) -> Option<Self> {
        match params {
            [a, b, c] => Some(Self::new(*a, *b, *c)),
            _ => None,
        }
    }

    fn transform(&self, handle: &mut GeneratorHandle) -> f64 {
        let Triangular { a, b, c } = *self;
        let f_c = (c - a) / (b - a);
        let u = handle.draw_normalized();
        if u < f_c {
            a + ((b - a) * (c - a) * u).sqrt()
        } else {
            b - ((b - a) * (b - c) * (1.0 - u)).sqrt()
        }
    }
}

/// Means below this use the multiplicative method; above it, PTRS.
const POISSON_PTRS_THRESHOLD: f64 = 10.0;

/// Poisson with mean `lambda`
///
/// Small means use Knuth's multiplicative method. Larger means use Hörmann's
/// transformed rejection with squeeze (PTRS), whose expected number of draws
/// is bounded independently of `lambda`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    pub lambda: f64,
}

impl Poisson {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    fn multiplicative(mean: f64, handle: &mut GeneratorHandle) -> f64 {
        let limit = (-mean).exp();
        let mut k = 0.0;
        let mut p = handle.draw_normalized();
        while p > limit {
            k += 1.0;
            p *= handle.draw_normalized();
        }
        k
    }

    /// Hörmann (1993), "The transformed rejection method for generating
    /// Poisson random variables".
    fn ptrs(lambda: f64, handle: &mut GeneratorHandle) -> f64 {
        let slam = lambda.sqrt();
        let b = 0.931 + 2.53 * slam;
        let a = -0.059 + 0.02483 * b;
        let inv_alpha = 1.1239 + 1.1328 / (b - 3.4);
        let v_r = 0.9277 - 3.6224 / (b - 2.0);

        loop {
            let u = handle.draw_normalized() - 0.5;
            let v = handle.draw_normalized();
            let us = 0.5 - u.abs();
            let k = ((2.0 * a / us + b) * u + lambda + 0.43).floor();

            if us >= 0.07 && v <= v_r {
                return k;
            }
            if k < 0.0 || (us < 0.013 && v > us) {
                continue;
            }
            let lhs = v.ln() + inv_alpha.ln() - (a / (us * us) + b).ln();
            if lhs <= log_pmf(k, lambda) {
                return k;
            }
        }
    }
}

/// ln P(X = k) for X ~ Poisson(lambda), k a non-negative integer.
///
/// Large k goes through Stirling's series written in terms of `k - lambda`,
/// which avoids cancelling two terms of size `k ln lambda`.
fn log_pmf(k: f64, lambda: f64) -> f64 {
    if k < POISSON_PTRS_THRESHOLD {
        let ln_factorial: f64 = (2..=k as u32).map(|i| f64::from(i).ln()).sum();
        return -lambda + k * lambda.ln() - ln_factorial;
    }
    let d = k - lambda;
    let stirling = 1.0 / (12.0 * k) - 1.0 / (360.0 * k.powi(3)) + 1.0 / (1260.0 * k.powi(5));
    d - k * (d / lambda).ln_1p() - 0.5 * (2.0 * std::f64::consts::PI * k).ln() - stirling
}

impl Distribution for Poisson {
    const NAME: &'static str = "poisson";

    fn is_valid(&self) -> bool {
        self.lambda > 0.0 && self.lambda.is_finite()
    }

    fn params(&self) -> Vec<f64> {
        vec![self.lambda]
    }

    fn from_params(params: &[f64]) -> Option<Self> {
        match params {
            [lambda] => Some(Self::new(*lambda)),
            _ => None,
        }
    }

    fn transform(&self, handle: &mut GeneratorHandle) -> f64 {
        if self.lambda < POISSON_PTRS_THRESHOLD {
            Self::multiplicative(self.lambda, handle)
        } else {
            Self::ptrs(self.lambda, handle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::PrngOptions;
    use crate::rng::Seed;

    fn handle(seed: u64) -> GeneratorHandle {
        GeneratorHandle::new(PrngOptions::seeded(Seed::from_scalar(seed).unwrap())).unwrap()
    }

    #[test]
    fn test_uniform_range() {
        let mut h = handle(42);
        let dist = Uniform::new(-2.0, 3.0);
        for _ in 0..1000 {
            let x = dist.transform(&mut h);
            assert!((-2.0..3.0).contains(&x), "uniform draw {} out of range", x);
        }
    }

    #[test]
    fn test_triangular_range_and_validation() {
        let mut h = handle(42);
        let dist = Triangular::new(0.0, 10.0, 2.0);
        for _ in 0..1000 {
            let x = dist.transform(&mut h);
            assert!((0.0..=10.0).contains(&x));
        }
        assert!(!Triangular::new(0.0, 10.0, 11.0).is_valid());
        assert!(!Triangular::new(5.0, 5.0, 5.0).is_valid());
    }

    #[test]
    fn test_exponential_mean() {
        let mut h = handle(7);
        let dist = Exponential::new(4.0);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| dist.transform(&mut h)).sum::<f64>() / n as f64;
        assert!((mean - 0.25).abs() < 0.01, "exponential mean {} far from 0.25", mean);
    }

    #[test]
    fn test_poisson_mean_both_regimes() {
        let mut h = handle(9);
        for &lambda in &[3.0, 10.0, 37.5, 1200.0] {
            let dist = Poisson::new(lambda);
            let n = 2_000;
            let mean: f64 = (0..n).map(|_| dist.transform(&mut h)).sum::<f64>() / n as f64;
            let tolerance = 5.0 * (lambda / n as f64).sqrt();
            assert!(
                (mean - lambda).abs() < tolerance,
                "poisson({}) mean {} outside tolerance {}",
                lambda,
                mean,
                tolerance
            );
        }
    }

    #[test]
    fn test_poisson_log_pmf_matches_direct_sum() {
        let cases = [
            (0.0, 12.0),
            (5.0, 12.0),
            (12.0, 12.0),
            (30.0, 12.0),
            (250.0, 200.0),
        ];
        for &(k, lambda) in &cases {
            let ln_factorial: f64 = (2..=k as u32).map(|i| f64::from(i).ln()).sum();
            let direct = -lambda + k * f64::ln(lambda) - ln_factorial;
            let actual = log_pmf(k, lambda);
            assert!(
                (actual - direct).abs() < 1e-9,
                "log_pmf({}, {}) = {}, expected {}",
                k,
                lambda,
                actual,
                direct
            );
        }
    }

    #[test]
    fn test_poisson_huge_mean_terminates() {
        let mut h = handle(1234);
        let lambda: f64 = 1e20;
        let dist = Poisson::new(lambda);
        for _ in 0..100 {
            let k = dist.transform(&mut h);
            assert!(k.is_finite() && k >= 0.0);
            assert!((k - lambda).abs() < 10.0 * lambda.sqrt(), "poisson(1e20) gave {}", k);
        }
    }

    #[test]
    fn test_from_params_wrong_arity() {
        assert!(Uniform::from_params(&[1.0]).is_none());
        assert!(Exponential::from_params(&[1.0, 2.0]).is_none());
        assert_eq!(Poisson::from_params(&[2.5]), Some(Poisson::new(2.5)));
    }
}
