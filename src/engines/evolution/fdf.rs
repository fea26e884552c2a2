use crate::config::FdfShape;
use crate::error::EtbdError;
use rand::{Rng, RngCore};

/// Draws selection-intensity values from a fitness density function.
///
/// Samples are non-negative and their expectation equals the configured mean.
/// Larger samples admit less fit parents, so the shape of the density sets how
/// variable selection pressure is from one parent choice to the next.
pub trait FdfSampler: Send + Sync {
    fn mean(&self) -> f64;

    fn sample(&self, rng: &mut dyn RngCore) -> f64;
}

/// Density falling linearly from its peak at 0 to 0 at three times the mean.
#[derive(Debug, Clone, Copy)]
pub struct LinearFdf {
    mean: f64,
}

/// Exponential density with rate `1 / mean`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialFdf {
    mean: f64,
}

fn check_mean(mean: f64) -> Result<f64, EtbdError> {
    if mean.is_finite() && mean > 0.0 {
        Ok(mean)
    } else {
        Err(EtbdError::Configuration(format!(
            "FDF mean must be a positive number, got {}",
            mean
        )))
    }
}

impl LinearFdf {
    pub fn new(mean: f64) -> Result<Self, EtbdError> {
        Ok(Self {
            mean: check_mean(mean)?,
        })
    }
}

impl ExponentialFdf {
    pub fn new(mean: f64) -> Result<Self, EtbdError> {
        Ok(Self {
            mean: check_mean(mean)?,
        })
    }
}

impl FdfSampler for LinearFdf {
    fn mean(&self) -> f64 {
        self.mean
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        // Inverse of F(x) = 1 - (1 - x / 3m)^2 on [0, 3m]
        let u: f64 = rng.gen();
        3.0 * self.mean * (1.0 - (1.0 - u).sqrt())
    }
}

impl FdfSampler for ExponentialFdf {
    fn mean(&self) -> f64 {
        self.mean
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        // u in [0, 1) keeps the logarithm finite
        let u: f64 = rng.gen();
        -self.mean * (1.0 - u).ln()
    }
}

impl FdfShape {
    /// Builds the sampler for this shape with the given mean.
    pub fn sampler(&self, mean: f64) -> Result<Box<dyn FdfSampler>, EtbdError> {
        Ok(match self {
            FdfShape::Linear => Box::new(LinearFdf::new(mean)?),
            FdfShape::Exponential => Box::new(ExponentialFdf::new(mean)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLES: usize = 200_000;

    fn moments(sampler: &dyn FdfSampler, seed: u64) -> (f64, f64, f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let values: Vec<f64> = (0..SAMPLES).map(|_| sampler.sample(&mut rng)).collect();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        (mean, variance, min)
    }

    #[test]
    fn test_linear_mean_converges() {
        for &m in &[0.5, 5.0, 40.0, 250.0] {
            let fdf = LinearFdf::new(m).unwrap();
            let (mean, variance, min) = moments(&fdf, 11);

            assert!(min >= 0.0);
            assert!((mean - m).abs() / m < 0.02, "mean {} for m = {}", mean, m);
            // Var = m^2 / 2 for the linear-decay density
            assert!((variance - m * m / 2.0).abs() / (m * m / 2.0) < 0.05);
        }
    }

    #[test]
    fn test_linear_support_ends_at_three_means() {
        let fdf = LinearFdf::new(10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..10_000).all(|_| fdf.sample(&mut rng) <= 30.0));
    }

    #[test]
    fn test_exponential_mean_converges() {
        for &m in &[0.5, 5.0, 40.0, 250.0] {
            let fdf = ExponentialFdf::new(m).unwrap();
            let (mean, _, min) = moments(&fdf, 17);

            assert!(min >= 0.0);
            assert!((mean - m).abs() / m < 0.02, "mean {} for m = {}", mean, m);
        }
    }

    #[test]
    fn test_exponential_heavier_tailed_than_linear() {
        let m = 20.0;
        let (_, linear_var, _) = moments(&LinearFdf::new(m).unwrap(), 5);
        let (_, exp_var, _) = moments(&ExponentialFdf::new(m).unwrap(), 5);

        assert!(exp_var > linear_var * 1.5);
    }

    #[test]
    fn test_rejects_invalid_means() {
        for &m in &[0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(LinearFdf::new(m).is_err());
            assert!(ExponentialFdf::new(m).is_err());
            assert!(FdfShape::Exponential.sampler(m).is_err());
        }
    }
}
