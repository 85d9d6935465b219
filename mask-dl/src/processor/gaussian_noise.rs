//! The additive Gaussian noise algorithm.

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GaussianNoiseInit {
    pub mean: R64,
    pub std: R64,
}

impl GaussianNoiseInit {
    pub fn build(self) -> Result<GaussianNoise> {
        let Self { mean, std } = self;
        ensure!(std >= 0.0, "std must be non-negative");

        Ok(GaussianNoise {
            mean: mean.raw(),
            std: std.raw(),
        })
    }
}

impl Default for GaussianNoiseInit {
    fn default() -> Self {
        Self {
            mean: r64(0.0),
            std: r64(1.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GaussianNoise {
    mean: f64,
    std: f64,
}

impl GaussianNoise {
    pub fn forward(&self, input: &Tensor) -> Tensor {
        tch::no_grad(|| input + input.randn_like() * self.std + self.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::kind::FLOAT_CPU;

    #[test]
    fn zero_std_shifts_by_mean() -> Result<()> {
        let noise = GaussianNoiseInit {
            mean: r64(0.25),
            std: r64(0.0),
        }
        .build()?;

        let input = Tensor::rand(&[3, 4, 4], FLOAT_CPU);
        let output = noise.forward(&input);
        let max_diff = f64::from((&output - &input - 0.25).abs().max());
        assert!(max_diff < 1e-6, "max diff {} too large", max_diff);
        Ok(())
    }

    #[test]
    fn negative_std_is_rejected() {
        let result = GaussianNoiseInit {
            mean: r64(0.0),
            std: r64(-1.0),
        }
        .build();
        assert!(result.is_err());
    }
}
