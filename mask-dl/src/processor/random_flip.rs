//! The random horizontal flip algorithm.

use crate::{common::*, ratio::Ratio};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomHorizontalFlipInit {
    pub prob: Ratio,
}

impl RandomHorizontalFlipInit {
    pub fn build(self) -> RandomHorizontalFlip {
        let Self { prob } = self;

        RandomHorizontalFlip {
            prob: prob.to_f64(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomHorizontalFlip {
    prob: f64,
}

impl RandomHorizontalFlip {
    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        tch::no_grad(|| -> Result<_> {
            let (_channels, _height, _width) = input.size3()?;
            let mut rng = StdRng::from_entropy();

            let output = if rng.gen_bool(self.prob) {
                input.flip(&[2])
            } else {
                input.shallow_clone()
            };

            Ok(output)
        })
    }
}
