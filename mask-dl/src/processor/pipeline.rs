//! The image transform pipeline.

use super::*;
use crate::{
    common::*,
    config::{ColorJitterConfig, GaussianNoiseConfig, PreprocessorConfig},
    stats::ChannelStats,
    tensor::TensorExt as _,
};

#[derive(Debug, Clone)]
pub struct CenterCrop {
    height: i64,
    width: i64,
}

impl CenterCrop {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "crop size must be positive, but get ({}, {})",
            height,
            width
        );

        Ok(Self {
            height: height as i64,
            width: width as i64,
        })
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        input.f_center_crop(self.height, self.width)
    }
}

#[derive(Debug, Clone)]
pub struct Resize {
    height: i64,
    width: i64,
}

impl Resize {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "target size must be positive, but get ({}, {})",
            height,
            width
        );

        Ok(Self {
            height: height as i64,
            width: width as i64,
        })
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        input.resize2d_exact(self.height, self.width)
    }
}

#[derive(Debug, Clone)]
pub struct Normalize {
    mean: [f64; 3],
    std: [f64; 3],
}

impl Normalize {
    pub fn new(stats: &ChannelStats) -> Result<Self> {
        let mean = stats.mean.map(R64::raw);
        let std = stats.std.map(R64::raw);
        ensure!(
            std.iter().all(|&value| value > 0.0),
            "std must be positive, but get {:?}",
            std
        );

        Ok(Self { mean, std })
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        input.normalize_channels(&self.mean, &self.std)
    }
}

/// One step of a [TransformPipeline].
#[derive(Debug, Clone)]
pub enum TransformStep {
    CenterCrop(CenterCrop),
    Resize(Resize),
    ColorJitter(ColorJitter),
    RandomHorizontalFlip(RandomHorizontalFlip),
    Normalize(Normalize),
    GaussianNoise(GaussianNoise),
}

impl TransformStep {
    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        match self {
            Self::CenterCrop(step) => step.forward(input),
            Self::Resize(step) => step.forward(input),
            Self::ColorJitter(step) => step.forward(input),
            Self::RandomHorizontalFlip(step) => step.forward(input),
            Self::Normalize(step) => step.forward(input),
            Self::GaussianNoise(step) => Ok(step.forward(input)),
        }
    }
}

/// The ordered list of transform steps that maps a decoded image to a
/// model input tensor.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    steps: Vec<TransformStep>,
}

impl TransformPipeline {
    pub fn from_config(config: &PreprocessorConfig, stats: &ChannelStats) -> Result<Self> {
        let PreprocessorConfig {
            resize,
            center_crop,
            ref color_jitter,
            horizontal_flip_prob,
            ref gaussian_noise,
            ..
        } = *config;

        let mut steps = vec![];

        if let Some(crop_size) = center_crop {
            let [height, width] = crop_size;
            steps.push(TransformStep::CenterCrop(CenterCrop::new(
                height.get(),
                width.get(),
            )?));
        }

        {
            let [height, width] = resize;
            steps.push(TransformStep::Resize(Resize::new(
                height.get(),
                width.get(),
            )?));
        }

        if let Some(jitter) = color_jitter {
            let ColorJitterConfig {
                hue_shift,
                saturation_shift,
                value_shift,
            } = *jitter;
            let jitter = ColorJitterInit {
                hue_shift,
                saturation_shift,
                value_shift,
            }
            .build()?;
            steps.push(TransformStep::ColorJitter(jitter));
        }

        if let Some(prob) = horizontal_flip_prob {
            let flip = RandomHorizontalFlipInit { prob }.build();
            steps.push(TransformStep::RandomHorizontalFlip(flip));
        }

        steps.push(TransformStep::Normalize(Normalize::new(stats)?));

        if let Some(noise) = gaussian_noise {
            let GaussianNoiseConfig { mean, std } = *noise;
            let noise = GaussianNoiseInit { mean, std }.build()?;
            steps.push(TransformStep::GaussianNoise(noise));
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let mut output = input.shallow_clone();
        for step in &self.steps {
            output = step.forward(&output)?;
        }
        Ok(output)
    }
}
