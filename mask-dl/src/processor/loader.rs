//! The image loading implementation.

use super::*;
use crate::{
    common::*, config::PreprocessorConfig, profiling::Timing, size::PixelSize,
    stats::ChannelStats,
};

/// Image loading processor that runs the transform pipeline on every
/// loaded file.
#[derive(Debug, Clone)]
pub struct SampleLoader {
    image_channels: usize,
    device: Device,
    pipeline: TransformPipeline,
}

impl SampleLoader {
    /// Build a new sample loading processor.
    ///
    /// * `config` - The preprocessor options.
    /// * `stats` - The channel statistics used by the normalization step.
    /// * `image_channels` - The expected number of image channels.
    pub fn new(
        config: &PreprocessorConfig,
        stats: &ChannelStats,
        image_channels: usize,
    ) -> Result<Self> {
        ensure!(
            image_channels == 3,
            "image_channels other than 3 is not supported"
        );

        let pipeline = TransformPipeline::from_config(config, stats)?;

        Ok(Self {
            image_channels,
            device: config.device,
            pipeline,
        })
    }

    pub fn image_channels(&self) -> usize {
        self.image_channels
    }

    /// Loads an image file and applies the transform pipeline.
    ///
    /// The image is verified against `orig_size` before any transform
    /// runs, so that files modified after the dataset scan are rejected
    /// instead of silently producing differently shaped samples.
    pub async fn load(
        &self,
        image_path: impl AsRef<Path>,
        orig_size: &PixelSize,
    ) -> Result<Tensor> {
        let Self {
            image_channels,
            device,
            ref pipeline,
        } = *self;
        let image_path = image_path.as_ref().to_owned();
        let pipeline = pipeline.clone();
        let [orig_h, orig_w] = orig_size.hw();
        let mut timing = Timing::new("sample_loader");

        let (image, timing_) = tokio::task::spawn_blocking(move || -> Result<_> {
            tch::no_grad(|| -> Result<_> {
                let image = vision::image::load(&image_path)?;
                {
                    let shape = image.size3()?;
                    let expect_shape = (image_channels as i64, orig_h as i64, orig_w as i64);
                    ensure!(
                        shape == expect_shape,
                        "image size does not match, expect {:?}, but get {:?}",
                        expect_shape,
                        shape
                    );
                }
                let image = image.to_kind(Kind::Float).g_div_scalar(255.0);
                timing.add_event("load");

                // transform on cpu before moving to CUDA due to this issue
                // https://github.com/LaurentMazare/tch-rs/issues/286
                let image = pipeline.forward(&image)?;
                timing.add_event("preprocess");

                let image = image.to_device(device).set_requires_grad(false);
                timing.add_event("move to device");

                Ok((image, timing))
            })
        })
        .await??;
        timing = timing_;

        timing.report();

        Ok(image)
    }
}
