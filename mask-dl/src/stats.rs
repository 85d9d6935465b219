//! Per-channel image statistics.

use crate::{
    common::*, config::PreprocessorConfig, dataset::FileRecord, profiling::Timing,
    tensor::TensorExt as _,
};

/// Per-channel pixel mean and standard deviation over a dataset.
///
/// The values are measured on `[0.0, 1.0]` scaled pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: [R64; 3],
    pub std: [R64; 3],
}

impl Default for ChannelStats {
    fn default() -> Self {
        Self {
            mean: [r64(0.548), r64(0.504), r64(0.479)],
            std: [r64(0.237), r64(0.247), r64(0.246)],
        }
    }
}

impl ChannelStats {
    /// Estimates channel statistics over at most `sample_limit` record
    /// images.
    pub async fn compute(records: &[Arc<FileRecord>], sample_limit: usize) -> Result<Self> {
        ensure!(!records.is_empty(), "the record list must not be empty");
        ensure!(sample_limit > 0, "sample_limit must be positive");

        let mut timing = Timing::new("channel_stats");
        let samples: Vec<_> = records.iter().take(sample_limit).cloned().collect();

        let per_image: Vec<([f64; 3], [f64; 3])> = stream::iter(samples)
            .par_map(None, |record| {
                move || -> Result<_> {
                    let image = vision::image::load(&record.path).with_context(|| {
                        format!("failed to load image file {}", record.path.display())
                    })?;
                    let (channels, _height, _width) = image.size3()?;
                    ensure!(
                        channels == 3,
                        "channel size must be 3, but get {}",
                        channels
                    );
                    let image = image.to_kind(Kind::Float).g_div_scalar(255.0);

                    let mut mean = [0.0; 3];
                    let mut meansq = [0.0; 3];
                    for index in 0..3 {
                        let channel = image.select(0, index as i64);
                        mean[index] = f64::from(channel.mean(Kind::Float));
                        meansq[index] = f64::from((&channel * &channel).mean(Kind::Float));
                    }

                    Ok((mean, meansq))
                }
            })
            .try_collect()
            .await?;
        timing.add_event("scan images");

        let stats = aggregate(&per_image)?;
        timing.add_event("aggregate");
        timing.report();

        Ok(stats)
    }

    /// Returns the configured statistics, or estimates them over the
    /// records when the configuration leaves them out.
    pub async fn resolve(config: &PreprocessorConfig, records: &[Arc<FileRecord>]) -> Result<Self> {
        let stats = match &config.stats {
            Some(stats) => stats.clone(),
            None => {
                warn!("channel statistics are not configured, computing them from the dataset");
                Self::compute(records, config.stats_sample_limit.get()).await?
            }
        };

        Ok(stats)
    }

    /// Recovers displayable pixel values from a normalized image.
    pub fn denormalize(&self, image: &Tensor) -> Result<Tensor> {
        image.denormalize_channels(&self.mean.map(R64::raw), &self.std.map(R64::raw))
    }
}

fn aggregate(per_image: &[([f64; 3], [f64; 3])]) -> Result<ChannelStats> {
    ensure!(!per_image.is_empty(), "the sample list must not be empty");
    let count = per_image.len() as f64;

    let mut mean_sum = [0.0; 3];
    let mut meansq_sum = [0.0; 3];
    per_image.iter().for_each(|(mean, meansq)| {
        izip!(&mut mean_sum, mean).for_each(|(acc, val)| *acc += val);
        izip!(&mut meansq_sum, meansq).for_each(|(acc, val)| *acc += val);
    });

    let mut mean = [r64(0.0); 3];
    let mut std = [r64(0.0); 3];
    for index in 0..3 {
        let channel_mean = mean_sum[index] / count;
        let channel_meansq = meansq_sum[index] / count;
        let channel_var = (channel_meansq - channel_mean * channel_mean).max(0.0);

        mean[index] = R64::try_new(channel_mean)
            .ok_or_else(|| format_err!("the channel mean is not finite"))?;
        std[index] = R64::try_new(channel_var.sqrt())
            .ok_or_else(|| format_err!("the channel std is not finite"))?;
    }

    Ok(ChannelStats { mean, std })
}
