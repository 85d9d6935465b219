//! Dataset pipeline configuration format.

use crate::{common::*, dataset::SplitStrategy, ratio::Ratio, stats::ChannelStats};

pub use dataset::*;
pub use preprocessor::*;

/// The main pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub preprocessor: PreprocessorConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

mod dataset {
    use super::*;

    /// Dataset options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        /// The directory that contains the profile directories.
        pub data_dir: PathBuf,
        /// The label encoding the dataset produces.
        pub class_mode: ClassMode,
        /// The fraction of records reserved for validation.
        #[serde(default = "default_val_ratio")]
        pub val_ratio: Ratio,
        /// The train/validation partitioning strategy.
        pub split: SplitStrategy,
        /// If set, the split is sampled deterministically from this seed.
        pub seed: Option<u64>,
        /// Corrections of mislabeled genders, keyed by profile id.
        #[serde(default = "empty_hashmap::<String, Gender>")]
        pub gender_overrides: HashMap<String, Gender>,
    }
}

mod preprocessor {
    use super::*;

    /// Data preprocessing options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PreprocessorConfig {
        /// The output height and width in pixels.
        pub resize: [NonZeroUsize; 2],
        /// If set, crop the image center to this height and width before
        /// resizing.
        pub center_crop: Option<[NonZeroUsize; 2]>,
        /// Random color distortion options.
        pub color_jitter: Option<ColorJitterConfig>,
        /// The probability to apply horizontal flip.
        pub horizontal_flip_prob: Option<Ratio>,
        /// Additive Gaussian noise options.
        pub gaussian_noise: Option<GaussianNoiseConfig>,
        /// If set, normalize with these statistics instead of measuring
        /// them on the dataset.
        pub stats: Option<ChannelStats>,
        /// The maximum number of images sampled when measuring channel
        /// statistics.
        #[serde(default = "default_stats_sample_limit")]
        pub stats_sample_limit: NonZeroUsize,
        /// The device where the preprocessor works on.
        #[serde(with = "tch_serde::serde_device")]
        pub device: Device,
    }

    /// Random color distortion options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ColorJitterConfig {
        pub hue_shift: Option<R64>,
        pub saturation_shift: Option<R64>,
        pub value_shift: Option<R64>,
    }

    /// Additive Gaussian noise options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GaussianNoiseConfig {
        #[serde(default = "default_noise_mean")]
        pub mean: R64,
        #[serde(default = "default_noise_std")]
        pub std: R64,
    }
}

fn default_val_ratio() -> Ratio {
    Ratio::try_from(0.2).unwrap()
}

fn default_stats_sample_limit() -> NonZeroUsize {
    NonZeroUsize::new(3000).unwrap()
}

fn default_noise_mean() -> R64 {
    r64(0.0)
}

fn default_noise_std() -> R64 {
    r64(1.0)
}

fn empty_hashmap<K, V>() -> HashMap<K, V> {
    HashMap::new()
}
