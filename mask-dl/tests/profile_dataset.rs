use anyhow::Result;
use approx::abs_diff_eq;
use face_label::{ClassMode, Gender};
use futures::stream::TryStreamExt;
use mask_dl::{
    config::{DatasetConfig, PreprocessorConfig},
    dataset::{
        GenericDataset, OnDemandDataset, ProfileDataset, RandomAccessDataset, RandomAccessStream,
        SplitStrategy, StreamingDataset, UnlabeledDataset,
    },
    processor::SampleLoader,
    ratio::Ratio,
    stats::ChannelStats,
};
use noisy_float::prelude::*;
use std::{
    collections::{HashMap, HashSet},
    fs,
    num::NonZeroUsize,
    path::Path,
    sync::Arc,
};
use tch::{vision, Device, Tensor};
use tempfile::TempDir;

const PROFILE_NAMES: &[&str] = &[
    "000001_male_Asian_20",
    "000002_female_Asian_45",
    "000003_female_Asian_60",
    "000004_male_Asian_29",
];

fn save_color_image(path: &Path, rgb: [u8; 3], height: i64, width: i64) -> Result<()> {
    let image = Tensor::of_slice(&rgb)
        .view([3, 1, 1])
        .expand(&[3, height, width], true)
        .contiguous();
    vision::image::save(&image, path)?;
    Ok(())
}

fn build_fixture(data_dir: &Path) -> Result<()> {
    for name in PROFILE_NAMES {
        let dir = data_dir.join(name);
        fs::create_dir(&dir)?;
        save_color_image(&dir.join("incorrect_mask.png"), [128, 128, 128], 48, 64)?;
        save_color_image(&dir.join("mask1.png"), [128, 128, 128], 48, 64)?;
        save_color_image(&dir.join("normal.jpg"), [128, 128, 128], 48, 64)?;
    }

    // entries the scan must skip
    fs::create_dir(data_dir.join(".cache"))?;
    fs::write(data_dir.join("readme.txt"), "fixture")?;
    let first_profile = data_dir.join(PROFILE_NAMES[0]);
    fs::write(first_profile.join("mask1.txt"), "not an image")?;
    save_color_image(&first_profile.join("photo.png"), [10, 20, 30], 48, 64)?;

    Ok(())
}

fn dataset_config(data_dir: &Path) -> DatasetConfig {
    DatasetConfig {
        data_dir: data_dir.to_owned(),
        class_mode: ClassMode::Full,
        val_ratio: Ratio::try_from(0.25).unwrap(),
        split: SplitStrategy::ByImage,
        seed: Some(42),
        gender_overrides: HashMap::new(),
    }
}

fn preprocessor_config() -> PreprocessorConfig {
    PreprocessorConfig {
        resize: [nonzero(32), nonzero(32)],
        center_crop: Some([nonzero(40), nonzero(40)]),
        color_jitter: None,
        horizontal_flip_prob: None,
        gaussian_noise: None,
        stats: None,
        stats_sample_limit: nonzero(100),
        device: Device::Cpu,
    }
}

fn nonzero(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn scan_profile_directories() -> Result<()> {
    let root = TempDir::new()?;
    build_fixture(root.path())?;

    let dataset = ProfileDataset::load(&dataset_config(root.path())).await?;

    assert_eq!(dataset.profiles.len(), 4);
    assert_eq!(dataset.records.len(), 12);
    assert_eq!(dataset.input_channels(), 3);
    assert_eq!(dataset.classes().len(), 18);

    // profiles are listed in name order
    let ids: Vec<_> = dataset
        .profiles
        .iter()
        .map(|profile| profile.id.as_str())
        .collect();
    assert_eq!(ids, ["000001", "000002", "000003", "000004"]);

    // every image is probed for its pixel size
    assert!(dataset
        .records
        .iter()
        .all(|record| record.size.hw() == [48, 64]));

    // the file stem and the profile attributes determine the class
    let class_of = |profile: &str, file: &str| -> i64 {
        dataset
            .records
            .iter()
            .find(|record| {
                record.path.parent().unwrap().file_name().unwrap() == profile
                    && record.path.file_name().unwrap() == file
            })
            .unwrap()
            .class
    };
    assert_eq!(class_of("000001_male_Asian_20", "mask1.png"), 0);
    assert_eq!(class_of("000002_female_Asian_45", "incorrect_mask.png"), 10);
    assert_eq!(class_of("000003_female_Asian_60", "normal.jpg"), 17);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn gender_override_relabels_profile() -> Result<()> {
    let root = TempDir::new()?;
    build_fixture(root.path())?;

    let mut config = dataset_config(root.path());
    config
        .gender_overrides
        .insert("000002".to_owned(), Gender::Male);

    let dataset = ProfileDataset::load(&config).await?;
    let profile = dataset
        .profiles
        .iter()
        .find(|profile| profile.id == "000002")
        .unwrap();
    assert_eq!(profile.gender, Gender::Male);

    // not_worn + male + middle = 2 * 6 + 0 * 3 + 1
    let record = dataset
        .records
        .iter()
        .find(|record| {
            record.profile_index == Some(1) && record.path.file_name().unwrap() == "normal.jpg"
        })
        .unwrap();
    assert_eq!(record.class, 13);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn scan_rejects_bad_data_dirs() -> Result<()> {
    // empty data directory
    let root = TempDir::new()?;
    assert!(ProfileDataset::load(&dataset_config(root.path()))
        .await
        .is_err());

    // malformed profile directory name
    let root = TempDir::new()?;
    build_fixture(root.path())?;
    fs::create_dir(root.path().join("badname"))?;
    assert!(ProfileDataset::load(&dataset_config(root.path()))
        .await
        .is_err());

    // profile directory without a usable image
    let root = TempDir::new()?;
    build_fixture(root.path())?;
    fs::create_dir(root.path().join("000099_male_Asian_33"))?;
    assert!(ProfileDataset::load(&dataset_config(root.path()))
        .await
        .is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn split_by_image_is_exact_and_reproducible() -> Result<()> {
    let root = TempDir::new()?;
    build_fixture(root.path())?;

    let dataset = Arc::new(ProfileDataset::load(&dataset_config(root.path())).await?);

    let split = dataset
        .clone()
        .split(SplitStrategy::ByImage, Ratio::try_from(0.25)?, Some(7))?;
    assert_eq!(split.train.records().len(), 9);
    assert_eq!(split.val.records().len(), 3);

    let train: HashSet<usize> = split.train.indexes().iter().cloned().collect();
    let val: HashSet<usize> = split.val.indexes().iter().cloned().collect();
    assert!(train.is_disjoint(&val));
    assert_eq!(train.len() + val.len(), 12);

    let again = dataset
        .clone()
        .split(SplitStrategy::ByImage, Ratio::try_from(0.25)?, Some(7))?;
    assert_eq!(split.train.indexes(), again.train.indexes());
    assert_eq!(split.val.indexes(), again.val.indexes());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn split_by_profile_keeps_identities_apart() -> Result<()> {
    let root = TempDir::new()?;
    build_fixture(root.path())?;

    let dataset = Arc::new(ProfileDataset::load(&dataset_config(root.path())).await?);

    let split = dataset
        .clone()
        .split(SplitStrategy::ByProfile, Ratio::try_from(0.5)?, Some(3))?;
    assert_eq!(split.train.records().len(), 6);
    assert_eq!(split.val.records().len(), 6);

    let train_profiles: HashSet<_> = split
        .train
        .records()
        .iter()
        .map(|record| record.profile_index)
        .collect();
    let val_profiles: HashSet<_> = split
        .val
        .records()
        .iter()
        .map(|record| record.profile_index)
        .collect();
    assert!(train_profiles.is_disjoint(&val_profiles));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn on_demand_loading_produces_model_inputs() -> Result<()> {
    let root = TempDir::new()?;
    build_fixture(root.path())?;

    let dataset = ProfileDataset::load(&dataset_config(root.path())).await?;
    let stats = ChannelStats {
        mean: [r64(0.5); 3],
        std: [r64(0.25); 3],
    };
    let loader = SampleLoader::new(&preprocessor_config(), &stats, 3)?;
    let dataset = OnDemandDataset::new(dataset, loader)?;

    assert_eq!(dataset.num_records(), 12);

    // the first record is incorrect_mask.png of the first profile
    let record = dataset.nth(0).await?;
    assert_eq!(record.image.size3()?, (3, 32, 32));
    assert_eq!(record.class, 6);

    // solid gray pixels land at (128 / 255 - mean) / std
    let expect = (128.0 / 255.0 - 0.5) / 0.25;
    let diff = f64::from((&record.image - expect).abs().max());
    assert!(diff < 2e-2, "diff {} too large", diff);

    assert!(dataset.nth(100).await.is_err());

    let records: Vec<_> = RandomAccessStream::new(dataset)
        .stream()?
        .try_collect()
        .await?;
    assert_eq!(records.len(), 12);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unlabeled_dataset_reads_listing_file() -> Result<()> {
    let root = TempDir::new()?;
    build_fixture(root.path())?;

    let listing = root.path().join("subset.txt");
    let first = root.path().join(PROFILE_NAMES[0]).join("mask1.png");
    let second = root.path().join(PROFILE_NAMES[1]).join("normal.jpg");
    fs::write(
        &listing,
        format!("{}\n{}\n\n", first.display(), second.display()),
    )?;

    let dataset = UnlabeledDataset::open(&listing, ClassMode::Full).await?;
    assert_eq!(dataset.records.len(), 2);
    assert_eq!(dataset.classes().len(), 18);
    assert!(dataset
        .records
        .iter()
        .all(|record| record.class == -1 && record.attrs.is_none()));

    let loader = SampleLoader::new(&preprocessor_config(), &ChannelStats::default(), 3)?;
    let dataset = OnDemandDataset::new(dataset, loader)?;
    let record = dataset.nth(1).await?;
    assert_eq!(record.class, -1);
    assert_eq!(record.image.size3()?, (3, 32, 32));

    // an empty listing is rejected
    fs::write(&listing, "\n")?;
    assert!(UnlabeledDataset::open(&listing, ClassMode::Full)
        .await
        .is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn channel_stats_match_known_colors() -> Result<()> {
    let root = TempDir::new()?;
    let first = root.path().join("a.png");
    let second = root.path().join("b.png");
    save_color_image(&first, [51, 102, 204], 16, 16)?;
    save_color_image(&second, [153, 102, 0], 16, 16)?;

    let listing = root.path().join("list.txt");
    fs::write(
        &listing,
        format!("{}\n{}\n", first.display(), second.display()),
    )?;
    let dataset = UnlabeledDataset::open(&listing, ClassMode::Full).await?;

    // channel means are (0.2 + 0.6) / 2, (0.4 + 0.4) / 2, (0.8 + 0.0) / 2
    let stats = ChannelStats::compute(&dataset.records, 100).await?;
    assert!(abs_diff_eq!(stats.mean[0].raw(), 0.4, epsilon = 1e-3));
    assert!(abs_diff_eq!(stats.mean[1].raw(), 0.4, epsilon = 1e-3));
    assert!(abs_diff_eq!(stats.mean[2].raw(), 0.4, epsilon = 1e-3));
    assert!(abs_diff_eq!(stats.std[0].raw(), 0.2, epsilon = 1e-3));
    assert!(abs_diff_eq!(stats.std[1].raw(), 0.0, epsilon = 1e-3));
    assert!(abs_diff_eq!(stats.std[2].raw(), 0.4, epsilon = 1e-3));

    // the sample limit caps the scan
    let stats = ChannelStats::compute(&dataset.records, 1).await?;
    assert!(abs_diff_eq!(stats.mean[2].raw(), 0.8, epsilon = 1e-3));

    // configured statistics win over measuring
    let mut config = preprocessor_config();
    config.stats = Some(ChannelStats::default());
    let resolved = ChannelStats::resolve(&config, &dataset.records).await?;
    assert_eq!(resolved, ChannelStats::default());
    Ok(())
}
