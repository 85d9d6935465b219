use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use mask_dl::{
    config::Config,
    dataset::{FileDataset, FileRecord, ProfileDataset},
    stats::ChannelStats,
};
use prettytable::{cell, row, Table};
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use structopt::StructOpt;

pub const FILE_STRFTIME: &str = "%Y-%m-%d-%H-%M-%S.%3f%z";

#[derive(Debug, Clone, StructOpt)]
/// Scan, measure and split face attribute datasets.
enum Args {
    /// Scans the dataset and prints the class distribution.
    Scan {
        /// configuration file
        #[structopt(long, default_value = "mask.json5")]
        config_file: PathBuf,
    },
    /// Measures per-channel statistics over the dataset images.
    Stats {
        /// configuration file
        #[structopt(long, default_value = "mask.json5")]
        config_file: PathBuf,
    },
    /// Partitions the dataset and saves the train/val manifests.
    Split {
        /// configuration file
        #[structopt(long, default_value = "mask.json5")]
        config_file: PathBuf,
        /// output directory
        #[structopt(long, default_value = "output")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
pub async fn main() -> Result<()> {
    pretty_env_logger::init();

    match Args::from_args() {
        Args::Scan { config_file } => scan(config_file).await?,
        Args::Stats { config_file } => stats(config_file).await?,
        Args::Split {
            config_file,
            output_dir,
        } => split(config_file, output_dir).await?,
    }

    Ok(())
}

async fn scan(config_file: impl AsRef<Path>) -> Result<()> {
    let config = load_config(config_file)?;
    let dataset = ProfileDataset::load(&config.dataset).await?;
    let class_mode = config.dataset.class_mode;

    let mut counts = vec![0usize; class_mode.num_classes()];
    dataset.records().iter().for_each(|record| {
        counts[record.class as usize] += 1;
    });
    let total = dataset.records().len();

    // print class distribution
    {
        let mut table = Table::new();
        table.add_row(row![
            "class", "name", "mask", "gender", "age", "images", "share"
        ]);

        for (class, &count) in counts.iter().enumerate() {
            let attrs = class_mode.decode(class as u32)?;
            table.add_row(row![
                class,
                class_mode.class_name(class as u32)?,
                attrs.mask.map(|val| val.as_str()).unwrap_or("-"),
                attrs.gender.map(|val| val.as_str()).unwrap_or("-"),
                attrs.age.map(|val| val.as_str()).unwrap_or("-"),
                count,
                format!("{:.1}%", count as f64 * 100.0 / total as f64),
            ]);
        }

        table.printstd();
    }

    // print profile summary
    {
        let mut table = Table::new();
        table.add_row(row!["profile", "gender", "age band", "images"]);

        dataset
            .profiles
            .iter()
            .enumerate()
            .for_each(|(index, profile)| {
                let num_images = dataset
                    .records()
                    .iter()
                    .filter(|record| record.profile_index == Some(index))
                    .count();
                table.add_row(row![
                    profile.id,
                    profile.gender.as_str(),
                    profile.age_band.as_str(),
                    num_images,
                ]);
            });

        table.printstd();
    }

    Ok(())
}

async fn stats(config_file: impl AsRef<Path>) -> Result<()> {
    let config = load_config(config_file)?;
    let dataset = ProfileDataset::load(&config.dataset).await?;

    let stats = ChannelStats::compute(
        dataset.records(),
        config.preprocessor.stats_sample_limit.get(),
    )
    .await?;

    let text = serde_json::to_string_pretty(&stats)?;
    println!("{}", text);
    Ok(())
}

async fn split(config_file: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<()> {
    let config = load_config(config_file)?;
    let dataset = Arc::new(ProfileDataset::load(&config.dataset).await?);

    let split = dataset.clone().split(
        config.dataset.split,
        config.dataset.val_ratio,
        config.dataset.seed,
    )?;

    let session_dir = output_dir
        .as_ref()
        .join(format!("{}", Local::now().format(FILE_STRFTIME)));
    tokio::fs::create_dir_all(&session_dir).await?;

    // save the config snapshot
    {
        let path = session_dir.join("config.json5");
        let text = serde_json::to_string_pretty(&config)?;
        tokio::fs::write(&path, text).await?;
    }

    write_manifest(&session_dir.join("train.json"), split.train.records()).await?;
    write_manifest(&session_dir.join("val.json"), split.val.records()).await?;

    info!("saved dataset manifests under '{}'", session_dir.display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    path: &'a Path,
    class: i64,
}

async fn write_manifest(path: &Path, records: &[Arc<FileRecord>]) -> Result<()> {
    let entries: Vec<_> = records
        .iter()
        .map(|record| ManifestEntry {
            path: &record.path,
            class: record.class,
        })
        .collect();
    let text = serde_json::to_string_pretty(&entries)?;
    tokio::fs::write(path, text).await?;
    Ok(())
}

fn load_config(config_file: impl AsRef<Path>) -> Result<Config> {
    let config_file = config_file.as_ref();
    Config::open(config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))
}
