use super::*;
use crate::{common::*, config::DatasetConfig, ratio::Ratio, size::PixelSize};
use std::fs;

const IMG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "ppm", "bmp"];

/// The dataset of face images grouped in per-identity profile directories.
///
/// Every direct subdirectory of the data directory is one profile named
/// `<id>_<gender>_<race>_<age>`. The image files inside a profile are
/// labeled by the attributes of the profile plus the mask state encoded
/// in the file stem.
#[derive(Debug, Clone)]
pub struct ProfileDataset {
    pub class_mode: ClassMode,
    pub classes: IndexSet<String>,
    pub profiles: Vec<Arc<Profile>>,
    pub records: Vec<Arc<FileRecord>>,
}

impl GenericDataset for ProfileDataset {
    fn input_channels(&self) -> usize {
        3
    }

    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }
}

impl FileDataset for ProfileDataset {
    fn records(&self) -> &[Arc<FileRecord>] {
        &self.records
    }
}

impl ProfileDataset {
    pub async fn load(config: &DatasetConfig) -> Result<Self> {
        let DatasetConfig {
            data_dir,
            class_mode,
            gender_overrides,
            ..
        } = config;
        let class_mode = *class_mode;

        // list profile directories
        let profiles = {
            let data_dir = data_dir.clone();
            let gender_overrides = gender_overrides.clone();
            tokio::task::spawn_blocking(move || list_profiles(&data_dir, &gender_overrides))
                .await??
        };
        ensure!(
            !profiles.is_empty(),
            "no profile directories found under '{}'",
            data_dir.display()
        );

        // scan image files per profile
        let record_groups: Vec<Vec<Arc<FileRecord>>> =
            stream::iter(profiles.clone().into_iter().enumerate())
                .par_map(None, move |(profile_index, profile)| {
                    move || scan_profile(profile_index, &profile, class_mode)
                })
                .try_collect()
                .await?;
        let records: Vec<_> = record_groups.into_iter().flatten().collect();

        let classes: IndexSet<String> = class_mode.class_names().into_iter().collect();
        info!(
            "found {} image files in {} profiles under '{}'",
            records.len(),
            profiles.len(),
            data_dir.display()
        );

        Ok(Self {
            class_mode,
            classes,
            profiles,
            records,
        })
    }

    /// Partitions the dataset into train and validation subsets.
    pub fn split(
        self: Arc<Self>,
        strategy: SplitStrategy,
        val_ratio: Ratio,
        seed: Option<u64>,
    ) -> Result<TrainValSplit<Self>> {
        TrainValSplit::new(self, strategy, val_ratio, seed)
    }
}

fn list_profiles(
    data_dir: &Path,
    gender_overrides: &HashMap<String, Gender>,
) -> Result<Vec<Arc<Profile>>> {
    let mut entries: Vec<(String, PathBuf)> = fs::read_dir(data_dir)
        .with_context(|| format!("failed to list dataset directory '{}'", data_dir.display()))?
        .map(|result| -> Result<_> {
            let entry = result?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let keep = !name.starts_with('.') && entry.file_type()?.is_dir();
            Ok(keep.then(|| (name, entry.path())))
        })
        .filter_map(|result| result.transpose())
        .try_collect()?;
    entries.sort();

    let profiles: Vec<_> = entries
        .into_iter()
        .map(|(name, dir)| -> Result<_> {
            let (id, gender, age_band) = parse_profile_name(&name)
                .with_context(|| format!("invalid profile directory name '{}'", name))?;
            let gender = match gender_overrides.get(&id) {
                Some(&correct) => {
                    warn!("override gender to {:?} for profile '{}'", correct, id);
                    correct
                }
                None => gender,
            };
            Ok(Arc::new(Profile {
                id,
                gender,
                age_band,
                dir,
            }))
        })
        .try_collect()?;

    Ok(profiles)
}

fn parse_profile_name(name: &str) -> Result<(String, Gender, AgeBand)> {
    let fields: Vec<_> = name.split('_').collect();
    let (id, gender, age) = match fields.as_slice() {
        &[id, gender, _race, age] => (id, gender, age),
        _ => bail!("expect '<id>_<gender>_<race>_<age>', but get '{}'", name),
    };
    let gender: Gender = gender.parse()?;
    let age: u32 = age
        .parse()
        .map_err(|_| format_err!("the age field must be an integer, but get '{}'", age))?;
    Ok((id.to_owned(), gender, AgeBand::from_age(age)))
}

fn scan_profile(
    profile_index: usize,
    profile: &Profile,
    class_mode: ClassMode,
) -> Result<Vec<Arc<FileRecord>>> {
    let mut files: Vec<PathBuf> = fs::read_dir(&profile.dir)
        .with_context(|| {
            format!(
                "failed to list profile directory '{}'",
                profile.dir.display()
            )
        })?
        .map(|result| -> Result<_> {
            let entry = result?;
            let keep = entry.file_type()?.is_file();
            Ok(keep.then(|| entry.path()))
        })
        .filter_map(|result| result.transpose())
        .try_collect()?;
    files.sort();

    let records: Vec<_> = files
        .into_iter()
        .filter_map(|path| {
            // a sample must both have a known stem and an image extension
            let mask = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(MaskState::from_stem)?;
            has_image_extension(&path).then(|| (path, mask))
        })
        .map(|(path, mask)| -> Result<_> {
            let size = {
                let imagesize::ImageSize {
                    height: img_h,
                    width: img_w,
                } = imagesize::size(&path).with_context(|| {
                    format!("failed to probe image file '{}'", path.display())
                })?;
                PixelSize::new(img_h, img_w)?
            };
            let attrs = FaceAttrs {
                mask,
                gender: profile.gender,
                age: profile.age_band,
            };
            let record = FileRecord {
                path,
                size,
                attrs: Some(attrs),
                class: class_mode.encode(attrs) as i64,
                profile_index: Some(profile_index),
            };
            Ok(Arc::new(record))
        })
        .try_collect()?;

    ensure!(
        !records.is_empty(),
        "no usable image files found in profile directory '{}'",
        profile.dir.display()
    );
    Ok(records)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMG_EXTENSIONS.iter().any(|&known| known == ext)
        })
        .unwrap_or(false)
}
