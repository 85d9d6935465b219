use super::*;
use crate::{common::*, size::PixelSize};

/// The dataset of bare image files without ground truth labels.
///
/// Its records yield the class id `-1`. The class names of the given
/// [ClassMode] are kept, so the dataset still knows the label space it
/// is classified into.
#[derive(Debug, Clone)]
pub struct UnlabeledDataset {
    pub classes: IndexSet<String>,
    pub records: Vec<Arc<FileRecord>>,
}

impl GenericDataset for UnlabeledDataset {
    fn input_channels(&self) -> usize {
        3
    }

    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }
}

impl FileDataset for UnlabeledDataset {
    fn records(&self) -> &[Arc<FileRecord>] {
        &self.records
    }
}

impl UnlabeledDataset {
    /// Loads the dataset from an explicit list of image paths.
    pub async fn load(paths: Vec<PathBuf>, class_mode: ClassMode) -> Result<Self> {
        ensure!(!paths.is_empty(), "the image path list must not be empty");

        let records: Vec<Arc<FileRecord>> = stream::iter(paths)
            .par_map(None, |path| {
                move || -> Result<_> {
                    let size = {
                        let imagesize::ImageSize {
                            height: img_h,
                            width: img_w,
                        } = imagesize::size(&path).with_context(|| {
                            format!("failed to probe image file '{}'", path.display())
                        })?;
                        PixelSize::new(img_h, img_w)?
                    };

                    Ok(Arc::new(FileRecord {
                        path,
                        size,
                        attrs: None,
                        class: -1,
                        profile_index: None,
                    }))
                }
            })
            .try_collect()
            .await?;

        let classes: IndexSet<String> = class_mode.class_names().into_iter().collect();
        info!("found {} unlabeled image files", records.len());

        Ok(Self { classes, records })
    }

    /// Loads the dataset from a newline separated listing file.
    pub async fn open(listing_file: impl AsRef<Path>, class_mode: ClassMode) -> Result<Self> {
        let paths = load_listing_file(listing_file).await?;
        Self::load(paths, class_mode).await
    }
}
