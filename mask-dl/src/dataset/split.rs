use super::*;
use crate::{common::*, ratio::Ratio};

/// The strategy that partitions a dataset into train and validation
/// subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Samples validation records uniformly over images.
    ByImage,
    /// Samples whole profiles, so that no identity contributes images
    /// to both subsets.
    ByProfile,
}

/// The train and validation subsets produced by a split.
#[derive(Debug)]
pub struct TrainValSplit<D>
where
    D: FileDataset,
{
    pub train: SubsetDataset<D>,
    pub val: SubsetDataset<D>,
}

impl<D> TrainValSplit<D>
where
    D: FileDataset,
{
    /// Partitions `dataset` according to `strategy`.
    ///
    /// The number of validation records is `floor(n * val_ratio)` over
    /// images or profiles respectively. A fixed `seed` makes the split
    /// reproducible.
    pub fn new(
        dataset: Arc<D>,
        strategy: SplitStrategy,
        val_ratio: Ratio,
        seed: Option<u64>,
    ) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (train_indexes, val_indexes) = match strategy {
            SplitStrategy::ByImage => {
                split_by_image(dataset.records().len(), val_ratio, &mut rng)
            }
            SplitStrategy::ByProfile => {
                let profile_indexes: Vec<usize> = dataset
                    .records()
                    .iter()
                    .map(|record| {
                        record.profile_index.ok_or_else(|| {
                            format_err!(
                                "cannot split by profile: record '{}' does not belong to a profile",
                                record.path.display()
                            )
                        })
                    })
                    .try_collect()?;
                split_by_profile(&profile_indexes, val_ratio, &mut rng)
            }
        };

        let train = SubsetDataset::new(dataset.clone(), train_indexes)?;
        let val = SubsetDataset::new(dataset, val_indexes)?;

        info!(
            "split {} records into {} train and {} val",
            train.records().len() + val.records().len(),
            train.records().len(),
            val.records().len()
        );

        Ok(Self { train, val })
    }
}

fn split_by_image(
    num_records: usize,
    val_ratio: Ratio,
    rng: &mut impl Rng,
) -> (Vec<usize>, Vec<usize>) {
    let num_val = (num_records as f64 * val_ratio.to_f64()) as usize;
    let num_train = num_records - num_val;

    let mut indexes: Vec<usize> = (0..num_records).collect();
    indexes.shuffle(rng);

    let mut val_indexes = indexes.split_off(num_train);
    let mut train_indexes = indexes;
    train_indexes.sort_unstable();
    val_indexes.sort_unstable();

    (train_indexes, val_indexes)
}

fn split_by_profile(
    profile_indexes: &[usize],
    val_ratio: Ratio,
    rng: &mut impl Rng,
) -> (Vec<usize>, Vec<usize>) {
    let mut profiles: Vec<usize> = profile_indexes.iter().cloned().unique().collect();
    profiles.sort_unstable();

    let num_val_profiles = (profiles.len() as f64 * val_ratio.to_f64()) as usize;
    profiles.shuffle(rng);
    let val_profiles: HashSet<usize> = profiles.into_iter().take(num_val_profiles).collect();

    let (val_indexes, train_indexes): (Vec<_>, Vec<_>) = (0..profile_indexes.len())
        .partition(|&index| val_profiles.contains(&profile_indexes[index]));

    (train_indexes, val_indexes)
}
