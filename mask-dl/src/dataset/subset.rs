use super::*;
use crate::common::*;

/// The dataset that exposes a subset of another dataset's records.
#[derive(Debug)]
pub struct SubsetDataset<D>
where
    D: FileDataset,
{
    dataset: Arc<D>,
    indexes: Vec<usize>,
    records: Vec<Arc<FileRecord>>,
}

impl<D> SubsetDataset<D>
where
    D: FileDataset,
{
    pub fn new(dataset: Arc<D>, indexes: Vec<usize>) -> Result<Self> {
        let source = dataset.records();

        let unique: HashSet<_> = indexes.iter().cloned().collect();
        ensure!(
            unique.len() == indexes.len(),
            "duplicated record indexes are not allowed"
        );

        let records: Vec<_> = indexes
            .iter()
            .map(|&index| -> Result<_> {
                let record = source
                    .get(index)
                    .ok_or_else(|| format_err!("invalid record index {}", index))?;
                Ok(record.clone())
            })
            .try_collect()?;

        Ok(Self {
            dataset,
            indexes,
            records,
        })
    }

    /// The record indexes into the source dataset.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }
}

impl<D> GenericDataset for SubsetDataset<D>
where
    D: FileDataset,
{
    fn input_channels(&self) -> usize {
        self.dataset.input_channels()
    }

    fn classes(&self) -> &IndexSet<String> {
        self.dataset.classes()
    }
}

impl<D> FileDataset for SubsetDataset<D>
where
    D: FileDataset,
{
    fn records(&self) -> &[Arc<FileRecord>] {
        &self.records
    }
}
