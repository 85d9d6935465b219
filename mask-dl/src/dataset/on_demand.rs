use super::*;
use crate::{common::*, processor::SampleLoader};

/// The dataset that loads and preprocesses images on access.
#[derive(Debug)]
pub struct OnDemandDataset<D>
where
    D: FileDataset,
{
    loader: Arc<SampleLoader>,
    dataset: D,
}

impl<D> OnDemandDataset<D>
where
    D: FileDataset,
{
    pub fn new(dataset: D, loader: SampleLoader) -> Result<Self> {
        ensure!(
            dataset.input_channels() == loader.image_channels(),
            "the dataset has {} channels, but the loader expects {}",
            dataset.input_channels(),
            loader.image_channels()
        );

        Ok(Self {
            loader: Arc::new(loader),
            dataset,
        })
    }
}

impl<D> GenericDataset for OnDemandDataset<D>
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

impl<D> RandomAccessDataset for OnDemandDataset<D>
where
    D: FileDataset,
{
    fn num_records(&self) -> usize {
        self.dataset.records().len()
    }

    fn nth(&self, index: usize) -> Pin<Box<dyn Future<Output = Result<DataRecord>> + Send>> {
        let record = self.dataset.records().get(index).cloned();
        let loader = self.loader.clone();

        Box::pin(async move {
            let record = record.ok_or_else(|| format_err!("invalid index {}", index))?;

            let image = loader
                .load(&record.path, &record.size)
                .await
                .with_context(|| {
                    format!("failed to load image file {}", record.path.display())
                })?;

            Ok(DataRecord {
                image,
                class: record.class,
            })
        })
    }
}
