//! Data-source seam and an in-memory reference implementation.
//!
//! The manager only ever observes a data source through three calls: the
//! total example count (the denominator for epoch means), the nominal batch
//! size, and an ordered batch stream. Whatever parallelism a real loader has
//! internally stays invisible behind this seam.

/// One (inputs, labels) batch handed to the training step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Per-example feature vectors, flattened.
    pub inputs: Vec<Vec<f32>>,
    /// Per-example ground-truth class indices.
    pub labels: Vec<usize>,
}

impl Batch {
    /// Number of examples in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the batch holds no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// What one training step hands back for metric tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Per-example class scores (one vector per example).
    pub predictions: Vec<Vec<f32>>,
    /// Batch-mean loss.
    pub loss: f64,
}

/// Batched, repeatable view over a dataset.
pub trait DataSource {
    /// Total example count. Must be positive for a run to begin; it is the
    /// denominator for epoch mean loss and accuracy.
    fn dataset_size(&self) -> usize;

    /// Nominal batch size (the final batch of an epoch may be smaller).
    fn batch_size(&self) -> usize;

    /// Stream one epoch's batches, in order.
    fn batches(&self) -> Box<dyn Iterator<Item = Batch> + '_>;
}

/// Dataset held fully in memory, chunked into fixed-size batches with a
/// ragged tail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    inputs: Vec<Vec<f32>>,
    labels: Vec<usize>,
    batch_size: usize,
}

impl InMemoryDataSource {
    /// Wrap `samples` of (feature vector, class index) pairs. A `batch_size`
    /// of zero is clamped to one.
    #[must_use]
    pub fn new(samples: Vec<(Vec<f32>, usize)>, batch_size: usize) -> Self {
        let (inputs, labels) = samples.into_iter().unzip();
        Self {
            inputs,
            labels,
            batch_size: batch_size.max(1),
        }
    }
}

impl DataSource for InMemoryDataSource {
    fn dataset_size(&self) -> usize {
        self.labels.len()
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn batches(&self) -> Box<dyn Iterator<Item = Batch> + '_> {
        Box::new(
            self.inputs
                .chunks(self.batch_size)
                .zip(self.labels.chunks(self.batch_size))
                .map(|(inputs, labels)| Batch {
                    inputs: inputs.to_vec(),
                    labels: labels.to_vec(),
                }),
        )
    }
}
