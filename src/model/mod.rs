//! Model introspection seam.
//!
//! The run manager never trains or evaluates a model; it only inspects one
//! for diagnostics: a structural snapshot when a run starts and parameter
//! distribution snapshots at the end of every epoch. Training frameworks
//! adapt to this seam by implementing [`ModelProbe`] on their model wrapper.

/// Read-only diagnostic view of a model.
pub trait ModelProbe {
    /// Human-readable structural snapshot (layer listing or summary),
    /// emitted to telemetry once per run.
    fn describe(&self) -> String;

    /// Snapshot every trainable parameter, with gradients where present.
    /// Called at the end of each epoch; expected to be cheap relative to an
    /// epoch of training.
    fn parameters(&self) -> Vec<ParameterSnapshot>;
}

/// Point-in-time copy of one trainable parameter tensor, flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSnapshot {
    name: String,
    values: Vec<f32>,
    gradients: Option<Vec<f32>>,
}

impl ParameterSnapshot {
    /// Snapshot without gradient data (e.g. before the first backward pass).
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            values,
            gradients: None,
        }
    }

    /// Attach the parameter's gradient tensor.
    #[must_use]
    pub fn with_gradients(mut self, gradients: Vec<f32>) -> Self {
        self.gradients = Some(gradients);
        self
    }

    /// Parameter name as registered by the model.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flattened parameter values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Flattened gradient values, when the parameter has them.
    #[must_use]
    pub fn gradients(&self) -> Option<&[f32]> {
        self.gradients.as_deref()
    }
}
