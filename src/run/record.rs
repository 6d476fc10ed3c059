//! Immutable per-epoch result snapshot.

use crate::sweep::ParamValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One history row summarizing a single (run, epoch) pair.
///
/// Field order is part of the persistence contract: `run`, `epoch`, `loss`,
/// `accuracy`, `epoch_duration`, `run_duration`, then every sweep parameter
/// in declaration order. `Serialize` is written by hand to pin that order;
/// a derived map would not keep the flattened parameters behind the fixed
/// columns. Records are never mutated after append.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    run: u32,
    epoch: u32,
    loss: f64,
    accuracy: f64,
    epoch_duration: f64,
    run_duration: f64,
    params: Vec<(String, ParamValue)>,
}

impl RunRecord {
    /// Assemble a record. Durations are in seconds.
    #[must_use]
    pub const fn new(
        run: u32,
        epoch: u32,
        loss: f64,
        accuracy: f64,
        epoch_duration: f64,
        run_duration: f64,
        params: Vec<(String, ParamValue)>,
    ) -> Self {
        Self {
            run,
            epoch,
            loss,
            accuracy,
            epoch_duration,
            run_duration,
            params,
        }
    }

    /// Run index (1-based, monotonic across the sweep).
    #[must_use]
    pub const fn run(&self) -> u32 {
        self.run
    }

    /// Epoch index (1-based within its run).
    #[must_use]
    pub const fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Dataset-weighted mean loss for the epoch.
    #[must_use]
    pub const fn loss(&self) -> f64 {
        self.loss
    }

    /// Fraction of correctly predicted examples.
    #[must_use]
    pub const fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Seconds spent in this epoch.
    #[must_use]
    pub const fn epoch_duration(&self) -> f64 {
        self.epoch_duration
    }

    /// Seconds since the run began, measured at epoch end.
    #[must_use]
    pub const fn run_duration(&self) -> f64 {
        self.run_duration
    }

    /// Flattened sweep parameters, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[(String, ParamValue)] {
        &self.params
    }

    /// Value of one sweep parameter, if the record carries it.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }
}

impl Serialize for RunRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(6 + self.params.len()))?;
        map.serialize_entry("run", &self.run)?;
        map.serialize_entry("epoch", &self.epoch)?;
        map.serialize_entry("loss", &self.loss)?;
        map.serialize_entry("accuracy", &self.accuracy)?;
        map.serialize_entry("epoch_duration", &self.epoch_duration)?;
        map.serialize_entry("run_duration", &self.run_duration)?;
        for (name, value) in &self.params {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> RunRecord {
        RunRecord::new(
            2,
            3,
            0.25,
            0.875,
            1.5,
            4.5,
            vec![
                ("lr".into(), ParamValue::Float(0.01)),
                ("batch_size".into(), ParamValue::Int(100)),
            ],
        )
    }

    #[test]
    fn test_getters() {
        let record = sample_record();
        assert_eq!(record.run(), 2);
        assert_eq!(record.epoch(), 3);
        assert!((record.loss() - 0.25).abs() < f64::EPSILON);
        assert!((record.accuracy() - 0.875).abs() < f64::EPSILON);
        assert!((record.epoch_duration() - 1.5).abs() < f64::EPSILON);
        assert!((record.run_duration() - 4.5).abs() < f64::EPSILON);
        assert_eq!(record.param("lr"), Some(&ParamValue::Float(0.01)));
        assert_eq!(record.param("missing"), None);
        assert_eq!(record.params().len(), 2);
    }

    #[test]
    fn test_serialized_field_order_is_pinned() {
        let json = serde_json::to_string(&sample_record()).expect("serialization failed");
        assert_eq!(
            json,
            r#"{"run":2,"epoch":3,"loss":0.25,"accuracy":0.875,"epoch_duration":1.5,"run_duration":4.5,"lr":0.01,"batch_size":100}"#
        );
    }
}
