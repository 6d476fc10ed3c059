//! One enumerated parameter combination.

use super::ParamValue;
use std::fmt;

/// One immutable combination: every declared parameter bound to exactly one
/// value, in declaration order.
///
/// Configs are normally produced by
/// [`SweepBuilder::enumerate`](super::SweepBuilder::enumerate); the
/// [`from_pairs`](Self::from_pairs) constructor covers ad-hoc single runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    entries: Vec<(String, ParamValue)>,
}

impl RunConfig {
    /// Build a config directly from name/value pairs.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<ParamValue>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    pub(crate) fn from_entries(entries: Vec<(String, ParamValue)>) -> Self {
        Self { entries }
    }

    /// Value bound to `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Bound names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Name/value pairs, in declaration order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, ParamValue)] {
        &self.entries
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the config binds no parameters (the empty-space case).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deterministic human-readable encoding, used for telemetry session labels:
/// `lr=0.01-batch_size=1000`; the empty config displays as `default`.
impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("default");
        }
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
