//! Declarative hyperparameter grid.

use super::ParamValue;

/// Ordered mapping from parameter name to its candidate values.
///
/// Declaration order is semantic: enumeration varies the last-declared
/// parameter fastest, so two spaces with the same pairs declared in a
/// different order enumerate to differently ordered sweeps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSpace {
    entries: Vec<(String, Vec<ParamValue>)>,
}

impl ParameterSpace {
    /// Create an empty space.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Declare a parameter with its candidate values.
    ///
    /// Re-declaring an existing name replaces its values in place, keeping
    /// the original declaration position. An empty value list is legal and
    /// makes the whole enumeration empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrido::sweep::ParameterSpace;
    ///
    /// let space = ParameterSpace::new()
    ///     .parameter("lr", [0.01, 0.001])
    ///     .parameter("shuffle", [true, false]);
    /// assert_eq!(space.combination_count(), 4);
    /// ```
    #[must_use]
    pub fn parameter<N, I, V>(mut self, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        let name = name.into();
        let values: Vec<ParamValue> = values.into_iter().map(Into::into).collect();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = values;
        } else {
            self.entries.push((name, values));
        }
        self
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no parameter has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Candidate values declared for `name`.
    #[must_use]
    pub fn values(&self, name: &str) -> Option<&[ParamValue]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Number of combinations the space enumerates to (the product of the
    /// value-list lengths; `1` for an empty space, `0` once any list is
    /// empty).
    #[must_use]
    pub fn combination_count(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).product()
    }

    pub(crate) fn entries(&self) -> &[(String, Vec<ParamValue>)] {
        &self.entries
    }
}
