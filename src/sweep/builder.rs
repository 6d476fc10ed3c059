//! Cartesian-product enumeration of a parameter space.

use super::{ParamValue, ParameterSpace, RunConfig};

/// Pure enumerator turning a [`ParameterSpace`] into the ordered list of
/// every parameter combination.
///
/// Ordering contract: odometer order with the **last-declared** parameter
/// varying fastest. The order is exact and reproducible across calls, so run
/// indices in persisted output are comparable across re-runs of the same
/// space.
#[derive(Debug, Clone, Copy)]
pub struct SweepBuilder;

impl SweepBuilder {
    /// Enumerate the full Cartesian product of `space`.
    ///
    /// Any parameter declared with an empty value list makes the result empty
    /// (nothing to do, not an error). A space with zero declared parameters
    /// yields a single empty config, the product identity.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrido::sweep::{ParameterSpace, SweepBuilder};
    ///
    /// let space = ParameterSpace::new()
    ///     .parameter("a", [1, 2])
    ///     .parameter("b", [10, 20]);
    /// let runs = SweepBuilder::enumerate(&space);
    ///
    /// assert_eq!(runs.len(), 4);
    /// // `b` was declared last, so it varies fastest.
    /// assert_eq!(runs[0].get("b").and_then(|v| v.as_int()), Some(10));
    /// assert_eq!(runs[1].get("b").and_then(|v| v.as_int()), Some(20));
    /// assert_eq!(runs[1].get("a").and_then(|v| v.as_int()), Some(1));
    /// ```
    #[must_use]
    pub fn enumerate(space: &ParameterSpace) -> Vec<RunConfig> {
        let mut partials: Vec<Vec<(String, ParamValue)>> = vec![Vec::new()];
        for (name, values) in space.entries() {
            let mut grown = Vec::with_capacity(partials.len().saturating_mul(values.len()));
            for partial in &partials {
                for value in values {
                    let mut assignment = partial.clone();
                    assignment.push((name.clone(), value.clone()));
                    grown.push(assignment);
                }
            }
            partials = grown;
        }
        partials.into_iter().map(RunConfig::from_entries).collect()
    }
}
