//! TimeSeries container for indicator output.

use serde::Serialize;

/// A bar-aligned series of values, typically used for indicator output.
///
/// Always holds exactly one slot per input bar; `None` marks a slot with
/// insufficient history and serializes as `null` (a gap in the rendered line).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries<T> {
    values: Vec<Option<T>>,
}

impl<T> TimeSeries<T> {
    /// Creates a series from per-bar slots.
    pub fn from_options(values: Vec<Option<T>>) -> Self {
        Self { values }
    }

    /// Creates a series of `len` empty slots.
    pub fn empty(len: usize) -> Self {
        let mut values = Vec::with_capacity(len);
        values.resize_with(len, || None);
        Self { values }
    }

    /// Returns the number of slots in this series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this series has no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets the value at the given bar index, if available.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index).and_then(|v| v.as_ref())
    }

    /// Returns an iterator over (index, value) pairs of defined slots.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|val| (i, val)))
    }

    /// Returns the underlying slots.
    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    /// Number of defined slots.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

impl<T: Copy> TimeSeries<T> {
    /// Creates a TimeSeries from a slice of values, all present.
    pub fn from_values(values: &[T]) -> Self {
        Self {
            values: values.iter().copied().map(Some).collect(),
        }
    }

    /// Copy of the value at `index`.
    pub fn value(&self, index: usize) -> Option<T> {
        self.get(index).copied()
    }

    /// Last slot of the series, if defined.
    pub fn last(&self) -> Option<T> {
        self.values.last().copied().flatten()
    }

    /// Combines two aligned series slot by slot; `None` on either side yields `None`.
    pub fn zip_with<U: Copy, R>(
        &self,
        other: &TimeSeries<U>,
        f: impl Fn(T, U) -> R,
    ) -> TimeSeries<R> {
        TimeSeries {
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => Some(f(*a, *b)),
                    _ => None,
                })
                .collect(),
        }
    }
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_len() {
        let s: TimeSeries<f64> = TimeSeries::empty(3);
        assert_eq!(s.len(), 3);
        assert_eq!(s.defined_count(), 0);
        assert_eq!(s.get(1), None);
    }

    #[test]
    fn test_zip_propagates_gaps() {
        let a = TimeSeries::from_options(vec![Some(1.0), None, Some(3.0)]);
        let b = TimeSeries::from_options(vec![Some(1.0), Some(2.0), None]);
        let c = a.zip_with(&b, |x, y| x + y);
        assert_eq!(c.values(), &[Some(2.0), None, None]);
    }

    #[test]
    fn test_iter_skips_gaps() {
        let s = TimeSeries::from_options(vec![None, Some(2.0), Some(4.0)]);
        let collected: Vec<(usize, f64)> = s.iter().map(|(i, v)| (i, *v)).collect();
        assert_eq!(collected, vec![(1, 2.0), (2, 4.0)]);
        assert_eq!(s.last(), Some(4.0));
    }

    #[test]
    fn test_serializes_gaps_as_null() {
        let s = TimeSeries::from_options(vec![None, Some(1.5)]);
        assert_eq!(serde_json::to_string(&s).unwrap(), "[null,1.5]");
    }
}
