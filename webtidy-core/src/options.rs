//! Key/value option accumulation.
//!
//! Options are gathered through a chainable builder and frozen into an
//! ordered [`OptionMap`] snapshot. Insertion order is preserved, so
//! serialized output lists options in the order they were first added.

use serde::ser::{Serialize, SerializeMap, Serializer};
use webtidy_types::OptionValue;

/// Chainable accumulator for named option values.
///
/// The value type defaults to [`OptionValue`]; narrower instantiations
/// are possible, and [`StringOptionBuilder`] wraps the string-only one.
///
/// ```
/// use webtidy_core::options::OptionBuilder;
///
/// let builder: OptionBuilder = OptionBuilder::new();
/// let map = builder.add("deflate", true).add("compressionFactor", 10).build();
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct OptionBuilder<V = OptionValue> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OptionBuilder<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OptionBuilder<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option, overwriting any existing value under the same name.
    ///
    /// Overwriting keeps the name at its original position.
    pub fn add(mut self, name: impl Into<String>, value: impl Into<V>) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value.into(),
            None => self.entries.push((name, value.into())),
        }
        self
    }

    /// Whether an option with this name has been added.
    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// Freeze the current entries into an ordered snapshot.
    ///
    /// Later additions do not affect snapshots taken earlier.
    pub fn build(&self) -> OptionMap<V>
    where
        V: Clone,
    {
        OptionMap {
            entries: self.entries.clone(),
        }
    }
}

/// String-only option accumulator with a non-overwriting `safe_add`.
///
/// Once a name is present, `safe_add` leaves its value alone, which
/// makes it safe to layer fallback values under options that may
/// already have been set.
#[derive(Debug, Clone, Default)]
pub struct StringOptionBuilder {
    inner: OptionBuilder<String>,
}

impl StringOptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option, overwriting any existing value under the same name.
    pub fn add(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            inner: self.inner.add(name, value),
        }
    }

    /// Add an option only if the name is not already present.
    pub fn safe_add(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if self.inner.has(&name) {
            self
        } else {
            self.add(name, value)
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.has(name)
    }

    pub fn build(&self) -> OptionMap<String> {
        self.inner.build()
    }
}

/// Ordered, immutable snapshot of accumulated options.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionMap<V = OptionValue> {
    entries: Vec<(String, V)>,
}

impl<V> OptionMap<V> {
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> IntoIterator for OptionMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for OptionMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
