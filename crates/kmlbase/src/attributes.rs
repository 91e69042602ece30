//! Ordered attribute bag.
//!
//! Attributes keep insertion order so that serialized output lists them in
//! the order they were parsed or added.

use indexmap::IndexMap;

/// An ordered set of XML attributes (name → value).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: IndexMap<String, String>,
}

impl Attributes {
    /// Create an empty attribute bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bag from name/value pairs, keeping their order
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut attributes = Self::new();
        for (name, value) in pairs {
            attributes.set_value(name, value);
        }
        attributes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set an attribute. An existing name keeps its position.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Get an attribute value by name
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Remove an attribute and return its value.
    ///
    /// The remaining attributes keep their relative order.
    pub fn cut_value(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    /// Copy every attribute of `other` into this bag, overwriting values of
    /// names already present.
    pub fn merge(&mut self, other: &Attributes) {
        for (name, value) in other.iter() {
            self.set_value(name, value);
        }
    }

    /// Iterate over (name, value) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Attribute names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut attrs = Attributes::new();
        assert!(attrs.is_empty());

        attrs.set_value("id", "pm-1");
        attrs.set_value("targetId", "pm-0");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get_value("id"), Some("pm-1"));
        assert_eq!(attrs.get_value("missing"), None);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut attrs = Attributes::from_pairs([("a", "1"), ("b", "2")]);
        attrs.set_value("a", "3");
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_cut_value_preserves_order() {
        let mut attrs = Attributes::from_pairs([("a", "1"), ("b", "2"), ("c", "3")]);
        assert_eq!(attrs.cut_value("b"), Some("2".to_string()));
        assert_eq!(attrs.cut_value("b"), None);
        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_merge() {
        let mut attrs = Attributes::from_pairs([("a", "1")]);
        attrs.merge(&Attributes::from_pairs([("b", "2"), ("a", "9")]));
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("a", "9"), ("b", "2")]);
    }
}
