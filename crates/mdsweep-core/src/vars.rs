use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One resolved mapping from variable name to value.
///
/// Values are kept as the raw strings from the configuration (or the CLI) and
/// passed to the engine verbatim; the wrapper never interprets them
/// numerically. Insertion order is preserved and is significant for
/// directory naming and log output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSet(IndexMap<String, String>);

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Removes `name`, preserving the relative order of the other entries.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `self` with every entry of `other` layered on top. Entries in
    /// `other` win on name collision; relative order of surviving entries is
    /// preserved.
    pub fn merged(&self, other: &VariableSet) -> VariableSet {
        let mut merged = self.clone();
        for (name, value) in other.iter() {
            merged.insert(name, value);
        }
        merged
    }

    /// Returns every name in `required` that this set does not contain, in
    /// the order they were required. Empty means the set is valid.
    pub fn missing_required(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.0.contains_key(name.as_str()))
            .cloned()
            .collect()
    }
}

impl FromIterator<(String, String)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VariableSet {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, &str)]) -> VariableSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn merged_layers_other_on_top() {
        let statics = set(&[("temp", "300"), ("mu", "-3.0")]);
        let dynamics = set(&[("mu", "-2.5"), ("cps", "1.5")]);

        let merged = statics.merged(&dynamics);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("temp"), Some("300"));
        assert_eq!(merged.get("mu"), Some("-2.5"));
        assert_eq!(merged.get("cps"), Some("1.5"));
    }

    #[test]
    fn merged_with_empty_is_identity() {
        let statics = set(&[("temp", "300")]);
        assert_eq!(statics.merged(&VariableSet::new()), statics);
    }

    #[test]
    fn missing_required_lists_every_absent_name() {
        let vars = set(&[("mu", "-2.5")]);
        let required = vec!["mu".to_string(), "temp".to_string(), "cps".to_string()];

        assert_eq!(
            vars.missing_required(&required),
            vec!["temp".to_string(), "cps".to_string()]
        );
    }

    #[test]
    fn missing_required_is_empty_for_valid_set() {
        let vars = set(&[("mu", "-2.5"), ("temp", "300")]);
        assert!(vars.missing_required(&["mu".to_string()]).is_empty());
    }

    #[test]
    fn json_round_trip_is_identity() {
        let vars = set(&[("mu", "-2.5"), ("temp", "300"), ("cps", "1.5")]);

        let json = serde_json::to_string(&vars).unwrap();
        let back: VariableSet = serde_json::from_str(&json).unwrap();

        assert_eq!(back, vars);
        // Order survives the round trip too.
        let names: Vec<&str> = back.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["mu", "temp", "cps"]);
    }
}
