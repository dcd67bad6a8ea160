//! Typed extraction from an untyped TOML table
//!
//! Every accessor removes the key it reads, so once the known keys of a level
//! have been taken, whatever is left over is the next nesting level down.

use toml::Value;

use super::error::ConfigError;

/// A TOML value kind that can be taken out of a [`ConfigTable`]
pub trait ConfigValue: Sized {
    /// Human readable expectation used in type errors
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

impl ConfigValue for String {
    const EXPECTED: &'static str = "a string";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl ConfigValue for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl ConfigValue for u64 {
    const EXPECTED: &'static str = "a non-negative integer";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => u64::try_from(i).ok(),
            _ => None,
        }
    }
}

impl ConfigValue for u32 {
    const EXPECTED: &'static str = "an integer between 0 and 4294967295";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => u32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl ConfigValue for f64 {
    const EXPECTED: &'static str = "a float";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }
}

impl ConfigValue for toml::Table {
    const EXPECTED: &'static str = "a table";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// One level of the configuration tree, consumed key by key
#[derive(Debug, Clone)]
pub struct ConfigTable {
    context: String,
    entries: Vec<(String, Value)>,
}

impl ConfigTable {
    /// Wrap `table`; `context` names the level in error messages, e.g. `experiment 'E'`
    pub fn new(context: impl Into<String>, table: toml::Table) -> Self {
        Self {
            context: context.into(),
            entries: table.into_iter().collect(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Remove `key`, which must be present and of type `T`
    pub fn take<T: ConfigValue>(&mut self, key: &str) -> Result<T, ConfigError> {
        let value = self.remove(key).ok_or_else(|| self.missing(key))?;
        self.convert(key, value)
    }

    /// Remove `key`, which must be an array whose elements are all of type `T`
    pub fn take_list<T: ConfigValue>(&mut self, key: &str) -> Result<Vec<T>, ConfigError> {
        let value = self.remove(key).ok_or_else(|| self.missing(key))?;
        let found = value.type_str();
        let Value::Array(items) = value else {
            return Err(self.wrong_type(key, "an array", found));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.convert(&format!("{key}[{index}]"), item))
            .collect()
    }

    /// Like [`take`](Self::take), but absent keys yield `default`
    pub fn take_or<T: ConfigValue>(&mut self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.remove(key) {
            Some(value) => self.convert(key, value),
            None => Ok(default),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Leftover entries in document order
    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }

    /// An [`ConfigError::InvalidValue`] for `key` at this level
    pub fn invalid(&self, key: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidValue {
            key: key.to_string(),
            context: self.context.clone(),
            reason: reason.into(),
        }
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    fn convert<T: ConfigValue>(&self, key: &str, value: Value) -> Result<T, ConfigError> {
        let found = value.type_str();
        T::from_value(value).ok_or_else(|| self.wrong_type(key, T::EXPECTED, found))
    }

    fn missing(&self, key: &str) -> ConfigError {
        ConfigError::MissingKey {
            key: key.to_string(),
            context: self.context.clone(),
        }
    }

    fn wrong_type(&self, key: &str, expected: &str, found: &str) -> ConfigError {
        ConfigError::WrongType {
            key: key.to_string(),
            context: self.context.clone(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(content: &str) -> ConfigTable {
        ConfigTable::new("experiment 'E'", toml::from_str(content).unwrap())
    }

    #[test]
    fn test_take_removes_key() {
        let mut t = table("graphs = 'g'\ntimeout = 5");
        let graphs: String = t.take("graphs").unwrap();
        assert_eq!(graphs, "g");
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["timeout"]);
    }

    #[test]
    fn test_take_missing_key() {
        let mut t = table("timeout = 5");
        let err = t.take::<String>("graphs").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "graphs"));
        assert_eq!(
            err.to_string(),
            "Missing required key 'graphs' in experiment 'E'"
        );
    }

    #[test]
    fn test_take_wrong_type() {
        let mut t = table("graphs = 3");
        let err = t.take::<String>("graphs").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Key 'graphs' in experiment 'E' has the wrong type: expected a string, found integer"
        );
    }

    #[test]
    fn test_take_list_reports_offending_element() {
        let mut t = table("ks = [2, 'four']");
        let err = t.take_list::<u32>("ks").unwrap_err();
        assert!(matches!(err, ConfigError::WrongType { ref key, .. } if key == "ks[1]"));
    }

    #[test]
    fn test_take_list_requires_array() {
        let mut t = table("ks = 2");
        let err = t.take_list::<u32>("ks").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WrongType { ref expected, .. } if expected == "an array"
        ));
    }

    #[test]
    fn test_floats_do_not_accept_integers() {
        let mut t = table("epsilons = [0.03, 1]");
        assert!(t.take_list::<f64>("epsilons").is_err());
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let mut t = table("seeds = [-1]");
        assert!(t.take_list::<u64>("seeds").is_err());
    }

    #[test]
    fn test_take_or_default_and_type_check() {
        let mut t = table("timeout = 'soon'");
        assert_eq!(t.take_or::<String>("branch", "main".to_string()).unwrap(), "main");
        assert!(t.take_or::<u64>("timeout", 0).is_err());
    }

    #[test]
    fn test_into_entries_preserves_document_order() {
        let t = table("graphs = 'g'\n[zeta]\nx = 1\n[alpha]\nx = 2\n[mid]\nx = 3");
        let keys: Vec<String> = t.into_entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["graphs", "zeta", "alpha", "mid"]);
    }
}
