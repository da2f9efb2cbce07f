use indexmap::IndexMap;
use methodcheck_types::{ParamValue, UnsupportedValue};
use serde_json::{Map as JsonMap, Value};

/// One supplied argument after boundary conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum SuppliedValue {
    Value(ParamValue),
    /// The key was given with a JSON `null`. It does not count as supplied,
    /// but the key still takes part in the unknown-parameter check.
    Absent,
    /// The caller supplied something no parameter can accept (e.g., a
    /// boolean). Reported as a value error on that parameter.
    Unsupported(UnsupportedValue),
}

/// Named arguments supplied for one method invocation, in caller order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: IndexMap<String, SuppliedValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(id.into(), SuppliedValue::Value(value.into()));
    }

    /// Converts a JSON object of arguments. `null` members become
    /// [`SuppliedValue::Absent`]; other unsupported kinds are kept so they
    /// can be reported.
    pub fn from_json_map(map: &JsonMap<String, Value>) -> Self {
        let entries = map
            .iter()
            .map(|(id, value)| {
                let supplied = match value {
                    Value::Null => SuppliedValue::Absent,
                    value => match ParamValue::from_json(value) {
                        Ok(value) => SuppliedValue::Value(value),
                        Err(unsupported) => SuppliedValue::Unsupported(unsupported),
                    },
                };
                (id.clone(), supplied)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&SuppliedValue> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether `id` carries a non-empty value.
    pub fn is_supplied(&self, id: &str) -> bool {
        match self.entries.get(id) {
            Some(SuppliedValue::Value(value)) => !value.is_empty(),
            Some(SuppliedValue::Unsupported(_)) => true,
            Some(SuppliedValue::Absent) | None => false,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = Self::new();
        for (id, value) in iter {
            arguments.insert(id, value);
        }
        arguments
    }
}
