//! Script-local name bindings for one run.

use indexmap::IndexMap;

use crate::value::Value;

/// A named value visible to later statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

/// All bindings of a single script execution.
///
/// Writes to an existing name replace its value but keep the slot of
/// its first definition, so snapshots stay in definition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: IndexMap<String, Value>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bind `name`, returning the value it replaced.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Current bindings in order of first definition.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Binding> {
        self.bindings
            .iter()
            .map(|(name, value)| Binding {
                name: name.clone(),
                value: value.clone(),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}
