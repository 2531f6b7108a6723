use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// One row of variable bindings, as produced by pattern matching.
///
/// Names are `?`-prefixed and case-sensitive. The row is read-only for the
/// engine and owned by the caller; `None` covers both "variable absent" and
/// "variable bound to nothing".
pub trait BindingRow {
    /// The lexical string bound to a variable name, or `None` if unbound.
    fn lexical_value(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> BindingRow for HashMap<String, String, S> {
    fn lexical_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<S: BuildHasher> BindingRow for HashMap<String, Option<String>, S> {
    fn lexical_value(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_deref()
    }
}

impl<R: BindingRow> BindingRow for &R {
    fn lexical_value(&self, name: &str) -> Option<&str> {
        (*self).lexical_value(name)
    }
}

/// An owned binding row.
#[derive(Debug, Clone, Default)]
pub struct VariableBindings {
    values: FxHashMap<String, Option<String>>,
}

impl VariableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable, normalizing the name to its `?`-prefixed form.
    ///
    /// Passing `None` records the variable as explicitly unbound.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Option<String>>) {
        let name = name.into();
        let name = if name.starts_with('?') {
            name
        } else {
            format!("?{name}")
        };
        self.values.insert(name, value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Option<String>>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl BindingRow for VariableBindings {
    fn lexical_value(&self, name: &str) -> Option<&str> {
        self.values.get(name)?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized_and_case_sensitive() {
        let row = VariableBindings::new()
            .with("a", "1".to_owned())
            .with("?B", "2".to_owned())
            .with("?gone", None);
        assert_eq!(row.lexical_value("?a"), Some("1"));
        assert_eq!(row.lexical_value("?A"), None);
        assert_eq!(row.lexical_value("?B"), Some("2"));
        assert_eq!(row.lexical_value("?gone"), None);
        assert_eq!(row.len(), 3);
    }
}
