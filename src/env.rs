use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Variable bindings at a point in execution.
///
/// Cloning an `Environment` is an `Arc` bump; writes go through
/// `Arc::make_mut`, which copies the table only while another handle still
/// references it. A caller that keeps its own handle therefore always sees
/// its original bindings unchanged, and executing a program that never
/// writes hands back the exact instance it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Arc<FxHashMap<String, i64>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.vars.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        Arc::make_mut(&mut self.vars).insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.vars.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// True when both handles share one underlying table.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Arc::ptr_eq(&self.vars, &other.vars)
    }
}

impl FromIterator<(String, i64)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Environment {
            vars: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<'a> FromIterator<(&'a str, i64)> for Environment {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_returns_bound_value() {
        let mut env = Environment::new();
        assert!(env.is_empty());
        env.insert("a", 7);
        assert_eq!(env.get("a"), Some(7));
        assert_eq!(env.get("b"), None);
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn clone_shares_the_table_until_a_write() {
        let original: Environment = [("a", 5)].into_iter().collect();
        let mut copy = original.clone();
        assert!(original.ptr_eq(&copy));

        copy.insert("a", 9);
        assert!(!original.ptr_eq(&copy));
        assert_eq!(original.get("a"), Some(5));
        assert_eq!(copy.get("a"), Some(9));
    }

    #[test]
    fn equality_compares_bindings_not_identity() {
        let left: Environment = [("a", 1), ("b", 2)].into_iter().collect();
        let right: Environment = [("b", 2), ("a", 1)].into_iter().collect();
        assert!(!left.ptr_eq(&right));
        assert_eq!(left, right);
    }
}
