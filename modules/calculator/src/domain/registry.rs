//! Name-to-operation lookup table, built once at startup and read-only
//! afterward.

use std::collections::HashMap;

use super::op::{EvalError, Operation};

/// Maps canonical uppercase names to operations.
///
/// Mutation happens only during initialization; request handlers share the
/// finished table behind an `Arc` and never write to it, so concurrent reads
/// need no synchronization.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    table: HashMap<String, Operation>,
}

impl OperationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All ten built-in operations under their canonical names.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for op in Operation::ALL {
            registry.register(op.canonical_name(), op);
        }
        registry
    }

    /// Associate a name with an operation. The name is canonicalized to
    /// uppercase; the last registration for a given name wins.
    pub fn register(&mut self, name: &str, op: Operation) {
        self.table.insert(name.to_ascii_uppercase(), op);
    }

    /// Case-insensitive lookup. Normalization is an uppercase ASCII fold and
    /// nothing else: an empty string or a name with stray characters is
    /// simply not found.
    ///
    /// # Errors
    /// [`EvalError::UnknownOperation`] when no operation is registered under
    /// the folded name.
    pub fn resolve(&self, name: &str) -> Result<Operation, EvalError> {
        self.table
            .get(&name.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| EvalError::UnknownOperation(name.to_owned()))
    }

    /// Registered canonical names, sorted. Used for validation messages and
    /// the OpenAPI enum.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive_for_every_builtin() {
        let registry = OperationRegistry::with_builtins();
        for op in Operation::ALL {
            let canonical = op.canonical_name();
            assert_eq!(registry.resolve(canonical).unwrap(), op);
            assert_eq!(
                registry.resolve(&canonical.to_ascii_lowercase()).unwrap(),
                op
            );
        }
        assert!(registry.resolve("AbsoluteDifference").is_ok());
    }

    #[test]
    fn unregistered_names_are_unknown() {
        let registry = OperationRegistry::with_builtins();
        for name in ["", "bogus", "ADD ", " add", "ADD+", "INTEGER-DIVISION"] {
            assert_eq!(
                registry.resolve(name),
                Err(EvalError::UnknownOperation(name.to_owned())),
                "{name:?}"
            );
        }
    }

    #[test]
    fn unknown_operation_message_carries_the_requested_name() {
        let registry = OperationRegistry::with_builtins();
        let err = registry.resolve("frobnicate").unwrap_err();
        assert_eq!(err.to_string(), "Unknown operation: frobnicate");
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = OperationRegistry::new();
        registry.register("ADD", Operation::Subtract);
        registry.register("add", Operation::Add);
        assert_eq!(registry.resolve("ADD").unwrap(), Operation::Add);
    }

    #[test]
    fn names_are_sorted_and_canonical() {
        let registry = OperationRegistry::with_builtins();
        let names = registry.names();
        assert_eq!(names.len(), 10);
        assert_eq!(names.first(), Some(&"ABSOLUTEDIFFERENCE"));
        assert_eq!(names.last(), Some(&"SUBTRACT"));
        assert!(names.iter().all(|n| *n == n.to_ascii_uppercase()));
    }
}
