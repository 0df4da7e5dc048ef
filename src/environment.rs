use crate::source::Span;
use crate::types::Value;
use std::collections::HashMap;
use thiserror::Error;

// --- Environment Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    // The message format is part of the observable contract
    #[error("Unbound variable: {0}")]
    UnboundVariable(String, Span), // Symbol name, span where lookup happened
}

// --- Environment Definition ---

/// Mutable name-to-value binding store.
///
/// Environments are flat: there is no outer-environment chain. The global
/// environment is threaded through top-level evaluation, and each procedure
/// invocation gets a brand-new environment holding only its parameter
/// bindings, so procedure bodies cannot see the caller's variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// Creates a new, empty environment.
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// Looks up a variable's value. Fails with [`EnvError::UnboundVariable`]
    /// if the name has never been bound in this environment.
    /// `lookup_span` is the location where the variable was referenced, used
    /// for error reporting.
    pub fn get(&self, name: &str, lookup_span: Span) -> Result<Value, EnvError> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| EnvError::UnboundVariable(name.to_string(), lookup_span))
    }

    /// Binds `name` to `value` in this environment. Always succeeds; an
    /// existing binding for the same name is overwritten, never duplicated.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Reports whether `name` currently has a binding, without cloning the
    /// bound value the way [`Environment::get`] does.
    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}
