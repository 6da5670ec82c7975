//! Parameter Bundle: the immutable snapshot of user-supplied scalar inputs.

use std::collections::HashMap;

use crate::error::TraitError;

/// An immutable mapping from parameter name to scalar value.
///
/// Constructed once per input snapshot and never mutated; a caller who
/// wants to change an input builds a new bundle and hands it to
/// `CalculationEngine::update_parameters`. All values are validated finite
/// at construction time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBundle {
    values: HashMap<String, f64>,
}

impl ParameterBundle {
    /// Builds a bundle from a name/value mapping, rejecting any non-finite
    /// value with [`TraitError::InvalidInput`].
    pub fn new(values: HashMap<String, f64>) -> Result<Self, TraitError> {
        for (name, value) in &values {
            if !value.is_finite() {
                return Err(TraitError::InvalidInput(format!(
                    "parameter '{name}' is not finite: {value}"
                )));
            }
        }
        Ok(Self { values })
    }

    /// An empty bundle; useful as the engine's initial state.
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Looks up a parameter by name.
    pub fn get(&self, name: &str) -> Result<f64, TraitError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| TraitError::NotFound(name.to_string()))
    }

    /// Whether `name` is present in this bundle.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over all declared parameter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Builds a new bundle from `self` with every entry in `overlay`
    /// overriding the corresponding entry in `self`; names only present in
    /// `self` are kept unchanged. Used by
    /// `CalculationEngine::swap_strategy_for_node` to apply a partial
    /// parameter overlay without discarding the rest of the current bundle.
    pub fn merged_with(&self, overlay: &ParameterBundle) -> ParameterBundle {
        let mut values = self.values.clone();
        for (name, value) in &overlay.values {
            values.insert(name.clone(), *value);
        }
        ParameterBundle { values }
    }

    /// Names whose value differs between `self` and `other` (or that exist
    /// in only one of the two). Used by the engine to scope invalidation to
    /// the parameters that actually changed.
    pub fn changed_names(&self, other: &ParameterBundle) -> Vec<String> {
        let mut changed = Vec::new();
        for (name, value) in &self.values {
            match other.values.get(name) {
                Some(other_value) if other_value == value => {}
                _ => changed.push(name.clone()),
            }
        }
        for name in other.values.keys() {
            if !self.values.contains_key(name) {
                changed.push(name.clone());
            }
        }
        changed
    }
}
