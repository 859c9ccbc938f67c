//! Global variable store.
//!
//! One store lives for one program run. Variables spring into existence on
//! first reference holding `Number(0)`; a slot remembers whether it was ever
//! written so that function bindings can be refused on used variables.

use std::collections::HashMap;

use log::debug;

use super::program::Function;
use super::symbol::VarId;
use super::value::Value;
use crate::error::BindingError;

#[derive(Debug, Clone, Default)]
struct Slot {
    value: Value,
    written: bool,
}

/// Identifier to value mapping shared by the parser and the interpreter
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    slots: HashMap<VarId, Slot>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, creating the variable as `Number(0)` on first access
    pub fn read(&mut self, id: VarId) -> &Value {
        &self.slots.entry(id).or_default().value
    }

    /// Current value without creating the variable
    pub fn get(&self, id: VarId) -> Option<&Value> {
        self.slots.get(&id).map(|slot| &slot.value)
    }

    /// Replace the stored value unconditionally
    pub fn write(&mut self, id: VarId, value: Value) {
        let slot = self.slots.entry(id).or_default();
        slot.value = value;
        slot.written = true;
    }

    /// Reset to `Number(0)`, whatever was stored before (functions included)
    pub fn init(&mut self, id: VarId) {
        self.write(id, Value::default());
    }

    /// Bind a function to a variable that has never been written
    pub fn bind_function(&mut self, id: VarId, body: Function) -> Result<(), BindingError> {
        if self.is_written(id) {
            return Err(BindingError(id));
        }
        debug!("binding function of {} instructions to {}", body.len(), id);
        self.write(id, Value::Function(body));
        Ok(())
    }

    /// Whether the variable left its implicit default state
    pub fn is_written(&self, id: VarId) -> bool {
        self.slots.get(&id).is_some_and(|slot| slot.written)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All variables in identifier order
    pub fn variables(&self) -> Vec<(VarId, &Value)> {
        let mut variables: Vec<_> = self
            .slots
            .iter()
            .map(|(id, slot)| (*id, &slot.value))
            .collect();
        variables.sort_by_key(|(id, _)| *id);
        variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::program::Instruction;

    fn body() -> Function {
        Function::new(vec![Instruction::Print { source: VarId(1) }])
    }

    #[test]
    fn test_read_creates_default() {
        let mut store = VariableStore::new();
        assert!(store.get(VarId(432)).is_none());

        assert_eq!(store.read(VarId(432)), &Value::Number(0.0));
        assert_eq!(store.len(), 1);
        // An implicit read leaves the variable untouched
        assert!(!store.is_written(VarId(432)));
    }

    #[test]
    fn test_write_replaces() {
        let mut store = VariableStore::new();
        store.write(VarId(1), Value::Number(3.0));
        store.write(VarId(1), Value::String("x".into()));
        assert_eq!(store.read(VarId(1)), &Value::String("x".into()));
    }

    #[test]
    fn test_init_overwrites_function() {
        let mut store = VariableStore::new();
        store.bind_function(VarId(7), body()).unwrap();
        store.init(VarId(7));
        assert_eq!(store.get(VarId(7)), Some(&Value::Number(0.0)));
    }

    #[test]
    fn test_bind_function_only_on_untouched() {
        let mut store = VariableStore::new();

        // Reading does not count as initialization
        store.read(VarId(5));
        assert!(store.bind_function(VarId(5), body()).is_ok());
        assert_eq!(store.bind_function(VarId(5), body()), Err(BindingError(VarId(5))));

        store.write(VarId(6), Value::Number(1.0));
        assert_eq!(store.bind_function(VarId(6), body()), Err(BindingError(VarId(6))));

        store.init(VarId(8));
        assert!(store.bind_function(VarId(8), body()).is_err());
    }

    #[test]
    fn test_variables_sorted() {
        let mut store = VariableStore::new();
        store.write(VarId(300), Value::Number(1.0));
        store.read(VarId(20));
        let ids: Vec<VarId> = store.variables().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![VarId(20), VarId(300)]);
    }
}
