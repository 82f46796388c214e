use super::SnapshotBackend;
use crate::error::{PromptDictError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory snapshot backend.
///
/// Uses `RefCell` so the trait can take `&self`; sessions are single-threaded.
#[derive(Debug, Default)]
pub struct MemBackend {
    slots: RefCell<HashMap<String, String>>,
    writes: RefCell<usize>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose slot `key` already holds `text`.
    pub fn with_slot(key: &str, text: &str) -> Self {
        let backend = Self::default();
        backend
            .slots
            .borrow_mut()
            .insert(key.to_string(), text.to_string());
        backend
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Number of successful saves so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }

    pub fn peek(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl SnapshotBackend for MemBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, text: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(PromptDictError::Store("Simulated write error".to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), text.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
