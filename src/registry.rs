//! Module registry.
//!
//! Tracks registered module instances by name and drives their
//! enable/disable transitions. One instance per name: registering a second
//! instance under the same name silently replaces the first.

use crate::error::RegistryError;
use crate::module::ModuleCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Name-keyed store of registered module cells.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<&'static str, Arc<ModuleCell>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cell under its manifest name, replacing any previous
    /// registration of that name.
    pub fn register(&mut self, cell: Arc<ModuleCell>) {
        self.modules.insert(cell.name(), cell);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModuleCell>> {
        self.modules.get(name)
    }

    /// Enable a module by name, running its init hook if it was disabled.
    pub fn enable(&self, name: &str) -> Result<(), RegistryError> {
        self.toggle(name, true)
    }

    /// Disable a module by name, running its deinit hook if it was enabled.
    pub fn disable(&self, name: &str) -> Result<(), RegistryError> {
        self.toggle(name, false)
    }

    fn toggle(&self, name: &str, on: bool) -> Result<(), RegistryError> {
        let cell = self
            .modules
            .get(name)
            .ok_or_else(|| RegistryError::ModuleNotFound(name.to_string()))?;
        cell.set_enabled(on);
        Ok(())
    }

    /// Registered cells in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModuleCell>> {
        let mut cells: Vec<_> = self.modules.values().collect();
        cells.sort_by_key(|cell| cell.name());
        cells.into_iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use crate::module::{Manifest, Module};

    struct Quiet;

    impl Module for Quiet {
        const MANIFEST: Manifest = Manifest::module("Quiet", 0.1, "tests");

        fn declare(_dispatcher: &mut Dispatcher) {}
    }

    #[test]
    fn enable_unknown_module_is_not_found() {
        let registry = ModuleRegistry::new();
        let err = registry.enable("Missing").unwrap_err();
        assert!(matches!(err, RegistryError::ModuleNotFound(name) if name == "Missing"));
    }

    #[test]
    fn registered_module_toggles() {
        let mut registry = ModuleRegistry::new();
        registry.register(ModuleCell::new(Quiet));
        assert_eq!(registry.len(), 1);

        registry.enable("Quiet").expect("enable");
        assert!(registry.get("Quiet").expect("registered").enabled());
        registry.disable("Quiet").expect("disable");
        assert!(!registry.get("Quiet").expect("registered").enabled());
    }

    #[test]
    fn same_name_registration_replaces() {
        let mut registry = ModuleRegistry::new();
        let first = ModuleCell::new(Quiet);
        registry.register(first.clone());
        first.set_enabled(true);

        registry.register(ModuleCell::new(Quiet));
        assert_eq!(registry.len(), 1);
        // The replacement starts disabled; the old cell is no longer reachable.
        assert!(!registry.get("Quiet").expect("registered").enabled());
    }
}
