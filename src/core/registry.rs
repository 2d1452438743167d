//! Backend type registry
//!
//! Maps a backend type name to a constructor. A [`Dispatcher`](super::Dispatcher)
//! holds an `Arc<Registry>` and consults it whenever a backend is attached,
//! so tests can build isolated registries instead of sharing process state.

use super::{
    backend::Backend,
    error::{DispatchError, Result},
};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Builds a fresh, uninitialized backend instance
pub type Constructor = Box<dyn Fn() -> Box<dyn Backend> + Send + Sync>;

#[derive(Default)]
pub struct Registry {
    constructors: RwLock<HashMap<String, Constructor>>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the bundled `console` and `file` backends
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        if let Err(e) = crate::backends::register_builtins(&registry) {
            eprintln!("[DISPATCH ERROR] Failed to register bundled backends: {}", e);
        }
        registry
    }

    /// Register a constructor under `name`.
    ///
    /// Registering the same name twice is a programming error; it is
    /// returned rather than panicking so the caller decides how fatal it is.
    pub fn register<F>(&self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Backend> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut constructors = self.constructors.write();
        if constructors.contains_key(&name) {
            return Err(DispatchError::duplicate_registration(name));
        }
        constructors.insert(name, Box::new(constructor));
        Ok(())
    }

    /// Build a new instance of the backend registered as `name`
    pub fn construct(&self, name: &str) -> Result<Box<dyn Backend>> {
        let constructors = self.constructors.read();
        let constructor = constructors
            .get(name)
            .ok_or_else(|| DispatchError::unknown_backend(name))?;
        Ok(constructor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("backends", &self.names())
            .finish()
    }
}
