//! Environment registry for creating environments by name

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use dungeon_rl_core::{DungeonError, EnvironmentConfig, Grid, Result};

use crate::{layouts, DungeonEnv};

type EnvConstructor = Box<dyn Fn(EnvironmentConfig) -> Result<DungeonEnv> + Send + Sync>;

/// Named environment constructors
///
/// Built once at startup and passed to whoever creates environments.
#[derive(Default)]
pub struct EnvRegistry {
    /// Registered environments
    envs: HashMap<String, EnvConstructor>,
}

impl EnvRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in level
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for (name, layout) in layouts::BUILTIN {
            registry.register_grid(name, layouts::load(layout));
        }
        registry
    }

    /// Register an environment, replacing any previous one of that name
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(EnvironmentConfig) -> Result<DungeonEnv> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(%name, "Registered environment");
        self.envs.insert(name, Box::new(constructor));
    }

    /// Register an environment playing a fixed grid
    pub fn register_grid(&mut self, name: impl Into<String>, grid: impl Into<Arc<Grid>>) {
        let grid = grid.into();
        self.register(name, move |config| DungeonEnv::new(Arc::clone(&grid), config));
    }

    /// Create an environment by name
    pub fn make(&self, name: &str, config: EnvironmentConfig) -> Result<DungeonEnv> {
        self.envs
            .get(name)
            .ok_or_else(|| DungeonError::UnknownEnvironment(name.to_string()))
            .and_then(|constructor| constructor(config))
    }

    /// Whether `name` is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.envs.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.envs.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for EnvRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvRegistry")
            .field("envs", &self.list())
            .finish()
    }
}
