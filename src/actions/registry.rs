use crate::actions::base::{reset_counter, CommandFn, RESET_COUNTER};
use crate::core::DriverTrait;
use crate::errors::{E2eError, Result};
use crate::locators::LocatorSet;
use std::collections::HashMap;

/// Name-keyed table of extension commands
pub struct CommandRegistry<D: DriverTrait> {
    commands: HashMap<String, CommandFn<D>>,
}

impl<D: DriverTrait> CommandRegistry<D> {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in commands
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(RESET_COUNTER, reset_counter::<D>);
        registry
    }

    /// Register a command, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, command: CommandFn<D>) {
        self.commands.insert(name.into(), command);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// List all registered commands
    pub fn list_commands(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Execute a command by name
    pub async fn execute(&self, name: &str, driver: &D, locators: &LocatorSet) -> Result<()> {
        let command = self
            .commands
            .get(name)
            .copied()
            .ok_or_else(|| E2eError::UnknownCommand(name.to_string()))?;

        let start_time = std::time::Instant::now();
        command(driver, locators).await?;
        tracing::debug!(
            command = name,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "command executed"
        );
        Ok(())
    }
}

impl<D: DriverTrait> Default for CommandRegistry<D> {
    fn default() -> Self {
        Self::with_builtins()
    }
}
