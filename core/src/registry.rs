//! Lookup table of registered commands.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::{CommandCatalog, CommandSchema, ValidationError, validate_catalog, validate_schema};

/// Errors raised while registering commands.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid command '{command}': {source}")]
    Invalid {
        command: String,
        #[source]
        source: ValidationError,
    },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[source] ValidationError),

    #[error("command name already registered: {0}")]
    DuplicateName(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Registered commands, addressable by primary name or alias.
///
/// Schemas are shared as `Arc<CommandSchema>` so parse results and
/// completion contexts can hold on to the resolved command cheaply.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
///
/// let mut registry = CommandRegistry::new();
/// registry.register(CommandSchema::new("vets list").with_alias("vl")).unwrap();
/// registry.register(CommandSchema::new("vets info")).unwrap();
///
/// assert_eq!(registry.by_name("vl").unwrap().name, "vets list");
/// assert!(registry.is_name_prefix("vets"));
/// assert!(!registry.is_name_prefix("vet"));
/// assert_eq!(registry.all_names(), vec!["vets info", "vets list", "vl"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    commands: Vec<Arc<CommandSchema>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a command under its name and aliases.
    pub fn register(&mut self, schema: CommandSchema) -> Result<()> {
        if let Some(source) = validate_schema(&schema).into_iter().next() {
            return Err(RegistryError::Invalid {
                command: schema.name.clone(),
                source,
            });
        }
        if let Some(taken) = schema.names().find(|n| self.index.contains_key(*n)) {
            return Err(RegistryError::DuplicateName(taken.to_string()));
        }

        let slot = self.commands.len();
        for name in schema.names() {
            self.index.insert(name.to_string(), slot);
        }
        debug!(command = %schema.name, aliases = schema.aliases.len(), "Registered command");
        self.commands.push(Arc::new(schema));
        Ok(())
    }

    /// Builds a registry from a validated catalog.
    pub fn from_catalog(catalog: CommandCatalog) -> Result<Self> {
        if let Some(err) = validate_catalog(&catalog).into_iter().next() {
            return Err(RegistryError::InvalidCatalog(err));
        }
        let mut registry = Self::new();
        for schema in catalog.commands {
            registry.register(schema)?;
        }
        info!(commands = registry.len(), "Loaded command catalog");
        Ok(registry)
    }

    /// Builds a registry from a JSON catalog document.
    pub fn from_json(input: &str) -> Result<Self> {
        Self::from_catalog(CommandCatalog::from_json(input)?)
    }

    /// Builds a registry from a YAML catalog document.
    pub fn from_yaml(input: &str) -> Result<Self> {
        Self::from_catalog(CommandCatalog::from_yaml(input)?)
    }

    /// Looks a command up by exact name or alias.
    pub fn by_name(&self, name: &str) -> Option<&Arc<CommandSchema>> {
        self.index.get(name).map(|&slot| &self.commands[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Every registered name and alias, sorted.
    pub fn all_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.index.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` when some registered name starts with the words of
    /// `words` followed by at least one more word.
    pub fn is_name_prefix(&self, words: &str) -> bool {
        self.index.keys().any(|name| {
            name.strip_prefix(words)
                .is_some_and(|rest| rest.starts_with(' '))
        })
    }

    /// Registered commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<CommandSchema>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandOption, ValueType};

    #[test]
    fn test_register_rejects_alias_collision() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandSchema::new("list")).unwrap();

        let err = registry
            .register(CommandSchema::new("ls").with_alias("list"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "list"));
        assert!(!registry.contains("ls"));
    }

    #[test]
    fn test_register_rejects_invalid_schema() {
        let mut registry = CommandRegistry::new();
        let schema = CommandSchema::new("bad")
            .with_option(CommandOption::with_value(None, Some("x"), ValueType::Bool))
            .with_option(CommandOption::with_value(None, Some("x"), ValueType::Bool));

        let err = registry.register(schema).unwrap_err();
        assert!(matches!(err, RegistryError::Invalid { ref command, .. } if command == "bad"));
        assert!(err.to_string().contains("duplicate option: --x"));
    }

    #[test]
    fn test_from_json_catalog() {
        let json = r#"{
            "version": "1.0.0",
            "commands": [
                {"name": "hello", "aliases": ["hi"]},
                {"name": "vets list"}
            ]
        }"#;
        let registry = CommandRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.by_name("hi").unwrap().name, "hello");
        assert!(registry.is_name_prefix("vets"));
    }

    #[test]
    fn test_from_yaml_reports_parse_errors() {
        let err = CommandRegistry::from_yaml("commands: [").unwrap_err();
        assert!(matches!(err, RegistryError::Yaml(_)));
    }

    #[test]
    fn test_from_catalog_rejects_duplicates() {
        let mut catalog = CommandCatalog::new("1.0.0");
        catalog.commands.push(CommandSchema::new("a"));
        catalog.commands.push(CommandSchema::new("a"));
        let err = CommandRegistry::from_catalog(catalog).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidCatalog(ValidationError::DuplicateCommand(_))
        ));
    }
}
