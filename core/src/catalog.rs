use serde::{Deserialize, Serialize};

use crate::CommandSchema;

/// Serializable bundle of command schemas.
///
/// A catalog groups the [`CommandSchema`] values a shell registers at
/// startup, with version metadata, so the whole command set can be declared
/// in one JSON or YAML document.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
///
/// let mut catalog = CommandCatalog::new("1.0.0");
/// catalog.name = Some("petclinic".into());
/// catalog.commands.push(CommandSchema::new("vets list"));
/// catalog.commands.push(CommandSchema::new("vets info"));
///
/// assert_eq!(catalog.command_count(), 2);
///
/// let yaml = "version: 1.0.0\ncommands:\n  - name: hello\n";
/// let parsed = CommandCatalog::from_yaml(yaml).unwrap();
/// assert_eq!(parsed.commands[0].name, "hello");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandCatalog {
    /// Catalog contract version (populated from
    /// [`CATALOG_CONTRACT_VERSION`](crate::CATALOG_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_version: Option<String>,
    /// Catalog format version (semver string).
    pub version: String,
    /// Optional catalog name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional catalog description.
    #[serde(default)]
    pub description: Option<String>,
    /// Commands in registration order.
    #[serde(default)]
    pub commands: Vec<CommandSchema>,
}

impl CommandCatalog {
    /// Creates an empty catalog.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            contract_version: Some(crate::CATALOG_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            commands: Vec::new(),
        }
    }

    /// Number of commands.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Parses a catalog from JSON.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Parses a catalog from YAML.
    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
