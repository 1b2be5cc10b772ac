//! Schema and catalog validation.
//!
//! Validates structural invariants of command schemas and catalogs, catching
//! errors such as duplicate options, malformed names, gaps in argument
//! indices and impossible arities before a schema reaches the registry.
//!
//! # Examples
//!
//! ```
//! use cmdline_core::*;
//!
//! let schema = CommandSchema::new("greet")
//!     .with_option(CommandOption::boolean(Some('v'), Some("verbose")));
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Invalid: long name carries its own dashes
//! let bad = CommandSchema::new("greet")
//!     .with_option(CommandOption::boolean(None, Some("--verbose")));
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{CommandArgument, CommandCatalog, CommandOption, CommandSchema};

static COMMAND_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s\-][^\s]*(?: [^\s\-][^\s]*)*$").expect("valid command name regex")
});

static LONG_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("valid long name regex")
});

/// Schema/catalog validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Catalog version string is empty.
    #[error("catalog version cannot be empty")]
    EmptyCatalogVersion,
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Command name words must be separated by single spaces and must not
    /// start with a dash.
    #[error("invalid command name: {0:?}")]
    InvalidCommandName(String),
    /// Two commands share a name or alias.
    #[error("duplicate command name: {0}")]
    DuplicateCommand(String),
    /// Long name is not made of word characters, or carries its own dashes.
    #[error("invalid long option name: {0}")]
    InvalidLongName(String),
    /// Short name must be a single alphanumeric character.
    #[error("invalid short option name: {0:?}")]
    InvalidShortName(char),
    /// An option has neither long nor short names.
    #[error("option must define a long or short name")]
    MissingOptionName,
    /// Two options of one command share a spelling.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),
    /// Argument indices must run 0, 1, 2, ... without gaps.
    #[error("argument '{name}' has index {found}, expected {expected}")]
    NonContiguousArgument {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Only the last argument may be variadic.
    #[error("variadic argument '{0}' must be the last argument")]
    VariadicNotLast(String),
    /// Arity range is empty.
    #[error("option {0} has an arity whose minimum exceeds its maximum")]
    InvalidArity(String),
    /// Enum type with no constants.
    #[error("{0} declares an enum type without constants")]
    EmptyEnum(String),
    /// A default value does not convert to the declared type.
    #[error("default value for {name} is invalid: {reason}")]
    InvalidDefault { name: String, reason: String },
}

/// Validates a full command catalog.
///
/// Checks for an empty version string and names shared between commands,
/// then validates each schema individually. Stops at the first error.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
///
/// let mut catalog = CommandCatalog::new("1.0.0");
/// catalog.commands.push(CommandSchema::new("vets list"));
/// assert!(validate_catalog(&catalog).is_empty());
///
/// // Alias colliding with another command → error
/// catalog.commands.push(CommandSchema::new("vets").with_alias("vets list"));
/// let errors = validate_catalog(&catalog);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateCommand(_))));
/// ```
pub fn validate_catalog(catalog: &CommandCatalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if catalog.version.trim().is_empty() {
        errors.push(ValidationError::EmptyCatalogVersion);
        return errors;
    }

    let mut seen_names: HashSet<&str> = HashSet::new();
    for schema in &catalog.commands {
        errors.extend(validate_schema(schema));
        if !errors.is_empty() {
            return errors;
        }
        for name in schema.names() {
            if !seen_names.insert(name) {
                errors.push(ValidationError::DuplicateCommand(name.to_string()));
                return errors;
            }
        }
    }

    errors
}

/// Validates a command schema.
///
/// Checks command names and aliases, every option (names, arity, defaults)
/// including the help option, and the positional argument layout.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
///
/// let schema = CommandSchema::new("cp")
///     .with_argument(CommandArgument::required("source", ValueType::String))
///     .with_argument(CommandArgument::required("dest", ValueType::String));
/// assert!(validate_schema(&schema).is_empty());
///
/// // Gap in argument indices
/// let mut gapped = schema.clone();
/// gapped.arguments[1].index = 2;
/// let errors = validate_schema(&gapped);
/// assert!(matches!(errors[0], ValidationError::NonContiguousArgument { .. }));
/// ```
pub fn validate_schema(schema: &CommandSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if schema.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    for name in schema.names() {
        if !COMMAND_NAME_RE.is_match(name) {
            errors.push(ValidationError::InvalidCommandName(name.to_string()));
            return errors;
        }
    }

    let options = schema.options.iter().chain(schema.help_option.as_ref());
    errors.extend(validate_options(options));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_arguments(&schema.arguments));
    errors
}

fn validate_options<'a>(options: impl Iterator<Item = &'a CommandOption>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in options {
        if option.long_names.is_empty() && option.short_names.is_empty() {
            errors.push(ValidationError::MissingOptionName);
            return errors;
        }

        for long in &option.long_names {
            if !LONG_NAME_RE.is_match(long) {
                errors.push(ValidationError::InvalidLongName(long.clone()));
                return errors;
            }
            if !seen.insert(format!("--{long}")) {
                errors.push(ValidationError::DuplicateOption(format!("--{long}")));
                return errors;
            }
        }

        for &short in &option.short_names {
            if !short.is_alphanumeric() {
                errors.push(ValidationError::InvalidShortName(short));
                return errors;
            }
            if !seen.insert(format!("-{short}")) {
                errors.push(ValidationError::DuplicateOption(format!("-{short}")));
                return errors;
            }
        }

        let name = option.primary_name();
        let arity = option.arity();
        if arity.max().is_some_and(|max| max < arity.min()) {
            errors.push(ValidationError::InvalidArity(name));
            return errors;
        }
        if option.value_type.is_enum() && option.value_type.constants().is_empty() {
            errors.push(ValidationError::EmptyEnum(name));
            return errors;
        }
        if let Some(default) = &option.default_value
            && let Err(err) = option.value_type.convert(default)
        {
            errors.push(ValidationError::InvalidDefault {
                name,
                reason: err.reason,
            });
            return errors;
        }
    }

    errors
}

fn validate_arguments(arguments: &[CommandArgument]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut sorted: Vec<&CommandArgument> = arguments.iter().collect();
    sorted.sort_by_key(|a| a.index);

    for (expected, argument) in sorted.iter().enumerate() {
        if argument.index != expected {
            errors.push(ValidationError::NonContiguousArgument {
                name: argument.name.clone(),
                expected,
                found: argument.index,
            });
            return errors;
        }
        if argument.variadic && expected + 1 != sorted.len() {
            errors.push(ValidationError::VariadicNotLast(argument.name.clone()));
            return errors;
        }
        if argument.value_type.is_enum() && argument.value_type.constants().is_empty() {
            errors.push(ValidationError::EmptyEnum(argument.name.clone()));
            return errors;
        }
        if let Some(default) = &argument.default_value
            && let Err(err) = argument.value_type.convert(default)
        {
            errors.push(ValidationError::InvalidDefault {
                name: argument.name.clone(),
                reason: err.reason,
            });
            return errors;
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::{Arity, ValueType};

    use super::*;

    #[test]
    fn test_validate_catalog_rejects_duplicate_commands() {
        let mut catalog = CommandCatalog::new("1.0.0");
        catalog.commands.push(CommandSchema::new("hello"));
        catalog.commands.push(CommandSchema::new("hello"));

        let errors = validate_catalog(&catalog);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateCommand("hello".to_string())]
        );
    }

    #[test]
    fn test_validate_catalog_rejects_empty_version() {
        let catalog = CommandCatalog::new("  ");
        assert_eq!(
            validate_catalog(&catalog),
            vec![ValidationError::EmptyCatalogVersion]
        );
    }

    #[test]
    fn test_validate_schema_rejects_bad_command_names() {
        for name in ["vets  list", "-x", " lead", "vets -l"] {
            let errors = validate_schema(&CommandSchema::new(name));
            assert_eq!(
                errors,
                vec![ValidationError::InvalidCommandName(name.to_string())],
                "name {name:?}"
            );
        }
    }

    #[test]
    fn test_validate_schema_rejects_duplicate_option() {
        let schema = CommandSchema::new("greet")
            .with_option(CommandOption::boolean(Some('v'), Some("verbose")))
            .with_option(CommandOption::boolean(Some('v'), Some("version")));

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::DuplicateOption("-v".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_checks_help_option_clash() {
        let schema = CommandSchema::new("greet")
            .with_option(CommandOption::boolean(Some('h'), Some("host")))
            .with_help_option(CommandOption::boolean(Some('h'), Some("help")));

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::DuplicateOption("-h".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_missing_option_name() {
        let schema = CommandSchema::new("greet").with_option(CommandOption::boolean(None, None));
        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::MissingOptionName]
        );
    }

    #[test]
    fn test_validate_schema_rejects_inverted_arity() {
        let schema = CommandSchema::new("sum").with_option(
            CommandOption::with_value(None, Some("n"), ValueType::Integer)
                .with_arity(Arity::Range { min: 3, max: Some(2) }),
        );
        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::InvalidArity("--n".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_bad_default() {
        let schema = CommandSchema::new("sum").with_option(
            CommandOption::with_value(None, Some("count"), ValueType::Integer).with_default("x"),
        );
        assert!(matches!(
            validate_schema(&schema)[0],
            ValidationError::InvalidDefault { .. }
        ));
    }

    #[test]
    fn test_validate_schema_rejects_variadic_not_last() {
        let schema = CommandSchema::new("cat")
            .with_argument(CommandArgument::optional("files", ValueType::String).variadic())
            .with_argument(CommandArgument::required("out", ValueType::String));
        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::VariadicNotLast("files".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_accepts_valid_schema() {
        let schema = CommandSchema::new("vets info")
            .with_alias("vi")
            .with_option(CommandOption::with_value(
                None,
                Some("vetId"),
                ValueType::Integer,
            ))
            .with_option(CommandOption::with_value(
                Some('c'),
                Some("color"),
                ValueType::Enum(vec!["RED".into()]),
            ))
            .with_argument(CommandArgument::optional("rest", ValueType::Any).variadic())
            .with_help_option(CommandOption::boolean(Some('h'), Some("help")));

        assert!(validate_schema(&schema).is_empty());
    }
}
