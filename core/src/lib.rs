//! Core command model shared by the parser and completion crates.
//!
//! This crate defines what a shell command looks like:
//!
//! - [`CommandSchema`]: a registered command with names, options and
//!   positional arguments.
//! - [`CommandOption`]: an option with long/short names, a [`ValueType`] and
//!   an [`Arity`].
//! - [`CommandArgument`]: a positional argument bound by index.
//! - [`CommandCatalog`]: a versioned bundle of schemas loaded from JSON or
//!   YAML.
//! - [`CommandRegistry`]: the lookup table the parser resolves names against.
//!
//! Validation ([`validate_schema`], [`validate_catalog`]) catches structural
//! errors such as duplicate options, malformed names and gaps in argument
//! indices. Conversion ([`ValueType::convert`]) turns raw tokens into
//! [`TypedValue`]s.
//!
//! # Example
//!
//! ```
//! use cmdline_core::*;
//!
//! let schema = CommandSchema::new("greet")
//!     .with_option(
//!         CommandOption::boolean(Some('l'), Some("loud"))
//!             .with_description("Shout the greeting"),
//!     )
//!     .with_argument(CommandArgument::optional("who", ValueType::String).with_default("world"));
//!
//! assert!(validate_schema(&schema).is_empty());
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(schema).unwrap();
//! assert!(registry.by_name("greet").unwrap().find_option("-l").is_some());
//! ```

mod catalog;
mod convert;
mod registry;
mod types;
mod validate;

pub use catalog::CommandCatalog;
pub use convert::{ConversionError, TypedValue};
pub use registry::{CommandRegistry, RegistryError};
pub use types::*;
pub use validate::{ValidationError, validate_catalog, validate_schema};
