//! Tokenizer and command parser for an interactive shell.
//!
//! The [`Tokenizer`] splits a raw line into words, honouring quotes,
//! escapes and comments, and records where the cursor is. The
//! [`CommandParser`] resolves the command named by the leading words against
//! a [`CommandRegistry`](cmdline_core::CommandRegistry) and binds the rest to
//! the command's options and positional arguments, converting values to
//! their declared types.
//!
//! # Example
//!
//! ```
//! use cmdline_core::*;
//! use cmdline_parser::CommandParser;
//!
//! let mut registry = CommandRegistry::new();
//! registry
//!     .register(
//!         CommandSchema::new("greet")
//!             .with_option(CommandOption::boolean(Some('l'), Some("loud")))
//!             .with_argument(CommandArgument::required("name", ValueType::String)),
//!     )
//!     .unwrap();
//!
//! let result = CommandParser::new()
//!     .parse_line(r#"greet -l "John Doe""#, &registry)
//!     .unwrap();
//! assert!(result.is_ok());
//! assert_eq!(result.option_value("loud"), Some(&TypedValue::Bool(true)));
//! assert_eq!(result.argument_value("name").and_then(TypedValue::as_str), Some("John Doe"));
//!
//! let missing = CommandParser::new().parse(&["greet"], &registry).unwrap();
//! assert_eq!(
//!     missing.format_errors(true),
//!     vec!["2005E:(pos 0): Missing mandatory argument 'name'"]
//! );
//! ```

mod config;
mod error;
mod parser;
mod result;
mod tokenizer;

pub use config::{ParserConfig, TokenizerConfig};
pub use error::{ParseError, ParseFailure, Result, TokenizeError};
pub use parser::{CommandParser, is_option_token, option_expecting_values, resolve_command};
pub use result::{Binding, BindingTarget, ParseResult, RawValue, ValueSource};
pub use tokenizer::{ParsedLine, Quoting, Token, Tokenizer};
