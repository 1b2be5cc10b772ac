//! Tokenizer and parser settings.
//!
//! Both structs deserialize from YAML with every field optional, so a host
//! configuration file only needs to mention what it changes.
//!
//! # Example YAML
//!
//! ```yaml
//! tokenizer:
//!   comment_marker: "#"
//!   eof_on_unclosed_quote: false
//! parser:
//!   case_sensitive_options: false
//!   strict: false
//! ```

use serde::{Deserialize, Serialize};

/// Lexical rules for splitting an input line into words.
///
/// # Examples
///
/// ```
/// use cmdline_parser::TokenizerConfig;
///
/// let config: TokenizerConfig = serde_yaml::from_str("comment_marker: '#'").unwrap();
/// assert_eq!(config.comment_marker.as_deref(), Some("#"));
/// assert_eq!(config.escape_char, Some('\\'));
/// assert!(config.eof_on_unclosed_quote);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Characters that open and close a quoted region.
    pub quote_chars: Vec<char>,
    /// Escape character; `None` disables escaping.
    pub escape_char: Option<char>,
    /// A word starting with this marker turns the rest of the line into a
    /// comment.
    pub comment_marker: Option<String>,
    /// Report a quote left open at the end of the line as an error.
    pub eof_on_unclosed_quote: bool,
    /// Report a line ending in a lone escape character as an error.
    pub eof_on_escaped_newline: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            quote_chars: vec!['\'', '"'],
            escape_char: Some('\\'),
            comment_marker: Some("//".to_string()),
            eof_on_unclosed_quote: true,
            eof_on_escaped_newline: false,
        }
    }
}

/// How tokens are bound to a command schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Match long option names case-sensitively.
    pub case_sensitive_options: bool,
    /// Treat conversion failures and repeated non-repeatable options as
    /// fatal instead of recording them on the result.
    pub strict: bool,
    /// Honour `--` as the end of options.
    pub argument_separator: bool,
    /// Accept bundled short flags such as `-abc`.
    pub combined_short_options: bool,
    /// Command invoked when a help option is found.
    pub help_command: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            case_sensitive_options: true,
            strict: true,
            argument_separator: true,
            combined_short_options: true,
            help_command: "help".to_string(),
        }
    }
}
