//! Error types for tokenizing and parsing.
//!
//! Three tiers, from least to most severe:
//!
//! - [`ParseError`]: a problem with the user's input that is collected on
//!   the [`ParseResult`](crate::ParseResult) so every problem can be
//!   reported at once.
//! - [`ParseFailure`]: aborts parsing (tokenizer errors, and in strict mode
//!   conversion failures and repeated options).
//! - [`TokenizeError`]: the line itself could not be split into words.

use cmdline_core::ConversionError;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while splitting a line into words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unclosed quote {quote} in line: {line}")]
    UnclosedQuote { quote: char, line: String },

    #[error("line ends with an escape character")]
    EscapedNewline,
}

fn describe(description: &Option<String>) -> String {
    description
        .as_deref()
        .map(|d| format!(", {d}"))
        .unwrap_or_default()
}

/// A problem with the user's input, recorded on the parse result.
///
/// Every variant has a numeric code and, where it refers to a token, the
/// token's position in the full token list.
///
/// # Examples
///
/// ```
/// use cmdline_parser::ParseError;
///
/// let err = ParseError::UnrecognisedOption {
///     option: "--colour".into(),
///     position: 2,
/// };
/// assert_eq!(err.code(), 2001);
/// assert_eq!(err.to_string(), "Unrecognised option '--colour'");
/// assert_eq!(err.format_message(true), "2001E:(pos 2): Unrecognised option '--colour'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    #[error("No command found for '{input}'")]
    NoCommand { input: String },

    #[error("Missing mandatory option '{option}'{}", describe(.description))]
    MandatoryOptionMissing {
        option: String,
        description: Option<String>,
    },

    #[error("Unrecognised option '{option}'")]
    UnrecognisedOption { option: String, position: usize },

    #[error("Illegal option value '{value}', reason '{reason}'")]
    IllegalOptionValue {
        option: String,
        value: String,
        reason: String,
        position: Option<usize>,
    },

    #[error("Not enough arguments for option '{option}', requires at least '{min}'")]
    NotEnoughOptionArguments {
        option: String,
        min: usize,
        position: usize,
    },

    #[error("Too many arguments for option '{option}', requires at most '{max}'")]
    TooManyOptionArguments {
        option: String,
        max: usize,
        position: usize,
    },

    #[error("Missing mandatory argument '{argument}'{}", describe(.description))]
    MandatoryArgumentMissing {
        argument: String,
        description: Option<String>,
    },

    #[error("Unexpected argument '{value}'")]
    UnexpectedArgument { value: String, position: usize },

    #[error("Duplicate option '{option}'")]
    DuplicateOption { option: String, position: usize },
}

impl ParseError {
    pub fn code(&self) -> u16 {
        match self {
            ParseError::NoCommand { .. } => 1000,
            ParseError::MandatoryOptionMissing { .. } => 2000,
            ParseError::UnrecognisedOption { .. } => 2001,
            ParseError::IllegalOptionValue { .. } => 2002,
            ParseError::NotEnoughOptionArguments { .. } => 2003,
            ParseError::TooManyOptionArguments { .. } => 2004,
            ParseError::MandatoryArgumentMissing { .. } => 2005,
            ParseError::UnexpectedArgument { .. } => 2006,
            ParseError::DuplicateOption { .. } => 2007,
        }
    }

    /// Token position the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnrecognisedOption { position, .. }
            | ParseError::NotEnoughOptionArguments { position, .. }
            | ParseError::TooManyOptionArguments { position, .. }
            | ParseError::UnexpectedArgument { position, .. }
            | ParseError::DuplicateOption { position, .. } => Some(*position),
            ParseError::IllegalOptionValue { position, .. } => *position,
            ParseError::NoCommand { .. }
            | ParseError::MandatoryOptionMissing { .. }
            | ParseError::MandatoryArgumentMissing { .. } => None,
        }
    }

    /// Renders the message, prefixed with `<code>E:(pos <n>): ` when
    /// `use_code` is set.
    pub fn format_message(&self, use_code: bool) -> String {
        if use_code {
            format!(
                "{}E:(pos {}): {}",
                self.code(),
                self.position().unwrap_or(0),
                self
            )
        } else {
            self.to_string()
        }
    }
}

/// Errors that abort parsing.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("tokenize error: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("invalid value for {target}: {source}")]
    Conversion {
        target: String,
        #[source]
        source: ConversionError,
    },

    #[error("option {option} given more than once")]
    AmbiguousBinding { option: String },
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_option_message_with_description() {
        let err = ParseError::MandatoryOptionMissing {
            option: "--vetId".into(),
            description: Some("vet identifier".into()),
        };
        assert_eq!(
            err.format_message(true),
            "2000E:(pos 0): Missing mandatory option '--vetId', vet identifier"
        );

        let bare = ParseError::MandatoryOptionMissing {
            option: "--vetId".into(),
            description: None,
        };
        assert_eq!(bare.to_string(), "Missing mandatory option '--vetId'");
    }

    #[test]
    fn test_arity_messages() {
        let few = ParseError::NotEnoughOptionArguments {
            option: "--pair".into(),
            min: 2,
            position: 1,
        };
        assert_eq!(few.code(), 2003);
        assert_eq!(
            few.to_string(),
            "Not enough arguments for option '--pair', requires at least '2'"
        );

        let many = ParseError::TooManyOptionArguments {
            option: "--name".into(),
            max: 1,
            position: 3,
        };
        assert_eq!(many.format_message(false), many.to_string());
        assert_eq!(many.position(), Some(3));
    }

    #[test]
    fn test_parse_error_serializes_tagged() {
        let err = ParseError::UnexpectedArgument {
            value: "extra".into(),
            position: 4,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "unexpected_argument");
        assert_eq!(json["value"], "extra");
    }

    #[test]
    fn test_failure_wraps_tokenize_error() {
        let failure: ParseFailure = TokenizeError::EscapedNewline.into();
        assert!(failure.to_string().contains("escape character"));
    }
}
