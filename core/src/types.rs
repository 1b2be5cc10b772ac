//! Schema type definitions for registered shell commands.
//!
//! This module defines the in-memory model of a command the shell knows how
//! to run: its name(s), its options and its positional arguments. The types
//! are designed for serialization with [`serde`] so a whole catalog can be
//! declared in JSON or YAML and handed to the registry.

use serde::{Deserialize, Serialize};

/// Version of the catalog contract (semver).
///
/// Embedded in every [`CommandCatalog`](crate::CommandCatalog) to track
/// compatibility across catalog versions.
pub const CATALOG_CONTRACT_VERSION: &str = "1.0.0";

/// Value type for options and arguments.
///
/// Describes which typed value a raw token converts into. Conversion is
/// performed by [`ValueType::convert`](crate::ValueType::convert).
///
/// # Examples
///
/// ```
/// use cmdline_core::ValueType;
///
/// let vt = ValueType::default();
/// assert_eq!(vt, ValueType::Any);
///
/// let colors = ValueType::Enum(vec!["RED".into(), "GREEN".into()]);
/// assert!(colors.is_enum());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// Boolean value (`true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`).
    Bool,
    /// String value.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point number.
    Float,
    /// One of a fixed set of constants (e.g., `RED|GREEN|BLUE`).
    Enum(Vec<String>),
    /// Untyped value, kept as a string (the default).
    #[default]
    Any,
}

impl ValueType {
    /// Returns `true` for [`ValueType::Enum`].
    pub fn is_enum(&self) -> bool {
        matches!(self, ValueType::Enum(_))
    }

    /// Returns the enum constants, or an empty slice for other types.
    pub fn constants(&self) -> &[String] {
        match self {
            ValueType::Enum(values) => values,
            _ => &[],
        }
    }

    /// Short lowercase name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Enum(_) => "enum",
            ValueType::Any => "any",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Enum(values) => write!(f, "enum[{}]", values.join("|")),
            other => f.write_str(other.name()),
        }
    }
}

/// How many value tokens an option consumes.
///
/// # Examples
///
/// ```
/// use cmdline_core::Arity;
///
/// assert_eq!(Arity::None.max(), Some(0));
/// assert_eq!(Arity::ExactlyOne.min(), 1);
/// assert_eq!(Arity::ZeroOrOne.min(), 0);
///
/// let many = Arity::Range { min: 1, max: None };
/// assert_eq!(many.max(), None);
/// assert!(!many.allows_flag_form());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    /// Consumes no values (boolean flag).
    None,
    /// Consumes exactly one value.
    ExactlyOne,
    /// Consumes one value if present.
    ZeroOrOne,
    /// Consumes between `min` and `max` values; `max: None` is unbounded.
    Range {
        /// Minimum number of values.
        min: usize,
        /// Maximum number of values, unbounded when `None`.
        max: Option<usize>,
    },
}

impl Arity {
    /// Minimum number of values.
    pub fn min(&self) -> usize {
        match self {
            Arity::None | Arity::ZeroOrOne => 0,
            Arity::ExactlyOne => 1,
            Arity::Range { min, .. } => *min,
        }
    }

    /// Maximum number of values, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        match self {
            Arity::None => Some(0),
            Arity::ExactlyOne | Arity::ZeroOrOne => Some(1),
            Arity::Range { max, .. } => *max,
        }
    }

    /// Whether the option may appear without any value.
    pub fn allows_flag_form(&self) -> bool {
        self.min() == 0
    }

    /// Whether the option can take more than one value.
    pub fn is_multi_valued(&self) -> bool {
        self.max().is_none_or(|max| max > 1)
    }
}

/// Schema for a command option.
///
/// An option has one or more long names (stored without the leading `--`,
/// first one is primary) and/or short names (single characters, stored
/// without the leading `-`), a value type, an arity and optional metadata.
///
/// Use [`boolean`](CommandOption::boolean) and
/// [`with_value`](CommandOption::with_value) to create options, then chain
/// builder methods.
///
/// # Examples
///
/// ```
/// use cmdline_core::{Arity, CommandOption, ValueType};
///
/// let verbose = CommandOption::boolean(Some('v'), Some("verbose"))
///     .with_description("Enable verbose output");
/// assert_eq!(verbose.primary_name(), "--verbose");
/// assert_eq!(verbose.arity(), Arity::None);
///
/// let name = CommandOption::with_value(Some('n'), Some("name"), ValueType::String)
///     .required();
/// assert!(name.matches("--name"));
/// assert!(name.matches("-n"));
/// assert_eq!(name.arity(), Arity::ExactlyOne);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    /// Long names without the `--` prefix; the first is primary.
    #[serde(default)]
    pub long_names: Vec<String>,
    /// Short names without the `-` prefix.
    #[serde(default)]
    pub short_names: Vec<char>,
    /// Declared value type.
    #[serde(default)]
    pub value_type: ValueType,
    /// Declared arity; derived from the value type when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arity: Option<Arity>,
    /// Whether the option must be given (or defaulted).
    #[serde(default)]
    pub required: bool,
    /// Default value, before conversion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Description shown in completion and error messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Can this option appear multiple times?
    #[serde(default)]
    pub repeatable: bool,
    /// Hidden options are parsed but never proposed by completion.
    #[serde(default)]
    pub hidden: bool,
}

impl CommandOption {
    /// Creates a boolean flag (arity [`Arity::None`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::CommandOption;
    ///
    /// let flag = CommandOption::boolean(Some('f'), Some("force"));
    /// assert!(flag.is_flag());
    /// assert!(flag.matches("-f"));
    /// assert!(flag.matches("--force"));
    /// ```
    pub fn boolean(short: Option<char>, long: Option<&str>) -> Self {
        Self::new(short, long, ValueType::Bool, Arity::None)
    }

    /// Creates an option that takes exactly one value.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::{CommandOption, ValueType};
    ///
    /// let opt = CommandOption::with_value(None, Some("vet-id"), ValueType::Integer);
    /// assert!(!opt.is_flag());
    /// assert_eq!(opt.value_type, ValueType::Integer);
    /// ```
    pub fn with_value(short: Option<char>, long: Option<&str>, value_type: ValueType) -> Self {
        Self::new(short, long, value_type, Arity::ExactlyOne)
    }

    fn new(short: Option<char>, long: Option<&str>, value_type: ValueType, arity: Arity) -> Self {
        Self {
            long_names: long.map(String::from).into_iter().collect(),
            short_names: short.into_iter().collect(),
            value_type,
            arity: Some(arity),
            required: false,
            default_value: None,
            description: None,
            repeatable: false,
            hidden: false,
        }
    }

    /// Adds another long name.
    pub fn with_alias(mut self, long: &str) -> Self {
        self.long_names.push(long.to_string());
        self
    }

    /// Adds another short name.
    pub fn with_short(mut self, short: char) -> Self {
        self.short_names.push(short);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the default value (converted at parse time).
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Overrides the arity.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Marks as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks as allowing multiple occurrences.
    pub fn allow_multiple(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Hides the option from completion.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Effective arity: the declared one, or [`Arity::None`] for booleans and
    /// [`Arity::ExactlyOne`] for everything else.
    pub fn arity(&self) -> Arity {
        self.arity.unwrap_or(match self.value_type {
            ValueType::Bool => Arity::None,
            _ => Arity::ExactlyOne,
        })
    }

    /// Returns `true` when the option never takes a value.
    pub fn is_flag(&self) -> bool {
        self.arity().max() == Some(0)
    }

    /// Returns the canonical name (`--long` preferred, falls back to `-s`).
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::CommandOption;
    ///
    /// let opt = CommandOption::boolean(Some('v'), Some("verbose"));
    /// assert_eq!(opt.primary_name(), "--verbose");
    ///
    /// let short_only = CommandOption::boolean(Some('v'), None);
    /// assert_eq!(short_only.primary_name(), "-v");
    /// ```
    pub fn primary_name(&self) -> String {
        if let Some(long) = self.long_names.first() {
            format!("--{long}")
        } else if let Some(short) = self.short_names.first() {
            format!("-{short}")
        } else {
            "unknown".to_string()
        }
    }

    /// All spellings of this option as they appear on a command line, long
    /// names first.
    pub fn display_names(&self) -> Vec<String> {
        self.long_names
            .iter()
            .map(|l| format!("--{l}"))
            .chain(self.short_names.iter().map(|s| format!("-{s}")))
            .collect()
    }

    /// Checks a long name (without dashes).
    pub fn matches_long(&self, name: &str, case_sensitive: bool) -> bool {
        self.long_names.iter().any(|l| {
            if case_sensitive {
                l == name
            } else {
                l.eq_ignore_ascii_case(name)
            }
        })
    }

    /// Checks a short name.
    pub fn matches_short(&self, short: char) -> bool {
        self.short_names.contains(&short)
    }

    /// Checks if this option matches a command-line spelling (`--long` or
    /// `-s`), case-sensitively.
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            return self.matches_long(long, true);
        }
        if let Some(short) = token.strip_prefix('-') {
            let mut chars = short.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return self.matches_short(c);
            }
        }
        false
    }
}

/// Schema for a positional argument.
///
/// Positional arguments bind in index order to the non-option tokens that
/// follow the command name.
///
/// # Examples
///
/// ```
/// use cmdline_core::{CommandArgument, ValueType};
///
/// let file = CommandArgument::required("file", ValueType::String);
/// assert!(file.required);
///
/// let rest = CommandArgument::optional("rest", ValueType::Any).variadic();
/// assert!(!rest.required);
/// assert!(rest.variadic);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandArgument {
    /// Zero-based position.
    #[serde(default)]
    pub index: usize,
    /// Name used in messages (e.g., "file").
    pub name: String,
    /// Declared value type.
    #[serde(default)]
    pub value_type: ValueType,
    /// Is this argument required?
    #[serde(default)]
    pub required: bool,
    /// Default value, before conversion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Collects every remaining positional token (last argument only).
    #[serde(default)]
    pub variadic: bool,
    /// Description from the registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CommandArgument {
    /// Creates a required positional argument.
    pub fn required(name: &str, value_type: ValueType) -> Self {
        Self {
            index: 0,
            name: name.to_string(),
            value_type,
            required: true,
            default_value: None,
            variadic: false,
            description: None,
        }
    }

    /// Creates an optional positional argument.
    pub fn optional(name: &str, value_type: ValueType) -> Self {
        Self {
            required: false,
            ..Self::required(name, value_type)
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks as collecting all remaining positional values.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// Complete schema for a registered command.
///
/// A command is identified by a primary name and optional aliases. Names may
/// span several words (`"vets info"`); words are separated by single spaces.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
///
/// let schema = CommandSchema::new("vets info")
///     .with_description("Show one vet")
///     .with_option(CommandOption::with_value(None, Some("vetId"), ValueType::Integer).required())
///     .with_argument(CommandArgument::optional("format", ValueType::String));
///
/// assert_eq!(schema.name, "vets info");
/// assert_eq!(schema.word_count(), 2);
/// assert!(schema.find_option("--vetId").is_some());
/// assert_eq!(schema.arguments[0].index, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Primary command name (e.g., "vets info").
    pub name: String,
    /// Alternative names.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Group label used as completion category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Declared options, in declaration order.
    #[serde(default)]
    pub options: Vec<CommandOption>,
    /// Positional arguments, in index order.
    #[serde(default)]
    pub arguments: Vec<CommandArgument>,
    /// Option that turns any invocation into a help request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_option: Option<CommandOption>,
    /// Hidden commands are never proposed by completion.
    #[serde(default)]
    pub hidden: bool,
}

impl CommandSchema {
    /// Creates a new command schema with the given name.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::CommandSchema;
    ///
    /// let schema = CommandSchema::new("hello");
    /// assert_eq!(schema.name, "hello");
    /// assert!(schema.options.is_empty());
    /// ```
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the group label.
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Adds an option.
    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a positional argument at the next free index.
    pub fn with_argument(mut self, mut argument: CommandArgument) -> Self {
        argument.index = self.arguments.len();
        self.arguments.push(argument);
        self
    }

    /// Configures the help option (e.g., `--help`/`-h`).
    pub fn with_help_option(mut self, option: CommandOption) -> Self {
        self.help_option = Some(option);
        self
    }

    /// Hides the command from completion.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Primary name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Number of words in the primary name.
    pub fn word_count(&self) -> usize {
        self.name.split_whitespace().count()
    }

    /// Finds an option by command-line spelling (`--long` or `-s`).
    pub fn find_option(&self, token: &str) -> Option<&CommandOption> {
        self.options.iter().find(|o| o.matches(token))
    }

    /// Finds an option index by long name (without dashes).
    pub fn find_long(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.matches_long(name, case_sensitive))
    }

    /// Finds an option index by short name.
    pub fn find_short(&self, short: char) -> Option<usize> {
        self.options.iter().position(|o| o.matches_short(short))
    }

    /// Returns the argument declared at `index`.
    pub fn argument(&self, index: usize) -> Option<&CommandArgument> {
        self.arguments.iter().find(|a| a.index == index)
    }

    /// Checks whether a command-line spelling names the help option.
    pub fn is_help_token(&self, token: &str) -> bool {
        self.help_option.as_ref().is_some_and(|h| h.matches(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_option_creation() {
        let opt = CommandOption::boolean(Some('v'), Some("verbose"))
            .with_description("Enable verbose output");

        assert_eq!(opt.short_names, vec!['v']);
        assert_eq!(opt.long_names, vec!["verbose".to_string()]);
        assert!(opt.is_flag());
        assert_eq!(opt.primary_name(), "--verbose");
    }

    #[test]
    fn test_arity_derived_from_value_type() {
        let mut opt = CommandOption::with_value(None, Some("count"), ValueType::Integer);
        opt.arity = None;
        assert_eq!(opt.arity(), Arity::ExactlyOne);

        let mut flag = CommandOption::boolean(None, Some("force"));
        flag.arity = None;
        assert_eq!(flag.arity(), Arity::None);
    }

    #[test]
    fn test_option_matches_spellings() {
        let opt = CommandOption::with_value(Some('f'), Some("first"), ValueType::String)
            .with_alias("given");

        assert!(opt.matches("--first"));
        assert!(opt.matches("--given"));
        assert!(opt.matches("-f"));
        assert!(!opt.matches("-fx"));
        assert!(!opt.matches("first"));
        assert!(opt.matches_long("FIRST", false));
        assert!(!opt.matches_long("FIRST", true));
    }

    #[test]
    fn test_display_names_long_first() {
        let opt = CommandOption::boolean(Some('l'), Some("last")).with_short('L');
        assert_eq!(opt.display_names(), vec!["--last", "-l", "-L"]);
    }

    #[test]
    fn test_schema_assigns_argument_indices() {
        let schema = CommandSchema::new("cp")
            .with_argument(CommandArgument::required("source", ValueType::String))
            .with_argument(CommandArgument::required("dest", ValueType::String));

        assert_eq!(schema.argument(0).unwrap().name, "source");
        assert_eq!(schema.argument(1).unwrap().name, "dest");
        assert!(schema.argument(2).is_none());
    }

    #[test]
    fn test_schema_names_and_help() {
        let schema = CommandSchema::new("vets list")
            .with_alias("vl")
            .with_help_option(CommandOption::boolean(Some('h'), Some("help")));

        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["vets list", "vl"]);
        assert!(schema.is_help_token("-h"));
        assert!(schema.is_help_token("--help"));
        assert!(!schema.is_help_token("--halp"));
    }

    #[test]
    fn test_schema_deserializes_with_defaults() {
        let json = r#"{
            "name": "paint",
            "options": [
                {"long_names": ["color"], "value_type": {"Enum": ["RED", "GREEN"]}},
                {"long_names": ["dry-run"], "value_type": "Bool"}
            ]
        }"#;
        let schema: CommandSchema = serde_json::from_str(json).unwrap();

        assert_eq!(schema.options[0].arity(), Arity::ExactlyOne);
        assert_eq!(schema.options[1].arity(), Arity::None);
        assert_eq!(schema.options[0].value_type.constants().len(), 2);
    }
}
