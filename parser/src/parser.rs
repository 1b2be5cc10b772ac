//! Binding of tokens to a registered command's options and arguments.

use std::sync::Arc;

use cmdline_core::{
    CommandArgument, CommandOption, CommandRegistry, CommandSchema, TypedValue, ValueType,
};
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::error::{ParseError, ParseFailure, Result};
use crate::result::{Binding, BindingTarget, ParseResult, RawValue, ValueSource};
use crate::tokenizer::Tokenizer;

/// Finds the longest registered command name made of the leading tokens.
///
/// Returns the schema and how many tokens its name spans. Scanning stops at
/// the first option token or as soon as the words read so far cannot start
/// any longer registered name.
///
/// # Examples
///
/// ```
/// use cmdline_core::{CommandRegistry, CommandSchema};
/// use cmdline_parser::resolve_command;
///
/// let mut registry = CommandRegistry::new();
/// registry.register(CommandSchema::new("vets")).unwrap();
/// registry.register(CommandSchema::new("vets info")).unwrap();
///
/// let (schema, consumed) = resolve_command(&["vets", "info", "3"], &registry).unwrap();
/// assert_eq!((schema.name.as_str(), consumed), ("vets info", 2));
///
/// let (schema, consumed) = resolve_command(&["vets", "3"], &registry).unwrap();
/// assert_eq!((schema.name.as_str(), consumed), ("vets", 1));
/// ```
pub fn resolve_command<'r, S: AsRef<str>>(
    tokens: &[S],
    registry: &'r CommandRegistry,
) -> Option<(&'r Arc<CommandSchema>, usize)> {
    let mut best = None;
    let mut name = String::new();
    for (i, token) in tokens.iter().enumerate() {
        let word = token.as_ref();
        if word.is_empty() || word.starts_with('-') || word.contains(char::is_whitespace) {
            break;
        }
        if i > 0 {
            name.push(' ');
        }
        name.push_str(word);
        if let Some(schema) = registry.by_name(&name) {
            best = Some((schema, i + 1));
        }
        if !registry.is_name_prefix(&name) {
            break;
        }
    }
    best
}

/// Parses token lists against a [`CommandRegistry`].
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
/// use cmdline_parser::CommandParser;
///
/// let mut registry = CommandRegistry::new();
/// registry
///     .register(
///         CommandSchema::new("vets info")
///             .with_option(CommandOption::with_value(None, Some("vetId"), ValueType::Integer).required()),
///     )
///     .unwrap();
///
/// let result = CommandParser::new()
///     .parse(&["vets", "info", "--vetId", "3"], &registry)
///     .unwrap();
/// assert!(result.is_ok());
/// assert_eq!(result.command_name(), Some("vets info"));
/// assert_eq!(result.option_value("vetId"), Some(&TypedValue::Integer(3)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    config: ParserConfig,
    tokenizer: Tokenizer,
}

impl CommandParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Replaces the tokenizer used by [`parse_line`](Self::parse_line).
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Tokenizes a whole line and parses it.
    pub fn parse_line(&self, line: &str, registry: &CommandRegistry) -> Result<ParseResult> {
        let parsed = self.tokenizer.tokenize(line, line.len())?;
        self.parse(&parsed.words(), registry)
    }

    /// Resolves the command named by the leading tokens and binds the rest.
    ///
    /// Input problems are collected on the result. `Err` is returned only
    /// for failures that abort parsing, see [`ParseFailure`].
    pub fn parse<S: AsRef<str>>(
        &self,
        tokens: &[S],
        registry: &CommandRegistry,
    ) -> Result<ParseResult> {
        let Some((schema, consumed)) = resolve_command(tokens, registry) else {
            let input = tokens
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(" ");
            debug!(input = %input, "No command matched");
            return Ok(ParseResult::failed(ParseError::NoCommand { input }));
        };
        debug!(command = %schema.name, consumed, "Resolved command");

        let args = &tokens[consumed..];
        if self.asks_for_help(schema, args) {
            return self.help(schema, registry);
        }
        self.bind_at(schema, args, consumed)
    }

    /// Binds arguments (the tokens after the command name) to a schema.
    pub fn bind<S: AsRef<str>>(
        &self,
        schema: &Arc<CommandSchema>,
        args: &[S],
    ) -> Result<ParseResult> {
        self.bind_at(schema, args, 0)
    }

    fn asks_for_help<S: AsRef<str>>(&self, schema: &CommandSchema, args: &[S]) -> bool {
        args.iter()
            .map(AsRef::as_ref)
            .take_while(|t| !(self.config.argument_separator && *t == "--"))
            .any(|t| schema.is_help_token(t))
    }

    fn help(&self, schema: &Arc<CommandSchema>, registry: &CommandRegistry) -> Result<ParseResult> {
        let help = self.config.help_command.as_str();
        if schema.name != help && registry.contains(help) {
            debug!(command = %schema.name, help, "Redirecting to help command");
            let mut tokens: Vec<&str> = help.split(' ').collect();
            tokens.push("--command");
            tokens.push(&schema.name);
            let mut result = self.parse(&tokens, registry)?;
            result.help_requested = true;
            return Ok(result);
        }
        Ok(ParseResult {
            command: Some(Arc::clone(schema)),
            help_requested: true,
            ..Default::default()
        })
    }

    fn bind_at<S: AsRef<str>>(
        &self,
        schema: &Arc<CommandSchema>,
        args: &[S],
        offset: usize,
    ) -> Result<ParseResult> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let mut binder = Binder::new(&self.config, schema, offset);
        binder.scan(&args);
        let (bindings, errors) = binder.finish()?;
        debug!(
            command = %schema.name,
            bindings = bindings.len(),
            errors = errors.len(),
            "Bound arguments"
        );
        Ok(ParseResult {
            command: Some(Arc::clone(schema)),
            bindings,
            errors,
            help_requested: false,
        })
    }
}

/// Returns `true` when `token` is read as an option, or as the `--`
/// separator when that is enabled, rather than as a value.
///
/// A negative number is a value unless its first character is a short
/// option of `schema`.
///
/// # Examples
///
/// ```
/// use cmdline_core::{CommandOption, CommandSchema, ValueType};
/// use cmdline_parser::{ParserConfig, is_option_token};
///
/// let schema = CommandSchema::new("move")
///     .with_option(CommandOption::with_value(None, Some("offset"), ValueType::Float));
/// let config = ParserConfig::default();
///
/// assert!(is_option_token("--offset", &schema, &config));
/// assert!(is_option_token("-x", &schema, &config));
/// assert!(!is_option_token("-1.5", &schema, &config));
/// assert!(!is_option_token("-", &schema, &config));
/// ```
pub fn is_option_token(token: &str, schema: &CommandSchema, config: &ParserConfig) -> bool {
    if token == "--" {
        return config.argument_separator;
    }
    let Some(body) = token.strip_prefix('-') else {
        return false;
    };
    let Some(first) = body.chars().next() else {
        return false;
    };
    if first == '-' {
        return true;
    }
    let numeric = (first.is_ascii_digit() || first == '.') && body.parse::<f64>().is_ok();
    !numeric || schema.find_short(first).is_some()
}

/// The option an option token leaves waiting for values in the following
/// tokens, if any.
///
/// `None` for values, flags, help tokens, unknown names and values attached
/// with `=` or glued to a short option.
pub fn option_expecting_values(
    token: &str,
    schema: &CommandSchema,
    config: &ParserConfig,
) -> Option<usize> {
    if token == "--" || !is_option_token(token, schema, config) || schema.is_help_token(token) {
        return None;
    }
    let index = match token.strip_prefix("--") {
        Some(body) if body.contains('=') => return None,
        Some(body) => schema.find_long(body, config.case_sensitive_options)?,
        None => {
            let body = &token[1..];
            if body.chars().nth(1).is_some() && !config.combined_short_options {
                return None;
            }
            let mut last = None;
            for (offset, short) in body.char_indices() {
                let Some(index) = schema.find_short(short) else {
                    continue;
                };
                if offset + short.len_utf8() == body.len() {
                    last = Some(index);
                } else if !schema.options[index].is_flag() {
                    return None;
                }
            }
            last?
        }
    };
    (!schema.options[index].is_flag()).then_some(index)
}

/// One appearance of an option on the line.
struct Occurrence<'t> {
    spelled: String,
    values: Vec<&'t str>,
    position: usize,
    /// Arity was violated; the option counts as present but is not bound.
    failed: bool,
}

struct Binder<'a, 't> {
    config: &'a ParserConfig,
    schema: &'a CommandSchema,
    offset: usize,
    occurrences: Vec<Vec<Occurrence<'t>>>,
    positionals: Vec<(usize, &'t str)>,
    errors: Vec<ParseError>,
}

impl<'a, 't> Binder<'a, 't> {
    fn new(config: &'a ParserConfig, schema: &'a CommandSchema, offset: usize) -> Self {
        Self {
            config,
            schema,
            offset,
            occurrences: schema.options.iter().map(|_| Vec::new()).collect(),
            positionals: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn is_option_token(&self, token: &str) -> bool {
        is_option_token(token, self.schema, self.config)
    }

    fn scan(&mut self, args: &[&'t str]) {
        let mut positional_only = false;
        let mut next = 0;
        while next < args.len() {
            let token = args[next];
            let position = self.offset + next;
            next += 1;

            if positional_only {
                self.positionals.push((position, token));
            } else if token == "--" && self.config.argument_separator {
                positional_only = true;
            } else if !self.is_option_token(token) {
                self.positionals.push((position, token));
            } else if self.schema.is_help_token(token) {
                continue;
            } else if let Some(body) = token.strip_prefix("--") {
                next = self.long_option(body, args, next, position);
            } else {
                next = self.short_options(&token[1..], args, next, position);
            }
        }
    }

    fn long_option(&mut self, body: &'t str, args: &[&'t str], next: usize, position: usize) -> usize {
        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let spelled = format!("--{name}");
        match self.schema.find_long(name, self.config.case_sensitive_options) {
            Some(index) => self.take_option(index, spelled, attached, args, next, position),
            None => {
                self.errors.push(ParseError::UnrecognisedOption {
                    option: spelled,
                    position,
                });
                next
            }
        }
    }

    fn short_options(&mut self, body: &'t str, args: &[&'t str], next: usize, position: usize) -> usize {
        if body.chars().nth(1).is_some() && !self.config.combined_short_options {
            self.errors.push(ParseError::UnrecognisedOption {
                option: format!("-{body}"),
                position,
            });
            return next;
        }

        for (offset, short) in body.char_indices() {
            let spelled = format!("-{short}");
            let Some(index) = self.schema.find_short(short) else {
                self.errors.push(ParseError::UnrecognisedOption {
                    option: spelled,
                    position,
                });
                continue;
            };
            let rest = &body[offset + short.len_utf8()..];
            if rest.is_empty() {
                return self.take_option(index, spelled, None, args, next, position);
            }
            if self.schema.options[index].is_flag() {
                self.occurrences[index].push(Occurrence {
                    spelled,
                    values: Vec::new(),
                    position,
                    failed: false,
                });
                continue;
            }
            let attached = rest.strip_prefix('=').unwrap_or(rest);
            return self.take_option(index, spelled, Some(attached), args, next, position);
        }
        next
    }

    fn take_option(
        &mut self,
        index: usize,
        spelled: String,
        attached: Option<&'t str>,
        args: &[&'t str],
        mut next: usize,
        position: usize,
    ) -> usize {
        let schema = self.schema;
        let option = &schema.options[index];
        let arity = option.arity();
        let max = arity.max();
        let mut values = Vec::new();
        let mut failed = false;

        match attached {
            Some(_) if max == Some(0) && option.value_type != ValueType::Bool => {
                self.errors.push(ParseError::TooManyOptionArguments {
                    option: spelled.clone(),
                    max: 0,
                    position,
                });
                failed = true;
            }
            Some(value) => values.push(value),
            None if max == Some(0) => {}
            None => {
                let start = next;
                while next < args.len() && !self.is_option_token(args[next]) {
                    next += 1;
                }
                let found = &args[start..next];
                let take = max.map_or(found.len(), |m| m.min(found.len()));
                values.extend_from_slice(&found[..take]);

                if take < found.len() {
                    let last = next == args.len() || args[next] == "--";
                    if !last {
                        self.errors.push(ParseError::TooManyOptionArguments {
                            option: spelled.clone(),
                            max: take,
                            position,
                        });
                    }
                    for (k, extra) in found[take..].iter().enumerate() {
                        self.positionals
                            .push((self.offset + start + take + k, *extra));
                    }
                }
            }
        }

        if !failed && values.len() < arity.min() {
            self.errors.push(ParseError::NotEnoughOptionArguments {
                option: spelled.clone(),
                min: arity.min(),
                position,
            });
            failed = true;
        }

        trace!(option = %spelled, values = values.len(), failed, "Collected option");
        self.occurrences[index].push(Occurrence {
            spelled,
            values,
            position,
            failed,
        });
        next
    }

    /// Converts raw text, recording the failure instead of aborting when not
    /// in strict mode.
    fn convert(
        &mut self,
        name: &str,
        value_type: &ValueType,
        raw: &str,
        position: Option<usize>,
    ) -> Result<Option<TypedValue>> {
        match value_type.convert(raw) {
            Ok(value) => Ok(Some(value)),
            Err(source) if self.config.strict => Err(ParseFailure::Conversion {
                target: name.to_string(),
                source,
            }),
            Err(source) => {
                self.errors.push(ParseError::IllegalOptionValue {
                    option: name.to_string(),
                    value: source.value,
                    reason: source.reason,
                    position,
                });
                Ok(None)
            }
        }
    }

    fn occurrence_value(
        &mut self,
        option: &CommandOption,
        occurrence: &Occurrence<'t>,
    ) -> Result<Option<TypedValue>> {
        if occurrence.values.is_empty() {
            return match (&option.value_type, &option.default_value) {
                (ValueType::Bool, _) => Ok(Some(TypedValue::Bool(true))),
                (value_type, Some(default)) => {
                    self.convert(&occurrence.spelled, value_type, default, None)
                }
                (_, None) => Ok(Some(TypedValue::Unit)),
            };
        }

        let mut converted = Vec::with_capacity(occurrence.values.len());
        for raw in &occurrence.values {
            match self.convert(
                &occurrence.spelled,
                &option.value_type,
                raw,
                Some(occurrence.position),
            )? {
                Some(value) => converted.push(value),
                None => return Ok(None),
            }
        }
        Ok(Some(match converted.len() {
            1 if !option.arity().is_multi_valued() => converted.swap_remove(0),
            _ => TypedValue::List(converted),
        }))
    }

    fn finish(mut self) -> Result<(Vec<Binding>, Vec<ParseError>)> {
        let schema = self.schema;
        let mut bindings = Vec::new();

        for (index, option) in schema.options.iter().enumerate() {
            let target = BindingTarget::Option(index);
            let name = option.primary_name();
            let mut occurrences = std::mem::take(&mut self.occurrences[index]);

            if occurrences.is_empty() {
                if let Some(default) = &option.default_value {
                    if let Some(value) = self.convert(&name, &option.value_type, default, None)? {
                        bindings.push(Binding {
                            target,
                            name,
                            raw: RawValue::Single(default.clone()),
                            value,
                            source: ValueSource::Default,
                        });
                    }
                } else if option.required {
                    self.errors.push(ParseError::MandatoryOptionMissing {
                        option: name,
                        description: option.description.clone(),
                    });
                }
                continue;
            }

            if occurrences.len() > 1 && !option.repeatable {
                if self.config.strict {
                    return Err(ParseFailure::AmbiguousBinding { option: name });
                }
                for extra in &occurrences[1..] {
                    self.errors.push(ParseError::DuplicateOption {
                        option: extra.spelled.clone(),
                        position: extra.position,
                    });
                }
                occurrences.truncate(1);
            }

            let mut raw = Vec::new();
            let mut values = Vec::new();
            for occurrence in occurrences.iter().filter(|o| !o.failed) {
                if let Some(value) = self.occurrence_value(option, occurrence)? {
                    raw.extend(occurrence.values.iter().map(|v| v.to_string()));
                    values.push(value);
                }
            }

            let value = match values.len() {
                0 => continue,
                1 => values.swap_remove(0),
                _ => TypedValue::List(
                    values
                        .into_iter()
                        .flat_map(|v| match v {
                            TypedValue::List(items) => items,
                            other => vec![other],
                        })
                        .collect(),
                ),
            };
            let raw = match raw.len() {
                0 => RawValue::Flag,
                1 if !matches!(value, TypedValue::List(_)) => RawValue::Single(raw.swap_remove(0)),
                _ => RawValue::Multiple(raw),
            };
            bindings.push(Binding {
                target,
                name,
                raw,
                value,
                source: ValueSource::CommandLine,
            });
        }

        let mut arguments: Vec<&CommandArgument> = schema.arguments.iter().collect();
        arguments.sort_by_key(|a| a.index);

        let mut positionals = std::mem::take(&mut self.positionals).into_iter();
        for argument in arguments {
            let target = BindingTarget::Argument(argument.index);

            if argument.variadic {
                let rest: Vec<(usize, &str)> = positionals.by_ref().collect();
                if !rest.is_empty() {
                    let mut items = Vec::with_capacity(rest.len());
                    for (position, raw) in &rest {
                        if let Some(value) =
                            self.convert(&argument.name, &argument.value_type, raw, Some(*position))?
                        {
                            items.push(value);
                        }
                    }
                    if items.len() == rest.len() {
                        bindings.push(Binding {
                            target,
                            name: argument.name.clone(),
                            raw: RawValue::Multiple(rest.iter().map(|(_, r)| r.to_string()).collect()),
                            value: TypedValue::List(items),
                            source: ValueSource::CommandLine,
                        });
                    }
                    continue;
                }
            } else if let Some((position, raw)) = positionals.next() {
                if let Some(value) =
                    self.convert(&argument.name, &argument.value_type, raw, Some(position))?
                {
                    bindings.push(Binding {
                        target,
                        name: argument.name.clone(),
                        raw: RawValue::Single(raw.to_string()),
                        value,
                        source: ValueSource::CommandLine,
                    });
                }
                continue;
            }

            if let Some(default) = &argument.default_value {
                if let Some(value) =
                    self.convert(&argument.name, &argument.value_type, default, None)?
                {
                    bindings.push(Binding {
                        target,
                        name: argument.name.clone(),
                        raw: RawValue::Single(default.clone()),
                        value: if argument.variadic {
                            TypedValue::List(vec![value])
                        } else {
                            value
                        },
                        source: ValueSource::Default,
                    });
                }
            } else if argument.required {
                self.errors.push(ParseError::MandatoryArgumentMissing {
                    argument: argument.name.clone(),
                    description: argument.description.clone(),
                });
            }
        }

        for (position, value) in positionals {
            self.errors.push(ParseError::UnexpectedArgument {
                value: value.to_string(),
                position,
            });
        }

        Ok((bindings, self.errors))
    }
}
