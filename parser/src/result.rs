//! Output of the command parser.

use std::sync::Arc;

use cmdline_core::{CommandSchema, TypedValue};
use serde::Serialize;

use crate::error::ParseError;

/// What a binding was bound to: an option or an argument, by its index in
/// the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum BindingTarget {
    Option(usize),
    Argument(usize),
}

/// The raw text a binding was converted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// The option appeared without a value.
    Flag,
    Single(String),
    Multiple(Vec<String>),
}

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    CommandLine,
    Default,
}

/// One option or argument with its raw and converted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub target: BindingTarget,
    /// `--long`/`-s` for options, the argument name for arguments.
    pub name: String,
    pub raw: RawValue,
    pub value: TypedValue,
    pub source: ValueSource,
}

/// The resolved command, its bindings and every input problem found.
///
/// A result is usable when [`is_ok`](ParseResult::is_ok) holds; otherwise
/// [`errors`](ParseResult::errors) lists what is wrong in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    pub command: Option<Arc<CommandSchema>>,
    pub bindings: Vec<Binding>,
    pub errors: Vec<ParseError>,
    /// The line asked for help instead of running the command.
    pub help_requested: bool,
}

impl ParseResult {
    pub(crate) fn failed(error: ParseError) -> Self {
        Self {
            errors: vec![error],
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.command.is_some() && self.errors.is_empty()
    }

    pub fn command_name(&self) -> Option<&str> {
        self.command.as_deref().map(|c| c.name.as_str())
    }

    fn option_index(&self, name: &str) -> Option<usize> {
        let schema = self.command.as_deref()?;
        if name.starts_with('-') {
            return schema.options.iter().position(|o| o.matches(name));
        }
        schema.find_long(name, true).or_else(|| {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(short), None) => schema.find_short(short),
                _ => None,
            }
        })
    }

    /// The binding of an option, looked up by `--long`, `-s`, or a bare
    /// long or short name.
    pub fn option(&self, name: &str) -> Option<&Binding> {
        let index = self.option_index(name)?;
        self.bindings
            .iter()
            .find(|b| b.target == BindingTarget::Option(index))
    }

    pub fn option_value(&self, name: &str) -> Option<&TypedValue> {
        self.option(name).map(|b| &b.value)
    }

    /// The binding of a positional argument, looked up by name.
    pub fn argument(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| matches!(b.target, BindingTarget::Argument(_)) && b.name == name)
    }

    pub fn argument_value(&self, name: &str) -> Option<&TypedValue> {
        self.argument(name).map(|b| &b.value)
    }

    /// Error messages in input order, optionally with their codes.
    pub fn format_errors(&self, use_code: bool) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| e.format_message(use_code))
            .collect()
    }
}
