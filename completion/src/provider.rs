//! Completion providers.
//!
//! A provider turns a [`CompletionContext`] into proposals and has no other
//! inputs or effects. Plain closures are providers too, so hosts can plug in
//! their own sources (file names, remote identifiers) next to the built-in
//! ones.

use std::collections::BTreeMap;
use std::sync::Arc;

use cmdline_core::{CommandOption, CommandRegistry};

use crate::context::CompletionContext;
use crate::proposal::CompletionProposal;

/// Produces completion proposals for a context.
pub trait CompletionProvider: Send + Sync {
    fn complete(&self, context: &CompletionContext) -> Vec<CompletionProposal>;
}

impl<F> CompletionProvider for F
where
    F: Fn(&CompletionContext) -> Vec<CompletionProposal> + Send + Sync,
{
    fn complete(&self, context: &CompletionContext) -> Vec<CompletionProposal> {
        self(context)
    }
}

fn starts_with(candidate: &str, prefix: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        candidate.starts_with(prefix)
    } else {
        candidate
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }
}

/// Runs several providers and concatenates their proposals in the order the
/// providers were added. Proposals are never re-sorted.
///
/// # Examples
///
/// ```
/// use cmdline_completion::*;
///
/// let composite = CompositeCompletionProvider::new()
///     .with_provider(|_: &CompletionContext| vec![CompletionProposal::new("x"), CompletionProposal::new("y")])
///     .with_provider(|_: &CompletionContext| vec![CompletionProposal::new("z")]);
///
/// let values: Vec<String> = composite
///     .complete(&CompletionContext::default())
///     .into_iter()
///     .map(|p| p.value)
///     .collect();
/// assert_eq!(values, vec!["x", "y", "z"]);
/// ```
#[derive(Default)]
pub struct CompositeCompletionProvider {
    providers: Vec<Box<dyn CompletionProvider>>,
}

impl CompositeCompletionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl CompletionProvider + 'static) -> Self {
        self.push(provider);
        self
    }

    pub fn push(&mut self, provider: impl CompletionProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for CompositeCompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeCompletionProvider")
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl CompletionProvider for CompositeCompletionProvider {
    fn complete(&self, context: &CompletionContext) -> Vec<CompletionProposal> {
        self.providers
            .iter()
            .flat_map(|p| p.complete(context))
            .collect()
    }
}

/// Completes command names one word at a time.
///
/// For `vets li` with `vets list` and `vets info` registered, proposes
/// `list`. Names are matched against the consumed words plus the words
/// before the cursor, so subcommands of an already resolved command are
/// offered too. Hidden commands are skipped.
#[derive(Debug, Clone)]
pub struct CommandNameProvider {
    registry: Arc<CommandRegistry>,
}

impl CommandNameProvider {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }
}

impl CompletionProvider for CommandNameProvider {
    fn complete(&self, context: &CompletionContext) -> Vec<CompletionProposal> {
        let typed: Vec<&str> = context
            .consumed()
            .iter()
            .chain(context.preceding_words())
            .map(String::as_str)
            .collect();
        let prefix = context.current_prefix();

        // segment -> (completes a full name, schema description, group)
        let mut segments: BTreeMap<&str, (bool, Option<&str>, Option<&str>)> = BTreeMap::new();
        for schema in self.registry.commands().filter(|s| !s.hidden) {
            for name in schema.names() {
                let words: Vec<&str> = name.split(' ').collect();
                if words.len() <= typed.len() || words[..typed.len()] != typed[..] {
                    continue;
                }
                let segment = words[typed.len()];
                if !segment.starts_with(prefix) {
                    continue;
                }
                let full = words.len() == typed.len() + 1;
                let entry = segments.entry(segment).or_insert((false, None, None));
                if full {
                    *entry = (
                        true,
                        schema.description.as_deref(),
                        schema.group.as_deref(),
                    );
                }
            }
        }

        segments
            .into_iter()
            .map(|(segment, (full, description, group))| {
                let mut proposal = CompletionProposal::new(segment);
                if full && let Some(description) = description {
                    proposal = proposal.with_description(description);
                }
                if let Some(group) = group {
                    proposal = proposal.with_category(group);
                }
                proposal
            })
            .collect()
    }
}

/// Completes option names of the resolved command.
///
/// Options already present on the line are skipped unless repeatable.
/// Presence is decided from the tokenized words, so `--colorful` does not
/// hide `--color`. Nothing is proposed while an option value is expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionNameProvider;

impl OptionNameProvider {
    fn is_present(option: &CommandOption, context: &CompletionContext) -> bool {
        context
            .words()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != context.word_index())
            .any(|(_, word)| {
                let spelled = word.split_once('=').map_or(word.as_str(), |(name, _)| name);
                option.matches(spelled)
            })
    }
}

impl CompletionProvider for OptionNameProvider {
    fn complete(&self, context: &CompletionContext) -> Vec<CompletionProposal> {
        let Some(schema) = context.command() else {
            return Vec::new();
        };
        if context.option().is_some() {
            return Vec::new();
        }
        let prefix = context.current_prefix();
        if !prefix.is_empty() && !prefix.starts_with('-') {
            return Vec::new();
        }

        schema
            .options
            .iter()
            .filter(|o| !o.hidden)
            .filter(|o| o.repeatable || !Self::is_present(o, context))
            .flat_map(|option| {
                option
                    .display_names()
                    .into_iter()
                    .filter(move |name| name.starts_with(prefix))
                    .map(move |name| {
                        let proposal = CompletionProposal::new(name).with_category("Options");
                        match &option.description {
                            Some(description) => proposal.with_description(description.clone()),
                            None => proposal,
                        }
                    })
            })
            .collect()
    }
}

/// Completes enum constants for option values and positional arguments.
///
/// Handles three shapes: a value word after an enum option (`--color R`), a
/// value attached with `=` (`--color=R`, proposals keep the `--color=`
/// prefix), and an enum-typed positional argument.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cmdline_core::*;
/// use cmdline_completion::*;
///
/// let schema = CommandSchema::new("paint").with_option(CommandOption::with_value(
///     None,
///     Some("color"),
///     ValueType::Enum(vec!["RED".into(), "GREEN".into(), "BLUE".into()]),
/// ));
/// let context = CompletionContext::new(vec!["--color=".into()], 0, 8)
///     .with_command(Arc::new(schema));
///
/// let values: Vec<String> = EnumValueProvider::new(false)
///     .complete(&context)
///     .into_iter()
///     .map(|p| p.value)
///     .collect();
/// assert_eq!(values, vec!["--color=RED", "--color=GREEN", "--color=BLUE"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumValueProvider {
    case_sensitive: bool,
}

impl EnumValueProvider {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    fn proposals(
        &self,
        constants: &[String],
        prefix: &str,
        to_proposal: impl Fn(&String) -> CompletionProposal,
    ) -> Vec<CompletionProposal> {
        constants
            .iter()
            .filter(|c| starts_with(c, prefix, self.case_sensitive))
            .map(to_proposal)
            .collect()
    }
}

impl CompletionProvider for EnumValueProvider {
    fn complete(&self, context: &CompletionContext) -> Vec<CompletionProposal> {
        let Some(schema) = context.command() else {
            return Vec::new();
        };
        let prefix = context.current_prefix();

        if let Some(body) = prefix.strip_prefix("--")
            && let Some((name, value)) = body.split_once('=')
        {
            let Some(option) = schema
                .find_long(name, self.case_sensitive)
                .map(|i| &schema.options[i])
            else {
                return Vec::new();
            };
            let key = &prefix[..prefix.len() - value.len()];
            return self.proposals(option.value_type.constants(), value, |c| {
                CompletionProposal::new(format!("{key}{c}")).with_display(c.clone())
            });
        }

        let value_type = match (context.option(), context.argument()) {
            (Some(option), _) => &option.value_type,
            (None, Some(argument)) if !prefix.starts_with('-') => &argument.value_type,
            _ => return Vec::new(),
        };
        self.proposals(value_type.constants(), prefix, |c| {
            CompletionProposal::new(c.clone())
        })
    }
}
