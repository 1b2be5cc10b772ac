use std::collections::HashSet;
use std::sync::Arc;

use cmdline_core::{CommandRegistry, CommandSchema};
use cmdline_parser::{
    ParsedLine, ParserConfig, Tokenizer, is_option_token, option_expecting_values,
    resolve_command,
};
use cmdline_search::SearchMatch;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::CompletionContext;
use crate::proposal::CompletionProposal;
use crate::provider::{
    CommandNameProvider, CompletionProvider, CompositeCompletionProvider, EnumValueProvider,
    OptionNameProvider,
};

/// Completion options, deserializable from the `completion` section of an
/// engine configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Match enum constants and `--long=` option names case-sensitively.
    pub case_sensitive: bool,
    /// Reorder proposals by search score against the word being completed.
    pub rank: bool,
    /// Escape proposal values for insertion on the line.
    pub escape: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            rank: false,
            escape: true,
        }
    }
}

/// Where the cursor sits relative to the resolved command's options.
enum Slot {
    Option(usize),
    Argument(usize),
}

/// Works out whether the words before the cursor leave an option waiting
/// for a value or which positional argument comes next. Option tokens are
/// recognised with the same rules the parser binds with.
fn locate(schema: &CommandSchema, config: &ParserConfig, words: &[String]) -> Slot {
    let mut positional = 0;
    let mut pending: Option<(usize, Option<usize>)> = None;
    let mut separated = false;

    for word in words {
        if separated {
            positional += 1;
            continue;
        }
        if word == "--" && config.argument_separator {
            separated = true;
            pending = None;
            continue;
        }
        if is_option_token(word, schema, config) {
            pending = option_expecting_values(word, schema, config)
                .map(|index| (index, schema.options[index].arity().max()));
            continue;
        }
        match pending {
            Some((index, Some(remaining))) => {
                pending = (remaining > 1).then_some((index, Some(remaining - 1)));
            }
            Some((_, None)) => {}
            None => positional += 1,
        }
    }

    match pending {
        Some((index, _)) => Slot::Option(index),
        None => Slot::Argument(positional),
    }
}

/// Produces completion proposals for a line and cursor.
///
/// The line is tokenized leniently, the command named by the words before
/// the cursor is resolved, and its words are dropped from the context before
/// the providers run. Proposals are deduplicated by value, first one wins.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cmdline_core::*;
/// use cmdline_completion::CompletionEngine;
///
/// let mut registry = CommandRegistry::new();
/// registry.register(CommandSchema::new("vets list")).unwrap();
/// registry
///     .register(
///         CommandSchema::new("vets info")
///             .with_option(CommandOption::with_value(None, Some("vetId"), ValueType::Integer)),
///     )
///     .unwrap();
///
/// let engine = CompletionEngine::new(Arc::new(registry));
///
/// let names: Vec<String> = engine.complete("vets ", 5).into_iter().map(|p| p.value).collect();
/// assert_eq!(names, vec!["info", "list"]);
///
/// let options: Vec<String> = engine.complete("vets info --v", 13).into_iter().map(|p| p.value).collect();
/// assert_eq!(options, vec!["--vetId"]);
/// ```
#[derive(Debug)]
pub struct CompletionEngine {
    registry: Arc<CommandRegistry>,
    tokenizer: Tokenizer,
    parser_config: ParserConfig,
    provider: CompositeCompletionProvider,
    matcher: SearchMatch,
    config: CompletionConfig,
}

impl CompletionEngine {
    /// Creates an engine with the built-in command-name, option-name and
    /// enum-value providers, in that order.
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self::with_config(registry, CompletionConfig::default())
    }

    pub fn with_config(registry: Arc<CommandRegistry>, config: CompletionConfig) -> Self {
        let provider = CompositeCompletionProvider::new()
            .with_provider(CommandNameProvider::new(Arc::clone(&registry)))
            .with_provider(OptionNameProvider)
            .with_provider(EnumValueProvider::new(config.case_sensitive));
        Self {
            registry,
            tokenizer: Tokenizer::new(),
            parser_config: ParserConfig::default(),
            provider,
            matcher: SearchMatch::new(),
            config,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Sets the option rules used to tell option tokens from values. Use the
    /// configuration the line will be parsed with.
    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    /// Sets the matcher used when ranking is enabled.
    pub fn with_matcher(mut self, matcher: SearchMatch) -> Self {
        self.matcher = matcher;
        self
    }

    /// Appends a provider after the built-in ones.
    pub fn with_provider(mut self, provider: impl CompletionProvider + 'static) -> Self {
        self.provider.push(provider);
        self
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Builds the context providers see for `line` and `cursor`.
    pub fn context(&self, line: &str, cursor: usize) -> CompletionContext {
        self.context_from(&self.tokenizer.tokenize_lenient(line, cursor))
    }

    fn context_from(&self, parsed: &ParsedLine) -> CompletionContext {
        let words: Vec<String> = parsed.tokens.iter().map(|t| t.value.clone()).collect();
        let context = CompletionContext::new(words, parsed.word_index, parsed.word_cursor);

        let Some((schema, consumed)) = resolve_command(context.preceding_words(), &self.registry)
        else {
            return context;
        };
        let context = context.with_command(Arc::clone(schema)).drop(consumed);
        match locate(schema, &self.parser_config, context.preceding_words()) {
            Slot::Option(index) => context.with_option(index),
            Slot::Argument(index) => context.with_argument(index),
        }
    }

    /// Completion proposals for the word under `cursor`.
    pub fn complete(&self, line: &str, cursor: usize) -> Vec<CompletionProposal> {
        let parsed = self.tokenizer.tokenize_lenient(line, cursor);
        let context = self.context_from(&parsed);

        let mut seen = HashSet::new();
        let mut proposals: Vec<CompletionProposal> = self
            .provider
            .complete(&context)
            .into_iter()
            .filter(|p| seen.insert(p.value.clone()))
            .collect();

        let prefix = context.current_prefix();
        if self.config.rank && !prefix.is_empty() {
            let values: Vec<&str> = proposals.iter().map(|p| p.value.as_str()).collect();
            let order: Vec<usize> = self
                .matcher
                .rank(&values, prefix)
                .into_iter()
                .map(|r| r.index)
                .collect();
            let mut slots: Vec<Option<CompletionProposal>> =
                proposals.into_iter().map(Some).collect();
            proposals = order
                .into_iter()
                .filter_map(|i| slots.get_mut(i).and_then(Option::take))
                .collect();
        }

        if self.config.escape {
            for proposal in proposals.iter_mut().filter(|p| !p.dont_quote) {
                proposal.value = parsed.escape_candidate(&proposal.value, proposal.complete);
            }
        }

        debug!(
            command = context.command().map(|c| c.name.as_str()),
            word = context.current_word(),
            proposals = proposals.len(),
            "Completed line"
        );
        proposals
    }
}
