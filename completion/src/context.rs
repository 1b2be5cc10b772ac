use std::sync::Arc;

use cmdline_core::{CommandArgument, CommandOption, CommandSchema};
use serde::Serialize;

/// What completion providers see: the words of the line, where the cursor
/// is, and what the engine worked out about the command being typed.
///
/// A context is never modified in place. The `with_*` methods and
/// [`drop`](CompletionContext::drop) return new contexts.
///
/// # Examples
///
/// ```
/// use cmdline_completion::CompletionContext;
///
/// let words = vec!["vets".to_string(), "info".to_string(), "--ve".to_string()];
/// let context = CompletionContext::new(words, 2, 4);
/// assert_eq!(context.current_word(), "--ve");
///
/// let args = context.drop(2);
/// assert_eq!(args.words(), ["--ve"]);
/// assert_eq!(args.word_index(), 0);
/// assert_eq!(args.consumed(), ["vets", "info"]);
/// assert_eq!(context.words().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletionContext {
    words: Vec<String>,
    word_index: usize,
    position: usize,
    consumed: Vec<String>,
    command: Option<Arc<CommandSchema>>,
    option: Option<usize>,
    argument: Option<usize>,
}

impl CompletionContext {
    /// Creates a context for `words`, with the cursor `position` characters
    /// into the word at `word_index`.
    pub fn new(words: Vec<String>, word_index: usize, position: usize) -> Self {
        Self {
            words,
            word_index,
            position,
            ..Default::default()
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    /// Cursor offset in characters within the current word.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Words removed by [`drop`](Self::drop), oldest first.
    pub fn consumed(&self) -> &[String] {
        &self.consumed
    }

    /// The word under the cursor, empty past the last word.
    pub fn current_word(&self) -> &str {
        self.words.get(self.word_index).map_or("", String::as_str)
    }

    /// The current word up to the cursor.
    pub fn current_prefix(&self) -> &str {
        let word = self.current_word();
        match word.char_indices().nth(self.position) {
            Some((byte, _)) => &word[..byte],
            None => word,
        }
    }

    /// Words before the current one.
    pub fn preceding_words(&self) -> &[String] {
        &self.words[..self.word_index.min(self.words.len())]
    }

    pub fn command(&self) -> Option<&Arc<CommandSchema>> {
        self.command.as_ref()
    }

    /// The option whose value is being completed.
    pub fn option(&self) -> Option<&CommandOption> {
        let schema = self.command.as_deref()?;
        schema.options.get(self.option?)
    }

    /// The positional argument being completed. Indices past the last
    /// argument land on it when it is variadic.
    pub fn argument(&self) -> Option<&CommandArgument> {
        let schema = self.command.as_deref()?;
        let index = self.argument?;
        schema
            .argument(index)
            .or_else(|| {
                schema
                    .arguments
                    .iter()
                    .max_by_key(|a| a.index)
                    .filter(|a| a.variadic && a.index < index)
            })
    }

    pub fn with_command(mut self, command: Arc<CommandSchema>) -> Self {
        self.command = Some(command);
        self
    }

    pub fn with_option(mut self, index: usize) -> Self {
        self.option = Some(index);
        self.argument = None;
        self
    }

    pub fn with_argument(mut self, index: usize) -> Self {
        self.argument = Some(index);
        self.option = None;
        self
    }

    /// Returns a context without the first `n` words. They move to
    /// [`consumed`](Self::consumed) and the word index shifts with them.
    pub fn drop(&self, n: usize) -> Self {
        let n = n.min(self.words.len());
        let mut consumed = self.consumed.clone();
        consumed.extend_from_slice(&self.words[..n]);
        let position = if self.word_index < n { 0 } else { self.position };
        Self {
            words: self.words[n..].to_vec(),
            word_index: self.word_index.saturating_sub(n),
            position,
            consumed,
            command: self.command.clone(),
            option: self.option,
            argument: self.argument,
        }
    }
}
