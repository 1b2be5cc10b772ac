//! Quote- and escape-aware splitting of an input line into words.
//!
//! The tokenizer keeps the byte span of every word in the raw line, so the
//! line can always be rebuilt from the spans plus the whitespace between
//! them, and it tracks which word the cursor sits in for completion.

use serde::Serialize;
use tracing::trace;

use crate::config::TokenizerConfig;
use crate::error::TokenizeError;

/// How a word was quoted on the line.
///
/// `Single` is reported for `'`, `Double` for any other configured quote
/// character. A word mixing quoted and unquoted text reports the first quote
/// it used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quoting {
    #[default]
    Unquoted,
    Single,
    Double,
}

impl Quoting {
    fn from_quote(quote: char) -> Self {
        if quote == '\'' {
            Quoting::Single
        } else {
            Quoting::Double
        }
    }
}

/// One word of the input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Unescaped text with quotes removed.
    pub value: String,
    /// Byte offset of the raw span in the line.
    pub start: usize,
    /// Byte offset one past the raw span.
    pub end: usize,
    pub quoting: Quoting,
}

impl Token {
    /// The raw text of this word as typed, quotes and escapes included.
    pub fn raw<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }
}

/// A tokenized line together with the cursor's place in it.
///
/// # Examples
///
/// ```
/// use cmdline_parser::Tokenizer;
///
/// let line = r#"greet "John Doe" --lou"#;
/// let parsed = Tokenizer::new().tokenize(line, line.len()).unwrap();
///
/// assert_eq!(parsed.words(), vec!["greet", "John Doe", "--lou"]);
/// assert_eq!(parsed.word_index, 2);
/// assert_eq!(parsed.word_cursor, 5);
/// assert_eq!(parsed.current_word(), Some("--lou"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLine {
    pub line: String,
    /// Cursor as a byte offset, clamped to the line and to a char boundary.
    pub cursor: usize,
    pub tokens: Vec<Token>,
    /// Number of words that end strictly before the cursor.
    pub word_index: usize,
    /// Characters of the current word before the cursor.
    pub word_cursor: usize,
    /// Quote left open at the end of the line (lenient tokenizing only).
    pub open_quote: Option<char>,
    #[serde(skip)]
    escape_char: Option<char>,
    #[serde(skip)]
    quote_chars: Vec<char>,
}

impl ParsedLine {
    /// Unescaped words in line order.
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.value.as_str()).collect()
    }

    /// The word under the cursor, `None` when the cursor is past the last
    /// word or between two words.
    pub fn current_word(&self) -> Option<&str> {
        let token = self.tokens.get(self.word_index)?;
        (token.start <= self.cursor).then_some(token.value.as_str())
    }

    /// The part of the current word left of the cursor, empty when there is
    /// no current word.
    pub fn word_up_to_cursor(&self) -> &str {
        let Some(word) = self.current_word() else {
            return "";
        };
        match word.char_indices().nth(self.word_cursor) {
            Some((byte, _)) => &word[..byte],
            None => word,
        }
    }

    /// Escapes a completion candidate so it can replace the current word.
    ///
    /// Inside an open single quote nothing is escaped. Inside any other open
    /// quote only the escape character and that quote are. Outside quotes,
    /// whitespace, quote characters and the escape character are. When
    /// `complete` is set an open quote is closed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_parser::Tokenizer;
    ///
    /// let plain = Tokenizer::new().tokenize_lenient("open My", 7);
    /// assert_eq!(plain.escape_candidate("My File", true), r"My\ File");
    ///
    /// let quoted = Tokenizer::new().tokenize_lenient("open \"My", 8);
    /// assert_eq!(quoted.escape_candidate("My \"File\"", true), r#"My \"File\"""#);
    /// ```
    pub fn escape_candidate(&self, candidate: &str, complete: bool) -> String {
        let mut out = String::with_capacity(candidate.len() + 2);
        match (self.open_quote, self.escape_char) {
            (Some('\''), _) | (Some(_), None) => out.push_str(candidate),
            (Some(quote), Some(escape)) => {
                for c in candidate.chars() {
                    if c == quote || c == escape {
                        out.push(escape);
                    }
                    out.push(c);
                }
            }
            (None, None) => out.push_str(candidate),
            (None, Some(escape)) => {
                for c in candidate.chars() {
                    if c.is_whitespace() || c == escape || self.quote_chars.contains(&c) {
                        out.push(escape);
                    }
                    out.push(c);
                }
            }
        }
        if complete && let Some(quote) = self.open_quote {
            out.push(quote);
        }
        out
    }
}

struct WordBuilder {
    value: String,
    start: usize,
    quoting: Quoting,
}

impl WordBuilder {
    fn finish(self, end: usize) -> Token {
        Token {
            value: self.value,
            start: self.start,
            end,
            quoting: self.quoting,
        }
    }
}

/// Splits lines into words according to a [`TokenizerConfig`].
///
/// # Examples
///
/// ```
/// use cmdline_parser::{TokenizeError, Tokenizer};
///
/// let tokenizer = Tokenizer::new();
/// let parsed = tokenizer.tokenize(r"cp My\ File 'a b' // trailing 'comment", 0).unwrap();
/// assert_eq!(parsed.words(), vec!["cp", "My File", "a b"]);
///
/// let err = tokenizer.tokenize("echo 'oops", 0).unwrap_err();
/// assert!(matches!(err, TokenizeError::UnclosedQuote { quote: '\'', .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TokenizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenizes `line`, reporting an unclosed quote or a trailing escape
    /// when the configuration asks for it.
    pub fn tokenize(&self, line: &str, cursor: usize) -> Result<ParsedLine, TokenizeError> {
        let (parsed, escaped_newline) = self.scan(line, cursor);
        if let Some(quote) = parsed.open_quote
            && self.config.eof_on_unclosed_quote
        {
            return Err(TokenizeError::UnclosedQuote {
                quote,
                line: line.to_string(),
            });
        }
        if escaped_newline && self.config.eof_on_escaped_newline {
            return Err(TokenizeError::EscapedNewline);
        }
        Ok(parsed)
    }

    /// Tokenizes `line` without ever failing; an unclosed quote is recorded
    /// in [`ParsedLine::open_quote`].
    pub fn tokenize_lenient(&self, line: &str, cursor: usize) -> ParsedLine {
        self.scan(line, cursor).0
    }

    fn scan(&self, line: &str, cursor: usize) -> (ParsedLine, bool) {
        let mut cursor = cursor.min(line.len());
        while !line.is_char_boundary(cursor) {
            cursor -= 1;
        }

        let escape = self.config.escape_char;
        let comment = self.config.comment_marker.as_deref().filter(|m| !m.is_empty());

        let mut tokens = Vec::new();
        let mut word: Option<WordBuilder> = None;
        let mut quote: Option<char> = None;
        let mut word_cursor: Option<usize> = None;
        let mut escaped_newline = false;

        let mut chars = line.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if word_cursor.is_none()
                && let Some(w) = &word
                && w.start < cursor
                && cursor <= i
            {
                word_cursor = Some(w.value.chars().count());
            }

            if let Some(q) = quote {
                if c == q {
                    quote = None;
                } else if Some(c) == escape && q != '\'' {
                    if let Some((_, next)) = chars.next()
                        && let Some(w) = word.as_mut()
                    {
                        w.value.push(next);
                    }
                } else if let Some(w) = word.as_mut() {
                    w.value.push(c);
                }
                continue;
            }

            if c.is_whitespace() {
                if let Some(w) = word.take() {
                    tokens.push(w.finish(i));
                }
                continue;
            }

            if word.is_none() {
                if let Some(marker) = comment
                    && line[i..].starts_with(marker)
                {
                    break;
                }
                word = Some(WordBuilder {
                    value: String::new(),
                    start: i,
                    quoting: Quoting::Unquoted,
                });
            }
            let Some(w) = word.as_mut() else {
                continue;
            };

            if self.config.quote_chars.contains(&c) {
                quote = Some(c);
                if w.quoting == Quoting::Unquoted {
                    w.quoting = Quoting::from_quote(c);
                }
            } else if Some(c) == escape {
                match chars.next() {
                    Some((_, next)) => w.value.push(next),
                    None => {
                        escaped_newline = true;
                        if w.start == i {
                            word = None;
                        }
                    }
                }
            } else {
                w.value.push(c);
            }
        }

        if let Some(w) = word.take() {
            if word_cursor.is_none() && w.start < cursor {
                word_cursor = Some(w.value.chars().count());
            }
            tokens.push(w.finish(line.len()));
        } else if let Some(last) = tokens.last()
            && word_cursor.is_none()
            && last.start < cursor
            && cursor <= last.end
        {
            word_cursor = Some(last.value.chars().count());
        }

        let word_index = tokens.iter().filter(|t| t.end < cursor).count();
        trace!(
            tokens = tokens.len(),
            word_index,
            open_quote = ?quote,
            "Tokenized line"
        );

        let parsed = ParsedLine {
            line: line.to_string(),
            cursor,
            tokens,
            word_index,
            word_cursor: word_cursor.unwrap_or(0),
            open_quote: quote,
            escape_char: escape,
            quote_chars: self.config.quote_chars.clone(),
        };
        (parsed, escaped_newline)
    }
}
