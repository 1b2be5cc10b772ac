use serde::{Deserialize, Serialize};

use crate::{exact, fuzzy_v1, fuzzy_v2};

/// The match algorithms the engine can run.
///
/// Selection for a user-typed pattern is done by [`Algorithm::select`]; each
/// variant can also be run directly with [`Algorithm::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Contiguous substring match.
    ExactNaive,
    /// Greedy subsequence match.
    FuzzyV1,
    /// Optimal subsequence match (dynamic programming).
    #[default]
    FuzzyV2,
}

/// Pattern prefix that requests an exact substring match.
pub const EXACT_MARKER: char = '\'';

impl Algorithm {
    /// Picks the algorithm for a prepared pattern and strips the exact
    /// marker when present.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_search::Algorithm;
    ///
    /// assert_eq!(Algorithm::select("'foo", Algorithm::FuzzyV2), (Algorithm::ExactNaive, "foo"));
    /// assert_eq!(Algorithm::select("foo", Algorithm::FuzzyV1), (Algorithm::FuzzyV1, "foo"));
    /// ```
    pub fn select(pattern: &str, fuzzy: Algorithm) -> (Algorithm, &str) {
        match pattern.strip_prefix(EXACT_MARKER) {
            Some(rest) => (Algorithm::ExactNaive, rest),
            None => (fuzzy, pattern),
        }
    }

    /// Runs this algorithm.
    ///
    /// The pattern must already be prepared: lowercased when
    /// `case_sensitive` is false and normalized when `normalize` is true.
    /// Positions in the result are character (not byte) indices into `text`.
    pub fn run(
        self,
        case_sensitive: bool,
        normalize: bool,
        forward: bool,
        text: &str,
        pattern: &str,
    ) -> SearchMatchResult {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        self.run_chars(case_sensitive, normalize, forward, &text, &pattern)
    }

    pub(crate) fn run_chars(
        self,
        case_sensitive: bool,
        normalize: bool,
        forward: bool,
        text: &[char],
        pattern: &[char],
    ) -> SearchMatchResult {
        if pattern.is_empty() {
            return SearchMatchResult::empty(self);
        }
        match self {
            Algorithm::ExactNaive => {
                exact::exact_match_naive(case_sensitive, normalize, forward, text, pattern)
            }
            Algorithm::FuzzyV1 => {
                fuzzy_v1::fuzzy_match_v1(case_sensitive, normalize, forward, text, pattern)
            }
            Algorithm::FuzzyV2 => {
                fuzzy_v2::fuzzy_match_v2(case_sensitive, normalize, forward, text, pattern)
            }
        }
    }
}

/// Outcome of matching a pattern against one text.
///
/// `end` is exclusive. A failed match has `start == end == -1`, score 0 and
/// no positions; an empty pattern matches at `0..0` with score 0.
///
/// # Examples
///
/// ```
/// use cmdline_search::{Algorithm, SearchMatchResult};
///
/// let miss = SearchMatchResult::no_match(Algorithm::FuzzyV2);
/// assert!(!miss.is_match());
/// assert_eq!((miss.start, miss.end, miss.score), (-1, -1, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatchResult {
    pub start: i32,
    pub end: i32,
    pub score: i32,
    /// Matched character indices, ascending.
    pub positions: Vec<usize>,
    /// Algorithm that produced this result.
    pub algorithm: Algorithm,
}

impl SearchMatchResult {
    pub(crate) fn new(
        start: usize,
        end: usize,
        score: i32,
        positions: Vec<usize>,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            start: start as i32,
            end: end as i32,
            score,
            positions,
            algorithm,
        }
    }

    pub fn no_match(algorithm: Algorithm) -> Self {
        Self {
            start: -1,
            end: -1,
            score: 0,
            positions: Vec::new(),
            algorithm,
        }
    }

    pub fn empty(algorithm: Algorithm) -> Self {
        Self {
            start: 0,
            end: 0,
            score: 0,
            positions: Vec::new(),
            algorithm,
        }
    }

    pub fn is_match(&self) -> bool {
        self.start >= 0
    }

    /// Matched range as character indices, `None` on no match.
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        if self.is_match() {
            Some(self.start as usize..self.end as usize)
        } else {
            None
        }
    }
}
