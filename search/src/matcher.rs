use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalize::normalize_str;
use crate::result::{Algorithm, SearchMatchResult};

/// Matching options, deserializable from the `search` section of an engine
/// configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    /// Fold accented Latin letters to their base letter.
    pub normalize: bool,
    /// Prefer the leftmost occurrence (`true`) or the rightmost one.
    pub forward: bool,
    /// Algorithm used for patterns without the exact marker.
    pub fuzzy_algorithm: Algorithm,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            normalize: false,
            forward: true,
            fuzzy_algorithm: Algorithm::FuzzyV2,
        }
    }
}

/// A candidate that matched during [`SearchMatch::rank`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedMatch<'a> {
    /// Position of the candidate in the input slice.
    pub index: usize,
    pub candidate: &'a str,
    pub result: SearchMatchResult,
}

/// Configured matcher for user-typed patterns.
///
/// Prepares the pattern (lowercases it unless case-sensitive, normalizes it
/// when requested), selects the algorithm from the pattern's exact marker
/// and runs it.
///
/// # Examples
///
/// ```
/// use cmdline_search::{Algorithm, SearchMatch};
///
/// let matcher = SearchMatch::new().case_sensitive(false);
///
/// let fuzzy = matcher.match_text("fooBarbaz1", "oBZ");
/// assert_eq!((fuzzy.start, fuzzy.end), (2, 9));
/// assert_eq!(fuzzy.algorithm, Algorithm::FuzzyV2);
///
/// let exact = matcher.match_text("fooBarbaz", "'oBA");
/// assert_eq!(exact.positions, vec![2, 3, 4]);
/// assert_eq!(exact.algorithm, Algorithm::ExactNaive);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchMatch {
    config: SearchConfig,
}

impl SearchMatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config.case_sensitive = case_sensitive;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.config.normalize = normalize;
        self
    }

    pub fn forward(mut self, forward: bool) -> Self {
        self.config.forward = forward;
        self
    }

    pub fn fuzzy_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.fuzzy_algorithm = algorithm;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn prepare(&self, pattern: &str) -> String {
        let pattern = if self.config.case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        if self.config.normalize {
            normalize_str(&pattern)
        } else {
            pattern
        }
    }

    /// Matches one text against a raw user pattern.
    pub fn match_text(&self, text: &str, pattern: &str) -> SearchMatchResult {
        let prepared = self.prepare(pattern);
        let (algorithm, pattern) = Algorithm::select(&prepared, self.config.fuzzy_algorithm);
        algorithm.run(
            self.config.case_sensitive,
            self.config.normalize,
            self.config.forward,
            text,
            pattern,
        )
    }

    /// Scores every candidate and returns the matching ones, best score
    /// first. Equal scores keep the input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_search::SearchMatch;
    ///
    /// let names = ["vets list", "visit add", "vets info"];
    /// let ranked = SearchMatch::new().rank(&names, "vi");
    /// let order: Vec<&str> = ranked.iter().map(|r| r.candidate).collect();
    /// assert_eq!(order, vec!["visit add", "vets info", "vets list"]);
    /// ```
    pub fn rank<'a, S>(&self, candidates: &'a [S], pattern: &str) -> Vec<RankedMatch<'a>>
    where
        S: AsRef<str> + Sync,
    {
        let mut ranked: Vec<RankedMatch<'a>> = candidates
            .par_iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                let candidate = candidate.as_ref();
                let result = self.match_text(candidate, pattern);
                result.is_match().then_some(RankedMatch {
                    index,
                    candidate,
                    result,
                })
            })
            .collect();
        ranked.sort_by(|a, b| b.result.score.cmp(&a.result.score));
        debug!(
            pattern,
            candidates = candidates.len(),
            matched = ranked.len(),
            "Ranked candidates"
        );
        ranked
    }
}

/// Matches `pattern` against `text` with the default fuzzy algorithm,
/// selecting exact matching when the pattern starts with `'`.
///
/// The pattern is lowercased when `case_sensitive` is false and normalized
/// when `normalize` is true before matching.
///
/// # Examples
///
/// ```
/// use cmdline_search::match_pattern;
///
/// let result = match_pattern(false, false, true, "fooBarbaz", "'oBA");
/// assert_eq!((result.start, result.end, result.score), (2, 5, 59));
///
/// let miss = match_pattern(false, false, true, "fooBarbaz", "fooBarbazz");
/// assert_eq!((miss.start, miss.end, miss.score), (-1, -1, 0));
/// ```
pub fn match_pattern(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &str,
    pattern: &str,
) -> SearchMatchResult {
    SearchMatch::new()
        .case_sensitive(case_sensitive)
        .normalize(normalize)
        .forward(forward)
        .match_text(text, pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"fuzzy_algorithm": "fuzzy_v1"}"#).unwrap();
        assert_eq!(config.fuzzy_algorithm, Algorithm::FuzzyV1);
        assert!(config.forward);
        assert!(!config.case_sensitive);
    }

    #[test]
    fn test_pattern_prepared_before_selection() {
        let matcher = SearchMatch::new().normalize(true);
        let result = matcher.match_text("Danço", "'DANÇO");
        assert_eq!(result.algorithm, Algorithm::ExactNaive);
        assert_eq!(result.score, 140);
    }

    #[test]
    fn test_empty_pattern_matches_empty_range() {
        let result = match_pattern(false, false, true, "anything", "");
        assert!(result.is_match());
        assert_eq!((result.start, result.end, result.score), (0, 0, 0));
        assert!(result.positions.is_empty());

        let exact = match_pattern(false, false, true, "anything", "'");
        assert_eq!(exact.algorithm, Algorithm::ExactNaive);
        assert_eq!((exact.start, exact.end), (0, 0));
    }

    #[test]
    fn test_rank_filters_and_keeps_tie_order() {
        let candidates = vec!["alpha", "beta", "gamma", "alpha"];
        let ranked = SearchMatch::new().rank(&candidates, "a");
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        // "alpha" matches at the start (boundary bonus), the rest mid-word.
        assert_eq!(indices, vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_v1_configurable() {
        let matcher = SearchMatch::new().fuzzy_algorithm(Algorithm::FuzzyV1);
        let result = matcher.match_text("foo bar baz", "fbb");
        assert_eq!(result.algorithm, Algorithm::FuzzyV1);
        assert_eq!(result.positions, vec![0, 4, 8]);
    }
}
