use crate::result::{Algorithm, SearchMatchResult};
use crate::scoring::{ascii_fuzzy_index, calculate_score, fold, index_at};

/// Greedy subsequence match.
///
/// Scans once in the requested direction until every pattern character has
/// been seen, then walks back from the end of that window to find the
/// tightest start. The window is scored with the shared scoring rules.
pub(crate) fn fuzzy_match_v1(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &[char],
    pattern: &[char],
) -> SearchMatchResult {
    if ascii_fuzzy_index(text, pattern, case_sensitive).is_none() {
        return SearchMatchResult::no_match(Algorithm::FuzzyV1);
    }

    let n = text.len();
    let m = pattern.len();
    let at = |index: usize| fold(text[index_at(index, n, forward)], case_sensitive, normalize);

    let mut pidx = 0;
    let mut sidx = None;
    let mut eidx = None;
    for index in 0..n {
        if at(index) == pattern[index_at(pidx, m, forward)] {
            sidx.get_or_insert(index);
            pidx += 1;
            if pidx == m {
                eidx = Some(index + 1);
                break;
            }
        }
    }

    let (Some(mut sidx), Some(eidx)) = (sidx, eidx) else {
        return SearchMatchResult::no_match(Algorithm::FuzzyV1);
    };

    let mut pidx = m as isize - 1;
    for index in (sidx..eidx).rev() {
        if at(index) == pattern[index_at(pidx as usize, m, forward)] {
            pidx -= 1;
            if pidx < 0 {
                sidx = index;
                break;
            }
        }
    }

    let (sidx, eidx) = if forward {
        (sidx, eidx)
    } else {
        (n - eidx, n - sidx)
    };
    let (score, positions) = calculate_score(case_sensitive, normalize, text, pattern, sidx, eidx);
    SearchMatchResult::new(sidx, eidx, score, positions, Algorithm::FuzzyV1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::*;

    fn v1(case_sensitive: bool, normalize: bool, forward: bool, text: &str, pattern: &str) -> SearchMatchResult {
        let pattern = if case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        Algorithm::FuzzyV1.run(case_sensitive, normalize, forward, text, &pattern)
    }

    /// Checks the expectation in both scan directions.
    fn assert_both(case_sensitive: bool, text: &str, pattern: &str, start: i32, end: i32, positions: &[usize], score: i32) {
        for forward in [true, false] {
            let result = v1(case_sensitive, false, forward, text, pattern);
            assert_eq!(
                (result.start, result.end),
                (start, end),
                "{text:?} / {pattern:?} forward={forward}"
            );
            assert_eq!(result.positions, positions, "{text:?} forward={forward}");
            assert_eq!(result.score, score, "{text:?} forward={forward}");
        }
    }

    #[test]
    fn test_case_insensitive_vectors() {
        assert_both(false, "fooBarbaz1", "oBZ", 2, 9, &[2, 3, 8],
            SCORE_MATCH * 3 + BONUS_CAMEL123 + SCORE_GAP_START + SCORE_GAP_EXTENSION * 3);
        assert_both(false, "foo bar baz", "fbb", 0, 9, &[0, 4, 8],
            SCORE_MATCH * 3 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_BOUNDARY_WHITE * 2 + 2 * SCORE_GAP_START + 4 * SCORE_GAP_EXTENSION);
        assert_both(false, "/AutomatorDocument.icns", "rdoc", 9, 13, &[9, 10, 11, 12],
            SCORE_MATCH * 4 + BONUS_CAMEL123 + BONUS_CONSECUTIVE * 2);
        assert_both(false, "/man1/zshcompctl.1", "zshc", 6, 10, &[6, 7, 8, 9],
            SCORE_MATCH * 4 + BONUS_BOUNDARY_DELIMITER * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_BOUNDARY_DELIMITER * 3);
        assert_both(false, "/.oh-my-zsh/cache", "zshc", 8, 13, &[8, 9, 10, 12],
            SCORE_MATCH * 4 + BONUS_BOUNDARY * BONUS_FIRST_CHAR_MULTIPLIER + BONUS_BOUNDARY * 2
                + SCORE_GAP_START + BONUS_BOUNDARY_DELIMITER);
    }

    #[test]
    fn test_digit_runs() {
        assert_both(false, "ab0123 456", "12356", 3, 10, &[3, 4, 5, 8, 9],
            SCORE_MATCH * 5 + BONUS_CONSECUTIVE * 3 + SCORE_GAP_START + SCORE_GAP_EXTENSION);
        assert_both(false, "abc123 456", "12356", 3, 10, &[3, 4, 5, 8, 9],
            SCORE_MATCH * 5 + BONUS_CAMEL123 * BONUS_FIRST_CHAR_MULTIPLIER + BONUS_CAMEL123 * 2
                + BONUS_CONSECUTIVE + SCORE_GAP_START + SCORE_GAP_EXTENSION);
    }

    #[test]
    fn test_word_boundaries() {
        assert_both(false, "foo/bar/baz", "fbb", 0, 9, &[0, 4, 8],
            SCORE_MATCH * 3 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_BOUNDARY_DELIMITER * 2 + SCORE_GAP_START * 2 + SCORE_GAP_EXTENSION * 4);
        assert_both(false, "fooBarBaz", "fbb", 0, 7, &[0, 3, 6],
            SCORE_MATCH * 3 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_CAMEL123 * 2 + SCORE_GAP_START * 2 + SCORE_GAP_EXTENSION * 2);
        assert_both(false, "foo barbaz", "fbb", 0, 8, &[0, 4, 7],
            SCORE_MATCH * 3 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_BOUNDARY_WHITE + SCORE_GAP_START * 2 + SCORE_GAP_EXTENSION * 3);
        assert_both(false, "fooBar Baz", "foob", 0, 4, &[0, 1, 2, 3],
            SCORE_MATCH * 4 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_BOUNDARY_WHITE * 3);
        assert_both(false, "xFoo-Bar Baz", "foo-b", 1, 6, &[1, 2, 3, 4, 5],
            SCORE_MATCH * 5 + BONUS_CAMEL123 * BONUS_FIRST_CHAR_MULTIPLIER + BONUS_CAMEL123 * 2
                + BONUS_NON_WORD + BONUS_BOUNDARY);
    }

    #[test]
    fn test_case_sensitive_vectors() {
        assert_both(true, "fooBarbaz", "oBz", 2, 9, &[2, 3, 8],
            SCORE_MATCH * 3 + BONUS_CAMEL123 + SCORE_GAP_START + SCORE_GAP_EXTENSION * 3);
        assert_both(true, "Foo/Bar/Baz", "FBB", 0, 9, &[0, 4, 8],
            SCORE_MATCH * 3 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_BOUNDARY_DELIMITER * 2 + SCORE_GAP_START * 2 + SCORE_GAP_EXTENSION * 4);
        assert_both(true, "FooBarBaz", "FBB", 0, 7, &[0, 3, 6],
            SCORE_MATCH * 3 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_CAMEL123 * 2 + SCORE_GAP_START * 2 + SCORE_GAP_EXTENSION * 2);
        assert_both(true, "FooBar Baz", "FooB", 0, 4, &[0, 1, 2, 3],
            SCORE_MATCH * 4 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_BOUNDARY_WHITE * 2 + BONUS_CAMEL123.max(BONUS_BOUNDARY_WHITE));
        assert_both(true, "foo-bar", "o-ba", 2, 6, &[2, 3, 4, 5],
            SCORE_MATCH * 4 + BONUS_BOUNDARY * 3);
    }

    #[test]
    fn test_case_sensitive_misses() {
        assert_both(true, "fooBarbaz", "oBZ", -1, -1, &[], 0);
        assert_both(true, "Foo Bar Baz", "fbb", -1, -1, &[], 0);
        assert_both(true, "fooBarbaz", "fooBarbazz", -1, -1, &[], 0);
    }

    #[test]
    fn test_direction_picks_occurrence() {
        let fwd = v1(false, false, true, "foobar fb", "fb");
        assert_eq!((fwd.start, fwd.end), (0, 4));
        assert_eq!(fwd.positions, vec![0, 3]);
        assert_eq!(
            fwd.score,
            SCORE_MATCH * 2 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + SCORE_GAP_START + SCORE_GAP_EXTENSION
        );

        let bwd = v1(false, false, false, "foobar fb", "fb");
        assert_eq!((bwd.start, bwd.end), (7, 9));
        assert_eq!(bwd.positions, vec![7, 8]);
        assert_eq!(
            bwd.score,
            SCORE_MATCH * 2 + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER + BONUS_BOUNDARY_WHITE
        );
    }
}
