use crate::result::{Algorithm, SearchMatchResult};
use crate::scoring::{BONUS_BOUNDARY, ascii_fuzzy_index, bonus_at, calculate_score, fold, index_at};

/// Finds the occurrence of `pattern` as a contiguous run of `text` whose
/// first character sits on the best boundary. Scanning starts from the left
/// when `forward`, from the right otherwise; the first occurrence on a word
/// boundary stops the scan.
pub(crate) fn exact_match_naive(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &[char],
    pattern: &[char],
) -> SearchMatchResult {
    let n = text.len();
    let m = pattern.len();
    if n < m || ascii_fuzzy_index(text, pattern, case_sensitive).is_none() {
        return SearchMatchResult::no_match(Algorithm::ExactNaive);
    }

    let mut pidx = 0;
    let mut bonus = 0;
    let mut best: Option<(usize, i32)> = None;
    let mut index = 0;
    while index < n {
        let c = fold(text[index_at(index, n, forward)], case_sensitive, normalize);
        let pidx_at = index_at(pidx, m, forward);
        if pattern[pidx_at] == c {
            if pidx_at == 0 {
                bonus = bonus_at(text, index_at(index, n, forward));
            }
            pidx += 1;
            if pidx == m {
                if best.is_none_or(|(_, best_bonus)| bonus > best_bonus) {
                    best = Some((index, bonus));
                }
                if bonus >= BONUS_BOUNDARY {
                    break;
                }
                index -= pidx - 1;
                pidx = 0;
                bonus = 0;
            }
        } else {
            index -= pidx;
            pidx = 0;
            bonus = 0;
        }
        index += 1;
    }

    let Some((best_pos, _)) = best else {
        return SearchMatchResult::no_match(Algorithm::ExactNaive);
    };
    let (sidx, eidx) = if forward {
        (best_pos + 1 - m, best_pos + 1)
    } else {
        (n - (best_pos + 1), n - (best_pos + 1 - m))
    };
    let (score, positions) = calculate_score(case_sensitive, normalize, text, pattern, sidx, eidx);
    SearchMatchResult::new(sidx, eidx, score, positions, Algorithm::ExactNaive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::*;

    fn exact(case_sensitive: bool, normalize: bool, forward: bool, text: &str, pattern: &str) -> SearchMatchResult {
        let pattern = if case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        Algorithm::ExactNaive.run(case_sensitive, normalize, forward, text, &pattern)
    }

    fn assert_match(result: &SearchMatchResult, start: i32, end: i32, positions: &[usize], score: i32) {
        assert_eq!((result.start, result.end), (start, end), "{result:?}");
        assert_eq!(result.positions, positions);
        assert_eq!(result.score, score);
    }

    #[test]
    fn test_case_sensitive_miss() {
        assert_match(&exact(true, false, true, "fooBarbaz", "oBA"), -1, -1, &[], 0);
        assert_match(&exact(true, false, true, "fooBarbaz", "fooBarbazz"), -1, -1, &[], 0);
    }

    #[test]
    fn test_camel_hump() {
        assert_match(
            &exact(false, false, true, "fooBarbaz", "oBA"),
            2,
            5,
            &[2, 3, 4],
            SCORE_MATCH * 3 + BONUS_CAMEL123 + BONUS_CONSECUTIVE,
        );
        assert_match(
            &exact(false, false, true, "/AutomatorDocument.icns", "rdoc"),
            9,
            13,
            &[9, 10, 11, 12],
            SCORE_MATCH * 4 + BONUS_CAMEL123 + BONUS_CONSECUTIVE * 2,
        );
    }

    #[test]
    fn test_delimiter_boundaries() {
        assert_match(
            &exact(false, false, true, "/man1/zshcompctl.1", "zshc"),
            6,
            10,
            &[6, 7, 8, 9],
            SCORE_MATCH * 4 + BONUS_BOUNDARY_DELIMITER * (BONUS_FIRST_CHAR_MULTIPLIER + 3),
        );
        assert_match(
            &exact(false, false, true, "/.oh-my-zsh/cache", "zsh/c"),
            8,
            13,
            &[8, 9, 10, 11, 12],
            SCORE_MATCH * 5
                + BONUS_BOUNDARY * (BONUS_FIRST_CHAR_MULTIPLIER + 3)
                + BONUS_BOUNDARY_DELIMITER,
        );
    }

    #[test]
    fn test_single_char() {
        assert_match(&exact(false, false, true, "fooBarbaz", "o"), 1, 2, &[1], SCORE_MATCH);
        assert_match(
            &exact(false, false, true, "/tmp/test/11/file11.txt", "e"),
            6,
            7,
            &[6],
            SCORE_MATCH,
        );
    }

    #[test]
    fn test_normalized() {
        assert_match(&exact(false, true, true, "Só Danço Samba", "So"), 0, 2, &[0, 1], 62);
        assert_match(&exact(false, true, true, "Danço", "danco"), 0, 5, &[0, 1, 2, 3, 4], 140);
    }

    #[test]
    fn test_backward_prefers_rightmost() {
        let fwd = exact(false, false, true, "foo-bar foo", "foo");
        let bwd = exact(false, false, false, "foo-bar foo", "foo");
        assert_eq!((fwd.start, fwd.end), (0, 3));
        assert_eq!((bwd.start, bwd.end), (8, 11));
        assert_eq!(fwd.score, bwd.score);
    }

    #[test]
    fn test_overlapping_restart() {
        let result = exact(true, false, true, "aaab", "aab");
        assert_match(&result, 1, 4, &[1, 2, 3], result.score);
    }
}
