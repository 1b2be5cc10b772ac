use tracing::trace;

use crate::fuzzy_v1::fuzzy_match_v1;
use crate::normalize::normalize_char;
use crate::result::{Algorithm, SearchMatchResult};
use crate::scoring::{
    BONUS_BOUNDARY, BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER, CharClass, SCORE_GAP_EXTENSION,
    SCORE_GAP_START, SCORE_MATCH, ascii_fuzzy_index, bonus_for, char_class,
};

/// Largest `text × pattern` matrix the optimal matcher fills before falling
/// back to the greedy one.
pub const MATRIX_BUDGET: usize = 100 * 1024;

/// Optimal subsequence match.
///
/// Fills a score matrix over `text × pattern` (restricted to the window
/// returned by the ASCII pre-filter) and backtraces the best alignment.
/// Ties on the final score pick the leftmost end when `forward` and the
/// rightmost end otherwise.
pub(crate) fn fuzzy_match_v2(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &[char],
    pattern: &[char],
) -> SearchMatchResult {
    let m = pattern.len();
    let n = text.len();
    if m > n {
        return SearchMatchResult::no_match(Algorithm::FuzzyV2);
    }
    if n * m > MATRIX_BUDGET {
        trace!(text_len = n, pattern_len = m, "Score matrix over budget, using greedy match");
        return fuzzy_match_v1(case_sensitive, normalize, forward, text, pattern);
    }

    let Some((min_idx, max_idx)) = ascii_fuzzy_index(text, pattern, case_sensitive) else {
        return SearchMatchResult::no_match(Algorithm::FuzzyV2);
    };
    let width_all = max_idx - min_idx;

    // Phase 2: fold the window, compute per-column bonuses, first-row scores
    // and the first occurrence of every pattern character.
    let mut t: Vec<char> = text[min_idx..max_idx].to_vec();
    let mut bonus = vec![0i32; width_all];
    let mut h0 = vec![0i32; width_all];
    let mut c0 = vec![0i32; width_all];
    let mut first = vec![0usize; m];

    let mut max_score = 0;
    let mut max_score_pos = 0;
    let mut pidx = 0;
    let mut last_idx = 0;
    let pchar0 = pattern[0];
    let mut pchar = pattern[0];
    let mut prev_h0 = 0;
    let mut prev_class = CharClass::White;
    let mut in_gap = false;

    for off in 0..width_all {
        let mut c = t[off];
        let class = char_class(c);
        if !case_sensitive && class == CharClass::Upper {
            c = if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c.to_lowercase().next().unwrap_or(c)
            };
        }
        if normalize && !c.is_ascii() {
            c = normalize_char(c);
        }
        t[off] = c;

        let b = bonus_for(prev_class, class);
        bonus[off] = b;
        prev_class = class;

        if c == pchar {
            if pidx < m {
                first[pidx] = off;
                pidx += 1;
                pchar = pattern[pidx.min(m - 1)];
            }
            last_idx = off;
        }

        if c == pchar0 {
            let score = SCORE_MATCH + b * BONUS_FIRST_CHAR_MULTIPLIER;
            h0[off] = score;
            c0[off] = 1;
            if m == 1 && ((forward && score > max_score) || (!forward && score >= max_score)) {
                max_score = score;
                max_score_pos = off;
                if forward && b >= BONUS_BOUNDARY {
                    break;
                }
            }
            in_gap = false;
        } else {
            let gap = if in_gap {
                SCORE_GAP_EXTENSION
            } else {
                SCORE_GAP_START
            };
            h0[off] = (prev_h0 + gap).max(0);
            c0[off] = 0;
            in_gap = true;
        }
        prev_h0 = h0[off];
    }

    if pidx != m {
        return SearchMatchResult::no_match(Algorithm::FuzzyV2);
    }
    if m == 1 {
        let pos = min_idx + max_score_pos;
        return SearchMatchResult::new(pos, pos + 1, max_score, vec![pos], Algorithm::FuzzyV2);
    }

    // Phase 3: fill the score matrix `h` and the consecutive-run matrix `c`
    // for columns `f0..=last_idx`. Row `i` only starts at the first
    // occurrence of pattern character `i`.
    let f0 = first[0];
    let width = last_idx - f0 + 1;
    let mut h = vec![0i32; width * m];
    let mut c = vec![0i32; width * m];
    h[..width].copy_from_slice(&h0[f0..=last_idx]);
    c[..width].copy_from_slice(&c0[f0..=last_idx]);

    for (i, &f) in first.iter().enumerate().skip(1) {
        let pchar = pattern[i];
        let row = i * width;
        let mut in_gap = false;
        h[row + f - f0 - 1] = 0;

        for col in f..=last_idx {
            let j0 = col - f0;
            let left = h[row + j0 - 1];
            let s2 = left
                + if in_gap {
                    SCORE_GAP_EXTENSION
                } else {
                    SCORE_GAP_START
                };
            let mut s1 = 0;
            let mut consecutive = 0;

            if pchar == t[col] {
                let diag = row - width + j0 - 1;
                s1 = h[diag] + SCORE_MATCH;
                let mut b = bonus[col];
                consecutive = c[diag] + 1;
                if consecutive > 1 {
                    let fb = bonus[col + 1 - consecutive as usize];
                    if b >= BONUS_BOUNDARY && b > fb {
                        consecutive = 1;
                    } else {
                        b = b.max(BONUS_CONSECUTIVE.max(fb));
                    }
                }
                if s1 + b < s2 {
                    s1 += bonus[col];
                    consecutive = 0;
                } else {
                    s1 += b;
                }
            }
            c[row + j0] = consecutive;

            in_gap = s1 < s2;
            let score = s1.max(s2).max(0);
            if i == m - 1 && ((forward && score > max_score) || (!forward && score >= max_score)) {
                max_score = score;
                max_score_pos = col;
            }
            h[row + j0] = score;
        }
    }

    // Phase 4: backtrace from the best cell of the last row.
    let mut positions = Vec::with_capacity(m);
    let mut i = m - 1;
    let mut j = max_score_pos;
    let mut prefer_match = true;
    loop {
        let row = i * width;
        let j0 = j - f0;
        let s = h[row + j0];
        let s1 = if i > 0 && j >= first[i] {
            h[row - width + j0 - 1]
        } else {
            0
        };
        let s2 = if j > first[i] { h[row + j0 - 1] } else { 0 };

        if s > s1 && (s > s2 || (s == s2 && prefer_match)) {
            positions.push(j + min_idx);
            if i == 0 {
                break;
            }
            i -= 1;
        }
        let below = row + width + j0 + 1;
        prefer_match = c[row + j0] > 1 || (below < c.len() && c[below] > 0);
        match j.checked_sub(1) {
            Some(prev) if prev >= f0 => j = prev,
            _ => break,
        }
    }
    positions.reverse();

    SearchMatchResult::new(
        min_idx + j,
        min_idx + max_score_pos + 1,
        max_score,
        positions,
        Algorithm::FuzzyV2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::*;

    fn v2(case_sensitive: bool, forward: bool, text: &str, pattern: &str) -> SearchMatchResult {
        let pattern = if case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        Algorithm::FuzzyV2.run(case_sensitive, false, forward, text, &pattern)
    }

    #[test]
    fn test_camel_gap_both_directions() {
        for forward in [true, false] {
            let result = v2(false, forward, "fooBarbaz1", "oBZ");
            assert_eq!((result.start, result.end), (2, 9));
            assert_eq!(result.positions, vec![2, 3, 8]);
            assert_eq!(
                result.score,
                SCORE_MATCH * 3 + BONUS_CAMEL123 + SCORE_GAP_START + SCORE_GAP_EXTENSION * 3
            );
        }
    }

    #[test]
    fn test_prefers_word_starts() {
        let result = v2(false, true, "foo bar baz", "fbb");
        assert_eq!((result.start, result.end), (0, 9));
        assert_eq!(result.positions, vec![0, 4, 8]);
        assert_eq!(
            result.score,
            SCORE_MATCH * 3
                + BONUS_BOUNDARY_WHITE * BONUS_FIRST_CHAR_MULTIPLIER
                + BONUS_BOUNDARY_WHITE * 2
                + 2 * SCORE_GAP_START
                + 4 * SCORE_GAP_EXTENSION
        );
    }

    #[test]
    fn test_beats_greedy_alignment() {
        let greedy = Algorithm::FuzzyV1.run(false, false, true, "axxb ab", "ab");
        assert_eq!(greedy.positions, vec![0, 3]);
        assert_eq!(greedy.score, 48);

        let optimal = v2(false, true, "axxb ab", "ab");
        assert_eq!((optimal.start, optimal.end), (5, 7));
        assert_eq!(optimal.positions, vec![5, 6]);
        assert_eq!(
            optimal.score,
            SCORE_MATCH * 2 + BONUS_BOUNDARY_WHITE * (BONUS_FIRST_CHAR_MULTIPLIER + 1)
        );
    }

    #[test]
    fn test_single_char_picks_boundary() {
        let result = v2(false, true, "xbar/baz", "b");
        assert_eq!(result.positions, vec![5]);
        assert_eq!(
            result.score,
            SCORE_MATCH + BONUS_BOUNDARY_DELIMITER * BONUS_FIRST_CHAR_MULTIPLIER
        );
    }

    #[test]
    fn test_no_match() {
        assert!(!v2(false, true, "fooBarbaz", "fooBarbazz").is_match());
        assert!(!v2(true, true, "fooBarbaz", "oBZ").is_match());
        assert!(!v2(false, true, "abc", "ad").is_match());
    }

    #[test]
    fn test_large_input_falls_back_to_greedy() {
        let text = "a".repeat(MATRIX_BUDGET) + "b";
        let result = v2(false, true, &text, "ab");
        assert!(result.is_match());
        assert_eq!(result.algorithm, Algorithm::FuzzyV1);
        assert_eq!(result.end as usize, text.len());
    }
}
