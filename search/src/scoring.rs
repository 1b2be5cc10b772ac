//! Scoring primitives shared by every match algorithm.

use crate::normalize::normalize_char;

/// Score for each matched character.
pub const SCORE_MATCH: i32 = 16;
/// Penalty for the first unmatched character inside a match window.
pub const SCORE_GAP_START: i32 = -3;
/// Penalty for each further unmatched character of the same gap.
pub const SCORE_GAP_EXTENSION: i32 = -1;

/// Match right after a non-word character.
pub const BONUS_BOUNDARY: i32 = SCORE_MATCH / 2;
/// Matching a non-word character itself.
pub const BONUS_NON_WORD: i32 = SCORE_MATCH / 2;
/// `camelCase` or letter-to-digit transition.
pub const BONUS_CAMEL123: i32 = BONUS_BOUNDARY + SCORE_GAP_EXTENSION;
/// Floor for the bonus of a consecutive run.
pub const BONUS_CONSECUTIVE: i32 = -(SCORE_GAP_START + SCORE_GAP_EXTENSION);
/// Applied to the bonus of the first pattern character.
pub const BONUS_FIRST_CHAR_MULTIPLIER: i32 = 2;
/// Match right after whitespace (or at the start of the text).
pub const BONUS_BOUNDARY_WHITE: i32 = BONUS_BOUNDARY + 2;
/// Match right after a delimiter character.
pub const BONUS_BOUNDARY_DELIMITER: i32 = BONUS_BOUNDARY + 2;

const DELIMITER_CHARS: &str = "/,:;|";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum CharClass {
    White,
    NonWord,
    Delimiter,
    Lower,
    Upper,
    Letter,
    Number,
}

pub(crate) fn char_class(c: char) -> CharClass {
    if c.is_ascii() {
        match c {
            'a'..='z' => CharClass::Lower,
            'A'..='Z' => CharClass::Upper,
            '0'..='9' => CharClass::Number,
            ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r' => CharClass::White,
            _ if DELIMITER_CHARS.contains(c) => CharClass::Delimiter,
            _ => CharClass::NonWord,
        }
    } else if c.is_lowercase() {
        CharClass::Lower
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_numeric() {
        CharClass::Number
    } else if c.is_alphabetic() {
        CharClass::Letter
    } else if c.is_whitespace() {
        CharClass::White
    } else {
        CharClass::NonWord
    }
}

/// Bonus for matching a character of class `class` preceded by `prev`.
pub(crate) fn bonus_for(prev: CharClass, class: CharClass) -> i32 {
    if class > CharClass::NonWord {
        match prev {
            CharClass::White => return BONUS_BOUNDARY_WHITE,
            CharClass::Delimiter => return BONUS_BOUNDARY_DELIMITER,
            CharClass::NonWord => return BONUS_BOUNDARY,
            _ => {}
        }
    }
    if (prev == CharClass::Lower && class == CharClass::Upper)
        || (prev != CharClass::Number && class == CharClass::Number)
    {
        return BONUS_CAMEL123;
    }
    match class {
        CharClass::NonWord | CharClass::Delimiter => BONUS_NON_WORD,
        CharClass::White => BONUS_BOUNDARY_WHITE,
        _ => 0,
    }
}

pub(crate) fn bonus_at(text: &[char], idx: usize) -> i32 {
    if idx == 0 {
        return BONUS_BOUNDARY_WHITE;
    }
    bonus_for(char_class(text[idx - 1]), char_class(text[idx]))
}

/// Folds case and accents the way patterns are prepared.
pub(crate) fn fold(c: char, case_sensitive: bool, normalize: bool) -> char {
    let mut c = c;
    if !case_sensitive {
        if c.is_ascii_uppercase() {
            c = c.to_ascii_lowercase();
        } else if !c.is_ascii() {
            c = c.to_lowercase().next().unwrap_or(c);
        }
    }
    if normalize { normalize_char(c) } else { c }
}

/// Maps a scan index onto the text depending on direction.
pub(crate) fn index_at(index: usize, len: usize, forward: bool) -> usize {
    if forward { index } else { len - index - 1 }
}

/// Scores the window `sidx..eidx`, matching pattern characters greedily
/// left to right, and returns the score with the matched positions.
pub(crate) fn calculate_score(
    case_sensitive: bool,
    normalize: bool,
    text: &[char],
    pattern: &[char],
    sidx: usize,
    eidx: usize,
) -> (i32, Vec<usize>) {
    let mut pidx = 0;
    let mut score = 0;
    let mut in_gap = false;
    let mut consecutive = 0;
    let mut first_bonus = 0;
    let mut positions = Vec::with_capacity(pattern.len());
    let mut prev_class = if sidx > 0 {
        char_class(text[sidx - 1])
    } else {
        CharClass::White
    };

    for (idx, &raw) in text.iter().enumerate().take(eidx).skip(sidx) {
        let class = char_class(raw);
        let c = fold(raw, case_sensitive, normalize);
        if pidx < pattern.len() && c == pattern[pidx] {
            positions.push(idx);
            score += SCORE_MATCH;
            let mut bonus = bonus_for(prev_class, class);
            if consecutive == 0 {
                first_bonus = bonus;
            } else {
                if bonus >= BONUS_BOUNDARY && bonus > first_bonus {
                    first_bonus = bonus;
                }
                bonus = bonus.max(first_bonus).max(BONUS_CONSECUTIVE);
            }
            score += if pidx == 0 {
                bonus * BONUS_FIRST_CHAR_MULTIPLIER
            } else {
                bonus
            };
            in_gap = false;
            consecutive += 1;
            pidx += 1;
        } else {
            score += if in_gap {
                SCORE_GAP_EXTENSION
            } else {
                SCORE_GAP_START
            };
            in_gap = true;
            consecutive = 0;
            first_bonus = 0;
        }
        prev_class = class;
    }
    (score, positions)
}

/// Finds the first position of `needle` in `haystack[from..]`; when
/// matching case-insensitively an uppercase occurrence that comes earlier
/// wins.
fn try_skip(haystack: &[char], case_sensitive: bool, needle: char, from: usize) -> Option<usize> {
    let slice = &haystack[from..];
    let found = slice.iter().position(|&c| c == needle);
    if found == Some(0) {
        return Some(from);
    }
    let mut found = found;
    if !case_sensitive && needle.is_ascii_lowercase() {
        let scope = match found {
            Some(idx) => &slice[..idx],
            None => slice,
        };
        let upper = needle.to_ascii_uppercase();
        if let Some(uidx) = scope.iter().position(|&c| c == upper) {
            found = Some(uidx);
        }
    }
    found.map(|idx| from + idx)
}

/// Quick rejection and window narrowing for ASCII text.
///
/// Returns `None` when the pattern cannot occur in the text. Otherwise
/// returns `(min, max)`: the scan may start at `min` (one character before
/// the first pattern character, for its bonus) and end at `max` (just after
/// the last occurrence of the last pattern character). Non-ASCII text
/// cannot be narrowed and yields the whole range.
pub(crate) fn ascii_fuzzy_index(
    text: &[char],
    pattern: &[char],
    case_sensitive: bool,
) -> Option<(usize, usize)> {
    if !text.iter().all(char::is_ascii) {
        return Some((0, text.len()));
    }
    if !pattern.iter().all(char::is_ascii) {
        return None;
    }

    let mut first_idx = 0;
    let mut idx = 0;
    let mut last_idx = 0;
    for (pidx, &pc) in pattern.iter().enumerate() {
        idx = try_skip(text, case_sensitive, pc, idx)?;
        if pidx == 0 && idx > 0 {
            first_idx = idx - 1;
        }
        last_idx = idx;
        idx += 1;
    }

    let Some(&last) = pattern.last() else {
        return Some((0, text.len()));
    };
    let last_upper = if case_sensitive {
        last
    } else {
        last.to_ascii_uppercase()
    };
    let scope = &text[last_idx..];
    for offset in (1..scope.len()).rev() {
        if scope[offset] == last || scope[offset] == last_upper {
            return Some((first_idx, last_idx + offset + 1));
        }
    }
    Some((first_idx, last_idx + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_char_classes() {
        assert_eq!(char_class('a'), CharClass::Lower);
        assert_eq!(char_class('Z'), CharClass::Upper);
        assert_eq!(char_class('7'), CharClass::Number);
        assert_eq!(char_class(' '), CharClass::White);
        assert_eq!(char_class('/'), CharClass::Delimiter);
        assert_eq!(char_class('-'), CharClass::NonWord);
        assert_eq!(char_class('é'), CharClass::Lower);
        assert_eq!(char_class('日'), CharClass::Letter);
    }

    #[test]
    fn test_bonus_table() {
        use CharClass::*;
        assert_eq!(bonus_for(White, Lower), BONUS_BOUNDARY_WHITE);
        assert_eq!(bonus_for(Delimiter, Lower), BONUS_BOUNDARY_DELIMITER);
        assert_eq!(bonus_for(NonWord, Upper), BONUS_BOUNDARY);
        assert_eq!(bonus_for(Lower, Upper), BONUS_CAMEL123);
        assert_eq!(bonus_for(Lower, Number), BONUS_CAMEL123);
        assert_eq!(bonus_for(Number, Number), 0);
        assert_eq!(bonus_for(Lower, NonWord), BONUS_NON_WORD);
        assert_eq!(bonus_for(Lower, Lower), 0);
    }

    #[test]
    fn test_constants() {
        assert_eq!(BONUS_BOUNDARY, 8);
        assert_eq!(BONUS_NON_WORD, 8);
        assert_eq!(BONUS_CAMEL123, 7);
        assert_eq!(BONUS_CONSECUTIVE, 4);
        assert_eq!(BONUS_BOUNDARY_WHITE, 10);
        assert_eq!(BONUS_BOUNDARY_DELIMITER, 10);
    }

    #[test]
    fn test_calculate_score_camel_window() {
        let text = chars("fooBarbaz");
        let (score, positions) = calculate_score(false, false, &text, &chars("oba"), 2, 5);
        assert_eq!(positions, vec![2, 3, 4]);
        assert_eq!(score, SCORE_MATCH * 3 + BONUS_CAMEL123 + BONUS_CONSECUTIVE);
    }

    #[test]
    fn test_ascii_fuzzy_index_narrows_window() {
        let text = chars("xx/foo/bar/foo");
        assert_eq!(ascii_fuzzy_index(&text, &chars("fo"), true), Some((2, 14)));
        assert_eq!(ascii_fuzzy_index(&text, &chars("fz"), true), None);
    }

    #[test]
    fn test_ascii_fuzzy_index_prefers_earlier_uppercase() {
        let text = chars("xFoo foo");
        assert_eq!(ascii_fuzzy_index(&text, &chars("f"), false), Some((0, 6)));
    }

    #[test]
    fn test_ascii_fuzzy_index_non_ascii() {
        let text = chars("Danço");
        assert_eq!(ascii_fuzzy_index(&text, &chars("xyz"), false), Some((0, 5)));
        assert_eq!(ascii_fuzzy_index(&chars("abc"), &chars("é"), false), None);
    }
}
