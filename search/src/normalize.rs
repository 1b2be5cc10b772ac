//! Folding of accented Latin letters to their ASCII base letter.

/// Base letters for the Latin-1 Supplement block, starting at U+00C0.
/// `'\0'` marks characters without a plain base letter (Æ, ×, Þ, ß, ...).
const LATIN1: [char; 64] = [
    // U+00C0 .. U+00CF
    'A', 'A', 'A', 'A', 'A', 'A', '\0', 'C', 'E', 'E', 'E', 'E', 'I', 'I', 'I', 'I',
    // U+00D0 .. U+00DF
    'D', 'N', 'O', 'O', 'O', 'O', 'O', '\0', 'O', 'U', 'U', 'U', 'U', 'Y', '\0', '\0',
    // U+00E0 .. U+00EF
    'a', 'a', 'a', 'a', 'a', 'a', '\0', 'c', 'e', 'e', 'e', 'e', 'i', 'i', 'i', 'i',
    // U+00F0 .. U+00FF
    'd', 'n', 'o', 'o', 'o', 'o', 'o', '\0', 'o', 'u', 'u', 'u', 'u', 'y', '\0', 'y',
];

/// Latin Extended-A ranges and their lowercase base letter.
const LATIN_EXT_A: &[(u32, u32, char)] = &[
    (0x0100, 0x0105, 'a'),
    (0x0106, 0x010D, 'c'),
    (0x010E, 0x0111, 'd'),
    (0x0112, 0x011B, 'e'),
    (0x011C, 0x0123, 'g'),
    (0x0124, 0x0127, 'h'),
    (0x0128, 0x0131, 'i'),
    (0x0134, 0x0135, 'j'),
    (0x0136, 0x0137, 'k'),
    (0x0139, 0x0142, 'l'),
    (0x0143, 0x0149, 'n'),
    (0x014C, 0x0151, 'o'),
    (0x0154, 0x0159, 'r'),
    (0x015A, 0x0161, 's'),
    (0x0162, 0x0167, 't'),
    (0x0168, 0x0173, 'u'),
    (0x0174, 0x0175, 'w'),
    (0x0176, 0x0178, 'y'),
    (0x0179, 0x017E, 'z'),
    (0x017F, 0x017F, 's'),
];

/// Maps an accented Latin letter to its unaccented base, keeping case.
/// Any other character is returned unchanged.
///
/// # Examples
///
/// ```
/// use cmdline_search::normalize_char;
///
/// assert_eq!(normalize_char('ç'), 'c');
/// assert_eq!(normalize_char('Ó'), 'O');
/// assert_eq!(normalize_char('Ł'), 'L');
/// assert_eq!(normalize_char('x'), 'x');
/// ```
pub fn normalize_char(c: char) -> char {
    let code = c as u32;
    if (0x00C0..=0x00FF).contains(&code) {
        let base = LATIN1[(code - 0x00C0) as usize];
        return if base == '\0' { c } else { base };
    }
    if (0x0100..=0x017F).contains(&code) {
        if let Some(&(_, _, base)) = LATIN_EXT_A
            .iter()
            .find(|(lo, hi, _)| (*lo..=*hi).contains(&code))
        {
            return if c.is_uppercase() {
                base.to_ascii_uppercase()
            } else {
                base
            };
        }
    }
    c
}

/// Normalizes every character of `s`.
pub fn normalize_str(s: &str) -> String {
    s.chars().map(normalize_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_letters() {
        assert_eq!(normalize_str("Só Danço Samba"), "So Danco Samba");
        assert_eq!(normalize_str("ÀÉÎÕÜÑÝÿ"), "AEIOUNYy");
    }

    #[test]
    fn test_symbols_untouched() {
        for c in ['Æ', '×', 'ß', 'Þ', 'æ', '÷', '€', '日'] {
            assert_eq!(normalize_char(c), c);
        }
    }

    #[test]
    fn test_latin_extended_a_case() {
        assert_eq!(normalize_str("ĀāČčĞğŁłŐőŠšŽžŸ"), "AaCcGgLlOoSsZzY");
        assert_eq!(normalize_char('ſ'), 's');
        assert_eq!(normalize_char('Œ'), 'Œ');
    }
}
