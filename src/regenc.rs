// regenc.rs - Character classification and UTF-8 stepping helpers.
//
// Patterns and subjects are `&str`; positions are byte offsets that always
// sit on a char boundary.

use unicode_ident::{is_xid_continue, is_xid_start};

// === Constants ===
pub const NEWLINE_CODE: char = '\n';
pub const ZWNJ: char = '\u{200C}';
pub const ZWJ: char = '\u{200D}';

// === Char Types (class escapes) ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CType {
    Digit,
    NotDigit,
    Word,
    NotWord,
    Space,
    NotSpace,
}

impl CType {
    pub fn from_escape(c: char) -> Option<CType> {
        Some(match c {
            'd' => CType::Digit,
            'D' => CType::NotDigit,
            'w' => CType::Word,
            'W' => CType::NotWord,
            's' => CType::Space,
            'S' => CType::NotSpace,
            _ => return None,
        })
    }

    pub fn is_code_ctype(self, c: char) -> bool {
        match self {
            CType::Digit => c.is_ascii_digit(),
            CType::NotDigit => !c.is_ascii_digit(),
            CType::Word => is_code_word(c),
            CType::NotWord => !is_code_word(c),
            CType::Space => is_code_space(c),
            CType::NotSpace => !is_code_space(c),
        }
    }
}

/// `[A-Za-z0-9_]`
#[inline]
pub fn is_code_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[inline]
pub fn is_code_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// WhiteSpace and LineTerminator code points.
pub fn is_code_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

// === Identifier Names ===

/// First char of a group name: `$`, `_`, or an ID_Start char.
pub fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || is_xid_start(c)
}

/// Subsequent chars of a group name: ID_Continue, `$`, ZWNJ, ZWJ.
pub fn is_id_continue(c: char) -> bool {
    c == '$' || c == ZWNJ || c == ZWJ || is_xid_continue(c)
}

// === Case Folding ===

/// Simple case fold: the single-char lowercase mapping, or `c` itself when
/// the mapping expands to several chars.
pub fn simple_fold(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Single-char uppercase mapping, if one exists.
pub fn simple_upper(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[inline]
pub fn chars_eq_ic(a: char, b: char) -> bool {
    a == b || simple_fold(a) == simple_fold(b)
}

// === Stepping ===

/// The char starting at byte offset `s`, with its encoded length.
#[inline]
pub fn char_at(text: &str, s: usize) -> Option<(char, usize)> {
    text.get(s..)?.chars().next().map(|c| (c, c.len_utf8()))
}

/// The char ending at byte offset `s`, with its encoded length.
#[inline]
pub fn char_before(text: &str, s: usize) -> Option<(char, usize)> {
    text.get(..s)?.chars().next_back().map(|c| (c, c.len_utf8()))
}

/// Byte length of the char at `s`, or 1 past the end so callers always
/// make progress.
#[inline]
pub fn enclen(text: &str, s: usize) -> usize {
    char_at(text, s).map_or(1, |(_, len)| len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_and_space() {
        assert!(is_code_word('a'));
        assert!(is_code_word('_'));
        assert!(!is_code_word('é'));
        assert!(is_code_space('\u{3000}'));
        assert!(is_code_space('\u{FEFF}'));
        assert!(!is_code_space('x'));
    }

    #[test]
    fn ctype_negations() {
        assert!(CType::Digit.is_code_ctype('7'));
        assert!(!CType::NotDigit.is_code_ctype('7'));
        assert!(CType::NotWord.is_code_ctype('-'));
        assert!(CType::NotSpace.is_code_ctype('a'));
        assert_eq!(CType::from_escape('q'), None);
    }

    #[test]
    fn identifier_chars() {
        assert!(is_id_start('$'));
        assert!(is_id_start('_'));
        assert!(is_id_start('π'));
        assert!(is_id_start('日'));
        assert!(!is_id_start('1'));
        assert!(!is_id_start('-'));
        assert!(!is_id_start('\u{0301}'));
        assert!(is_id_continue('1'));
        assert!(is_id_continue('\u{0301}'));
        assert!(is_id_continue(ZWJ));
        assert!(!is_id_continue('-'));
        assert!(!is_id_continue(' '));
        // superscript two is a No numeral, not an identifier char
        assert!(!is_id_start('\u{B2}'));
        assert!(!is_id_continue('\u{B2}'));
        // Bengali sign candrabindu (Mn) may continue but not start a name
        assert!(!is_id_start('\u{981}'));
        assert!(is_id_continue('\u{981}'));
        // Thai tone mark (Mn)
        assert!(is_id_start('\u{E01}'));
        assert!(is_id_continue('\u{E48}'));
    }

    #[test]
    fn folding() {
        assert_eq!(simple_fold('A'), 'a');
        assert_eq!(simple_fold('Σ'), 'σ');
        assert_eq!(simple_upper('ß'), 'ß');
        assert!(chars_eq_ic('Ä', 'ä'));
        assert!(!chars_eq_ic('a', 'b'));
    }

    #[test]
    fn stepping() {
        let s = "aé日";
        assert_eq!(char_at(s, 0), Some(('a', 1)));
        assert_eq!(char_at(s, 1), Some(('é', 2)));
        assert_eq!(char_before(s, 3), Some(('é', 2)));
        assert_eq!(char_before(s, 0), None);
        assert_eq!(char_at(s, s.len()), None);
        assert_eq!(enclen(s, 3), 3);
        assert_eq!(enclen(s, s.len()), 1);
    }
}
