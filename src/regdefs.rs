// regdefs.rs - Public types and constants.
// Compile options, error codes, and the capture Region.

use bitflags::bitflags;
use smallvec::SmallVec;

// === Options ===

bitflags! {
    /// Compile options. Each flag corresponds to one ECMAScript flag letter.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RegexOptions: u32 {
        /// `i`: simple case-insensitive matching.
        const IGNORECASE = 1 << 0;
        /// `m`: `^` and `$` also match at line terminators.
        const MULTILINE = 1 << 1;
        /// `s`: `.` also matches line terminators.
        const DOTALL = 1 << 2;
        /// `u`: strict dialect. Implies [`RegexOptions::STRICT_NAMED_REFS`].
        const UNICODE = 1 << 3;
        /// `y`: only match at the search start position.
        const STICKY = 1 << 4;
        /// `\k<name>` is always a named backreference, even when the pattern
        /// declares no named groups.
        const STRICT_NAMED_REFS = 1 << 5;
    }
}

impl RegexOptions {
    /// Parse a flag string such as `"imsu"`.
    ///
    /// Unknown or repeated letters are rejected with
    /// [`REGERR_INVALID_ARGUMENT`].
    pub fn from_flags(flags: &str) -> Result<RegexOptions, i32> {
        let mut options = RegexOptions::empty();
        for c in flags.chars() {
            let flag = match c {
                'i' => RegexOptions::IGNORECASE,
                'm' => RegexOptions::MULTILINE,
                's' => RegexOptions::DOTALL,
                'u' => RegexOptions::UNICODE,
                'y' => RegexOptions::STICKY,
                _ => return Err(REGERR_INVALID_ARGUMENT),
            };
            if options.contains(flag) {
                return Err(REGERR_INVALID_ARGUMENT);
            }
            options |= flag;
        }
        Ok(options)
    }

    /// True when `\k<...>` must always resolve to a declared group.
    #[inline]
    pub fn strict_named_refs(self) -> bool {
        self.intersects(RegexOptions::UNICODE | RegexOptions::STRICT_NAMED_REFS)
    }

    #[inline]
    pub fn is_strict(self) -> bool {
        self.contains(RegexOptions::UNICODE)
    }
}

// === Result Codes ===
pub const REG_MISMATCH: i32 = -1;

// internal error
pub const REGERR_PARSER_BUG: i32 = -11;
pub const REGERR_UNDEFINED_BYTECODE: i32 = -13;
pub const REGERR_PARSE_DEPTH_LIMIT_OVER: i32 = -16;
pub const REGERR_RETRY_LIMIT_IN_MATCH_OVER: i32 = -17;
pub const REGERR_RETRY_LIMIT_IN_SEARCH_OVER: i32 = -18;
pub const REGERR_TIME_LIMIT_OVER: i32 = -20;

// general error
pub const REGERR_INVALID_ARGUMENT: i32 = -30;

// syntax error
pub const REGERR_END_PATTERN_AT_LEFT_BRACE: i32 = -100;
pub const REGERR_PREMATURE_END_OF_CHAR_CLASS: i32 = -103;
pub const REGERR_END_PATTERN_AT_ESCAPE: i32 = -104;
pub const REGERR_CONTROL_CODE_SYNTAX: i32 = -109;
pub const REGERR_UNMATCHED_RANGE_SPECIFIER_IN_CHAR_CLASS: i32 = -112;
pub const REGERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED: i32 = -113;
pub const REGERR_TARGET_OF_REPEAT_OPERATOR_INVALID: i32 = -114;
pub const REGERR_NESTED_REPEAT_OPERATOR: i32 = -115;
pub const REGERR_UNMATCHED_CLOSE_PARENTHESIS: i32 = -116;
pub const REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS: i32 = -117;
pub const REGERR_END_PATTERN_IN_GROUP: i32 = -118;
pub const REGERR_UNDEFINED_GROUP_OPTION: i32 = -119;
pub const REGERR_INVALID_REPEAT_RANGE_PATTERN: i32 = -123;
pub const REGERR_INVALID_ESCAPE: i32 = -124;
pub const REGERR_UNMATCHED_CLOSE_BRACKET: i32 = -125;

// values error (syntax error)
pub const REGERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE: i32 = -202;
pub const REGERR_EMPTY_RANGE_IN_CHAR_CLASS: i32 = -203;
pub const REGERR_INVALID_BACKREF: i32 = -208;
pub const REGERR_TOO_MANY_CAPTURES: i32 = -210;
pub const REGERR_EMPTY_GROUP_NAME: i32 = -214;
pub const REGERR_INVALID_GROUP_NAME: i32 = -215;
pub const REGERR_INVALID_CHAR_IN_GROUP_NAME: i32 = -216;
pub const REGERR_UNDEFINED_NAME_REFERENCE: i32 = -217;
pub const REGERR_MULTIPLEX_DEFINED_NAME: i32 = -219;
pub const REGERR_INVALID_CODE_POINT_VALUE: i32 = -400;
pub const REGERR_TOO_BIG_WIDE_CHAR_VALUE: i32 = -401;

#[inline]
pub fn reg_is_pattern_error(ecode: i32) -> bool {
    ecode <= -100 && ecode > -1000
}

// === Region (match result) ===

/// Raw match spans: slot 0 is the whole match, slots 1..N the capture groups.
/// `None` marks a group that did not participate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    regs: SmallVec<[Option<(usize, usize)>; 8]>,
}

impl Region {
    pub fn new() -> Self {
        Region {
            regs: SmallVec::new(),
        }
    }

    /// A region with `num_regs` slots, all unset.
    pub fn with_num_regs(num_regs: usize) -> Self {
        Region {
            regs: SmallVec::from_elem(None, num_regs),
        }
    }

    pub fn num_regs(&self) -> usize {
        self.regs.len()
    }

    pub fn get(&self, i: usize) -> Option<(usize, usize)> {
        self.regs.get(i).copied().flatten()
    }

    pub fn set(&mut self, i: usize, span: Option<(usize, usize)>) {
        if i >= self.regs.len() {
            self.regs.resize(i + 1, None);
        }
        self.regs[i] = span;
    }

    pub fn clear(&mut self) {
        for r in self.regs.iter_mut() {
            *r = None;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<(usize, usize)>> + '_ {
        self.regs.iter().copied()
    }
}

impl FromIterator<Option<(usize, usize)>> for Region {
    fn from_iter<I: IntoIterator<Item = Option<(usize, usize)>>>(iter: I) -> Self {
        Region {
            regs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let o = RegexOptions::from_flags("imu").unwrap();
        assert!(o.contains(RegexOptions::IGNORECASE));
        assert!(o.contains(RegexOptions::MULTILINE));
        assert!(o.is_strict());
        assert!(o.strict_named_refs());
        assert!(!o.contains(RegexOptions::DOTALL));
    }

    #[test]
    fn flags_reject_unknown_and_repeated() {
        assert_eq!(RegexOptions::from_flags("q"), Err(REGERR_INVALID_ARGUMENT));
        assert_eq!(RegexOptions::from_flags("ii"), Err(REGERR_INVALID_ARGUMENT));
    }

    #[test]
    fn strict_named_refs_without_unicode() {
        let o = RegexOptions::STRICT_NAMED_REFS;
        assert!(o.strict_named_refs());
        assert!(!o.is_strict());
    }

    #[test]
    fn region_set_and_get() {
        let mut r = Region::with_num_regs(3);
        assert_eq!(r.num_regs(), 3);
        r.set(1, Some((2, 4)));
        assert_eq!(r.get(1), Some((2, 4)));
        assert_eq!(r.get(2), None);
        assert_eq!(r.get(9), None);
        r.clear();
        assert_eq!(r.get(1), None);
        assert_eq!(r.num_regs(), 3);
    }

    #[test]
    fn pattern_error_range() {
        assert!(reg_is_pattern_error(REGERR_INVALID_GROUP_NAME));
        assert!(!reg_is_pattern_error(REGERR_RETRY_LIMIT_IN_MATCH_OVER));
    }
}
