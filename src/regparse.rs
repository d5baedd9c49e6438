// regparse.rs - Parser: converts pattern text into an AST (Node tree).
//
// Structure: global limits -> parse environment -> pre-scan -> number and
// escape scanning -> group names -> char classes -> groups -> expressions.
// The parser is a pure function of (pattern, options).

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::error::RegexError;
use crate::regdefs::*;
use crate::regenc::{is_id_continue, is_id_start, CType};
use crate::regint::{DEFAULT_MAX_CAPTURE_NUM, DEFAULT_PARSE_DEPTH_LIMIT};
use crate::regparse_types::*;

const MAX_CODE_POINT: u32 = 0x10FFFF;

// ============================================================================
// Global State
// ============================================================================

static MAX_CAPTURE_NUM: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_CAPTURE_NUM);
static PARSE_DEPTH_LIMIT: AtomicU32 = AtomicU32::new(DEFAULT_PARSE_DEPTH_LIMIT);

pub fn reg_set_capture_num_limit(num: usize) {
    MAX_CAPTURE_NUM.store(num, Ordering::Relaxed);
}

pub fn reg_get_capture_num_limit() -> usize {
    MAX_CAPTURE_NUM.load(Ordering::Relaxed)
}

pub fn reg_get_parse_depth_limit() -> u32 {
    PARSE_DEPTH_LIMIT.load(Ordering::Relaxed)
}

/// Set the nesting limit for groups. `0` restores the default.
pub fn reg_set_parse_depth_limit(depth: u32) {
    let depth = if depth == 0 {
        DEFAULT_PARSE_DEPTH_LIMIT
    } else {
        depth
    };
    PARSE_DEPTH_LIMIT.store(depth, Ordering::Relaxed);
}

type ParseResult<T> = Result<T, RegexError>;

#[inline]
fn err<T>(code: i32) -> ParseResult<T> {
    Err(RegexError::from(code))
}

#[inline]
fn err_name<T>(code: i32, name: &str) -> ParseResult<T> {
    Err(RegexError::with_param(code, Some(name)))
}

// ============================================================================
// Parse Environment
// ============================================================================

pub struct ParseEnv {
    pattern: Vec<char>,
    p: usize,
    pub options: RegexOptions,
    /// Capturing groups in the whole pattern (pre-scan).
    pub num_mem: usize,
    /// The pattern declares at least one named group (pre-scan).
    pub has_named: bool,
    depth: u32,
    depth_limit: u32,
}

impl ParseEnv {
    pub fn new(pattern: &str, options: RegexOptions) -> Self {
        let pattern: Vec<char> = pattern.chars().collect();
        let (num_mem, has_named) = scan_capture_groups(&pattern);
        ParseEnv {
            pattern,
            p: 0,
            options,
            num_mem,
            has_named,
            depth: 0,
            depth_limit: reg_get_parse_depth_limit(),
        }
    }

    #[inline]
    fn strict(&self) -> bool {
        self.options.is_strict()
    }

    /// `\k<...>` is a named backreference rather than literal text.
    #[inline]
    fn named_refs_enabled(&self) -> bool {
        self.has_named || self.options.strict_named_refs()
    }

    #[inline]
    fn p_end(&self) -> bool {
        self.p >= self.pattern.len()
    }

    #[inline]
    fn ppeek(&self) -> Option<char> {
        self.pattern.get(self.p).copied()
    }

    #[inline]
    fn ppeek_at(&self, n: usize) -> Option<char> {
        self.pattern.get(self.p + n).copied()
    }

    #[inline]
    fn ppeek_is(&self, c: char) -> bool {
        self.ppeek() == Some(c)
    }

    #[inline]
    fn pfetch(&mut self) -> Option<char> {
        let c = self.ppeek()?;
        self.p += 1;
        Some(c)
    }

    #[inline]
    fn pinc(&mut self) {
        self.p += 1;
    }
}

/// Count capturing groups and detect named groups ahead of parsing, so that
/// `\N` and `\k<name>` can be classified even when the group comes later.
fn scan_capture_groups(pattern: &[char]) -> (usize, bool) {
    let mut num = 0usize;
    let mut named = false;
    let mut in_class = false;
    let mut i = 0;
    while i < pattern.len() {
        match pattern[i] {
            '\\' => {
                i += 2;
                continue;
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                if pattern.get(i + 1) != Some(&'?') {
                    num += 1;
                } else if pattern.get(i + 2) == Some(&'<')
                    && !matches!(pattern.get(i + 3), Some('=') | Some('!'))
                {
                    num += 1;
                    named = true;
                }
            }
            _ => {}
        }
        i += 1;
    }
    (num, named)
}

// ============================================================================
// Number scanning
// ============================================================================

/// Scan decimal digits, saturating at `u32::MAX`. Returns `None` if there
/// are no digits at the current position.
fn scan_number(env: &mut ParseEnv) -> Option<u32> {
    let mut num: Option<u32> = None;
    while let Some(c) = env.ppeek() {
        let Some(d) = c.to_digit(10) else { break };
        num = Some(num.unwrap_or(0).saturating_mul(10).saturating_add(d));
        env.pinc();
    }
    num
}

/// Scan exactly `len` hex digits. Restores the position on failure.
fn scan_hexadecimal_number(env: &mut ParseEnv, len: usize) -> Option<u32> {
    let save = env.p;
    let mut num = 0u32;
    for _ in 0..len {
        match env.ppeek().and_then(|c| c.to_digit(16)) {
            Some(d) => {
                num = num * 16 + d;
                env.pinc();
            }
            None => {
                env.p = save;
                return None;
            }
        }
    }
    Some(num)
}

/// Legacy octal escape starting at digit `first` (already consumed).
fn scan_octal_number(env: &mut ParseEnv, first: u32) -> u32 {
    let mut num = first;
    if let Some(d) = env.ppeek().and_then(|c| c.to_digit(8)) {
        num = num * 8 + d;
        env.pinc();
        if first <= 3 {
            if let Some(d) = env.ppeek().and_then(|c| c.to_digit(8)) {
                num = num * 8 + d;
                env.pinc();
            }
        }
    }
    num
}

#[inline]
fn is_high_surrogate(v: u32) -> bool {
    (0xD800..=0xDBFF).contains(&v)
}

#[inline]
fn is_low_surrogate(v: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&v)
}

/// Body of a `\u` escape (the `\u` is already consumed): `XXXX`, a
/// surrogate pair `XXXX\uXXXX`, or `{X...}` when `allow_braces`.
/// Returns `Ok(None)` with the position restored when malformed.
fn scan_unicode_escape(env: &mut ParseEnv, allow_braces: bool) -> ParseResult<Option<u32>> {
    let save = env.p;
    if allow_braces && env.ppeek_is('{') {
        env.pinc();
        let mut num = 0u32;
        let mut digits = 0;
        while let Some(d) = env.ppeek().and_then(|c| c.to_digit(16)) {
            num = num.saturating_mul(16).saturating_add(d);
            digits += 1;
            env.pinc();
        }
        if digits == 0 || !env.ppeek_is('}') {
            env.p = save;
            return Ok(None);
        }
        env.pinc();
        if num > MAX_CODE_POINT {
            return err(REGERR_TOO_BIG_WIDE_CHAR_VALUE);
        }
        return Ok(Some(num));
    }

    let Some(lead) = scan_hexadecimal_number(env, 4) else {
        return Ok(None);
    };
    if is_high_surrogate(lead) && env.ppeek_is('\\') && env.ppeek_at(1) == Some('u') {
        let trail_save = env.p;
        env.p += 2;
        match scan_hexadecimal_number(env, 4) {
            Some(trail) if is_low_surrogate(trail) => {
                return Ok(Some(0x10000 + ((lead - 0xD800) << 10) + (trail - 0xDC00)));
            }
            _ => env.p = trail_save,
        }
    }
    Ok(Some(lead))
}

// ============================================================================
// Group names
// ============================================================================

/// Fetch a group name up to and including the closing `>`. The opening `<`
/// is already consumed.
fn fetch_name(env: &mut ParseEnv) -> ParseResult<String> {
    let mut name = String::new();
    loop {
        let Some(c) = env.pfetch() else {
            return err_name(REGERR_INVALID_GROUP_NAME, &name);
        };
        if c == '>' {
            break;
        }
        let c = if c == '\\' {
            fetch_name_escape(env, &name)?
        } else {
            c
        };
        let valid = if name.is_empty() {
            is_id_start(c)
        } else {
            is_id_continue(c)
        };
        if !valid {
            name.push(c);
            return err_name(REGERR_INVALID_CHAR_IN_GROUP_NAME, &name);
        }
        name.push(c);
    }

    if name.is_empty() {
        return err(REGERR_EMPTY_GROUP_NAME);
    }
    Ok(name)
}

/// Only `\uXXXX`, surrogate pairs and `\u{X}` are allowed inside a name.
fn fetch_name_escape(env: &mut ParseEnv, name: &str) -> ParseResult<char> {
    let bad = |env: &ParseEnv| {
        let mut shown = name.to_string();
        shown.push('\\');
        if let Some(c) = env.ppeek() {
            shown.push(c);
        }
        err_name(REGERR_INVALID_CHAR_IN_GROUP_NAME, &shown)
    };

    if !env.ppeek_is('u') {
        return bad(env);
    }
    env.pinc();
    match scan_unicode_escape(env, true)? {
        Some(code) => match char::from_u32(code) {
            Some(c) => Ok(c),
            None => bad(env),
        },
        None => bad(env),
    }
}

// ============================================================================
// Escapes
// ============================================================================

/// Character value of an escape whose letter `c` was just consumed.
/// Class escapes (`\d` etc.), `\b`, backreferences and `\k` are handled by
/// the callers.
fn fetch_escaped_value(env: &mut ParseEnv, c: char, in_class: bool) -> ParseResult<char> {
    let strict = env.strict();
    let v = match c {
        't' => '\t',
        'n' => '\n',
        'v' => '\u{0B}',
        'f' => '\u{0C}',
        'r' => '\r',
        '0' if !env.ppeek().is_some_and(|n| n.is_ascii_digit()) => '\0',
        '0'..='7' => {
            if strict {
                return err(REGERR_INVALID_ESCAPE);
            }
            let first = c.to_digit(8).unwrap_or(0);
            let v = scan_octal_number(env, first);
            char::from_u32(v).unwrap_or('\0')
        }
        '8' | '9' => {
            if strict {
                return err(REGERR_INVALID_ESCAPE);
            }
            c
        }
        'c' => {
            let next = env.ppeek();
            match next {
                Some(l) if l.is_ascii_alphabetic() => {
                    env.pinc();
                    char::from_u32(l as u32 % 32).unwrap_or('\0')
                }
                Some(l) if in_class && !strict && (l.is_ascii_digit() || l == '_') => {
                    env.pinc();
                    char::from_u32(l as u32 % 32).unwrap_or('\0')
                }
                _ => {
                    if strict {
                        return err(REGERR_CONTROL_CODE_SYNTAX);
                    }
                    // The backslash is literal; `c` is re-read as its own atom.
                    env.p -= 1;
                    '\\'
                }
            }
        }
        'x' => match scan_hexadecimal_number(env, 2) {
            Some(v) => char::from_u32(v).unwrap_or('\0'),
            None => {
                if strict {
                    return err(REGERR_INVALID_ESCAPE);
                }
                'x'
            }
        },
        'u' => match scan_unicode_escape(env, strict)? {
            Some(v) => match char::from_u32(v) {
                Some(ch) => ch,
                None => return err(REGERR_INVALID_CODE_POINT_VALUE),
            },
            None => {
                if strict {
                    return err(REGERR_INVALID_CODE_POINT_VALUE);
                }
                'u'
            }
        },
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
        | '/' => c,
        '-' => {
            if strict && !in_class {
                return err(REGERR_INVALID_ESCAPE);
            }
            '-'
        }
        'k' => {
            if strict || env.has_named {
                return err(REGERR_INVALID_ESCAPE);
            }
            'k'
        }
        _ => {
            if strict {
                return err(REGERR_INVALID_ESCAPE);
            }
            c
        }
    };
    Ok(v)
}

/// Escape in atom position; the backslash is consumed.
fn prs_escape(env: &mut ParseEnv) -> ParseResult<Node> {
    let Some(c) = env.pfetch() else {
        return err(REGERR_END_PATTERN_AT_ESCAPE);
    };

    if let Some(ctype) = CType::from_escape(c) {
        let mut cc = CClassNode::new(false);
        cc.add_ctype(ctype);
        return Ok(Node::CClass(cc));
    }

    match c {
        'b' => Ok(Node::Anchor(AnchorType::WordBoundary)),
        'B' => Ok(Node::Anchor(AnchorType::NoWordBoundary)),
        '1'..='9' => {
            let save = env.p;
            env.p -= 1;
            let n = scan_number(env).unwrap_or(0) as usize;
            if n <= env.num_mem {
                return Ok(Node::BackRef(BackRefNode::Number(n)));
            }
            if env.strict() {
                return err(REGERR_INVALID_BACKREF);
            }
            env.p = save;
            Ok(Node::Char(fetch_escaped_value(env, c, false)?))
        }
        'k' if env.named_refs_enabled() => {
            if !env.ppeek_is('<') {
                return err_name(REGERR_INVALID_GROUP_NAME, "");
            }
            env.pinc();
            let name = fetch_name(env)?;
            Ok(Node::BackRef(BackRefNode::Name { name, regnum: 0 }))
        }
        'k' => Ok(Node::Char('k')),
        _ => Ok(Node::Char(fetch_escaped_value(env, c, false)?)),
    }
}

// ============================================================================
// Character classes
// ============================================================================

enum ClassAtom {
    Code(char),
    CType(CType),
}

fn fetch_class_atom(env: &mut ParseEnv) -> ParseResult<ClassAtom> {
    let Some(c) = env.pfetch() else {
        return err(REGERR_PREMATURE_END_OF_CHAR_CLASS);
    };
    if c != '\\' {
        return Ok(ClassAtom::Code(c));
    }

    let Some(c) = env.pfetch() else {
        return err(REGERR_END_PATTERN_AT_ESCAPE);
    };
    if let Some(ctype) = CType::from_escape(c) {
        return Ok(ClassAtom::CType(ctype));
    }
    match c {
        'b' => Ok(ClassAtom::Code('\u{08}')),
        'B' if env.strict() => err(REGERR_INVALID_ESCAPE),
        _ => Ok(ClassAtom::Code(fetch_escaped_value(env, c, true)?)),
    }
}

fn add_class_atom(cc: &mut CClassNode, atom: ClassAtom) {
    match atom {
        ClassAtom::Code(c) => cc.add_code(c),
        ClassAtom::CType(ct) => cc.add_ctype(ct),
    }
}

/// Parse a class body; the `[` is consumed.
fn prs_cc(env: &mut ParseEnv) -> ParseResult<Node> {
    let negated = if env.ppeek_is('^') {
        env.pinc();
        true
    } else {
        false
    };
    let mut cc = CClassNode::new(negated);

    loop {
        match env.ppeek() {
            None => return err(REGERR_PREMATURE_END_OF_CHAR_CLASS),
            Some(']') => {
                env.pinc();
                break;
            }
            Some(_) => {}
        }

        let from = fetch_class_atom(env)?;
        let is_range = env.ppeek_is('-') && env.ppeek_at(1).is_some_and(|c| c != ']');
        if !is_range {
            add_class_atom(&mut cc, from);
            continue;
        }

        env.pinc();
        let to = fetch_class_atom(env)?;
        match (from, to) {
            (ClassAtom::Code(a), ClassAtom::Code(b)) => {
                if a > b {
                    return err(REGERR_EMPTY_RANGE_IN_CHAR_CLASS);
                }
                cc.add_range(a, b);
            }
            (from, to) => {
                if env.strict() {
                    return err(REGERR_UNMATCHED_RANGE_SPECIFIER_IN_CHAR_CLASS);
                }
                add_class_atom(&mut cc, from);
                cc.add_code('-');
                add_class_atom(&mut cc, to);
            }
        }
    }

    Ok(Node::CClass(cc))
}

// ============================================================================
// Quantifier helpers
// ============================================================================

/// Parse `{n}`, `{n,}` or `{n,m}` at the current `{`. Returns `Ok(None)` with
/// the position restored when the braces do not form a quantifier.
fn fetch_interval(env: &mut ParseEnv) -> ParseResult<Option<(u32, Option<u32>)>> {
    let save = env.p;
    env.pinc();

    let Some(lower) = scan_number(env) else {
        env.p = save;
        return Ok(None);
    };
    let upper = if env.ppeek_is(',') {
        env.pinc();
        scan_number(env)
    } else {
        Some(lower)
    };
    if !env.ppeek_is('}') {
        env.p = save;
        return Ok(None);
    }
    env.pinc();

    if let Some(upper) = upper {
        if upper < lower {
            return err(REGERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE);
        }
    }
    Ok(Some((lower, upper)))
}

/// Whether a `{` at the current position starts a quantifier (a malformed
/// range such as `{2,1}` counts). Never moves the position.
fn is_interval_ahead(env: &mut ParseEnv) -> bool {
    let save = env.p;
    let r = fetch_interval(env);
    env.p = save;
    matches!(r, Ok(Some(_)) | Err(_))
}

fn fetch_quantifier(env: &mut ParseEnv) -> ParseResult<Option<(u32, Option<u32>)>> {
    let q = match env.ppeek() {
        Some('*') => Some((0, None)),
        Some('+') => Some((1, None)),
        Some('?') => Some((0, Some(1))),
        Some('{') => {
            return match fetch_interval(env)? {
                Some(range) => Ok(Some(range)),
                None if env.strict() => err(REGERR_INVALID_REPEAT_RANGE_PATTERN),
                None => Ok(None),
            };
        }
        _ => None,
    };
    if q.is_some() {
        env.pinc();
    }
    Ok(q)
}

// ============================================================================
// Groups
// ============================================================================

fn prs_group_body(env: &mut ParseEnv) -> ParseResult<Node> {
    let body = prs_alts(env)?;
    if !env.ppeek_is(')') {
        return err(REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS);
    }
    env.pinc();
    Ok(body)
}

fn prs_named_group(env: &mut ParseEnv) -> ParseResult<Node> {
    let name = fetch_name(env)?;
    let body = prs_group_body(env)?;
    Ok(Node::new_memory(Some(name), body))
}

fn prs_look(env: &mut ParseEnv, behind: bool, negative: bool) -> ParseResult<Node> {
    let body = prs_group_body(env)?;
    Ok(Node::Look(LookNode {
        behind,
        negative,
        body: Box::new(body),
    }))
}

/// Parse a group; the `(` is consumed.
fn prs_bag(env: &mut ParseEnv) -> ParseResult<Node> {
    if !env.ppeek_is('?') {
        let body = prs_group_body(env)?;
        return Ok(Node::new_memory(None, body));
    }
    env.pinc();

    let Some(c) = env.pfetch() else {
        return err(REGERR_END_PATTERN_IN_GROUP);
    };
    match c {
        ':' => Ok(Node::new_group(prs_group_body(env)?)),
        '=' => prs_look(env, false, false),
        '!' => prs_look(env, false, true),
        '<' => match env.ppeek() {
            Some('=') => {
                env.pinc();
                prs_look(env, true, false)
            }
            Some('!') => {
                env.pinc();
                prs_look(env, true, true)
            }
            None => err(REGERR_END_PATTERN_IN_GROUP),
            Some(_) => prs_named_group(env),
        },
        _ => err(REGERR_UNDEFINED_GROUP_OPTION),
    }
}

// ============================================================================
// Expressions
// ============================================================================

fn prs_atom(env: &mut ParseEnv) -> ParseResult<Node> {
    let Some(c) = env.pfetch() else {
        return err(REGERR_PARSER_BUG);
    };
    let node = match c {
        '.' => Node::AnyChar,
        '^' => Node::Anchor(AnchorType::BeginLine),
        '$' => Node::Anchor(AnchorType::EndLine),
        '(' => prs_bag(env)?,
        '[' => prs_cc(env)?,
        '\\' => prs_escape(env)?,
        ']' | '}' if env.strict() => return err(REGERR_UNMATCHED_CLOSE_BRACKET),
        '{' if env.strict() => return err(REGERR_END_PATTERN_AT_LEFT_BRACE),
        _ => Node::Char(c),
    };
    Ok(node)
}

/// An atom with its optional quantifier.
fn prs_exp(env: &mut ParseEnv) -> ParseResult<Node> {
    match env.ppeek() {
        Some('*') | Some('+') | Some('?') => {
            return err(REGERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED);
        }
        Some('{') if !env.strict() && is_interval_ahead(env) => {
            return err(REGERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED);
        }
        _ => {}
    }

    let atom = prs_atom(env)?;
    let Some((lower, upper)) = fetch_quantifier(env)? else {
        return Ok(atom);
    };
    if !atom.is_quantifiable(env.strict()) {
        return err(REGERR_TARGET_OF_REPEAT_OPERATOR_INVALID);
    }

    let greedy = if env.ppeek_is('?') {
        env.pinc();
        false
    } else {
        true
    };

    match env.ppeek() {
        Some('*') | Some('+') | Some('?') => return err(REGERR_NESTED_REPEAT_OPERATOR),
        Some('{') if env.strict() || is_interval_ahead(env) => {
            return err(REGERR_NESTED_REPEAT_OPERATOR);
        }
        _ => {}
    }

    Ok(Node::Quant(QuantNode {
        lower,
        upper,
        greedy,
        body: Box::new(atom),
    }))
}

fn prs_branch(env: &mut ParseEnv) -> ParseResult<Node> {
    let mut items = Vec::new();
    while let Some(c) = env.ppeek() {
        if c == '|' || c == ')' {
            break;
        }
        items.push(prs_exp(env)?);
    }
    Ok(Node::new_list(items))
}

fn prs_alts(env: &mut ParseEnv) -> ParseResult<Node> {
    env.depth += 1;
    if env.depth > env.depth_limit {
        return err(REGERR_PARSE_DEPTH_LIMIT_OVER);
    }

    let mut branches = vec![prs_branch(env)?];
    while env.ppeek_is('|') {
        env.pinc();
        branches.push(prs_branch(env)?);
    }

    env.depth -= 1;
    Ok(Node::new_alt(branches))
}

fn prs_regexp(env: &mut ParseEnv) -> ParseResult<Node> {
    let node = prs_alts(env)?;
    if !env.p_end() {
        return err(REGERR_UNMATCHED_CLOSE_PARENTHESIS);
    }
    Ok(node)
}

/// Parse `pattern` into an AST. Capture numbers and named backreference
/// targets are left unresolved; see [`crate::regcomp::build_group_table`].
pub fn reg_parse_tree(pattern: &str, options: RegexOptions) -> Result<Node, RegexError> {
    let mut env = ParseEnv::new(pattern, options);
    if env.num_mem > reg_get_capture_num_limit() {
        return Err(RegexError::TooManyCaptures);
    }
    prs_regexp(&mut env)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(p: &str) -> Node {
        reg_parse_tree(p, RegexOptions::empty()).unwrap()
    }

    fn parse_u(p: &str) -> Node {
        reg_parse_tree(p, RegexOptions::UNICODE).unwrap()
    }

    fn parse_err(p: &str, options: RegexOptions) -> i32 {
        reg_parse_tree(p, options).unwrap_err().code()
    }

    fn chars(s: &str) -> Node {
        Node::new_list(s.chars().map(Node::Char).collect())
    }

    #[test]
    fn prescan_counts_groups() {
        let p: Vec<char> = r"(a)(?:b)(?<n>c)(?<=d)[(](\()".chars().collect();
        assert_eq!(scan_capture_groups(&p), (3, true));
        let p: Vec<char> = r"(a)\k<x>".chars().collect();
        assert_eq!(scan_capture_groups(&p), (1, false));
    }

    #[test]
    fn named_group() {
        let node = parse(r"(?<year>\d)");
        match node {
            Node::Bag(BagNode {
                bag_type: BagType::Memory { name, .. },
                ..
            }) => assert_eq!(name.as_deref(), Some("year")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn group_name_unicode_escapes() {
        for p in [r"(?<\u0061b>.)", r"(?<a\u{62}>.)", r"(?<\u{61}b>.)"] {
            match parse(p) {
                Node::Bag(BagNode {
                    bag_type: BagType::Memory { name, .. },
                    ..
                }) => assert_eq!(name.as_deref(), Some("ab")),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn group_name_surrogate_pair_escape() {
        match parse(r"(?<\uD835\uDC9C>.)") {
            Node::Bag(BagNode {
                bag_type: BagType::Memory { name, .. },
                ..
            }) => assert_eq!(name.as_deref(), Some("\u{1D49C}")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn group_name_errors() {
        let o = RegexOptions::empty();
        assert_eq!(parse_err(r"(?<>a)", o), REGERR_EMPTY_GROUP_NAME);
        assert_eq!(parse_err(r"(?<1a>a)", o), REGERR_INVALID_CHAR_IN_GROUP_NAME);
        assert_eq!(parse_err(r"(?<a-b>a)", o), REGERR_INVALID_CHAR_IN_GROUP_NAME);
        assert_eq!(parse_err(r"(?<a\x41>a)", o), REGERR_INVALID_CHAR_IN_GROUP_NAME);
        assert_eq!(parse_err(r"(?<\uD835>a)", o), REGERR_INVALID_CHAR_IN_GROUP_NAME);
        assert_eq!(parse_err(r"(?<abc", o), REGERR_INVALID_GROUP_NAME);
    }

    #[test]
    fn dollar_and_underscore_names() {
        assert!(reg_parse_tree(r"(?<$>a)(?<_x1>b)(?<π>c)", RegexOptions::empty()).is_ok());
    }

    #[test]
    fn k_without_named_groups_is_literal() {
        assert_eq!(parse(r"\k<foo>"), chars("k<foo>"));
    }

    #[test]
    fn k_with_named_groups_is_backref() {
        let node = parse(r"(?<foo>a)\k<foo>");
        match node {
            Node::List(items) => assert_eq!(
                items[1],
                Node::BackRef(BackRefNode::Name {
                    name: "foo".to_string(),
                    regnum: 0
                })
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn k_strict_modes() {
        // parsed as a reference; resolution fails later in the group table
        let node = reg_parse_tree(r"\k<foo>", RegexOptions::STRICT_NAMED_REFS).unwrap();
        assert_eq!(
            node,
            Node::BackRef(BackRefNode::Name {
                name: "foo".to_string(),
                regnum: 0
            })
        );
        // `\k` without `<` once named references are active
        assert_eq!(
            parse_err(r"(?<a>.)\k", RegexOptions::empty()),
            REGERR_INVALID_GROUP_NAME
        );
        assert_eq!(parse_err(r"\k", RegexOptions::UNICODE), REGERR_INVALID_GROUP_NAME);
    }

    #[test]
    fn numbered_backref_and_legacy_octal() {
        match parse(r"(a)\1") {
            Node::List(items) => assert_eq!(items[1], Node::BackRef(BackRefNode::Number(1))),
            other => panic!("unexpected {:?}", other),
        }
        // no group 2: octal escape \2 = U+0002
        match parse(r"(a)\2") {
            Node::List(items) => assert_eq!(items[1], Node::Char('\u{2}')),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(parse(r"\8"), Node::Char('8'));
        assert_eq!(parse_err(r"(a)\2", RegexOptions::UNICODE), REGERR_INVALID_BACKREF);
    }

    #[test]
    fn forward_numbered_backref() {
        match parse(r"\1(a)") {
            Node::List(items) => assert_eq!(items[0], Node::BackRef(BackRefNode::Number(1))),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn quantifiers() {
        match parse("a{2,3}?") {
            Node::Quant(q) => {
                assert_eq!((q.lower, q.upper, q.greedy), (2, Some(3), false));
            }
            other => panic!("unexpected {:?}", other),
        }
        match parse("a{2,}") {
            Node::Quant(q) => assert_eq!((q.lower, q.upper), (2, None)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn legacy_braces_are_literal() {
        assert_eq!(parse("a{"), chars("a{"));
        assert_eq!(parse("a{x}"), chars("a{x}"));
        assert_eq!(parse("}"), Node::Char('}'));
        assert_eq!(parse("]"), Node::Char(']'));
        assert_eq!(
            parse_err("a{", RegexOptions::UNICODE),
            REGERR_INVALID_REPEAT_RANGE_PATTERN
        );
        assert_eq!(parse_err("]", RegexOptions::UNICODE), REGERR_UNMATCHED_CLOSE_BRACKET);
    }

    #[test]
    fn quantifier_errors() {
        let o = RegexOptions::empty();
        assert_eq!(parse_err("*a", o), REGERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED);
        assert_eq!(parse_err("{2}", o), REGERR_TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED);
        assert_eq!(parse_err("a**", o), REGERR_NESTED_REPEAT_OPERATOR);
        assert_eq!(parse_err("a{2}{3}", o), REGERR_NESTED_REPEAT_OPERATOR);
        assert_eq!(parse_err("a{3,2}", o), REGERR_UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE);
        assert_eq!(parse_err("^*", o), REGERR_TARGET_OF_REPEAT_OPERATOR_INVALID);
        assert_eq!(parse_err("(?<=a)*", o), REGERR_TARGET_OF_REPEAT_OPERATOR_INVALID);
        assert!(reg_parse_tree("(?=a)*", o).is_ok());
        assert_eq!(
            parse_err("(?=a)*", RegexOptions::UNICODE),
            REGERR_TARGET_OF_REPEAT_OPERATOR_INVALID
        );
    }

    #[test]
    fn parenthesis_errors() {
        let o = RegexOptions::empty();
        assert_eq!(parse_err("(a", o), REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS);
        assert_eq!(parse_err("a)", o), REGERR_UNMATCHED_CLOSE_PARENTHESIS);
        assert_eq!(parse_err("(?", o), REGERR_END_PATTERN_IN_GROUP);
        assert_eq!(parse_err("(?x)", o), REGERR_UNDEFINED_GROUP_OPTION);
        assert_eq!(parse_err("a\\", o), REGERR_END_PATTERN_AT_ESCAPE);
    }

    #[test]
    fn char_classes() {
        match parse(r"[^a-c\d-]") {
            Node::CClass(cc) => {
                assert!(cc.negated);
                assert_eq!(
                    cc.items,
                    vec![
                        ClassItem::Range('a', 'c'),
                        ClassItem::CType(CType::Digit),
                        ClassItem::Range('-', '-'),
                    ]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
        match parse(r"[\b]") {
            Node::CClass(cc) => assert_eq!(cc.items, vec![ClassItem::Range('\u{8}', '\u{8}')]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn char_class_errors() {
        let o = RegexOptions::empty();
        assert_eq!(parse_err("[z-a]", o), REGERR_EMPTY_RANGE_IN_CHAR_CLASS);
        assert_eq!(parse_err("[abc", o), REGERR_PREMATURE_END_OF_CHAR_CLASS);
        assert!(reg_parse_tree(r"[\d-z]", o).is_ok());
        assert_eq!(
            parse_err(r"[\d-z]", RegexOptions::UNICODE),
            REGERR_UNMATCHED_RANGE_SPECIFIER_IN_CHAR_CLASS
        );
    }

    #[test]
    fn escapes() {
        assert_eq!(parse(r"\x41"), Node::Char('A'));
        assert_eq!(parse(r"\u0041"), Node::Char('A'));
        assert_eq!(parse(r"\u{41}"), chars("u{41}"));
        assert_eq!(parse_u(r"\u{1F600}"), Node::Char('\u{1F600}'));
        assert_eq!(parse(r"\cJ"), Node::Char('\n'));
        assert_eq!(parse(r"\c"), chars("\\c"));
        assert_eq!(parse(r"\q"), Node::Char('q'));
        assert_eq!(parse(r"\0"), Node::Char('\0'));
        assert_eq!(parse_err(r"\q", RegexOptions::UNICODE), REGERR_INVALID_ESCAPE);
        assert_eq!(
            parse_err(r"\u{110000}", RegexOptions::UNICODE),
            REGERR_TOO_BIG_WIDE_CHAR_VALUE
        );
    }

    #[test]
    fn lookarounds() {
        match parse("(?<!a)b") {
            Node::List(items) => match &items[0] {
                Node::Look(l) => assert!(l.behind && l.negative),
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn alternation_shapes() {
        match parse("a|b|") {
            Node::Alt(branches) => {
                assert_eq!(branches.len(), 3);
                assert_eq!(branches[2], Node::Empty);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
