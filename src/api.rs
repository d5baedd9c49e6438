// api.rs - Idiomatic Rust API.
//
// Wraps the internals (reg_new, reg_search) with Rust-native types:
// Regex, RegexBuilder, Match, Captures, NamedGroups, FindIter.

use std::borrow::Cow;
use std::ops::Range;

use indexmap::IndexMap;
use tracing::warn;

use crate::error::RegexError;
use crate::regcomp::reg_new;
use crate::regdefs::{Region, RegexOptions};
use crate::regenc::enclen;
use crate::regexec::{reg_search, MatchArg};
use crate::regint::RegexType;
use crate::regparse_types::GroupTable;
use crate::regsubst::{Replacer, Template};

/// A compiled regular expression.
///
/// Compiled once, then shared freely: a `Regex` is `Send + Sync` and every
/// search builds its own matcher state.
///
/// # Examples
///
/// ```
/// use ferroni_named::api::Regex;
///
/// let re = Regex::new(r"(?<year>\d{4})-(?<month>\d{2})").unwrap();
/// let caps = re.captures("due 2015-01").unwrap();
/// assert_eq!(caps.name("year").unwrap().as_str(), "2015");
/// assert_eq!(&caps[2], "01");
/// ```
pub struct Regex {
    inner: RegexType,
    pattern: String,
    retry_limit: Option<u64>,
    time_limit: Option<u64>,
}

impl Regex {
    /// Compile a pattern with no flags.
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        RegexBuilder::new(pattern).build()
    }

    /// Compile a pattern with ECMAScript flag letters (`i`, `m`, `s`, `u`,
    /// `y`).
    pub fn with_flags(pattern: &str, flags: &str) -> Result<Regex, RegexError> {
        let options = RegexOptions::from_flags(flags).map_err(RegexError::from)?;
        RegexBuilder::new(pattern).options(options).build()
    }

    /// Create a [`RegexBuilder`] for fine-grained control over compilation.
    pub fn builder(pattern: &str) -> RegexBuilder {
        RegexBuilder::new(pattern)
    }

    fn match_arg(&self) -> MatchArg {
        let mut msa = MatchArg::new(&self.inner);
        if let Some(n) = self.retry_limit {
            msa.set_retry_limit_in_match(n);
        }
        if let Some(ms) = self.time_limit {
            msa.set_time_limit(ms);
        }
        msa
    }

    fn search_region(&self, text: &str, at: usize) -> Result<Option<Region>, RegexError> {
        let mut msa = self.match_arg();
        Ok(reg_search(&self.inner, text, at, &mut msa)?.map(|_| msa.region))
    }

    // ========================================================================
    // Fallible searches
    // ========================================================================

    /// Like [`Regex::find_at`], but reports a step or time budget overrun
    /// instead of treating it as "no match".
    pub fn try_find_at<'t>(&self, text: &'t str, at: usize) -> Result<Option<Match<'t>>, RegexError> {
        Ok(self.search_region(text, at)?.and_then(|region| {
            region.get(0).map(|(start, end)| Match { text, start, end })
        }))
    }

    pub fn try_find<'t>(&self, text: &'t str) -> Result<Option<Match<'t>>, RegexError> {
        self.try_find_at(text, 0)
    }

    /// Like [`Regex::captures_at`], but reports a step or time budget
    /// overrun instead of treating it as "no match".
    pub fn try_captures_at<'r, 't>(
        &'r self,
        text: &'t str,
        at: usize,
    ) -> Result<Option<Captures<'r, 't>>, RegexError> {
        Ok(self.search_region(text, at)?.map(|region| Captures {
            text,
            region,
            regex: self,
        }))
    }

    pub fn try_captures<'r, 't>(&'r self, text: &'t str) -> Result<Option<Captures<'r, 't>>, RegexError> {
        self.try_captures_at(text, 0)
    }

    // ========================================================================
    // Searches
    // ========================================================================

    /// Return the first match at or after byte offset `at`.
    ///
    /// A budget overrun is logged and reported as `None`; use
    /// [`Regex::try_find_at`] to observe it.
    pub fn find_at<'t>(&self, text: &'t str, at: usize) -> Option<Match<'t>> {
        self.try_find_at(text, at).unwrap_or_else(|err| {
            warn!(error = %err, pattern = %self.pattern, "search aborted");
            None
        })
    }

    /// Return the first match in `text`, or `None` if no match.
    pub fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find_at(text, 0)
    }

    /// Check whether `text` matches the pattern anywhere.
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Return the first match at or after `at` with all capture groups.
    pub fn captures_at<'r, 't>(&'r self, text: &'t str, at: usize) -> Option<Captures<'r, 't>> {
        self.try_captures_at(text, at).unwrap_or_else(|err| {
            warn!(error = %err, pattern = %self.pattern, "search aborted");
            None
        })
    }

    /// Return the first match with all capture groups, or `None`.
    pub fn captures<'r, 't>(&'r self, text: &'t str) -> Option<Captures<'r, 't>> {
        self.captures_at(text, 0)
    }

    /// Iterate over all non-overlapping matches in `text`.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> FindIter<'r, 't> {
        FindIter {
            regex: self,
            text,
            next_start: 0,
        }
    }

    /// Iterate over the captures of all non-overlapping matches in `text`.
    pub fn captures_iter<'r, 't>(&'r self, text: &'t str) -> CaptureMatches<'r, 't> {
        CaptureMatches {
            regex: self,
            text,
            next_start: 0,
        }
    }

    // ========================================================================
    // Replacement
    // ========================================================================

    /// Replace the first match.
    pub fn replace<'t, R: Replacer>(&self, text: &'t str, rep: R) -> Cow<'t, str> {
        self.replacen(text, 1, rep)
    }

    /// Replace every match.
    pub fn replace_all<'t, R: Replacer>(&self, text: &'t str, rep: R) -> Cow<'t, str> {
        self.replacen(text, 0, rep)
    }

    /// Replace at most `limit` matches (`0` means all). On a budget overrun
    /// the text is returned unchanged; use [`Regex::try_replacen`] to
    /// observe it.
    pub fn replacen<'t, R: Replacer>(&self, text: &'t str, limit: usize, rep: R) -> Cow<'t, str> {
        self.try_replacen(text, limit, rep).unwrap_or_else(|err| {
            warn!(error = %err, pattern = %self.pattern, "replace aborted");
            Cow::Borrowed(text)
        })
    }

    pub fn try_replacen<'t, R: Replacer>(
        &self,
        text: &'t str,
        limit: usize,
        mut rep: R,
    ) -> Result<Cow<'t, str>, RegexError> {
        let mut out = String::new();
        let mut last = 0;
        let mut at = 0;
        let mut count = 0;

        while at <= text.len() {
            let Some(caps) = self.try_captures_at(text, at)? else {
                break;
            };
            let Some(m) = caps.get(0) else {
                break;
            };
            out.push_str(&text[last..m.start()]);
            rep.replace_append(&caps, &mut out);
            last = m.end();
            at = next_search_start(text, &m);

            count += 1;
            if limit != 0 && count >= limit {
                break;
            }
        }

        if count == 0 {
            return Ok(Cow::Borrowed(text));
        }
        out.push_str(&text[last..]);
        Ok(Cow::Owned(out))
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of capture groups in the pattern (excluding group 0).
    pub fn captures_len(&self) -> usize {
        self.inner.num_mem
    }

    /// Declared group names in declaration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.group_table.names().map(|(name, _)| name)
    }

    /// Index of the group declared as `name`.
    pub fn name_to_index(&self, name: &str) -> Option<usize> {
        self.inner.group_table.name_to_group_number(name)
    }

    pub fn group_table(&self) -> &GroupTable {
        &self.inner.group_table
    }

    pub fn options(&self) -> RegexOptions {
        self.inner.options
    }

    /// The pattern text this regex was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Access the compiled program.
    pub fn as_raw(&self) -> &RegexType {
        &self.inner
    }
}

impl std::fmt::Debug for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Regex").field(&self.pattern).finish()
    }
}

impl std::fmt::Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl std::str::FromStr for Regex {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Regex, RegexError> {
        Regex::new(s)
    }
}

/// Where to search after `m`: an empty match advances by one char.
fn next_search_start(text: &str, m: &Match<'_>) -> usize {
    if m.is_empty() {
        m.end() + enclen(text, m.end())
    } else {
        m.end()
    }
}

// === RegexBuilder ===

/// Builder for compiling a [`Regex`] with custom options.
///
/// # Examples
///
/// ```
/// use ferroni_named::api::Regex;
///
/// let re = Regex::builder(r"hello world")
///     .case_insensitive(true)
///     .build()
///     .unwrap();
/// assert!(re.is_match("Hello World"));
/// ```
pub struct RegexBuilder {
    pattern: String,
    options: RegexOptions,
    retry_limit: Option<u64>,
    time_limit: Option<u64>,
}

impl RegexBuilder {
    /// Create a new builder for the given pattern.
    pub fn new(pattern: &str) -> Self {
        RegexBuilder {
            pattern: pattern.to_string(),
            options: RegexOptions::empty(),
            retry_limit: None,
            time_limit: None,
        }
    }

    fn flag(mut self, flag: RegexOptions, yes: bool) -> Self {
        self.options.set(flag, yes);
        self
    }

    /// Enable or disable case-insensitive matching (`i`).
    pub fn case_insensitive(self, yes: bool) -> Self {
        self.flag(RegexOptions::IGNORECASE, yes)
    }

    /// `^`/`$` match at every line boundary (`m`).
    pub fn multi_line(self, yes: bool) -> Self {
        self.flag(RegexOptions::MULTILINE, yes)
    }

    /// `.` matches line terminators too (`s`).
    pub fn dot_matches_new_line(self, yes: bool) -> Self {
        self.flag(RegexOptions::DOTALL, yes)
    }

    /// Strict dialect (`u`): no legacy leniencies, `\u{...}` escapes.
    pub fn unicode(self, yes: bool) -> Self {
        self.flag(RegexOptions::UNICODE, yes)
    }

    /// Only match at the search start position (`y`).
    pub fn sticky(self, yes: bool) -> Self {
        self.flag(RegexOptions::STICKY, yes)
    }

    /// Treat `\k<name>` as a named backreference even in patterns that
    /// declare no named groups, so an undeclared name is a compile error.
    pub fn strict_named_refs(self, yes: bool) -> Self {
        self.flag(RegexOptions::STRICT_NAMED_REFS, yes)
    }

    /// Replace all options at once.
    pub fn options(mut self, options: RegexOptions) -> Self {
        self.options = options;
        self
    }

    /// Backtrack budget per match attempt for this regex (`0` disables the
    /// limit). Defaults to the process-wide setting.
    pub fn retry_limit(mut self, n: u64) -> Self {
        self.retry_limit = Some(n);
        self
    }

    /// Wall-clock budget per search in milliseconds (`0` disables the
    /// limit). Defaults to the process-wide setting.
    pub fn time_limit(mut self, msec: u64) -> Self {
        self.time_limit = Some(msec);
        self
    }

    /// Compile the pattern into a [`Regex`].
    pub fn build(self) -> Result<Regex, RegexError> {
        let inner = reg_new(&self.pattern, self.options)?;
        Ok(Regex {
            inner,
            pattern: self.pattern,
            retry_limit: self.retry_limit,
            time_limit: self.time_limit,
        })
    }
}

// === Match ===

/// A single match result referencing the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    /// Byte offset of the start of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the end of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Byte range of the match.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The matched text.
    pub fn as_str(&self) -> &'t str {
        &self.text[self.start..self.end]
    }

    pub fn as_bytes(&self) -> &'t [u8] {
        self.as_str().as_bytes()
    }

    /// Returns the length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the match is empty (zero-length).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// === Captures ===

/// All capture groups from a single match.
///
/// Group 0 is the entire match. Groups 1..N correspond to capturing groups
/// in order of their opening parenthesis, named or not.
pub struct Captures<'r, 't> {
    text: &'t str,
    region: Region,
    regex: &'r Regex,
}

impl<'r, 't> Captures<'r, 't> {
    /// Get capture group `i`, or `None` if the group did not participate.
    ///
    /// Group 0 is the entire match.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        self.region.get(i).map(|(start, end)| Match {
            text: self.text,
            start,
            end,
        })
    }

    /// Get the group declared as `name`, or `None` if it did not
    /// participate or no such name is declared.
    pub fn name(&self, name: &str) -> Option<Match<'t>> {
        self.get(self.regex.name_to_index(name)?)
    }

    /// The named-group projection: every declared name mapped to its capture
    /// or `None`. Absent when the pattern declares no named groups.
    pub fn groups(&self) -> Option<NamedGroups<'r, 't>> {
        let table = self.regex.group_table();
        if !table.has_named_groups() {
            return None;
        }
        let entries = table
            .names()
            .map(|(name, index)| (name, self.get(index)))
            .collect();
        Some(NamedGroups { entries })
    }

    /// Byte offset where the whole match starts.
    pub fn start(&self) -> usize {
        self.region.get(0).map_or(0, |(start, _)| start)
    }

    /// The full subject text.
    pub fn input(&self) -> &'t str {
        self.text
    }

    /// Number of capture groups (including group 0).
    pub fn len(&self) -> usize {
        self.regex.captures_len() + 1
    }

    /// Always `false`: group 0 is present on every match.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all capture groups.
    pub fn iter(&self) -> CapturesIter<'_, 'r, 't> {
        CapturesIter {
            captures: self,
            index: 0,
        }
    }

    /// Expand a replacement template for this match and append it to `dst`.
    pub fn expand(&self, template: &str, dst: &mut String) {
        Template::parse(template, self.regex.group_table()).expand(self, dst);
    }
}

impl std::ops::Index<usize> for Captures<'_, '_> {
    type Output = str;

    /// # Panics
    ///
    /// Panics if group `i` did not participate in the match.
    fn index(&self, i: usize) -> &str {
        match self.get(i) {
            Some(m) => m.as_str(),
            None => panic!("no group at index '{}'", i),
        }
    }
}

impl<'n> std::ops::Index<&'n str> for Captures<'_, '_> {
    type Output = str;

    /// # Panics
    ///
    /// Panics if group `name` is undeclared or did not participate.
    fn index(&self, name: &'n str) -> &str {
        match self.name(name) {
            Some(m) => m.as_str(),
            None => panic!("no group named '{}'", name),
        }
    }
}

impl std::fmt::Debug for Captures<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for m in self.iter() {
            list.entry(&m.map(|m| m.as_str()));
        }
        list.finish()
    }
}

// === NamedGroups ===

/// Declared group names mapped to their captures, in declaration order.
///
/// Every declared name is a key, including groups that did not participate
/// in the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedGroups<'r, 't> {
    entries: IndexMap<&'r str, Option<Match<'t>>>,
}

impl<'r, 't> NamedGroups<'r, 't> {
    /// `None` if `name` is not declared; `Some(None)` if it is declared but
    /// did not participate.
    pub fn get(&self, name: &str) -> Option<Option<Match<'t>>> {
        self.entries.get(name).copied()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'r str> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'r str, Option<Match<'t>>)> + '_ {
        self.entries.iter().map(|(name, m)| (*name, *m))
    }
}

// === CapturesIter ===

/// Iterator over capture groups in a [`Captures`].
pub struct CapturesIter<'c, 'r, 't> {
    captures: &'c Captures<'r, 't>,
    index: usize,
}

impl<'t> Iterator for CapturesIter<'_, '_, 't> {
    type Item = Option<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.captures.len() {
            return None;
        }
        let m = self.captures.get(self.index);
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CapturesIter<'_, '_, '_> {}

// === FindIter ===

/// Iterator over all non-overlapping matches in a text.
pub struct FindIter<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    next_start: usize,
}

impl<'t> Iterator for FindIter<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        if self.next_start > self.text.len() {
            return None;
        }
        let m = self.regex.find_at(self.text, self.next_start)?;
        self.next_start = next_search_start(self.text, &m);
        Some(m)
    }
}

// === CaptureMatches ===

/// Iterator over the captures of all non-overlapping matches in a text.
pub struct CaptureMatches<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    next_start: usize,
}

impl<'r, 't> Iterator for CaptureMatches<'r, 't> {
    type Item = Captures<'r, 't>;

    fn next(&mut self) -> Option<Captures<'r, 't>> {
        if self.next_start > self.text.len() {
            return None;
        }
        let caps = self.regex.captures_at(self.text, self.next_start)?;
        let m = caps.get(0)?;
        self.next_start = next_search_start(self.text, &m);
        Some(caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_new_and_find() {
        let re = Regex::new(r"\d+").unwrap();
        let m = re.find("hello 42 world").unwrap();
        assert_eq!(m.as_str(), "42");
        assert_eq!(m.start(), 6);
        assert_eq!(m.end(), 8);
        assert_eq!(m.range(), 6..8);
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
    }

    #[test]
    fn regex_no_match() {
        let re = Regex::new(r"\d+").unwrap();
        assert!(re.find("no digits here").is_none());
    }

    #[test]
    fn regex_captures() {
        let re = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
        let caps = re.captures("date: 2026-02-14").unwrap();
        assert_eq!(&caps[0], "2026-02-14");
        assert_eq!(&caps[1], "2026");
        assert_eq!(&caps[3], "14");
        assert!(caps.get(4).is_none());
        assert_eq!(caps.len(), 4);
        assert_eq!(caps.start(), 6);
        assert_eq!(caps.input(), "date: 2026-02-14");
        assert!(caps.groups().is_none());
    }

    #[test]
    fn captures_iter_over_groups() {
        let re = Regex::new(r"(a)(b)?").unwrap();
        let caps = re.captures("a").unwrap();
        let items: Vec<_> = caps.iter().collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_some());
        assert!(items[1].is_some());
        assert!(items[2].is_none());
    }

    #[test]
    fn named_projection() {
        let re = Regex::new(r"(?<a>x)?(?<b>y)").unwrap();
        let caps = re.captures("y").unwrap();
        let groups = caps.groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("a"), Some(None));
        assert_eq!(groups.get("b").flatten().map(|m| m.as_str()), Some("y"));
        assert_eq!(groups.get("c"), None);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn with_flags() {
        let re = Regex::with_flags("^b", "im").unwrap();
        assert!(re.is_match("a\nB"));
        assert_eq!(
            Regex::with_flags("a", "x").unwrap_err(),
            RegexError::InvalidArgument
        );
    }

    #[test]
    fn empty_match_find_iter() {
        let re = Regex::new(r"").unwrap();
        let starts: Vec<_> = re.find_iter("ab").map(|m| m.start()).collect();
        assert_eq!(starts, vec![0, 1, 2]);

        let re = Regex::new(r"a*").unwrap();
        let found: Vec<_> = re.find_iter("baaa").map(|m| m.range()).collect();
        assert_eq!(found, vec![0..0, 1..4, 4..4]);
    }

    #[test]
    fn empty_match_steps_over_multibyte_char() {
        let re = Regex::new(r"x*").unwrap();
        let starts: Vec<_> = re.find_iter("日").map(|m| m.start()).collect();
        assert_eq!(starts, vec![0, 3]);
    }

    #[test]
    fn replace_variants() {
        let re = Regex::new(r"(?<d>\d)").unwrap();
        assert_eq!(re.replace("a1b2", "<$<d>>"), "a<1>b2");
        assert_eq!(re.replace_all("a1b2", "<$1>"), "a<1>b<2>");
        assert_eq!(re.replacen("1 2 3", 2, "x"), "x x 3");
        assert!(matches!(re.replace("none", "x"), Cow::Borrowed(_)));
        let owned = String::from("[$&]");
        assert_eq!(re.replace_all("1", &owned), "[1]");
        assert_eq!(re.replace_all("1", owned), "[1]");
    }

    #[test]
    fn replace_with_closure_is_verbatim() {
        let re = Regex::new(r"(?<d>\d)").unwrap();
        let out = re.replace_all("a1b2", |caps: &Captures<'_, '_>| {
            format!("$<d>{}", caps.start())
        });
        assert_eq!(out, "a$<d>1b$<d>3");
    }

    #[test]
    fn introspection() {
        let re = Regex::new(r"(?<y>\d+)-(\d+)-(?<d>\d+)").unwrap();
        assert_eq!(re.captures_len(), 3);
        assert_eq!(re.group_names().collect::<Vec<_>>(), vec!["y", "d"]);
        assert_eq!(re.name_to_index("d"), Some(3));
        assert_eq!(re.name_to_index("m"), None);
        assert_eq!(re.as_str(), r"(?<y>\d+)-(\d+)-(?<d>\d+)");
        assert_eq!(format!("{:?}", re), r#"Regex("(?<y>\\d+)-(\\d+)-(?<d>\\d+)")"#);
    }

    #[test]
    fn budget_overrun_surfaces_in_try_api() {
        let re = Regex::builder(r"(a|aa)+$").retry_limit(1000).build().unwrap();
        let text = format!("{}b", "a".repeat(40));
        assert_eq!(re.try_find(&text).unwrap_err(), RegexError::RetryLimitInMatchOver);
        assert!(re.find(&text).is_none());
    }

    #[test]
    fn regex_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Regex>();
    }
}
