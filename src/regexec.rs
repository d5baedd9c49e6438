// regexec.rs - Matcher: backtracking VM over compiled bytecode, and search.
//
// Structure: global limits -> stack types -> match state -> VM (match_at)
// -> search entry point.
//
// Every change to capture or loop state made after a choice point is
// recorded on the backtrack stack, so popping back to a choice point
// restores exactly the state that existed when it was pushed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use memchr::memmem;
use tracing::trace;

use crate::error::RegexError;
use crate::regdefs::*;
use crate::regenc::*;
use crate::regint::*;

// ============================================================================
// Global limits
// ============================================================================

static RETRY_LIMIT_IN_MATCH: AtomicU64 = AtomicU64::new(DEFAULT_RETRY_LIMIT_IN_MATCH);
static RETRY_LIMIT_IN_SEARCH: AtomicU64 = AtomicU64::new(DEFAULT_RETRY_LIMIT_IN_SEARCH);
static TIME_LIMIT: AtomicU64 = AtomicU64::new(DEFAULT_TIME_LIMIT_MSEC);

pub fn reg_set_retry_limit_in_match(n: u64) { RETRY_LIMIT_IN_MATCH.store(n, Ordering::Relaxed); }
pub fn reg_get_retry_limit_in_match() -> u64 { RETRY_LIMIT_IN_MATCH.load(Ordering::Relaxed) }
pub fn reg_set_retry_limit_in_search(n: u64) { RETRY_LIMIT_IN_SEARCH.store(n, Ordering::Relaxed); }
pub fn reg_get_retry_limit_in_search() -> u64 { RETRY_LIMIT_IN_SEARCH.load(Ordering::Relaxed) }
pub fn reg_set_time_limit(n: u64) { TIME_LIMIT.store(n, Ordering::Relaxed); }
pub fn reg_get_time_limit() -> u64 { TIME_LIMIT.load(Ordering::Relaxed) }

// ============================================================================
// Stack Types
// ============================================================================

#[derive(Clone, Copy, Debug)]
enum StackEntry {
    /// Choice point: resume at `pcode` with string position `pstr`.
    Alt { pcode: usize, pstr: usize },
    /// Previous span of a capture group.
    MemRestore { num: usize, prev: Option<(usize, usize)> },
    /// Previous pending start of a capture group.
    PendingRestore { num: usize, prev: usize },
    /// Previous iteration count of a loop.
    RepeatCount { id: usize, prev: u32 },
    /// Previous iteration start position of a loop.
    RepeatStartPos { id: usize, prev: usize },
}

// ============================================================================
// Match State
// ============================================================================

#[derive(Clone, Debug, Default)]
struct MatchState {
    mem: Vec<Option<(usize, usize)>>,
    /// Position recorded by `MemStart`, closed by `MemEnd`.
    pending: Vec<usize>,
    counts: Vec<u32>,
    iter_start: Vec<usize>,
}

impl MatchState {
    fn reset(&mut self, reg: &RegexType) {
        self.mem.clear();
        self.mem.resize(reg.num_mem + 1, None);
        self.pending.clear();
        self.pending.resize(reg.num_mem + 1, 0);
        self.counts.clear();
        self.counts.resize(reg.num_repeat, 0);
        self.iter_start.clear();
        self.iter_start.resize(reg.num_repeat, 0);
    }

    fn restore(&mut self, entry: StackEntry) {
        match entry {
            StackEntry::Alt { .. } => {}
            StackEntry::MemRestore { num, prev } => self.mem[num] = prev,
            StackEntry::PendingRestore { num, prev } => self.pending[num] = prev,
            StackEntry::RepeatCount { id, prev } => self.counts[id] = prev,
            StackEntry::RepeatStartPos { id, prev } => self.iter_start[id] = prev,
        }
    }
}

/// Pop to the most recent choice point above `base`, undoing state changes
/// on the way.
fn stack_pop(stack: &mut Vec<StackEntry>, base: usize, st: &mut MatchState) -> Option<(usize, usize)> {
    while stack.len() > base {
        match stack.pop()? {
            StackEntry::Alt { pcode, pstr } => return Some((pcode, pstr)),
            entry => st.restore(entry),
        }
    }
    None
}

/// Undo every state change above `base`.
fn stack_unwind(stack: &mut Vec<StackEntry>, base: usize, st: &mut MatchState) {
    while stack.len() > base {
        if let Some(entry) = stack.pop() {
            st.restore(entry);
        }
    }
}

/// Drop the choice points above `base` but keep their state records, so a
/// later failure still undoes what happened inside an atomic section.
fn stack_cut_alts(stack: &mut Vec<StackEntry>, base: usize) {
    let kept: Vec<StackEntry> = stack
        .drain(base..)
        .filter(|e| !matches!(e, StackEntry::Alt { .. }))
        .collect();
    stack.extend(kept);
}

// ============================================================================
// MatchArg
// ============================================================================

/// Per-search matcher context: limits, counters and the capture region of
/// the last successful match.
pub struct MatchArg {
    pub region: Region,
    retry_limit_in_match: u64,
    retry_limit_in_search: u64,
    retry_in_match_counter: u64,
    retry_in_search_counter: u64,
    step_counter: u64,
    time_limit: u64,
    time_start: Option<Instant>,
    state: MatchState,
}

impl MatchArg {
    /// A context using the process-wide limits.
    pub fn new(reg: &RegexType) -> Self {
        MatchArg {
            region: Region::with_num_regs(reg.num_mem + 1),
            retry_limit_in_match: reg_get_retry_limit_in_match(),
            retry_limit_in_search: reg_get_retry_limit_in_search(),
            retry_in_match_counter: 0,
            retry_in_search_counter: 0,
            step_counter: 0,
            time_limit: reg_get_time_limit(),
            time_start: None,
            state: MatchState::default(),
        }
    }

    pub fn set_retry_limit_in_match(&mut self, n: u64) {
        self.retry_limit_in_match = n;
    }

    pub fn set_time_limit(&mut self, msec: u64) {
        self.time_limit = msec;
    }

    fn check_time_limit(&mut self) -> bool {
        if self.time_limit == 0 { return false; }
        let start = self.time_start.get_or_insert_with(Instant::now);
        start.elapsed() >= Duration::from_millis(self.time_limit)
    }

    /// Account for one backtrack and enforce the retry and time limits.
    fn count_retry(&mut self) -> Result<(), RegexError> {
        self.retry_in_match_counter += 1;
        if self.retry_limit_in_match != 0 && self.retry_in_match_counter > self.retry_limit_in_match {
            return Err(RegexError::RetryLimitInMatchOver);
        }
        if self.retry_limit_in_search != 0
            && self.retry_in_search_counter + self.retry_in_match_counter > self.retry_limit_in_search
        {
            return Err(RegexError::RetryLimitInSearchOver);
        }
        if self.time_limit > 0
            && self.retry_in_match_counter % CHECK_TIME_INTERVAL == 0
            && self.check_time_limit()
        {
            return Err(RegexError::TimeLimitOver);
        }
        Ok(())
    }

    /// Account for one loop iteration that did not backtrack. Only the time
    /// limit applies here.
    fn count_step(&mut self) -> Result<(), RegexError> {
        self.step_counter += 1;
        if self.time_limit > 0
            && self.step_counter % CHECK_TIME_INTERVAL == 0
            && self.check_time_limit()
        {
            return Err(RegexError::TimeLimitOver);
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Read one char in the matching direction. Returns the char and the new
/// position.
#[inline]
fn step(text: &str, s: usize, back: bool) -> Option<(char, usize)> {
    if back {
        char_before(text, s).map(|(c, len)| (c, s - len))
    } else {
        char_at(text, s).map(|(c, len)| (c, s + len))
    }
}

#[inline]
fn is_word_at(text: &str, s: usize) -> bool {
    char_at(text, s).is_some_and(|(c, _)| is_code_word(c))
}

#[inline]
fn is_word_before(text: &str, s: usize) -> bool {
    char_before(text, s).is_some_and(|(c, _)| is_code_word(c))
}

/// Match the captured text `cap` at `s`. Returns the new position.
fn backref_match(text: &str, s: usize, cap: &str, ic: bool, back: bool) -> Option<usize> {
    if !ic {
        return if back {
            let from = s.checked_sub(cap.len())?;
            (text.get(from..s)? == cap).then_some(from)
        } else {
            let to = s + cap.len();
            (text.get(s..to)? == cap).then_some(to)
        };
    }

    let mut s = s;
    if back {
        for c in cap.chars().rev() {
            let (x, ns) = step(text, s, true)?;
            if !chars_eq_ic(x, c) {
                return None;
            }
            s = ns;
        }
    } else {
        for c in cap.chars() {
            let (x, ns) = step(text, s, false)?;
            if !chars_eq_ic(x, c) {
                return None;
            }
            s = ns;
        }
    }
    Some(s)
}

// ============================================================================
// VM
// ============================================================================

/// Run the program from `start_p` at string position `start_s` until an
/// `End` or `LookEnd` operation is reached.
///
/// On success the state changes made on the way stay on `stack` above its
/// entry length. On failure the stack is back at its entry length and the
/// state is exactly as it was on entry.
fn match_run(
    reg: &RegexType,
    text: &str,
    start_p: usize,
    start_s: usize,
    msa: &mut MatchArg,
    stack: &mut Vec<StackEntry>,
) -> Result<Option<usize>, RegexError> {
    let base = stack.len();
    let end = text.len();
    let ignore_case = opton_ignorecase(reg.options);
    let mut p = start_p;
    let mut s = start_s;

    loop {
        let Some(op) = reg.ops.get(p) else {
            return Err(RegexError::from(REGERR_UNDEFINED_BYTECODE));
        };
        let mut goto_fail = false;

        match op.opcode {
            // ================================================================
            // End of the whole program or of a lookaround body
            // ================================================================
            OpCode::End | OpCode::LookEnd => {
                return Ok(Some(s));
            }

            // ================================================================
            // Single chars
            // ================================================================
            OpCode::Char | OpCode::CharIc => {
                if let OperationPayload::Char { c, back } = op.payload {
                    let ic = op.opcode == OpCode::CharIc;
                    match step(text, s, back) {
                        Some((x, ns)) if x == c || (ic && chars_eq_ic(x, c)) => {
                            s = ns;
                            p += 1;
                        }
                        _ => goto_fail = true,
                    }
                } else {
                    goto_fail = true;
                }
            }

            OpCode::AnyChar | OpCode::AnyCharMl => {
                if let OperationPayload::AnyChar { back } = op.payload {
                    match step(text, s, back) {
                        Some((x, ns)) if op.opcode == OpCode::AnyCharMl || !is_code_newline(x) => {
                            s = ns;
                            p += 1;
                        }
                        _ => goto_fail = true,
                    }
                } else {
                    goto_fail = true;
                }
            }

            OpCode::CClass => {
                if let OperationPayload::CClass { index, back } = op.payload {
                    let cc = &reg.classes[index];
                    match step(text, s, back) {
                        Some((x, ns)) if cc.is_code_in_cc(x, ignore_case) => {
                            s = ns;
                            p += 1;
                        }
                        _ => goto_fail = true,
                    }
                } else {
                    goto_fail = true;
                }
            }

            // ================================================================
            // Anchors
            // ================================================================
            OpCode::BeginLine => {
                if let OperationPayload::Anchor { multiline } = op.payload {
                    let ok = s == 0
                        || (multiline && char_before(text, s).is_some_and(|(c, _)| is_code_newline(c)));
                    if ok { p += 1; } else { goto_fail = true; }
                } else {
                    goto_fail = true;
                }
            }

            OpCode::EndLine => {
                if let OperationPayload::Anchor { multiline } = op.payload {
                    let ok = s == end
                        || (multiline && char_at(text, s).is_some_and(|(c, _)| is_code_newline(c)));
                    if ok { p += 1; } else { goto_fail = true; }
                } else {
                    goto_fail = true;
                }
            }

            OpCode::WordBoundary => {
                if is_word_before(text, s) != is_word_at(text, s) { p += 1; } else { goto_fail = true; }
            }

            OpCode::NoWordBoundary => {
                if is_word_before(text, s) == is_word_at(text, s) { p += 1; } else { goto_fail = true; }
            }

            // ================================================================
            // Back references (an unset group matches the empty string)
            // ================================================================
            OpCode::BackRefN | OpCode::BackRefNIc => {
                if let OperationPayload::BackRef { num, back } = op.payload {
                    match msa.state.mem[num] {
                        None => p += 1,
                        Some((b, e)) => {
                            let ic = op.opcode == OpCode::BackRefNIc;
                            match backref_match(text, s, &text[b..e], ic, back) {
                                Some(ns) => {
                                    s = ns;
                                    p += 1;
                                }
                                None => goto_fail = true,
                            }
                        }
                    }
                } else {
                    goto_fail = true;
                }
            }

            // ================================================================
            // Capture groups
            // ================================================================
            OpCode::MemStart => {
                if let OperationPayload::Memory { num, .. } = op.payload {
                    stack.push(StackEntry::PendingRestore { num, prev: msa.state.pending[num] });
                    msa.state.pending[num] = s;
                    p += 1;
                } else {
                    goto_fail = true;
                }
            }

            OpCode::MemEnd => {
                if let OperationPayload::Memory { num, back } = op.payload {
                    let pending = msa.state.pending[num];
                    let span = if back { (s, pending) } else { (pending, s) };
                    stack.push(StackEntry::MemRestore { num, prev: msa.state.mem[num] });
                    msa.state.mem[num] = Some(span);
                    p += 1;
                } else {
                    goto_fail = true;
                }
            }

            OpCode::MemClear => {
                if let OperationPayload::MemClear { from, to } = op.payload {
                    for num in from..=to {
                        if let Some(prev) = msa.state.mem[num].take() {
                            stack.push(StackEntry::MemRestore { num, prev: Some(prev) });
                        }
                    }
                    p += 1;
                } else {
                    goto_fail = true;
                }
            }

            // ================================================================
            // Control flow
            // ================================================================
            OpCode::Jump => {
                if let OperationPayload::Jump { addr } = op.payload {
                    p = jump_target(p, addr);
                } else {
                    goto_fail = true;
                }
            }

            OpCode::Push => {
                if let OperationPayload::Push { addr } = op.payload {
                    stack.push(StackEntry::Alt { pcode: jump_target(p, addr), pstr: s });
                    p += 1; // try main path first
                } else {
                    goto_fail = true;
                }
            }

            // ================================================================
            // Counted loops
            // ================================================================
            OpCode::RepeatStart => {
                if let OperationPayload::RepeatStart { id } = op.payload {
                    stack.push(StackEntry::RepeatCount { id, prev: msa.state.counts[id] });
                    msa.state.counts[id] = 0;
                    p += 1;
                } else {
                    goto_fail = true;
                }
            }

            OpCode::Repeat | OpCode::RepeatNg => {
                if let OperationPayload::Repeat { id, lower, upper, exit } = op.payload {
                    let count = msa.state.counts[id];
                    let exit = jump_target(p, exit);
                    if count < lower {
                        p += 1;
                    } else if upper == Some(count) {
                        p = exit;
                    } else if op.opcode == OpCode::Repeat {
                        stack.push(StackEntry::Alt { pcode: exit, pstr: s });
                        p += 1;
                    } else {
                        stack.push(StackEntry::Alt { pcode: p + 1, pstr: s });
                        p = exit;
                    }
                } else {
                    goto_fail = true;
                }
            }

            OpCode::RepeatBody => {
                if let OperationPayload::RepeatBody { id } = op.payload {
                    stack.push(StackEntry::RepeatStartPos { id, prev: msa.state.iter_start[id] });
                    msa.state.iter_start[id] = s;
                    p += 1;
                } else {
                    goto_fail = true;
                }
            }

            OpCode::RepeatInc => {
                if let OperationPayload::RepeatInc { id, lower, head } = op.payload {
                    let count = msa.state.counts[id];
                    // An iteration past the minimum may not match empty.
                    if count >= lower && s == msa.state.iter_start[id] {
                        goto_fail = true;
                    } else {
                        msa.count_step()?;
                        stack.push(StackEntry::RepeatCount { id, prev: count });
                        msa.state.counts[id] = count.saturating_add(1);
                        p = jump_target(p, head);
                    }
                } else {
                    goto_fail = true;
                }
            }

            // ================================================================
            // Lookarounds (atomic: no backtracking into the body)
            // ================================================================
            OpCode::PrecRead | OpCode::PrecReadNot => {
                if let OperationPayload::Look { end: look_end } = op.payload {
                    let next = jump_target(p, look_end) + 1;
                    let look_base = stack.len();
                    let found = match_run(reg, text, p + 1, s, msa, stack)?.is_some();
                    if op.opcode == OpCode::PrecRead {
                        if found {
                            stack_cut_alts(stack, look_base);
                            p = next;
                        } else {
                            goto_fail = true;
                        }
                    } else if found {
                        stack_unwind(stack, look_base, &mut msa.state);
                        goto_fail = true;
                    } else {
                        p = next;
                    }
                } else {
                    goto_fail = true;
                }
            }
        }

        if goto_fail {
            msa.count_retry()?;
            match stack_pop(stack, base, &mut msa.state) {
                Some((pcode, pstr)) => {
                    p = pcode;
                    s = pstr;
                }
                None => return Ok(None),
            }
        }
    }
}

/// Try to match at exactly `sstart`. On success returns the match end and
/// fills `msa.region`.
pub fn match_at(
    reg: &RegexType,
    text: &str,
    sstart: usize,
    msa: &mut MatchArg,
) -> Result<Option<usize>, RegexError> {
    msa.state.reset(reg);
    msa.retry_in_match_counter = 0;
    let mut stack = Vec::with_capacity(INIT_MATCH_STACK_SIZE);

    let result = match_run(reg, text, 0, sstart, msa, &mut stack);
    msa.retry_in_search_counter += msa.retry_in_match_counter;

    let Some(end) = result? else {
        return Ok(None);
    };
    msa.region.clear();
    msa.region.set(0, Some((sstart, end)));
    for num in 1..=reg.num_mem {
        msa.region.set(num, msa.state.mem[num]);
    }
    Ok(Some(end))
}

// ============================================================================
// Search
// ============================================================================

/// Next candidate start at or after `s`, honoring the literal prefix and
/// line anchors.
fn forward_search(reg: &RegexType, text: &str, s: usize) -> Option<usize> {
    let mut s = s;
    if reg.optimize == OptimizeType::Str {
        let off = memmem::find(&text.as_bytes()[s..], &reg.exact)?;
        s += off;
    }
    if reg.anchor & ANCR_BEGIN_LINE != 0 {
        while s > 0 && !char_before(text, s).is_some_and(|(c, _)| is_code_newline(c)) {
            if s >= text.len() {
                return None;
            }
            s += enclen(text, s);
        }
    }
    Some(s)
}

/// Find the leftmost match starting at or after `start`. Returns the match
/// start; spans are in `msa.region`.
pub fn reg_search(
    reg: &RegexType,
    text: &str,
    start: usize,
    msa: &mut MatchArg,
) -> Result<Option<usize>, RegexError> {
    let end = text.len();
    if start > end {
        return Ok(None);
    }
    if !text.is_char_boundary(start) {
        return Err(RegexError::InvalidArgument);
    }
    trace!(start, len = end, "search");

    msa.retry_in_search_counter = 0;
    msa.step_counter = 0;
    msa.time_start = (msa.time_limit > 0).then(Instant::now);

    if opton_sticky(reg.options) {
        return Ok(match_at(reg, text, start, msa)?.map(|_| start));
    }
    if reg.anchor & ANCR_BEGIN_BUF != 0 {
        if start != 0 {
            return Ok(None);
        }
        return Ok(match_at(reg, text, 0, msa)?.map(|_| 0));
    }

    let mut s = start;
    loop {
        let Some(cand) = forward_search(reg, text, s) else {
            return Ok(None);
        };
        s = cand;
        if match_at(reg, text, s, msa)?.is_some() {
            return Ok(Some(s));
        }
        if s >= end {
            return Ok(None);
        }
        s += enclen(text, s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regcomp::reg_new;

    fn search(pattern: &str, text: &str) -> Option<(usize, usize)> {
        let reg = reg_new(pattern, RegexOptions::empty()).unwrap();
        let mut msa = MatchArg::new(&reg);
        reg_search(&reg, text, 0, &mut msa).unwrap()?;
        msa.region.get(0)
    }

    fn groups(pattern: &str, text: &str) -> Vec<Option<(usize, usize)>> {
        let reg = reg_new(pattern, RegexOptions::empty()).unwrap();
        let mut msa = MatchArg::new(&reg);
        reg_search(&reg, text, 0, &mut msa).unwrap().unwrap();
        msa.region.iter().collect()
    }

    #[test]
    fn literal_search() {
        assert_eq!(search("bc", "abcd"), Some((1, 3)));
        assert_eq!(search("x", "abcd"), None);
        assert_eq!(search("", "abc"), Some((0, 0)));
    }

    #[test]
    fn greedy_and_lazy() {
        assert_eq!(search("a+", "baaa"), Some((1, 4)));
        assert_eq!(search("a+?", "baaa"), Some((1, 2)));
        assert_eq!(search("a{2,3}", "aaaa"), Some((0, 3)));
        assert_eq!(search("a{2,3}?", "aaaa"), Some((0, 2)));
        assert_eq!(search("(?:ab){2}", "abababx"), Some((0, 4)));
    }

    #[test]
    fn capture_reset_per_iteration() {
        // second iteration takes the `b` branch; group 1 is cleared
        let g = groups("(?:(a)|b)+", "ab");
        assert_eq!(g, vec![Some((0, 2)), None]);
    }

    #[test]
    fn empty_iteration_is_rejected() {
        let g = groups("(a*)*b", "b");
        assert_eq!(g[0], Some((0, 1)));
        assert_eq!(g[1], None);
        let g = groups("(a*)?", "b");
        assert_eq!(g, vec![Some((0, 0)), None]);
    }

    #[test]
    fn backtracking_restores_captures() {
        let g = groups("(a|ab)(c|bcd)(d*)", "abcd");
        assert_eq!(g, vec![Some((0, 4)), Some((0, 1)), Some((1, 4)), Some((4, 4))]);
    }

    #[test]
    fn backref_to_unset_group_matches_empty() {
        assert_eq!(search(r"(a)?\1b", "b"), Some((0, 1)));
        assert_eq!(search(r"(a)\1", "aa"), Some((0, 2)));
        assert_eq!(search(r"(a)\1", "ab"), None);
    }

    #[test]
    fn lookbehind_captures_right_to_left() {
        let g = groups(r"(?<=(\d+)(\d+))$", "1053");
        assert_eq!(g, vec![Some((4, 4)), Some((0, 1)), Some((1, 4))]);
        assert_eq!(search(r"(?<!a)b", "abcb"), Some((3, 4)));
    }

    #[test]
    fn lookahead_keeps_captures() {
        let g = groups(r"(?=(a+))a*b\1", "baaabac");
        assert_eq!(g, vec![Some((3, 6)), Some((3, 4))]);
        let g = groups(r"(?!(a))b", "b");
        assert_eq!(g, vec![Some((0, 1)), None]);
    }

    #[test]
    fn anchors() {
        assert_eq!(search("^b", "ab"), None);
        assert_eq!(search("a$", "ab\na"), Some((3, 4)));
        let reg = reg_new("^b", RegexOptions::MULTILINE).unwrap();
        let mut msa = MatchArg::new(&reg);
        assert_eq!(reg_search(&reg, "a\nb", 0, &mut msa).unwrap(), Some(2));
        assert_eq!(search(r"\bfoo\b", "a foo."), Some((2, 5)));
        assert_eq!(search(r"\Boo", "foo"), Some((1, 3)));
    }

    #[test]
    fn utf8_offsets() {
        assert_eq!(search("é+", "caféé!"), Some((3, 7)));
        assert_eq!(search(".", "日本"), Some((0, 3)));
        assert_eq!(search("(?<=日)本", "日本"), Some((3, 6)));
    }

    #[test]
    fn sticky_only_at_start() {
        let reg = reg_new("b", RegexOptions::STICKY).unwrap();
        let mut msa = MatchArg::new(&reg);
        assert_eq!(reg_search(&reg, "ab", 0, &mut msa).unwrap(), None);
        assert_eq!(reg_search(&reg, "ab", 1, &mut msa).unwrap(), Some(1));
    }

    #[test]
    fn retry_limit() {
        let reg = reg_new("(a*)*b", RegexOptions::empty()).unwrap();
        let mut msa = MatchArg::new(&reg);
        msa.set_retry_limit_in_match(100);
        let err = reg_search(&reg, "aaaaaaaaaaaaaaaaaaaaaaaaaaaaac", 0, &mut msa).unwrap_err();
        assert_eq!(err, RegexError::RetryLimitInMatchOver);
    }

    #[test]
    fn case_insensitive() {
        let reg = reg_new(r"(straße)\1", RegexOptions::IGNORECASE).unwrap();
        let mut msa = MatchArg::new(&reg);
        assert_eq!(reg_search(&reg, "STRAßEstraße", 0, &mut msa).unwrap(), Some(0));
    }

    #[test]
    fn not_on_char_boundary() {
        let reg = reg_new("a", RegexOptions::empty()).unwrap();
        let mut msa = MatchArg::new(&reg);
        assert_eq!(
            reg_search(&reg, "éa", 1, &mut msa).unwrap_err(),
            RegexError::InvalidArgument
        );
    }
}
