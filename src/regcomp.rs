// regcomp.rs - Compiler: converts the AST into bytecode (Operation arrays).
//
// Structure: group table -> operation management -> quantifier compilation
// -> bag compilation -> lookaround compilation -> tree compilation ->
// optimization info -> entry point.

use tracing::debug;

use crate::error::RegexError;
use crate::regdefs::*;
use crate::regint::*;
use crate::regparse::{reg_get_capture_num_limit, reg_parse_tree};
use crate::regparse_types::*;

// ============================================================================
// Group table
// ============================================================================

fn assign_groups(
    node: &mut Node,
    table: &mut GroupTable,
    in_alternation: bool,
    in_quantifier: bool,
) -> Result<(), RegexError> {
    match node {
        Node::Bag(bag) => {
            if let BagType::Memory { regnum, name } = &mut bag.bag_type {
                if table.len() >= reg_get_capture_num_limit() {
                    return Err(RegexError::TooManyCaptures);
                }
                *regnum = table
                    .add(name.as_deref(), in_alternation, in_quantifier)
                    .map_err(|code| RegexError::with_param(code, name.as_deref()))?;
            }
            assign_groups(&mut bag.body, table, in_alternation, in_quantifier)
        }
        Node::Quant(qn) => assign_groups(&mut qn.body, table, in_alternation, true),
        Node::Look(look) => assign_groups(&mut look.body, table, in_alternation, in_quantifier),
        Node::List(items) => items
            .iter_mut()
            .try_for_each(|item| assign_groups(item, table, in_alternation, in_quantifier)),
        Node::Alt(branches) => branches
            .iter_mut()
            .try_for_each(|branch| assign_groups(branch, table, true, in_quantifier)),
        _ => Ok(()),
    }
}

fn resolve_named_refs(node: &mut Node, table: &GroupTable) -> Result<(), RegexError> {
    match node {
        Node::BackRef(BackRefNode::Name { name, regnum }) => {
            match table.name_to_group_number(name) {
                Some(n) => {
                    *regnum = n;
                    Ok(())
                }
                None => Err(RegexError::with_param(
                    REGERR_UNDEFINED_NAME_REFERENCE,
                    Some(name),
                )),
            }
        }
        Node::Bag(bag) => resolve_named_refs(&mut bag.body, table),
        Node::Quant(qn) => resolve_named_refs(&mut qn.body, table),
        Node::Look(look) => resolve_named_refs(&mut look.body, table),
        Node::List(items) | Node::Alt(items) => items
            .iter_mut()
            .try_for_each(|item| resolve_named_refs(item, table)),
        _ => Ok(()),
    }
}

/// Number every capturing group in order of its opening parenthesis,
/// register declared names, and resolve `\k<name>` references.
///
/// Duplicate names fail with [`RegexError::DuplicateGroupName`]; a
/// reference to an undeclared name fails with a syntax error.
pub fn build_group_table(root: &mut Node) -> Result<GroupTable, RegexError> {
    let mut table = GroupTable::new();
    assign_groups(root, &mut table, false, false)?;
    resolve_named_refs(root, &table)?;
    Ok(table)
}

// ============================================================================
// Operation management
// ============================================================================

struct Compiler<'a> {
    reg: &'a mut RegexType,
    ignore_case: bool,
    multiline: bool,
    dotall: bool,
}

impl<'a> Compiler<'a> {
    fn new(reg: &'a mut RegexType) -> Self {
        let options = reg.options;
        Compiler {
            reg,
            ignore_case: opton_ignorecase(options),
            multiline: opton_multiline(options),
            dotall: opton_dotall(options),
        }
    }

    #[inline]
    fn ops_len(&self) -> usize {
        self.reg.ops.len()
    }

    fn add_op(&mut self, opcode: OpCode, payload: OperationPayload) -> usize {
        self.reg.ops.push(Operation::new(opcode, payload));
        self.reg.ops.len() - 1
    }

    fn add_jump(&mut self, to: usize) {
        let at = self.ops_len();
        self.add_op(
            OpCode::Jump,
            OperationPayload::Jump {
                addr: rel_addr(at, to),
            },
        );
    }

    /// Point the jump operand of the operation at `at` to `to`.
    fn patch_addr(&mut self, at: usize, to: usize) -> Result<(), RegexError> {
        let addr = rel_addr(at, to);
        match &mut self.reg.ops[at].payload {
            OperationPayload::Jump { addr: a } | OperationPayload::Push { addr: a } => *a = addr,
            OperationPayload::Repeat { exit, .. } => *exit = addr,
            OperationPayload::Look { end } => *end = addr,
            _ => return Err(RegexError::from(REGERR_PARSER_BUG)),
        }
        Ok(())
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    fn compile_char(&mut self, c: char, back: bool) {
        let opcode = if self.ignore_case {
            OpCode::CharIc
        } else {
            OpCode::Char
        };
        self.add_op(opcode, OperationPayload::Char { c, back });
    }

    fn compile_cclass(&mut self, cc: &CClassNode, back: bool) {
        let index = self.reg.classes.len();
        self.reg.classes.push(cc.clone());
        self.add_op(OpCode::CClass, OperationPayload::CClass { index, back });
    }

    fn compile_anchor(&mut self, anchor: AnchorType) {
        let multiline = self.multiline;
        match anchor {
            AnchorType::BeginLine => {
                self.add_op(OpCode::BeginLine, OperationPayload::Anchor { multiline });
            }
            AnchorType::EndLine => {
                self.add_op(OpCode::EndLine, OperationPayload::Anchor { multiline });
            }
            AnchorType::WordBoundary => {
                self.add_op(OpCode::WordBoundary, OperationPayload::None);
            }
            AnchorType::NoWordBoundary => {
                self.add_op(OpCode::NoWordBoundary, OperationPayload::None);
            }
        }
    }

    fn compile_backref(&mut self, br: &BackRefNode, back: bool) -> Result<(), RegexError> {
        let num = br.regnum();
        if num == 0 || num > self.reg.num_mem {
            return Err(RegexError::from(REGERR_INVALID_BACKREF));
        }
        let opcode = if self.ignore_case {
            OpCode::BackRefNIc
        } else {
            OpCode::BackRefN
        };
        self.add_op(opcode, OperationPayload::BackRef { num, back });
        Ok(())
    }

    // ========================================================================
    // Quantifiers
    // ========================================================================

    /// `x*` / `x+` over a single-char body: a plain push/jump loop, since
    /// the body can never match empty.
    fn compile_simple_star(&mut self, qn: &QuantNode, back: bool) -> Result<(), RegexError> {
        for _ in 0..qn.lower {
            self.compile_tree(&qn.body, back)?;
        }

        let head = self.ops_len();
        if qn.greedy {
            let push = self.add_op(OpCode::Push, OperationPayload::Push { addr: 0 });
            self.compile_tree(&qn.body, back)?;
            self.add_jump(head);
            let exit = self.ops_len();
            self.patch_addr(push, exit)
        } else {
            let push = self.add_op(OpCode::Push, OperationPayload::Push { addr: 0 });
            let jump = self.add_op(OpCode::Jump, OperationPayload::Jump { addr: 0 });
            let body = self.ops_len();
            self.compile_tree(&qn.body, back)?;
            self.add_jump(head);
            let exit = self.ops_len();
            self.patch_addr(push, body)?;
            self.patch_addr(jump, exit)
        }
    }

    /// `x?` over a single-char body.
    fn compile_simple_option(&mut self, qn: &QuantNode, back: bool) -> Result<(), RegexError> {
        let push = self.add_op(OpCode::Push, OperationPayload::Push { addr: 0 });
        if qn.greedy {
            self.compile_tree(&qn.body, back)?;
            let exit = self.ops_len();
            self.patch_addr(push, exit)
        } else {
            let jump = self.add_op(OpCode::Jump, OperationPayload::Jump { addr: 0 });
            let body = self.ops_len();
            self.compile_tree(&qn.body, back)?;
            let exit = self.ops_len();
            self.patch_addr(push, body)?;
            self.patch_addr(jump, exit)
        }
    }

    /// General counted loop:
    ///
    /// ```text
    ///       RepeatStart id
    /// head: Repeat(Ng) id lower upper -> exit
    ///       RepeatBody id
    ///       MemClear lo..hi          (body has captures)
    ///       <body>
    ///       RepeatInc id lower -> head
    /// exit:
    /// ```
    fn compile_repeat(&mut self, qn: &QuantNode, back: bool) -> Result<(), RegexError> {
        let id = self.reg.num_repeat;
        self.reg.num_repeat += 1;

        self.add_op(OpCode::RepeatStart, OperationPayload::RepeatStart { id });
        let opcode = if qn.greedy {
            OpCode::Repeat
        } else {
            OpCode::RepeatNg
        };
        let head = self.add_op(
            opcode,
            OperationPayload::Repeat {
                id,
                lower: qn.lower,
                upper: qn.upper,
                exit: 0,
            },
        );
        self.add_op(OpCode::RepeatBody, OperationPayload::RepeatBody { id });
        if let Some((from, to)) = qn.body.mem_range() {
            self.add_op(OpCode::MemClear, OperationPayload::MemClear { from, to });
        }
        self.compile_tree(&qn.body, back)?;

        let at = self.ops_len();
        self.add_op(
            OpCode::RepeatInc,
            OperationPayload::RepeatInc {
                id,
                lower: qn.lower,
                head: rel_addr(at, head),
            },
        );
        let exit = self.ops_len();
        self.patch_addr(head, exit)
    }

    fn compile_quantifier(&mut self, qn: &QuantNode, back: bool) -> Result<(), RegexError> {
        match (qn.lower, qn.upper) {
            (_, Some(0)) => Ok(()),
            (1, Some(1)) => self.compile_tree(&qn.body, back),
            (0, Some(1)) if qn.body.is_single_char() => self.compile_simple_option(qn, back),
            (lower, None) if lower <= 2 && qn.body.is_single_char() => {
                self.compile_simple_star(qn, back)
            }
            _ => self.compile_repeat(qn, back),
        }
    }

    // ========================================================================
    // Bags and lookarounds
    // ========================================================================

    fn compile_bag(&mut self, bag: &BagNode, back: bool) -> Result<(), RegexError> {
        match bag.bag_type {
            BagType::Memory { regnum, .. } => {
                let payload = OperationPayload::Memory { num: regnum, back };
                self.add_op(OpCode::MemStart, payload.clone());
                self.compile_tree(&bag.body, back)?;
                self.add_op(OpCode::MemEnd, payload);
                Ok(())
            }
            BagType::NonCapture => self.compile_tree(&bag.body, back),
        }
    }

    /// The body of a lookbehind is compiled right-to-left.
    fn compile_look(&mut self, look: &LookNode) -> Result<(), RegexError> {
        let opcode = if look.negative {
            OpCode::PrecReadNot
        } else {
            OpCode::PrecRead
        };
        let start = self.add_op(opcode, OperationPayload::Look { end: 0 });
        self.compile_tree(&look.body, look.behind)?;
        let end = self.add_op(OpCode::LookEnd, OperationPayload::None);
        self.patch_addr(start, end)
    }

    // ========================================================================
    // Tree
    // ========================================================================

    fn compile_alt(&mut self, branches: &[Node], back: bool) -> Result<(), RegexError> {
        let mut jumps = Vec::with_capacity(branches.len());
        let last = branches.len().saturating_sub(1);
        for (i, branch) in branches.iter().enumerate() {
            if i == last {
                self.compile_tree(branch, back)?;
                break;
            }
            let push = self.add_op(OpCode::Push, OperationPayload::Push { addr: 0 });
            self.compile_tree(branch, back)?;
            jumps.push(self.add_op(OpCode::Jump, OperationPayload::Jump { addr: 0 }));
            let next = self.ops_len();
            self.patch_addr(push, next)?;
        }
        let end = self.ops_len();
        for jump in jumps {
            self.patch_addr(jump, end)?;
        }
        Ok(())
    }

    fn compile_tree(&mut self, node: &Node, back: bool) -> Result<(), RegexError> {
        match node {
            Node::Empty => Ok(()),
            Node::Char(c) => {
                self.compile_char(*c, back);
                Ok(())
            }
            Node::AnyChar => {
                let opcode = if self.dotall {
                    OpCode::AnyCharMl
                } else {
                    OpCode::AnyChar
                };
                self.add_op(opcode, OperationPayload::AnyChar { back });
                Ok(())
            }
            Node::CClass(cc) => {
                self.compile_cclass(cc, back);
                Ok(())
            }
            Node::BackRef(br) => self.compile_backref(br, back),
            Node::Quant(qn) => self.compile_quantifier(qn, back),
            Node::Bag(bag) => self.compile_bag(bag, back),
            Node::Anchor(anchor) => {
                self.compile_anchor(*anchor);
                Ok(())
            }
            Node::Look(look) => self.compile_look(look),
            Node::List(items) => {
                if back {
                    items.iter().rev().try_for_each(|n| self.compile_tree(n, back))
                } else {
                    items.iter().try_for_each(|n| self.compile_tree(n, back))
                }
            }
            Node::Alt(branches) => self.compile_alt(branches, back),
        }
    }
}

// ============================================================================
// Optimization info
// ============================================================================

/// Collect the literal every match must start with. Returns `false` once
/// the literal can not be extended past `node`.
fn get_head_exact(node: &Node, exact: &mut String) -> bool {
    match node {
        Node::Empty => true,
        Node::Char(c) => {
            exact.push(*c);
            true
        }
        Node::List(items) => items.iter().all(|item| get_head_exact(item, exact)),
        Node::Bag(bag) => get_head_exact(&bag.body, exact),
        Node::Quant(qn) if qn.lower >= 1 => {
            get_head_exact(&qn.body, exact);
            false
        }
        _ => false,
    }
}

fn get_head_anchor(node: &Node) -> Option<AnchorType> {
    match node {
        Node::Anchor(a) => Some(*a),
        Node::List(items) => items.first().and_then(get_head_anchor),
        Node::Bag(bag) => get_head_anchor(&bag.body),
        _ => None,
    }
}

fn set_optimize_info(reg: &mut RegexType, root: &Node) {
    if get_head_anchor(root) == Some(AnchorType::BeginLine) {
        reg.anchor = if opton_multiline(reg.options) {
            ANCR_BEGIN_LINE
        } else {
            ANCR_BEGIN_BUF
        };
    }

    if opton_ignorecase(reg.options) {
        return;
    }
    let mut exact = String::new();
    get_head_exact(root, &mut exact);
    if !exact.is_empty() {
        reg.exact = exact.into_bytes();
        reg.optimize = OptimizeType::Str;
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Compile `pattern` under `options` into a matcher program.
pub fn reg_new(pattern: &str, options: RegexOptions) -> Result<RegexType, RegexError> {
    let mut root = reg_parse_tree(pattern, options)?;
    let group_table = build_group_table(&mut root)?;

    let mut reg = RegexType::new(options);
    reg.num_mem = group_table.len();
    reg.group_table = group_table;

    let mut compiler = Compiler::new(&mut reg);
    compiler.compile_tree(&root, false)?;
    compiler.add_op(OpCode::End, OperationPayload::None);

    set_optimize_info(&mut reg, &root);

    debug!(
        pattern,
        captures = reg.num_mem,
        named = reg.group_table.num_named(),
        ops = reg.ops.len(),
        "compiled regex"
    );
    Ok(reg)
}

// ============================================================================
// Tests
// ============================================================================
