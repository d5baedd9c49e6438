// regparse_types.rs - AST node types and the group table.

use indexmap::IndexMap;

use crate::regdefs::*;
use crate::regenc::{simple_fold, simple_upper, CType};

// === AST Node ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Matches the empty string (empty branch or empty group body).
    Empty,
    Char(char),
    /// `.`
    AnyChar,
    CClass(CClassNode),
    BackRef(BackRefNode),
    Quant(QuantNode),
    Bag(BagNode),
    Anchor(AnchorType),
    Look(LookNode),
    /// Concatenation.
    List(Vec<Node>),
    /// Alternation.
    Alt(Vec<Node>),
}

impl Node {
    pub fn new_memory(name: Option<String>, body: Node) -> Node {
        Node::Bag(BagNode {
            bag_type: BagType::Memory { regnum: 0, name },
            body: Box::new(body),
        })
    }

    pub fn new_group(body: Node) -> Node {
        Node::Bag(BagNode {
            bag_type: BagType::NonCapture,
            body: Box::new(body),
        })
    }

    /// Build a concatenation, collapsing the trivial cases.
    pub fn new_list(mut items: Vec<Node>) -> Node {
        match items.len() {
            0 => Node::Empty,
            1 => items.pop().unwrap_or(Node::Empty),
            _ => Node::List(items),
        }
    }

    /// Build an alternation, collapsing the single-branch case.
    pub fn new_alt(mut branches: Vec<Node>) -> Node {
        if branches.len() == 1 {
            branches.pop().unwrap_or(Node::Empty)
        } else {
            Node::Alt(branches)
        }
    }

    /// True for nodes a quantifier may be applied to.
    pub fn is_quantifiable(&self, strict: bool) -> bool {
        match self {
            Node::Anchor(_) => false,
            Node::Look(look) => !strict && !look.behind,
            _ => true,
        }
    }

    /// Lowest and highest capture number inside this subtree.
    pub fn mem_range(&self) -> Option<(usize, usize)> {
        let mut range: Option<(usize, usize)> = None;
        self.for_each_memory(&mut |regnum| {
            range = Some(match range {
                None => (regnum, regnum),
                Some((lo, hi)) => (lo.min(regnum), hi.max(regnum)),
            });
        });
        range
    }

    fn for_each_memory(&self, f: &mut dyn FnMut(usize)) {
        match self {
            Node::Bag(bag) => {
                if let BagType::Memory { regnum, .. } = bag.bag_type {
                    f(regnum);
                }
                bag.body.for_each_memory(f);
            }
            Node::Quant(qn) => qn.body.for_each_memory(f),
            Node::Look(look) => look.body.for_each_memory(f),
            Node::List(items) | Node::Alt(items) => {
                for item in items {
                    item.for_each_memory(f);
                }
            }
            _ => {}
        }
    }

    /// True when the node always consumes exactly one char.
    pub fn is_single_char(&self) -> bool {
        matches!(self, Node::Char(_) | Node::AnyChar | Node::CClass(_))
    }
}

// === Char Class ===

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassItem {
    Range(char, char),
    CType(CType),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CClassNode {
    pub negated: bool,
    pub items: Vec<ClassItem>,
}

impl CClassNode {
    pub fn new(negated: bool) -> Self {
        CClassNode {
            negated,
            items: Vec::new(),
        }
    }

    pub fn add_code(&mut self, c: char) {
        self.items.push(ClassItem::Range(c, c));
    }

    pub fn add_range(&mut self, from: char, to: char) {
        self.items.push(ClassItem::Range(from, to));
    }

    pub fn add_ctype(&mut self, ctype: CType) {
        self.items.push(ClassItem::CType(ctype));
    }

    fn contains(&self, c: char) -> bool {
        self.items.iter().any(|item| match *item {
            ClassItem::Range(from, to) => from <= c && c <= to,
            ClassItem::CType(ct) => ct.is_code_ctype(c),
        })
    }

    /// Class membership, honoring negation. With `ignore_case` a char also
    /// matches when its lowercase or uppercase form is in the class.
    pub fn is_code_in_cc(&self, c: char, ignore_case: bool) -> bool {
        let found = self.contains(c)
            || (ignore_case && (self.contains(simple_fold(c)) || self.contains(simple_upper(c))));
        found != self.negated
    }
}

// === Back Reference ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackRefNode {
    /// `\1`..`\99`
    Number(usize),
    /// `\k<name>`; `regnum` is 0 until the group table resolves it.
    Name { name: String, regnum: usize },
}

impl BackRefNode {
    pub fn regnum(&self) -> usize {
        match self {
            BackRefNode::Number(n) => *n,
            BackRefNode::Name { regnum, .. } => *regnum,
        }
    }
}

// === Quantifier ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantNode {
    pub lower: u32,
    /// `None` is unbounded.
    pub upper: Option<u32>,
    pub greedy: bool,
    pub body: Box<Node>,
}

// === Bag (group) ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BagType {
    /// Capturing group; `regnum` is 0 until the group table assigns it.
    Memory { regnum: usize, name: Option<String> },
    /// `(?:...)`
    NonCapture,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BagNode {
    pub bag_type: BagType,
    pub body: Box<Node>,
}

// === Anchor ===

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorType {
    BeginLine,
    EndLine,
    WordBoundary,
    NoWordBoundary,
}

// === Lookaround ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookNode {
    pub behind: bool,
    pub negative: bool,
    pub body: Box<Node>,
}

// === Group Table ===

/// One capturing group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupDescriptor {
    /// 1-based, dense, in order of the opening parenthesis.
    pub index: usize,
    pub name: Option<String>,
    /// The group sits inside some alternation branch.
    pub in_alternation: bool,
    /// The group sits inside some quantified atom.
    pub in_quantifier: bool,
}

/// Registry of all capturing groups of a compiled pattern.
///
/// Built once by [`crate::regcomp::build_group_table`] and read-only
/// afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: Vec<GroupDescriptor>,
    names: IndexMap<String, usize>,
}

impl GroupTable {
    pub fn new() -> Self {
        GroupTable::default()
    }

    /// Append a group and return its index. A name already present is
    /// rejected with `REGERR_MULTIPLEX_DEFINED_NAME`.
    pub fn add(
        &mut self,
        name: Option<&str>,
        in_alternation: bool,
        in_quantifier: bool,
    ) -> Result<usize, i32> {
        let index = self.groups.len() + 1;
        if let Some(name) = name {
            if name.is_empty() {
                return Err(REGERR_EMPTY_GROUP_NAME);
            }
            if self.names.contains_key(name) {
                return Err(REGERR_MULTIPLEX_DEFINED_NAME);
            }
            self.names.insert(name.to_string(), index);
        }
        self.groups.push(GroupDescriptor {
            index,
            name: name.map(str::to_string),
            in_alternation,
            in_quantifier,
        });
        Ok(index)
    }

    /// Number of capturing groups (excluding the whole match).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Descriptor for group `index` (1-based).
    pub fn get(&self, index: usize) -> Option<&GroupDescriptor> {
        index.checked_sub(1).and_then(|i| self.groups.get(i))
    }

    pub fn name_to_group_number(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn has_named_groups(&self) -> bool {
        !self.names.is_empty()
    }

    pub fn num_named(&self) -> usize {
        self.names.len()
    }

    /// Declared names with their indices, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.names.iter().map(|(name, &index)| (name.as_str(), index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupDescriptor> {
        self.groups.iter()
    }
}
