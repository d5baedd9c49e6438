// regint.rs - Internal types: OpCode, Operation, compiled regex.

use crate::regdefs::RegexOptions;
use crate::regparse_types::{CClassNode, GroupTable};

// === Config Constants ===
// Parser, compiler and tree drop all recurse per nesting level; this bound
// keeps them inside a 2 MiB thread stack in debug builds.
pub const DEFAULT_PARSE_DEPTH_LIMIT: u32 = 256;
pub const DEFAULT_MAX_CAPTURE_NUM: usize = 32767;
pub const INIT_MATCH_STACK_SIZE: usize = 160;
pub const DEFAULT_RETRY_LIMIT_IN_MATCH: u64 = 10_000_000;
pub const DEFAULT_RETRY_LIMIT_IN_SEARCH: u64 = 0;
pub const DEFAULT_TIME_LIMIT_MSEC: u64 = 0;
pub const CHECK_TIME_INTERVAL: u64 = 512;

// === Anchor Flags (whole-pattern optimization) ===
pub const ANCR_BEGIN_BUF: i32 = 1 << 0;
pub const ANCR_BEGIN_LINE: i32 = 1 << 1;

// === Bytecode Types ===
pub type RelAddrType = i32;
pub type MemNumType = usize;
pub type RepeatNumType = usize;

/// Relative address from `from` to `to`, as stored in jump operands.
#[inline]
pub fn rel_addr(from: usize, to: usize) -> RelAddrType {
    to as RelAddrType - from as RelAddrType
}

#[inline]
pub fn jump_target(p: usize, addr: RelAddrType) -> usize {
    (p as RelAddrType + addr) as usize
}

// === OpCode Enum ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    End = 0,
    Char = 1,
    CharIc = 2,
    AnyChar = 3,
    AnyCharMl = 4,
    CClass = 5,
    WordBoundary = 6,
    NoWordBoundary = 7,
    BeginLine = 8,
    EndLine = 9,
    BackRefN = 10,
    BackRefNIc = 11,
    MemStart = 12,
    MemEnd = 13,
    MemClear = 14,
    Jump = 15,
    Push = 16,
    RepeatStart = 17,
    Repeat = 18,
    RepeatNg = 19,
    RepeatBody = 20,
    RepeatInc = 21,
    PrecRead = 22,
    PrecReadNot = 23,
    LookEnd = 24,
}

// === Operation (Bytecode Instruction) ===
//
// The opcode is stored next to its payload for dispatch. `back` marks
// operations compiled for right-to-left matching inside a lookbehind.
#[derive(Clone, Debug)]
pub struct Operation {
    pub opcode: OpCode,
    pub payload: OperationPayload,
}

#[derive(Clone, Debug)]
pub enum OperationPayload {
    None,
    Char {
        c: char,
        back: bool,
    },
    AnyChar {
        back: bool,
    },
    CClass {
        index: usize,
        back: bool,
    },
    Anchor {
        multiline: bool,
    },
    BackRef {
        num: MemNumType,
        back: bool,
    },
    Memory {
        num: MemNumType,
        back: bool,
    },
    MemClear {
        from: MemNumType,
        to: MemNumType,
    },
    Jump {
        addr: RelAddrType,
    },
    Push {
        addr: RelAddrType,
    },
    RepeatStart {
        id: RepeatNumType,
    },
    Repeat {
        id: RepeatNumType,
        lower: u32,
        upper: Option<u32>,
        /// Address of the first operation after the loop.
        exit: RelAddrType,
    },
    RepeatBody {
        id: RepeatNumType,
    },
    RepeatInc {
        id: RepeatNumType,
        lower: u32,
        /// Address of the loop head (`Repeat` / `RepeatNg`).
        head: RelAddrType,
    },
    Look {
        /// Address of the matching `LookEnd`.
        end: RelAddrType,
    },
}

impl Operation {
    pub fn new(opcode: OpCode, payload: OperationPayload) -> Self {
        Operation { opcode, payload }
    }
}

// === OptimizeType ===
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizeType {
    None,
    /// Every match starts with the literal in `exact`.
    Str,
}

// === Compiled regex ===
#[derive(Clone, Debug)]
pub struct RegexType {
    // bytecode
    pub ops: Vec<Operation>,
    pub classes: Vec<CClassNode>,

    // capture info
    pub num_mem: usize,
    pub num_repeat: usize,
    pub group_table: GroupTable,

    // metadata
    pub options: RegexOptions,

    // optimization
    pub optimize: OptimizeType,
    pub anchor: i32,
    pub exact: Vec<u8>,
}

impl RegexType {
    pub fn new(options: RegexOptions) -> Self {
        RegexType {
            ops: Vec::new(),
            classes: Vec::new(),
            num_mem: 0,
            num_repeat: 0,
            group_table: GroupTable::new(),
            options,
            optimize: OptimizeType::None,
            anchor: 0,
            exact: Vec::new(),
        }
    }
}

// === Option checks ===
#[inline]
pub fn opton_ignorecase(options: RegexOptions) -> bool {
    options.contains(RegexOptions::IGNORECASE)
}

#[inline]
pub fn opton_multiline(options: RegexOptions) -> bool {
    options.contains(RegexOptions::MULTILINE)
}

#[inline]
pub fn opton_dotall(options: RegexOptions) -> bool {
    options.contains(RegexOptions::DOTALL)
}

#[inline]
pub fn opton_sticky(options: RegexOptions) -> bool {
    options.contains(RegexOptions::STICKY)
}
