//! IR error taxonomy
//!
//! Everything here is unrecoverable within one compilation: a construction
//! contract violation means the producer (frontend or pass) has a bug, and
//! an evaluation failure means the differentiation replay or a folding
//! consumer went wrong. There is no retry path; callers abort compilation
//! with the diagnostic, which always identifies the offending statement id
//! and kind. No condition in this layer is ever observed by the end user
//! of the compiled program.

use thiserror::Error;

use crate::ir::{StmtId, TaskKind};
use crate::snode::SNodeId;

/// Construction contract violations, raised by the statement factory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("linearize: {inputs} inputs but {strides} strides")]
    ArityMismatch { inputs: usize, strides: usize },

    #[error("element_shuffle: empty lane list")]
    EmptyShuffle,

    #[error("offset_and_extract_bits: bit range [{bit_begin}, {bit_end}) is empty or exceeds 64 bits")]
    InvalidBitRange { bit_begin: u32, bit_end: u32 },

    #[error("{kind} at ${user}: operand ${stmt} is not a stack_alloca")]
    NotAStack {
        kind: &'static str,
        user: StmtId,
        stmt: StmtId,
    },

    #[error("{kind} task must not carry a body")]
    MaintenanceTaskWithBody { kind: TaskKind },

    #[error("{kind} task requires a body block")]
    MissingBody { kind: TaskKind },

    #[error("{kind} task requires an snode")]
    MissingSNode { kind: TaskKind },

    #[error("get_child: {snode} has {child_count} children, child {chid} requested")]
    ChildIndexOutOfRange {
        snode: SNodeId,
        chid: usize,
        child_count: usize,
    },

    #[error("get_child: operand ${stmt} does not reference a hierarchy node")]
    NotANodeRef { stmt: StmtId },

    #[error("unknown snode {id}")]
    UnknownSNode { id: SNodeId },

    #[error("no open block to append to")]
    NoOpenBlock,

    #[error("unbalanced end_block")]
    UnbalancedBlock,
}

/// Failures of the constant evaluator / differentiation-stack replay
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("{kind} at ${stmt}: stack ${stack} is empty")]
    EmptyStack {
        kind: &'static str,
        stmt: StmtId,
        stack: StmtId,
    },

    #[error("stack_push at ${stmt}: stack ${stack} is full ({max_size} entries)")]
    StackOverflow {
        stmt: StmtId,
        stack: StmtId,
        max_size: usize,
    },

    #[error("cannot evaluate {kind} at ${stmt}")]
    Unsupported { kind: &'static str, stmt: StmtId },

    #[error("${stmt} used before definition")]
    Undefined { stmt: StmtId },

    #[error("{kind} at ${stmt}: expected an integer operand")]
    ExpectedInt { kind: &'static str, stmt: StmtId },

    #[error("loop index {index} not bound in this evaluation")]
    UnboundLoopIndex { index: usize },

    #[error("global temporary at offset {offset} not bound in this evaluation")]
    UnboundTemporary { offset: usize },
}
