//! Statement IR - typed, side-effect-annotated instruction graph
//!
//! The IR is a tree of [`Block`]s of [`Stmt`]s. A statement never owns the
//! statements it reads: operands are backward [`StmtId`] references to
//! statements that dominate the use, which holds by construction order and
//! is never re-checked lazily. Containers ([`OffloadedTask`]) exclusively
//! own their nested block, so the whole graph is acyclic by construction.
//!
//! Three statement families give this IR its shape:
//! - Hierarchy addressing: compute the physical offset of an element inside
//!   the sparse SNode tree one level at a time, so address-prefix
//!   computations can be shared across sibling accesses.
//! - Offloaded tasks: the unit of parallel dispatch, each carrying a task
//!   kind, execution-range parameters and (for the body kinds) a nested
//!   block.
//! - Differentiation stack: per-variable shadow stacks that record primal
//!   values during the forward pass and accumulate adjoints during the
//!   backward replay.
//!
//! Structural identity for common-subexpression elimination goes through
//! [`Stmt::fields_eq`] / [`Stmt::fields_hash`], which cover the result type
//! and every declared field of the kind but exclude the statement id.

pub mod builder;
pub mod display;
pub mod eval;
pub mod visit;

pub use builder::IrBuilder;
pub use eval::{AdStack, Evaluator, Value};
pub use visit::{walk_block, IrVisitor};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::snode::SNodeId;
use crate::types::{DataType, VectorType};

/// Program-unique statement identity
///
/// Assigned by the factory, monotonically increasing, never reused. The
/// basis for operand references and for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub u32);

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One output lane of an [`ElementShuffle`]: (source statement, source lane)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorElement {
    pub stmt: StmtId,
    pub index: usize,
}

// ============================================================================
// Hierarchy addressing
// ============================================================================

/// Descend from a node-level reference to the child element at a linear
/// index. With `activate` set, may lazily materialize backing storage for
/// that element - the one side-effecting hierarchy operation.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct SNodeLookup {
    pub snode: SNodeId,
    pub input_snode: StmtId,
    pub input_index: StmtId,
    pub global_indices: Vec<StmtId>,
    pub activate: bool,
}

/// Reinterpret an already-resolved node reference as one of its named
/// children. Pure: no storage is touched.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct GetChild {
    pub input_ptr: StmtId,
    pub input_snode: SNodeId,
    pub output_snode: SNodeId,
    pub chid: usize,
}

/// Row-major accumulation of per-dimension indices:
/// `index = sum(inputs[i] * strides[i])`
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct Linearize {
    pub inputs: Vec<StmtId>,
    pub strides: Vec<i64>,
}

/// Bitfield extraction for levels that pack several logical indices into
/// one machine word: `((input + offset) >> bit_begin) & mask(bit_end - bit_begin)`
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct OffsetAndExtractBits {
    pub input: StmtId,
    pub bit_begin: u32,
    pub bit_end: u32,
    pub offset: i64,
    /// Set by a peephole pass once the extraction is proven equivalent to a
    /// cheaper form. Downstream passes treat it as a hint, never re-derive.
    pub simplified: bool,
}

/// Add a compile-time constant. A single normalized node shape for
/// constant-folding and strength-reduction passes to target.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct IntegerOffset {
    pub input: StmtId,
    pub offset: i64,
}

/// Rearrange lanes from source vectors into a new vector of width
/// `elements.len()`. `pointer` marks the result as an address rather than
/// numeric data, which changes how codegen treats it.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct ElementShuffle {
    pub elements: Vec<VectorElement>,
    pub pointer: bool,
}

// ============================================================================
// Offloaded tasks
// ============================================================================

/// Target device of an offloaded task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Arch {
    X64,
    Arm64,
    Cuda,
    Metal,
    Vulkan,
}

impl Arch {
    pub fn name(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::Cuda => "cuda",
            Arch::Metal => "metal",
            Arch::Vulkan => "vulkan",
        }
    }

    pub fn is_gpu(&self) -> bool {
        matches!(self, Arch::Cuda | Arch::Metal | Arch::Vulkan)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of an offloaded task
///
/// Tasks execute in program order: task i+1 does not begin until task i's
/// visible effects (activations, list maintenance, global-temporary writes)
/// are complete. Within one `RangeFor`/`StructFor` task, iterations are
/// independent and may run in parallel; activation side effects order
/// tasks, not iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TaskKind {
    /// Execute the body once, sequentially
    Serial,
    /// Execute the body once per index in `[begin, end)`
    RangeFor,
    /// Execute the body once per active element of the snode hierarchy, in
    /// hierarchy traversal order (not index order)
    StructFor,
    /// Reset the materialized-element list of the snode
    ClearList,
    /// (Re)build the materialized-element list by scanning activation state
    ListGen,
    /// Reclaim storage of deactivated elements
    Gc,
}

impl TaskKind {
    /// True for the kinds that carry a nested instruction block
    pub fn has_body(&self) -> bool {
        matches!(self, TaskKind::Serial | TaskKind::RangeFor | TaskKind::StructFor)
    }

    /// True for the list/storage maintenance kinds
    pub fn is_maintenance(&self) -> bool {
        !self.has_body()
    }

    /// True for the kinds driven by the snode hierarchy
    pub fn requires_snode(&self) -> bool {
        matches!(
            self,
            TaskKind::StructFor | TaskKind::ClearList | TaskKind::ListGen | TaskKind::Gc
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Serial => "serial",
            TaskKind::RangeFor => "range_for",
            TaskKind::StructFor => "struct_for",
            TaskKind::ClearList => "clear_list",
            TaskKind::ListGen => "listgen",
            TaskKind::Gc => "gc",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One independently dispatchable unit of the compiled program
///
/// Owns its body block exclusively; destroying the task destroys the block
/// and transitively every statement in it. The execution range of a
/// `RangeFor` is `[begin, end)`: each bound is either a compile-time
/// constant (`const_begin`/`const_end` set, value in
/// `begin_value`/`end_value`) or computed by a prior task at runtime and
/// read from the global temporary arena at `begin_offset`/`end_offset`.
#[derive(Debug, Clone)]
pub struct OffloadedTask {
    pub kind: TaskKind,
    pub snode: Option<SNodeId>,
    pub begin_offset: usize,
    pub end_offset: usize,
    pub const_begin: bool,
    pub const_end: bool,
    pub begin_value: i32,
    pub end_value: i32,
    /// Reserved; no backend consults it today
    pub step: i32,
    /// Tile/group size hint for the accelerator grid, 0 = backend default
    pub block_dim: usize,
    pub reversed: bool,
    pub num_cpu_threads: usize,
    pub device: Arch,
    pub body: Option<Block>,
}

impl OffloadedTask {
    pub fn new(kind: TaskKind, device: Arch) -> Self {
        Self {
            kind,
            snode: None,
            begin_offset: 0,
            end_offset: 0,
            const_begin: false,
            const_end: false,
            begin_value: 0,
            end_value: 0,
            step: 1,
            block_dim: 0,
            reversed: false,
            num_cpu_threads: 1,
            device,
            body: None,
        }
    }

    pub fn serial(device: Arch, body: Block) -> Self {
        let mut task = Self::new(TaskKind::Serial, device);
        task.body = Some(body);
        task
    }

    /// Range-for over constant bounds `[begin, end)`
    pub fn range_for(device: Arch, begin: i32, end: i32, body: Block) -> Self {
        let mut task = Self::new(TaskKind::RangeFor, device);
        task.const_begin = true;
        task.const_end = true;
        task.begin_value = begin;
        task.end_value = end;
        task.body = Some(body);
        task
    }

    pub fn struct_for(device: Arch, snode: SNodeId, body: Block) -> Self {
        let mut task = Self::new(TaskKind::StructFor, device);
        task.snode = Some(snode);
        task.body = Some(body);
        task
    }

    /// A maintenance task (`ClearList` / `ListGen` / `Gc`) for `snode`
    pub fn maintenance(kind: TaskKind, device: Arch, snode: SNodeId) -> Self {
        let mut task = Self::new(kind, device);
        task.snode = Some(snode);
        task
    }

    pub fn has_body(&self) -> bool {
        self.kind.has_body()
    }

    /// Stable human-readable name for diagnostics and profiling:
    /// kind, optional snode name, target device.
    pub fn task_name(&self, tree: &crate::snode::SNodeTree) -> String {
        match self.snode.and_then(|id| tree.get(id)) {
            Some(snode) => format!("{}_{}_{}", self.kind, snode.name, self.device),
            None => format!("{}_{}", self.kind, self.device),
        }
    }
}

// Structural identity covers the declared task parameters, not the nested
// body: CSE never merges container statements.
impl PartialEq for OffloadedTask {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.snode == other.snode
            && self.begin_offset == other.begin_offset
            && self.end_offset == other.end_offset
            && self.const_begin == other.const_begin
            && self.const_end == other.const_end
            && self.begin_value == other.begin_value
            && self.end_value == other.end_value
            && self.step == other.step
            && self.block_dim == other.block_dim
            && self.reversed == other.reversed
            && self.num_cpu_threads == other.num_cpu_threads
            && self.device == other.device
    }
}

impl Hash for OffloadedTask {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.snode.hash(state);
        self.begin_offset.hash(state);
        self.end_offset.hash(state);
        self.const_begin.hash(state);
        self.const_end.hash(state);
        self.begin_value.hash(state);
        self.end_value.hash(state);
        self.step.hash(state);
        self.block_dim.hash(state);
        self.reversed.hash(state);
        self.num_cpu_threads.hash(state);
        self.device.hash(state);
    }
}

// ============================================================================
// Differentiation stack
// ============================================================================

/// Declare a per-variable shadow stack of (primal, adjoint) pairs
///
/// `max_size == 0` denotes an implementation-defined growable stack.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct StackAlloca {
    pub dt: DataType,
    pub max_size: usize,
}

impl StackAlloca {
    pub fn element_size_in_bytes(&self) -> usize {
        self.dt.size_in_bytes()
    }

    /// One entry holds the primal and the adjoint slot
    pub fn entry_size_in_bytes(&self) -> usize {
        self.element_size_in_bytes() * 2
    }

    /// Total storage: a 32-bit top-of-stack header plus the entries
    pub fn size_in_bytes(&self) -> usize {
        core::mem::size_of::<i32>() + self.entry_size_in_bytes() * self.max_size
    }
}

/// Append `(v, adjoint = 0)` to the stack
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct StackPush {
    pub stack: StmtId,
    pub v: StmtId,
}

/// Remove the top entry; empty stacks fail the replay
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct StackPop {
    pub stack: StmtId,
}

/// Read the primal value of the top entry without popping
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct StackLoadTop {
    pub stack: StmtId,
}

/// Read the adjoint slot of the top entry
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct StackLoadTopAdjoint {
    pub stack: StmtId,
}

/// Add `v` into the adjoint slot of the top entry (accumulate, not
/// overwrite: multiple backward contributions to one primal must sum)
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct StackAccAdjoint {
    pub stack: StmtId,
    pub v: StmtId,
}

// ============================================================================
// Misc
// ============================================================================

/// Current iteration index of the nearest enclosing range/struct for, along
/// dimension `index`
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct LoopIndex {
    pub index: usize,
    pub is_struct_for: bool,
}

/// Fixed scratch slot in the global temporary arena; survives across task
/// boundaries, since tasks do not share registers
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct GlobalTemporary {
    pub offset: usize,
}

/// Opaque call-out to a runtime-provided routine; result type fixed to i32
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct InternalFuncCall {
    pub func_name: String,
}

/// Annotation asking later passes to attempt SIMD-lane vectorization at the
/// given width
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct PragmaSlp {
    pub slp_width: usize,
}

/// Compile-time constant value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedConstant {
    Int(i64, DataType),
    Float(f64, DataType),
}

impl TypedConstant {
    pub fn dt(&self) -> DataType {
        match self {
            TypedConstant::Int(_, dt) => *dt,
            TypedConstant::Float(_, dt) => *dt,
        }
    }
}

impl Hash for TypedConstant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            TypedConstant::Int(v, dt) => {
                0u8.hash(state);
                v.hash(state);
                dt.hash(state);
            }
            TypedConstant::Float(v, dt) => {
                1u8.hash(state);
                v.to_bits().hash(state);
                dt.hash(state);
            }
        }
    }
}

impl fmt::Display for TypedConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedConstant::Int(v, _) => write!(f, "{}", v),
            TypedConstant::Float(v, _) => write!(f, "{}", v),
        }
    }
}

// ============================================================================
// Statement
// ============================================================================

/// Closed sum of every statement kind
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum StmtKind {
    // Hierarchy addressing
    GetRoot,
    SNodeLookup(SNodeLookup),
    GetChild(GetChild),
    Linearize(Linearize),
    OffsetAndExtractBits(OffsetAndExtractBits),
    IntegerOffset(IntegerOffset),
    ElementShuffle(ElementShuffle),
    // Offloaded task
    Offloaded(Box<OffloadedTask>),
    // Differentiation stack
    StackAlloca(StackAlloca),
    StackPush(StackPush),
    StackPop(StackPop),
    StackLoadTop(StackLoadTop),
    StackLoadTopAdjoint(StackLoadTopAdjoint),
    StackAccAdjoint(StackAccAdjoint),
    // Misc
    LoopIndex(LoopIndex),
    GlobalTemporary(GlobalTemporary),
    InternalFuncCall(InternalFuncCall),
    PragmaSlp(PragmaSlp),
    Const(TypedConstant),
}

/// One instruction of the IR
///
/// Owned by its enclosing [`Block`]; refers to the statements it reads and
/// to schema nodes by id only.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: StmtId,
    pub ret_type: VectorType,
    pub kind: StmtKind,
}

impl Stmt {
    /// Kind name, used in diagnostics and printing
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::GetRoot => "get_root",
            StmtKind::SNodeLookup(_) => "snode_lookup",
            StmtKind::GetChild(_) => "get_child",
            StmtKind::Linearize(_) => "linearize",
            StmtKind::OffsetAndExtractBits(_) => "offset_and_extract_bits",
            StmtKind::IntegerOffset(_) => "integer_offset",
            StmtKind::ElementShuffle(_) => "element_shuffle",
            StmtKind::Offloaded(_) => "offloaded",
            StmtKind::StackAlloca(_) => "stack_alloca",
            StmtKind::StackPush(_) => "stack_push",
            StmtKind::StackPop(_) => "stack_pop",
            StmtKind::StackLoadTop(_) => "stack_load_top",
            StmtKind::StackLoadTopAdjoint(_) => "stack_load_top_adjoint",
            StmtKind::StackAccAdjoint(_) => "stack_acc_adjoint",
            StmtKind::LoopIndex(_) => "loop_index",
            StmtKind::GlobalTemporary(_) => "global_temporary",
            StmtKind::InternalFuncCall(_) => "internal_func_call",
            StmtKind::PragmaSlp(_) => "pragma_slp",
            StmtKind::Const(_) => "const",
        }
    }

    /// Ordered backward references to the statements this one reads
    pub fn operands(&self) -> Vec<StmtId> {
        match &self.kind {
            StmtKind::GetRoot
            | StmtKind::Offloaded(_)
            | StmtKind::StackAlloca(_)
            | StmtKind::LoopIndex(_)
            | StmtKind::GlobalTemporary(_)
            | StmtKind::InternalFuncCall(_)
            | StmtKind::PragmaSlp(_)
            | StmtKind::Const(_) => Vec::new(),
            StmtKind::SNodeLookup(op) => {
                let mut ops = vec![op.input_snode, op.input_index];
                ops.extend_from_slice(&op.global_indices);
                ops
            }
            StmtKind::GetChild(op) => vec![op.input_ptr],
            StmtKind::Linearize(op) => op.inputs.clone(),
            StmtKind::OffsetAndExtractBits(op) => vec![op.input],
            StmtKind::IntegerOffset(op) => vec![op.input],
            StmtKind::ElementShuffle(op) => op.elements.iter().map(|e| e.stmt).collect(),
            StmtKind::StackPush(op) => vec![op.stack, op.v],
            StmtKind::StackPop(op) => vec![op.stack],
            StmtKind::StackLoadTop(op) => vec![op.stack],
            StmtKind::StackLoadTopAdjoint(op) => vec![op.stack],
            StmtKind::StackAccAdjoint(op) => vec![op.stack, op.v],
        }
    }

    /// Whether passes must preserve this statement and its ordering
    /// relative to other effecting statements.
    ///
    /// The default is conservative: only the pure address-arithmetic and
    /// constant kinds opt out. `SNodeLookup` effects exactly when it
    /// activates.
    pub fn has_global_side_effect(&self) -> bool {
        match &self.kind {
            StmtKind::GetRoot
            | StmtKind::GetChild(_)
            | StmtKind::Linearize(_)
            | StmtKind::OffsetAndExtractBits(_)
            | StmtKind::IntegerOffset(_)
            | StmtKind::ElementShuffle(_)
            | StmtKind::Const(_) => false,
            StmtKind::SNodeLookup(op) => op.activate,
            _ => true,
        }
    }

    /// True when this statement owns a nested block
    pub fn is_container_stmt(&self) -> bool {
        match &self.kind {
            StmtKind::Offloaded(task) => task.has_body(),
            _ => false,
        }
    }

    /// Structural equality over (result type, declared fields), excluding
    /// the statement id. The contract common-subexpression elimination
    /// relies on.
    pub fn fields_eq(&self, other: &Stmt) -> bool {
        self.ret_type == other.ret_type && self.kind == other.kind
    }

    /// Structural hash, consistent with [`Stmt::fields_eq`]
    pub fn fields_hash<H: Hasher>(&self, state: &mut H) {
        self.ret_type.hash(state);
        self.kind.hash(state);
    }

    pub fn as_offloaded(&self) -> Option<&OffloadedTask> {
        match &self.kind {
            StmtKind::Offloaded(task) => Some(task),
            _ => None,
        }
    }
}

/// Ordered sequence of statements, exclusively owned by its parent
/// container (or by the caller for the root block)
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn get(&self, id: StmtId) -> Option<&Stmt> {
        self.stmts.iter().find(|s| s.id == id)
    }

    /// Statements of this block and, transitively, of nested bodies
    pub fn iter_recursive(&self) -> impl Iterator<Item = &Stmt> {
        // Depth matches offload nesting, which is one level deep in
        // practice; recursion via collect keeps the signature simple.
        let mut out = Vec::new();
        fn walk<'a>(block: &'a Block, out: &mut Vec<&'a Stmt>) {
            for stmt in &block.stmts {
                out.push(stmt);
                if let StmtKind::Offloaded(task) = &stmt.kind {
                    if let Some(body) = &task.body {
                        walk(body, out);
                    }
                }
            }
        }
        walk(self, &mut out);
        out.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn stmt(id: u32, kind: StmtKind) -> Stmt {
        Stmt {
            id: StmtId(id),
            ret_type: VectorType::scalar(DataType::I32),
            kind,
        }
    }

    #[test]
    fn test_task_kind_body_table() {
        assert!(TaskKind::Serial.has_body());
        assert!(TaskKind::RangeFor.has_body());
        assert!(TaskKind::StructFor.has_body());
        assert!(!TaskKind::ClearList.has_body());
        assert!(!TaskKind::ListGen.has_body());
        assert!(!TaskKind::Gc.has_body());
    }

    #[test]
    fn test_task_kind_snode_table() {
        assert!(!TaskKind::Serial.requires_snode());
        assert!(!TaskKind::RangeFor.requires_snode());
        assert!(TaskKind::StructFor.requires_snode());
        assert!(TaskKind::ClearList.requires_snode());
        assert!(TaskKind::ListGen.requires_snode());
        assert!(TaskKind::Gc.requires_snode());
    }

    #[test]
    fn test_operand_order() {
        let lookup = stmt(
            5,
            StmtKind::SNodeLookup(SNodeLookup {
                snode: SNodeId(1),
                input_snode: StmtId(1),
                input_index: StmtId(2),
                global_indices: vec![StmtId(3), StmtId(4)],
                activate: false,
            }),
        );
        assert_eq!(
            lookup.operands(),
            vec![StmtId(1), StmtId(2), StmtId(3), StmtId(4)]
        );
    }

    #[test]
    fn test_structural_identity_ignores_id() {
        let a = stmt(
            1,
            StmtKind::IntegerOffset(IntegerOffset {
                input: StmtId(0),
                offset: 8,
            }),
        );
        let mut b = a.clone();
        b.id = StmtId(99);
        assert!(a.fields_eq(&b));
        let c = stmt(
            2,
            StmtKind::IntegerOffset(IntegerOffset {
                input: StmtId(0),
                offset: 9,
            }),
        );
        assert!(!a.fields_eq(&c));
    }

    #[test]
    fn test_offloaded_identity_excludes_body() {
        let mut body = Block::new();
        body.stmts.push(stmt(7, StmtKind::GetRoot));
        let with_body = OffloadedTask::serial(Arch::X64, body);
        let without = OffloadedTask::serial(Arch::X64, Block::new());
        assert_eq!(with_body, without);
    }

    #[test]
    fn test_stack_alloca_sizes() {
        let alloca = StackAlloca {
            dt: DataType::F32,
            max_size: 16,
        };
        assert_eq!(alloca.element_size_in_bytes(), 4);
        assert_eq!(alloca.entry_size_in_bytes(), 8);
        assert_eq!(alloca.size_in_bytes(), 4 + 8 * 16);
    }

    #[test]
    fn test_iter_recursive_includes_bodies() {
        let mut body = Block::new();
        body.stmts.push(stmt(1, StmtKind::GetRoot));
        let mut block = Block::new();
        block.stmts.push(stmt(
            0,
            StmtKind::Const(TypedConstant::Int(1, DataType::I32)),
        ));
        block.stmts.push(stmt(
            2,
            StmtKind::Offloaded(Box::new(OffloadedTask::serial(Arch::Cuda, body))),
        ));
        let ids: Vec<u32> = block.iter_recursive().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![0, 2, 1]);
    }

    #[test]
    fn test_arch_classification() {
        assert!(Arch::Cuda.is_gpu());
        assert!(Arch::Metal.is_gpu());
        assert!(!Arch::X64.is_gpu());
        assert_eq!(Arch::Arm64.name(), "arm64");
    }

    #[test]
    fn test_float_const_hash_consistent() {
        use std::collections::hash_map::DefaultHasher;
        let a = TypedConstant::Float(1.5, DataType::F64);
        let b = TypedConstant::Float(1.5, DataType::F64);
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(a, b);
        assert_eq!(ha.finish(), hb.finish());
    }
}
