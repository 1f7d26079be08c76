//! Statement factory
//!
//! All statements are created through [`IrBuilder`]: it assigns the
//! program-unique id, infers the result type, checks every construction
//! contract, and appends the statement to the innermost open block.
//! Keeping identity assignment and validation out of the statement types
//! themselves keeps those types plain data that passes can clone and hash
//! freely.
//!
//! Contract violations are frontend bugs, not recoverable conditions, so
//! every constructor returns `Result` and the caller is expected to abort
//! compilation on `Err`.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::{
    Arch, Block, ElementShuffle, GetChild, GlobalTemporary, IntegerOffset, InternalFuncCall,
    Linearize, LoopIndex, OffloadedTask, OffsetAndExtractBits, PragmaSlp, SNodeLookup, StackAlloca,
    StackAccAdjoint, StackLoadTop, StackLoadTopAdjoint, StackPop, StackPush, Stmt, StmtId,
    StmtKind, TaskKind, TypedConstant, VectorElement,
};
use crate::error::IrError;
use crate::snode::{SNodeId, SNodeTree};
use crate::types::{DataType, VectorType};

/// Factory for IR statements and blocks
///
/// Blocks nest through [`IrBuilder::begin_block`] / [`IrBuilder::end_block`];
/// statements append to the innermost open block, so dominance of operand
/// references holds by construction order.
#[derive(Debug, Default)]
pub struct IrBuilder {
    next_id: u32,
    open_blocks: Vec<Block>,
    /// Result type of every statement created so far
    ret_types: FxHashMap<StmtId, VectorType>,
    /// Element type per stack_alloca, for the stack-operand contract
    stack_allocas: FxHashMap<StmtId, DataType>,
    /// Which hierarchy node each reference-producing statement resolves to
    snode_refs: FxHashMap<StmtId, SNodeId>,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new block; statements created until the matching
    /// [`IrBuilder::end_block`] land in it.
    pub fn begin_block(&mut self) {
        self.open_blocks.push(Block::new());
    }

    /// Close the innermost block and hand it to the caller.
    pub fn end_block(&mut self) -> Result<Block, IrError> {
        self.open_blocks.pop().ok_or(IrError::UnbalancedBlock)
    }

    /// Result type of a previously created statement
    pub fn ret_type(&self, stmt: StmtId) -> Option<VectorType> {
        self.ret_types.get(&stmt).copied()
    }

    fn push(&mut self, ret_type: VectorType, kind: StmtKind) -> Result<StmtId, IrError> {
        let block = self.open_blocks.last_mut().ok_or(IrError::NoOpenBlock)?;
        let id = StmtId(self.next_id);
        self.next_id += 1;
        block.stmts.push(Stmt { id, ret_type, kind });
        self.ret_types.insert(id, ret_type);
        Ok(id)
    }

    fn require_stack(
        &self,
        kind: &'static str,
        stack: StmtId,
    ) -> Result<DataType, IrError> {
        self.stack_allocas
            .get(&stack)
            .copied()
            .ok_or(IrError::NotAStack {
                kind,
                user: StmtId(self.next_id),
                stmt: stack,
            })
    }

    // ------------------------------------------------------------------
    // Hierarchy addressing
    // ------------------------------------------------------------------

    /// Reference to the hierarchy's root node. Pure handle acquisition.
    pub fn get_root(&mut self, tree: &SNodeTree) -> Result<StmtId, IrError> {
        let root = tree.root().ok_or(IrError::UnknownSNode { id: SNodeId(0) })?;
        let root_id = root.id;
        let id = self.push(VectorType::VOID, StmtKind::GetRoot)?;
        self.snode_refs.insert(id, root_id);
        Ok(id)
    }

    /// Child element of `snode` at `input_index`. With `activate`, may
    /// lazily materialize storage (declared global side effect).
    pub fn snode_lookup(
        &mut self,
        snode: SNodeId,
        input_snode: StmtId,
        input_index: StmtId,
        activate: bool,
        global_indices: Vec<StmtId>,
    ) -> Result<StmtId, IrError> {
        let id = self.push(
            VectorType::VOID,
            StmtKind::SNodeLookup(SNodeLookup {
                snode,
                input_snode,
                input_index,
                global_indices,
                activate,
            }),
        )?;
        self.snode_refs.insert(id, snode);
        Ok(id)
    }

    /// Descend from the node reference `input_ptr` to child slot `chid`.
    /// The parent schema is resolved from the reference producer; the child
    /// schema is looked up in `tree` at construction.
    pub fn get_child(
        &mut self,
        tree: &SNodeTree,
        input_ptr: StmtId,
        chid: usize,
    ) -> Result<StmtId, IrError> {
        let parent = *self
            .snode_refs
            .get(&input_ptr)
            .ok_or(IrError::NotANodeRef { stmt: input_ptr })?;
        let parent_node = tree.get(parent).ok_or(IrError::UnknownSNode { id: parent })?;
        let child = tree
            .child(parent, chid)
            .ok_or(IrError::ChildIndexOutOfRange {
                snode: parent,
                chid,
                child_count: parent_node.child_count(),
            })?;
        let output_snode = child.id;
        let id = self.push(
            VectorType::VOID,
            StmtKind::GetChild(GetChild {
                input_ptr,
                input_snode: parent,
                output_snode,
                chid,
            }),
        )?;
        self.snode_refs.insert(id, output_snode);
        Ok(id)
    }

    /// `sum(inputs[i] * strides[i])`; fails unless the lists have equal
    /// length.
    pub fn linearize(
        &mut self,
        inputs: Vec<StmtId>,
        strides: Vec<i64>,
    ) -> Result<StmtId, IrError> {
        if inputs.len() != strides.len() {
            return Err(IrError::ArityMismatch {
                inputs: inputs.len(),
                strides: strides.len(),
            });
        }
        self.push(
            VectorType::scalar(DataType::I32),
            StmtKind::Linearize(Linearize { inputs, strides }),
        )
    }

    /// `((input + offset) >> bit_begin) & mask(bit_end - bit_begin)`;
    /// requires `bit_begin < bit_end <= 64`.
    pub fn offset_and_extract_bits(
        &mut self,
        input: StmtId,
        bit_begin: u32,
        bit_end: u32,
        offset: i64,
    ) -> Result<StmtId, IrError> {
        if bit_begin >= bit_end || bit_end > 64 {
            return Err(IrError::InvalidBitRange { bit_begin, bit_end });
        }
        self.push(
            VectorType::scalar(DataType::I32),
            StmtKind::OffsetAndExtractBits(OffsetAndExtractBits {
                input,
                bit_begin,
                bit_end,
                offset,
                simplified: false,
            }),
        )
    }

    pub fn integer_offset(&mut self, input: StmtId, offset: i64) -> Result<StmtId, IrError> {
        self.push(
            VectorType::scalar(DataType::I32),
            StmtKind::IntegerOffset(IntegerOffset { input, offset }),
        )
    }

    /// New vector of width `elements.len()`, one (source stmt, source lane)
    /// pair per output lane. Element type comes from the first source.
    pub fn element_shuffle(
        &mut self,
        elements: Vec<VectorElement>,
        pointer: bool,
    ) -> Result<StmtId, IrError> {
        let first = elements.first().ok_or(IrError::EmptyShuffle)?;
        let dt = self
            .ret_types
            .get(&first.stmt)
            .map(|t| t.dt)
            .unwrap_or(DataType::Void);
        let width = elements.len();
        self.push(
            VectorType::new(dt, width),
            StmtKind::ElementShuffle(ElementShuffle { elements, pointer }),
        )
    }

    // ------------------------------------------------------------------
    // Offloaded tasks
    // ------------------------------------------------------------------

    /// Append an offloaded task, validating the kind/body/snode contracts.
    pub fn offloaded(&mut self, task: OffloadedTask) -> Result<StmtId, IrError> {
        if task.kind.is_maintenance() {
            if task.body.as_ref().is_some_and(|b| !b.is_empty()) {
                return Err(IrError::MaintenanceTaskWithBody { kind: task.kind });
            }
        } else if task.body.is_none() {
            return Err(IrError::MissingBody { kind: task.kind });
        }
        if task.kind.requires_snode() && task.snode.is_none() {
            return Err(IrError::MissingSNode { kind: task.kind });
        }
        debug!(
            kind = task.kind.name(),
            device = task.device.name(),
            body_len = task.body.as_ref().map(|b| b.len()).unwrap_or(0),
            "offload task created"
        );
        self.push(VectorType::VOID, StmtKind::Offloaded(Box::new(task)))
    }

    // ------------------------------------------------------------------
    // Differentiation stack
    // ------------------------------------------------------------------

    /// Declare a shadow stack of `(primal, adjoint)` pairs of `dt`.
    /// `max_size == 0` denotes a growable stack.
    pub fn stack_alloca(&mut self, dt: DataType, max_size: usize) -> Result<StmtId, IrError> {
        let id = self.push(
            VectorType::scalar(dt),
            StmtKind::StackAlloca(StackAlloca { dt, max_size }),
        )?;
        self.stack_allocas.insert(id, dt);
        Ok(id)
    }

    pub fn stack_push(&mut self, stack: StmtId, v: StmtId) -> Result<StmtId, IrError> {
        self.require_stack("stack_push", stack)?;
        self.push(VectorType::VOID, StmtKind::StackPush(StackPush { stack, v }))
    }

    pub fn stack_pop(&mut self, stack: StmtId) -> Result<StmtId, IrError> {
        self.require_stack("stack_pop", stack)?;
        self.push(VectorType::VOID, StmtKind::StackPop(StackPop { stack }))
    }

    pub fn stack_load_top(&mut self, stack: StmtId) -> Result<StmtId, IrError> {
        let dt = self.require_stack("stack_load_top", stack)?;
        self.push(
            VectorType::scalar(dt),
            StmtKind::StackLoadTop(StackLoadTop { stack }),
        )
    }

    pub fn stack_load_top_adjoint(&mut self, stack: StmtId) -> Result<StmtId, IrError> {
        let dt = self.require_stack("stack_load_top_adjoint", stack)?;
        self.push(
            VectorType::scalar(dt),
            StmtKind::StackLoadTopAdjoint(StackLoadTopAdjoint { stack }),
        )
    }

    pub fn stack_acc_adjoint(&mut self, stack: StmtId, v: StmtId) -> Result<StmtId, IrError> {
        self.require_stack("stack_acc_adjoint", stack)?;
        self.push(
            VectorType::VOID,
            StmtKind::StackAccAdjoint(StackAccAdjoint { stack, v }),
        )
    }

    // ------------------------------------------------------------------
    // Misc
    // ------------------------------------------------------------------

    pub fn loop_index(&mut self, index: usize, is_struct_for: bool) -> Result<StmtId, IrError> {
        self.push(
            VectorType::scalar(DataType::I32),
            StmtKind::LoopIndex(LoopIndex {
                index,
                is_struct_for,
            }),
        )
    }

    pub fn global_temporary(
        &mut self,
        offset: usize,
        ret_type: VectorType,
    ) -> Result<StmtId, IrError> {
        self.push(ret_type, StmtKind::GlobalTemporary(GlobalTemporary { offset }))
    }

    pub fn internal_func_call(&mut self, func_name: impl Into<String>) -> Result<StmtId, IrError> {
        self.push(
            VectorType::scalar(DataType::I32),
            StmtKind::InternalFuncCall(InternalFuncCall {
                func_name: func_name.into(),
            }),
        )
    }

    pub fn pragma_slp(&mut self, slp_width: usize) -> Result<StmtId, IrError> {
        self.push(
            VectorType::VOID,
            StmtKind::PragmaSlp(PragmaSlp { slp_width }),
        )
    }

    pub fn const_int(&mut self, v: i64, dt: DataType) -> Result<StmtId, IrError> {
        self.push(
            VectorType::scalar(dt),
            StmtKind::Const(TypedConstant::Int(v, dt)),
        )
    }

    pub fn const_float(&mut self, v: f64, dt: DataType) -> Result<StmtId, IrError> {
        self.push(
            VectorType::scalar(dt),
            StmtKind::Const(TypedConstant::Float(v, dt)),
        )
    }

    /// Re-insert a cloned statement under a fresh id, keeping ids unique
    /// program-wide. For a container statement the body is re-idded
    /// recursively, with operand references between body statements
    /// remapped to the fresh ids; references to statements outside the
    /// clone are left pointing at the originals. Field values are
    /// otherwise preserved exactly, and builder registries (result types,
    /// stack allocas, node references) are extended to cover the clone.
    pub fn push_cloned(&mut self, stmt: &Stmt) -> Result<StmtId, IrError> {
        let mut kind = stmt.kind.clone();
        if let StmtKind::Offloaded(task) = &mut kind {
            if let Some(body) = &mut task.body {
                let mut remap = FxHashMap::default();
                self.reid_block(body, &mut remap);
            }
        }
        let stack_dt = match &kind {
            StmtKind::StackAlloca(op) => Some(op.dt),
            _ => None,
        };
        let node_ref = match &kind {
            StmtKind::SNodeLookup(op) => Some(op.snode),
            StmtKind::GetChild(op) => Some(op.output_snode),
            StmtKind::GetRoot => self.snode_refs.get(&stmt.id).copied(),
            _ => None,
        };
        let id = self.push(stmt.ret_type, kind)?;
        if let Some(dt) = stack_dt {
            self.stack_allocas.insert(id, dt);
        }
        if let Some(snode) = node_ref {
            self.snode_refs.insert(id, snode);
        }
        Ok(id)
    }

    /// Walk a cloned body in statement order, giving every statement a
    /// fresh id and rewriting operand references through `remap`. Entries
    /// for the original ids stay in the registries since the originals
    /// still exist elsewhere in the program.
    fn reid_block(&mut self, block: &mut Block, remap: &mut FxHashMap<StmtId, StmtId>) {
        for stmt in &mut block.stmts {
            Self::remap_operands(&mut stmt.kind, remap);
            if let StmtKind::Offloaded(task) = &mut stmt.kind {
                if let Some(body) = &mut task.body {
                    self.reid_block(body, remap);
                }
            }
            let old = stmt.id;
            let fresh = StmtId(self.next_id);
            self.next_id += 1;
            remap.insert(old, fresh);
            stmt.id = fresh;
            self.ret_types.insert(fresh, stmt.ret_type);
            match &stmt.kind {
                StmtKind::StackAlloca(op) => {
                    self.stack_allocas.insert(fresh, op.dt);
                }
                StmtKind::SNodeLookup(op) => {
                    self.snode_refs.insert(fresh, op.snode);
                }
                StmtKind::GetChild(op) => {
                    self.snode_refs.insert(fresh, op.output_snode);
                }
                StmtKind::GetRoot => {
                    if let Some(snode) = self.snode_refs.get(&old).copied() {
                        self.snode_refs.insert(fresh, snode);
                    }
                }
                _ => {}
            }
        }
    }

    fn remap_operands(kind: &mut StmtKind, remap: &FxHashMap<StmtId, StmtId>) {
        let rewrite = |id: &mut StmtId| {
            if let Some(fresh) = remap.get(id) {
                *id = *fresh;
            }
        };
        match kind {
            StmtKind::SNodeLookup(op) => {
                rewrite(&mut op.input_snode);
                rewrite(&mut op.input_index);
                for index in &mut op.global_indices {
                    rewrite(index);
                }
            }
            StmtKind::GetChild(op) => rewrite(&mut op.input_ptr),
            StmtKind::Linearize(op) => {
                for input in &mut op.inputs {
                    rewrite(input);
                }
            }
            StmtKind::OffsetAndExtractBits(op) => rewrite(&mut op.input),
            StmtKind::IntegerOffset(op) => rewrite(&mut op.input),
            StmtKind::ElementShuffle(op) => {
                for element in &mut op.elements {
                    rewrite(&mut element.stmt);
                }
            }
            StmtKind::StackPush(op) => {
                rewrite(&mut op.stack);
                rewrite(&mut op.v);
            }
            StmtKind::StackPop(op) => rewrite(&mut op.stack),
            StmtKind::StackLoadTop(op) => rewrite(&mut op.stack),
            StmtKind::StackLoadTopAdjoint(op) => rewrite(&mut op.stack),
            StmtKind::StackAccAdjoint(op) => {
                rewrite(&mut op.stack);
                rewrite(&mut op.v);
            }
            StmtKind::GetRoot
            | StmtKind::Offloaded(_)
            | StmtKind::StackAlloca(_)
            | StmtKind::LoopIndex(_)
            | StmtKind::GlobalTemporary(_)
            | StmtKind::InternalFuncCall(_)
            | StmtKind::PragmaSlp(_)
            | StmtKind::Const(_) => {}
        }
    }

    /// A convenient way to offload a serial task built in a closure.
    pub fn serial_task(
        &mut self,
        device: Arch,
        f: impl FnOnce(&mut IrBuilder) -> Result<(), IrError>,
    ) -> Result<StmtId, IrError> {
        self.begin_block();
        f(self)?;
        let body = self.end_block()?;
        self.offloaded(OffloadedTask::serial(device, body))
    }

    /// Offload a range-for over constant bounds built in a closure.
    pub fn range_for_task(
        &mut self,
        device: Arch,
        begin: i32,
        end: i32,
        f: impl FnOnce(&mut IrBuilder) -> Result<(), IrError>,
    ) -> Result<StmtId, IrError> {
        self.begin_block();
        f(self)?;
        let body = self.end_block()?;
        self.offloaded(OffloadedTask::range_for(device, begin, end, body))
    }

    /// Offload a struct-for over the active elements of `snode`.
    pub fn struct_for_task(
        &mut self,
        device: Arch,
        snode: SNodeId,
        f: impl FnOnce(&mut IrBuilder) -> Result<(), IrError>,
    ) -> Result<StmtId, IrError> {
        self.begin_block();
        f(self)?;
        let body = self.end_block()?;
        self.offloaded(OffloadedTask::struct_for(device, snode, body))
    }

    /// Maintenance task for `snode` (`ClearList`, `ListGen` or `Gc`).
    pub fn maintenance_task(
        &mut self,
        kind: TaskKind,
        device: Arch,
        snode: SNodeId,
    ) -> Result<StmtId, IrError> {
        self.offloaded(OffloadedTask::maintenance(kind, device, snode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snode::{AxisBits, SNodeKind};

    fn tree() -> (SNodeTree, SNodeId, SNodeId) {
        let mut tree = SNodeTree::new();
        let root = tree.add_node("root", SNodeKind::Root, vec![], None);
        let blk = tree.add_node(
            "blk",
            SNodeKind::Pointer,
            vec![AxisBits::new(0, 2), AxisBits::new(1, 2)],
            None,
        );
        tree.add_child(root, blk);
        (tree, root, blk)
    }

    #[test]
    fn test_ids_monotonic() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let a = b.const_int(1, DataType::I32).unwrap();
        let c = b.const_int(2, DataType::I32).unwrap();
        let d = b.integer_offset(a, 3).unwrap();
        assert!(a < c && c < d);
    }

    #[test]
    fn test_push_without_block_fails() {
        let mut b = IrBuilder::new();
        assert_eq!(
            b.const_int(0, DataType::I32).unwrap_err(),
            IrError::NoOpenBlock
        );
    }

    #[test]
    fn test_linearize_arity_contract() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let i = b.const_int(1, DataType::I32).unwrap();
        let err = b.linearize(vec![i], vec![4, 1]).unwrap_err();
        assert_eq!(
            err,
            IrError::ArityMismatch {
                inputs: 1,
                strides: 2
            }
        );
    }

    #[test]
    fn test_get_child_resolves_schema() {
        let (tree, root_id, blk) = tree();
        let mut b = IrBuilder::new();
        b.begin_block();
        let root_ref = b.get_root(&tree).unwrap();
        let child = b.get_child(&tree, root_ref, 0).unwrap();
        let block = b.end_block().unwrap();
        match &block.get(child).unwrap().kind {
            StmtKind::GetChild(op) => {
                assert_eq!(op.input_snode, root_id);
                assert_eq!(op.output_snode, blk);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_get_child_out_of_range() {
        let (tree, _, _) = tree();
        let mut b = IrBuilder::new();
        b.begin_block();
        let root_ref = b.get_root(&tree).unwrap();
        let err = b.get_child(&tree, root_ref, 3).unwrap_err();
        assert!(matches!(
            err,
            IrError::ChildIndexOutOfRange { chid: 3, child_count: 1, .. }
        ));
    }

    #[test]
    fn test_bit_range_contract() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let v = b.const_int(1, DataType::I32).unwrap();
        assert_eq!(
            b.offset_and_extract_bits(v, 64, 64, 0).unwrap_err(),
            IrError::InvalidBitRange { bit_begin: 64, bit_end: 64 }
        );
        assert_eq!(
            b.offset_and_extract_bits(v, 8, 4, 0).unwrap_err(),
            IrError::InvalidBitRange { bit_begin: 8, bit_end: 4 }
        );
        assert_eq!(
            b.offset_and_extract_bits(v, 0, 65, 0).unwrap_err(),
            IrError::InvalidBitRange { bit_begin: 0, bit_end: 65 }
        );
        assert!(b.offset_and_extract_bits(v, 0, 64, 0).is_ok());
    }

    #[test]
    fn test_stack_operand_contract() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let not_a_stack = b.const_int(0, DataType::I32).unwrap();
        assert!(matches!(
            b.stack_pop(not_a_stack).unwrap_err(),
            IrError::NotAStack { kind: "stack_pop", .. }
        ));
        let stack = b.stack_alloca(DataType::F32, 8).unwrap();
        assert!(b.stack_pop(stack).is_ok());
    }

    #[test]
    fn test_stack_load_top_type() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let stack = b.stack_alloca(DataType::F64, 0).unwrap();
        let top = b.stack_load_top(stack).unwrap();
        assert_eq!(b.ret_type(top), Some(VectorType::scalar(DataType::F64)));
    }

    #[test]
    fn test_element_shuffle_type() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let x = b.const_float(1.0, DataType::F32).unwrap();
        let y = b.const_float(2.0, DataType::F32).unwrap();
        let shuffle = b
            .element_shuffle(
                vec![
                    VectorElement { stmt: x, index: 0 },
                    VectorElement { stmt: y, index: 0 },
                    VectorElement { stmt: x, index: 0 },
                ],
                false,
            )
            .unwrap();
        assert_eq!(b.ret_type(shuffle), Some(VectorType::new(DataType::F32, 3)));
    }

    #[test]
    fn test_maintenance_contracts() {
        let (_, _, blk) = tree();
        let mut b = IrBuilder::new();
        b.begin_block();

        // maintenance with a populated body
        b.begin_block();
        b.const_int(0, DataType::I32).unwrap();
        let body = b.end_block().unwrap();
        let mut task = OffloadedTask::maintenance(TaskKind::Gc, Arch::X64, blk);
        task.body = Some(body);
        assert_eq!(
            b.offloaded(task).unwrap_err(),
            IrError::MaintenanceTaskWithBody { kind: TaskKind::Gc }
        );

        // hierarchy-driven kind without an snode
        let mut task = OffloadedTask::new(TaskKind::ListGen, Arch::X64);
        task.snode = None;
        assert_eq!(
            b.offloaded(task).unwrap_err(),
            IrError::MissingSNode { kind: TaskKind::ListGen }
        );

        // body kind without a body
        let task = OffloadedTask::new(TaskKind::Serial, Arch::X64);
        assert_eq!(
            b.offloaded(task).unwrap_err(),
            IrError::MissingBody { kind: TaskKind::Serial }
        );
    }

    #[test]
    fn test_task_closure_builders() {
        let (_, _, blk) = tree();
        let mut b = IrBuilder::new();
        b.begin_block();
        let task = b
            .range_for_task(Arch::Cuda, 0, 128, |b| {
                let i = b.loop_index(0, false)?;
                b.integer_offset(i, 1)?;
                Ok(())
            })
            .unwrap();
        b.maintenance_task(TaskKind::ListGen, Arch::Cuda, blk).unwrap();
        let block = b.end_block().unwrap();
        let task = block.get(task).unwrap().as_offloaded().unwrap();
        assert_eq!(task.kind, TaskKind::RangeFor);
        assert_eq!(task.body.as_ref().unwrap().len(), 2);
        assert!(task.const_begin && task.const_end);
        assert_eq!((task.begin_value, task.end_value), (0, 128));
    }
}
