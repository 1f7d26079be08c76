//! Statement visitation
//!
//! Passes and code generators consume the IR through [`IrVisitor`]:
//! one method per concrete statement kind, dispatched by exhaustive match
//! in [`Stmt::accept`]. The instruction set is closed, so adding a kind is
//! a compile error at the dispatch site until every visitor handles it.
//!
//! [`walk_block`] drives a block in order and recurses into offloaded
//! bodies after the container itself has been visited.

use super::{
    Block, ElementShuffle, GetChild, GlobalTemporary, IntegerOffset, InternalFuncCall, Linearize,
    LoopIndex, OffloadedTask, OffsetAndExtractBits, PragmaSlp, SNodeLookup, StackAccAdjoint,
    StackAlloca, StackLoadTop, StackLoadTopAdjoint, StackPop, StackPush, Stmt, StmtKind,
    TypedConstant,
};

/// Double-dispatch interface over the closed statement set
///
/// Every method defaults to a no-op, so a pass only implements the kinds
/// it cares about.
#[allow(unused_variables)]
pub trait IrVisitor {
    fn visit_get_root(&mut self, stmt: &Stmt) {}
    fn visit_snode_lookup(&mut self, stmt: &Stmt, op: &SNodeLookup) {}
    fn visit_get_child(&mut self, stmt: &Stmt, op: &GetChild) {}
    fn visit_linearize(&mut self, stmt: &Stmt, op: &Linearize) {}
    fn visit_offset_and_extract_bits(&mut self, stmt: &Stmt, op: &OffsetAndExtractBits) {}
    fn visit_integer_offset(&mut self, stmt: &Stmt, op: &IntegerOffset) {}
    fn visit_element_shuffle(&mut self, stmt: &Stmt, op: &ElementShuffle) {}
    fn visit_offloaded(&mut self, stmt: &Stmt, task: &OffloadedTask) {}
    fn visit_stack_alloca(&mut self, stmt: &Stmt, op: &StackAlloca) {}
    fn visit_stack_push(&mut self, stmt: &Stmt, op: &StackPush) {}
    fn visit_stack_pop(&mut self, stmt: &Stmt, op: &StackPop) {}
    fn visit_stack_load_top(&mut self, stmt: &Stmt, op: &StackLoadTop) {}
    fn visit_stack_load_top_adjoint(&mut self, stmt: &Stmt, op: &StackLoadTopAdjoint) {}
    fn visit_stack_acc_adjoint(&mut self, stmt: &Stmt, op: &StackAccAdjoint) {}
    fn visit_loop_index(&mut self, stmt: &Stmt, op: &LoopIndex) {}
    fn visit_global_temporary(&mut self, stmt: &Stmt, op: &GlobalTemporary) {}
    fn visit_internal_func_call(&mut self, stmt: &Stmt, op: &InternalFuncCall) {}
    fn visit_pragma_slp(&mut self, stmt: &Stmt, op: &PragmaSlp) {}
    fn visit_const(&mut self, stmt: &Stmt, value: &TypedConstant) {}
}

impl Stmt {
    /// Dispatch to the visitor method for this statement's kind.
    pub fn accept<V: IrVisitor + ?Sized>(&self, v: &mut V) {
        match &self.kind {
            StmtKind::GetRoot => v.visit_get_root(self),
            StmtKind::SNodeLookup(op) => v.visit_snode_lookup(self, op),
            StmtKind::GetChild(op) => v.visit_get_child(self, op),
            StmtKind::Linearize(op) => v.visit_linearize(self, op),
            StmtKind::OffsetAndExtractBits(op) => v.visit_offset_and_extract_bits(self, op),
            StmtKind::IntegerOffset(op) => v.visit_integer_offset(self, op),
            StmtKind::ElementShuffle(op) => v.visit_element_shuffle(self, op),
            StmtKind::Offloaded(task) => v.visit_offloaded(self, task),
            StmtKind::StackAlloca(op) => v.visit_stack_alloca(self, op),
            StmtKind::StackPush(op) => v.visit_stack_push(self, op),
            StmtKind::StackPop(op) => v.visit_stack_pop(self, op),
            StmtKind::StackLoadTop(op) => v.visit_stack_load_top(self, op),
            StmtKind::StackLoadTopAdjoint(op) => v.visit_stack_load_top_adjoint(self, op),
            StmtKind::StackAccAdjoint(op) => v.visit_stack_acc_adjoint(self, op),
            StmtKind::LoopIndex(op) => v.visit_loop_index(self, op),
            StmtKind::GlobalTemporary(op) => v.visit_global_temporary(self, op),
            StmtKind::InternalFuncCall(op) => v.visit_internal_func_call(self, op),
            StmtKind::PragmaSlp(op) => v.visit_pragma_slp(self, op),
            StmtKind::Const(value) => v.visit_const(self, value),
        }
    }
}

/// Visit every statement of `block` in order, recursing into offloaded
/// bodies after their container.
pub fn walk_block<V: IrVisitor + ?Sized>(block: &Block, v: &mut V) {
    for stmt in &block.stmts {
        stmt.accept(v);
        if let StmtKind::Offloaded(task) = &stmt.kind {
            if let Some(body) = &task.body {
                walk_block(body, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Arch, IrBuilder};
    use crate::types::DataType;

    #[derive(Default)]
    struct KindCounter {
        consts: usize,
        offloads: usize,
        loop_indices: usize,
    }

    impl IrVisitor for KindCounter {
        fn visit_const(&mut self, _stmt: &Stmt, _value: &TypedConstant) {
            self.consts += 1;
        }
        fn visit_offloaded(&mut self, _stmt: &Stmt, _task: &OffloadedTask) {
            self.offloads += 1;
        }
        fn visit_loop_index(&mut self, _stmt: &Stmt, _op: &LoopIndex) {
            self.loop_indices += 1;
        }
    }

    #[test]
    fn test_walk_recurses_into_bodies() {
        let mut b = IrBuilder::new();
        b.begin_block();
        b.const_int(1, DataType::I32).unwrap();
        b.range_for_task(Arch::X64, 0, 4, |b| {
            let i = b.loop_index(0, false)?;
            b.integer_offset(i, 1)?;
            Ok(())
        })
        .unwrap();
        let block = b.end_block().unwrap();

        let mut counter = KindCounter::default();
        walk_block(&block, &mut counter);
        assert_eq!(counter.consts, 1);
        assert_eq!(counter.offloads, 1);
        assert_eq!(counter.loop_indices, 1);
    }

    struct EffectScan {
        effecting: Vec<&'static str>,
    }

    impl IrVisitor for EffectScan {}

    #[test]
    fn test_accept_reaches_every_pushed_stmt() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let x = b.const_float(1.0, DataType::F32).unwrap();
        let stack = b.stack_alloca(DataType::F32, 4).unwrap();
        b.stack_push(stack, x).unwrap();
        let block = b.end_block().unwrap();

        // effect scan over the generic interface, not the enum
        let mut names = EffectScan { effecting: vec![] };
        for stmt in &block.stmts {
            stmt.accept(&mut names);
            if stmt.has_global_side_effect() {
                names.effecting.push(stmt.kind_name());
            }
        }
        assert_eq!(names.effecting, vec!["stack_alloca", "stack_push"]);
    }
}
