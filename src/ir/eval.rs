//! Constant evaluation and differentiation-stack replay
//!
//! A small reference evaluator for the pure arithmetic statements and the
//! stack instruction family. Folding consumers use it to resolve address
//! arithmetic at compile time; the test suite uses it to pin down the
//! semantics of `linearize`, `offset_and_extract_bits` and the stack
//! discipline. Hierarchy lookups and task dispatch are runtime concerns
//! and evaluate to [`EvalError::Unsupported`] - failing fast, never a
//! sentinel value.

use rustc_hash::FxHashMap;

use super::{Block, Stmt, StmtId, StmtKind, TypedConstant};
use crate::error::EvalError;

/// A scalar value held during evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(v) => *v as f64,
            Value::Float(v) => *v,
        }
    }
}

/// Runtime model of one differentiation stack
///
/// Entries are `(primal, adjoint)` pairs. A `max_size` of 0 denotes a
/// growable stack; bounded stacks refuse pushes past their capacity, since
/// capacity is part of the storage layout codegen commits to.
#[derive(Debug, Clone, Default)]
pub struct AdStack {
    entries: Vec<(f64, f64)>,
    max_size: usize,
}

impl AdStack {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.max_size != 0 && self.entries.len() >= self.max_size
    }

    /// Append `(primal, adjoint = 0)`; false when the stack is full.
    pub fn push(&mut self, primal: f64) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push((primal, 0.0));
        true
    }

    pub fn pop(&mut self) -> Option<(f64, f64)> {
        self.entries.pop()
    }

    /// `(primal, adjoint)` of the top entry
    pub fn top(&self) -> Option<(f64, f64)> {
        self.entries.last().copied()
    }

    /// Add `delta` into the adjoint slot of the top entry; false when
    /// empty.
    pub fn acc_adjoint(&mut self, delta: f64) -> bool {
        match self.entries.last_mut() {
            Some(entry) => {
                entry.1 += delta;
                true
            }
            None => false,
        }
    }
}

/// Evaluator state: one value per evaluated statement, one [`AdStack`] per
/// `stack_alloca`, plus external bindings for loop indices and global
/// temporaries.
#[derive(Debug, Default)]
pub struct Evaluator {
    values: FxHashMap<StmtId, Value>,
    stacks: FxHashMap<StmtId, AdStack>,
    loop_indices: Vec<i64>,
    temporaries: FxHashMap<usize, Value>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the iteration index of loop dimension `index`.
    pub fn bind_loop_index(&mut self, index: usize, value: i64) {
        if self.loop_indices.len() <= index {
            self.loop_indices.resize(index + 1, 0);
        }
        self.loop_indices[index] = value;
    }

    /// Bind the global temporary slot at `offset`.
    pub fn bind_temporary(&mut self, offset: usize, value: Value) {
        self.temporaries.insert(offset, value);
    }

    /// Value computed for `stmt`, if it has been evaluated.
    pub fn value(&self, stmt: StmtId) -> Option<Value> {
        self.values.get(&stmt).copied()
    }

    /// The stack declared by the `stack_alloca` at `stmt`.
    pub fn stack(&self, stmt: StmtId) -> Option<&AdStack> {
        self.stacks.get(&stmt)
    }

    pub fn run_block(&mut self, block: &Block) -> Result<(), EvalError> {
        for stmt in &block.stmts {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    fn int_operand(&self, stmt: &Stmt, id: StmtId) -> Result<i64, EvalError> {
        let value = self
            .values
            .get(&id)
            .ok_or(EvalError::Undefined { stmt: id })?;
        value.as_int().ok_or(EvalError::ExpectedInt {
            kind: stmt.kind_name(),
            stmt: stmt.id,
        })
    }

    fn f64_operand(&self, id: StmtId) -> Result<f64, EvalError> {
        self.values
            .get(&id)
            .map(Value::as_f64)
            .ok_or(EvalError::Undefined { stmt: id })
    }

    fn stack_mut(&mut self, id: StmtId) -> Result<&mut AdStack, EvalError> {
        // the factory guarantees the operand is a stack_alloca; Undefined
        // here means the alloca was never evaluated
        self.stacks
            .get_mut(&id)
            .ok_or(EvalError::Undefined { stmt: id })
    }

    pub fn eval_stmt(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        match &stmt.kind {
            StmtKind::Const(value) => {
                let v = match value {
                    TypedConstant::Int(v, _) => Value::Int(*v),
                    TypedConstant::Float(v, _) => Value::Float(*v),
                };
                self.values.insert(stmt.id, v);
            }
            StmtKind::Linearize(op) => {
                let mut acc: i64 = 0;
                for (input, stride) in op.inputs.iter().zip(&op.strides) {
                    let term = self.int_operand(stmt, *input)?.wrapping_mul(*stride);
                    acc = acc.wrapping_add(term);
                }
                self.values.insert(stmt.id, Value::Int(acc));
            }
            StmtKind::OffsetAndExtractBits(op) => {
                let input = self.int_operand(stmt, op.input)?;
                let bits = op.bit_end.saturating_sub(op.bit_begin);
                let mask: u64 = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
                // the factory enforces bit_begin < 64; shifting a hand-built
                // wider range extracts nothing
                let shifted = (input.wrapping_add(op.offset) as u64)
                    .checked_shr(op.bit_begin)
                    .unwrap_or(0);
                self.values.insert(stmt.id, Value::Int((shifted & mask) as i64));
            }
            StmtKind::IntegerOffset(op) => {
                let input = self.int_operand(stmt, op.input)?;
                self.values
                    .insert(stmt.id, Value::Int(input.wrapping_add(op.offset)));
            }
            StmtKind::LoopIndex(op) => {
                let v = *self
                    .loop_indices
                    .get(op.index)
                    .ok_or(EvalError::UnboundLoopIndex { index: op.index })?;
                self.values.insert(stmt.id, Value::Int(v));
            }
            StmtKind::GlobalTemporary(op) => {
                let v = *self
                    .temporaries
                    .get(&op.offset)
                    .ok_or(EvalError::UnboundTemporary { offset: op.offset })?;
                self.values.insert(stmt.id, v);
            }
            StmtKind::ElementShuffle(op) => {
                // scalar values only; wider shuffles need the lane-aware
                // backend representation
                if op.elements.len() != 1 || op.elements[0].index != 0 {
                    return Err(EvalError::Unsupported {
                        kind: stmt.kind_name(),
                        stmt: stmt.id,
                    });
                }
                let v = *self
                    .values
                    .get(&op.elements[0].stmt)
                    .ok_or(EvalError::Undefined {
                        stmt: op.elements[0].stmt,
                    })?;
                self.values.insert(stmt.id, v);
            }
            StmtKind::PragmaSlp(_) => {}
            StmtKind::StackAlloca(op) => {
                self.stacks.insert(stmt.id, AdStack::new(op.max_size));
            }
            StmtKind::StackPush(op) => {
                let primal = self.f64_operand(op.v)?;
                let stack = self.stack_mut(op.stack)?;
                if !stack.push(primal) {
                    let max_size = stack.max_size;
                    return Err(EvalError::StackOverflow {
                        stmt: stmt.id,
                        stack: op.stack,
                        max_size,
                    });
                }
            }
            StmtKind::StackPop(op) => {
                let id = stmt.id;
                let stack = self.stack_mut(op.stack)?;
                if stack.pop().is_none() {
                    return Err(EvalError::EmptyStack {
                        kind: "stack_pop",
                        stmt: id,
                        stack: op.stack,
                    });
                }
            }
            StmtKind::StackLoadTop(op) => {
                let stack = self.stack_mut(op.stack)?;
                let (primal, _) = stack.top().ok_or(EvalError::EmptyStack {
                    kind: "stack_load_top",
                    stmt: stmt.id,
                    stack: op.stack,
                })?;
                self.values.insert(stmt.id, Value::Float(primal));
            }
            StmtKind::StackLoadTopAdjoint(op) => {
                let stack = self.stack_mut(op.stack)?;
                let (_, adjoint) = stack.top().ok_or(EvalError::EmptyStack {
                    kind: "stack_load_top_adjoint",
                    stmt: stmt.id,
                    stack: op.stack,
                })?;
                self.values.insert(stmt.id, Value::Float(adjoint));
            }
            StmtKind::StackAccAdjoint(op) => {
                let delta = self.f64_operand(op.v)?;
                let id = stmt.id;
                let stack = self.stack_mut(op.stack)?;
                if !stack.acc_adjoint(delta) {
                    return Err(EvalError::EmptyStack {
                        kind: "stack_acc_adjoint",
                        stmt: id,
                        stack: op.stack,
                    });
                }
            }
            StmtKind::GetRoot
            | StmtKind::SNodeLookup(_)
            | StmtKind::GetChild(_)
            | StmtKind::Offloaded(_)
            | StmtKind::InternalFuncCall(_) => {
                return Err(EvalError::Unsupported {
                    kind: stmt.kind_name(),
                    stmt: stmt.id,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IrBuilder;
    use crate::types::DataType;

    #[test]
    fn test_ad_stack_model() {
        let mut stack = AdStack::new(2);
        assert!(stack.is_empty());
        assert!(stack.push(1.0));
        assert!(stack.push(2.0));
        assert!(stack.is_full());
        assert!(!stack.push(3.0));
        assert_eq!(stack.top(), Some((2.0, 0.0)));
        assert!(stack.acc_adjoint(0.5));
        assert!(stack.acc_adjoint(0.25));
        assert_eq!(stack.top(), Some((2.0, 0.75)));
        assert_eq!(stack.pop(), Some((2.0, 0.75)));
        assert_eq!(stack.top(), Some((1.0, 0.0)));
    }

    #[test]
    fn test_growable_stack() {
        let mut stack = AdStack::new(0);
        for i in 0..1000 {
            assert!(stack.push(i as f64));
        }
        assert!(!stack.is_full());
    }

    #[test]
    fn test_linearize_fold() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let i = b.const_int(3, DataType::I32).unwrap();
        let j = b.const_int(5, DataType::I32).unwrap();
        let lin = b.linearize(vec![i, j], vec![16, 1]).unwrap();
        let block = b.end_block().unwrap();

        let mut ev = Evaluator::new();
        ev.run_block(&block).unwrap();
        assert_eq!(ev.value(lin), Some(Value::Int(3 * 16 + 5)));
    }

    #[test]
    fn test_bit_extract_fold() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let v = b.const_int(0b1101_0110, DataType::I32).unwrap();
        let x = b.offset_and_extract_bits(v, 2, 6, 0).unwrap();
        let block = b.end_block().unwrap();

        let mut ev = Evaluator::new();
        ev.run_block(&block).unwrap();
        assert_eq!(ev.value(x), Some(Value::Int((0b1101_0110 >> 2) & 0b1111)));
    }

    #[test]
    fn test_offset_arithmetic_wraps() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let v = b.const_int(i64::MAX, DataType::I64).unwrap();
        let off = b.integer_offset(v, 1).unwrap();
        let lin = b.linearize(vec![v, v], vec![2, 2]).unwrap();
        let block = b.end_block().unwrap();

        let mut ev = Evaluator::new();
        ev.run_block(&block).unwrap();
        assert_eq!(ev.value(off), Some(Value::Int(i64::MIN)));
        assert_eq!(ev.value(lin), Some(Value::Int(-4)));
    }

    #[test]
    fn test_bit_extract_full_width() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let v = b.const_int(-1, DataType::I64).unwrap();
        let whole = b.offset_and_extract_bits(v, 0, 64, 0).unwrap();
        let top = b.offset_and_extract_bits(v, 63, 64, 0).unwrap();
        let block = b.end_block().unwrap();

        let mut ev = Evaluator::new();
        ev.run_block(&block).unwrap();
        assert_eq!(ev.value(whole), Some(Value::Int(-1)));
        assert_eq!(ev.value(top), Some(Value::Int(1)));
    }

    #[test]
    fn test_loop_index_binding() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let i = b.loop_index(1, true).unwrap();
        let off = b.integer_offset(i, 10).unwrap();
        let block = b.end_block().unwrap();

        let mut ev = Evaluator::new();
        assert!(matches!(
            ev.run_block(&block),
            Err(EvalError::UnboundLoopIndex { index: 1 })
        ));

        let mut ev = Evaluator::new();
        ev.bind_loop_index(1, 7);
        ev.run_block(&block).unwrap();
        assert_eq!(ev.value(off), Some(Value::Int(17)));
    }

    #[test]
    fn test_global_temporary_binding() {
        let mut b = IrBuilder::new();
        b.begin_block();
        let tmp = b
            .global_temporary(16, crate::types::VectorType::scalar(DataType::I32))
            .unwrap();
        let off = b.integer_offset(tmp, 2).unwrap();
        let block = b.end_block().unwrap();

        let mut ev = Evaluator::new();
        assert!(matches!(
            ev.run_block(&block),
            Err(EvalError::UnboundTemporary { offset: 16 })
        ));

        let mut ev = Evaluator::new();
        ev.bind_temporary(16, Value::Int(40));
        ev.run_block(&block).unwrap();
        assert_eq!(ev.value(off), Some(Value::Int(42)));
    }

    #[test]
    fn test_lookup_is_not_constant() {
        let mut tree = crate::snode::SNodeTree::new();
        tree.add_node("root", crate::snode::SNodeKind::Root, vec![], None);
        let mut b = IrBuilder::new();
        b.begin_block();
        b.get_root(&tree).unwrap();
        let block = b.end_block().unwrap();

        let mut ev = Evaluator::new();
        assert!(matches!(
            ev.run_block(&block),
            Err(EvalError::Unsupported { kind: "get_root", .. })
        ));
    }
}
