//! Strata IR - typed statement IR for a sparse hierarchical tensor compiler
//!
//! The intermediate representation at the center of a compiler for
//! data-parallel tensor computations over tree-shaped, sparsely populated
//! storage, targeting multi-core CPUs and GPU-style accelerators. A
//! frontend lowers user programs into statement blocks; an offload pass
//! partitions them into dispatchable tasks; optimization passes and the
//! per-target code generators consume the result through the visitation
//! interface.
//!
//! # Architecture
//!
//! ```text
//! frontend -> Block of Stmt -> offload partitioning -> OffloadedTask*
//!          -> passes (CSE/DCE/...) -> codegen (CPU / GPU)
//! ```
//!
//! Three subsystems carry most of the weight:
//! - hierarchy addressing ([`ir::GetChild`], [`ir::SNodeLookup`],
//!   [`ir::Linearize`], [`ir::OffsetAndExtractBits`], ...): incremental
//!   physical-offset computation inside the [`snode`] schema tree;
//! - offloaded tasks ([`ir::OffloadedTask`]): the unit of parallel
//!   dispatch, with serial / range-for / struct-for bodies and the
//!   hierarchy maintenance kinds;
//! - the differentiation stack ([`ir::StackAlloca`] and companions):
//!   per-variable shadow stacks for reverse-mode gradient replay.
//!
//! # Example
//!
//! ```
//! use strata_ir::ir::{Arch, IrBuilder};
//! use strata_ir::snode::{AxisBits, SNodeKind, SNodeTree};
//!
//! let mut tree = SNodeTree::new();
//! let root = tree.add_node("root", SNodeKind::Root, vec![], None);
//! let grid = tree.add_node(
//!     "grid",
//!     SNodeKind::Pointer,
//!     vec![AxisBits::new(0, 4), AxisBits::new(1, 4)],
//!     None,
//! );
//! tree.add_child(root, grid);
//!
//! let mut b = IrBuilder::new();
//! b.begin_block();
//! b.struct_for_task(Arch::Cuda, grid, |b| {
//!     let i = b.loop_index(0, true)?;
//!     let j = b.loop_index(1, true)?;
//!     let lin = b.linearize(vec![i, j], vec![16, 1])?;
//!     let root_ref = b.get_root(&tree)?;
//!     b.snode_lookup(grid, root_ref, lin, true, vec![i, j])?;
//!     Ok(())
//! })
//! .unwrap();
//! let program = b.end_block().unwrap();
//! assert_eq!(program.len(), 1);
//! ```

pub mod error;
pub mod ir;
pub mod snode;
pub mod types;

pub use error::{EvalError, IrError};
pub use ir::{Block, IrBuilder, Stmt, StmtId, StmtKind};
pub use snode::{SNode, SNodeId, SNodeKind, SNodeTree};
pub use types::{DataType, VectorType};
