//! Sparse hierarchy schema (SNode tree)
//!
//! The storage layout of a tensor is described by a tree of SNodes: each
//! level either fans out into a fixed grid (`Dense`), materializes children
//! lazily (`Pointer`, `Dynamic`, `Bitmasked`), or holds a scalar value
//! (`Place`). Logical indices are bit-packed per level: every level owns a
//! slice of bits of each axis's index word, declared by its
//! [`AxisBits`] layout.
//!
//! The schema is constructed once, before any IR references it, and is
//! read-only from the IR's perspective. Statements refer to nodes by
//! [`SNodeId`]; the [`SNodeTree`] arena owns the nodes themselves.
//!
//! # Lazy materialization
//!
//! Sparse node kinds allocate backing storage for an element on first
//! declared access ("activation"). Activation is the one side-effect
//! channel of hierarchy addressing: an activating lookup may allocate,
//! and the maintenance task kinds (`clear_list` / `listgen` / `gc`)
//! rebuild or reclaim the per-node element lists that activation feeds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use rustc_hash::FxHashMap;
use std::fmt;

use crate::types::DataType;

/// Non-owning reference to a node in the schema tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SNodeId(pub u32);

impl fmt::Display for SNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Storage behavior of one hierarchy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SNodeKind {
    /// The single tree root
    Root,
    /// Fixed-extent grid, always materialized
    Dense,
    /// One pointer per cell, children allocated on activation
    Pointer,
    /// Variable-length list along the last axis
    Dynamic,
    /// Dense storage with an activity bitmask
    Bitmasked,
    /// Leaf holding one scalar element
    Place,
}

impl SNodeKind {
    /// Whether elements of this level are lazily materialized
    pub fn is_sparse(&self) -> bool {
        matches!(
            self,
            SNodeKind::Pointer | SNodeKind::Dynamic | SNodeKind::Bitmasked
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            SNodeKind::Root => "root",
            SNodeKind::Dense => "dense",
            SNodeKind::Pointer => "pointer",
            SNodeKind::Dynamic => "dynamic",
            SNodeKind::Bitmasked => "bitmasked",
            SNodeKind::Place => "place",
        }
    }
}

impl fmt::Display for SNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bit slice one level owns of one axis's packed index word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisBits {
    pub axis: usize,
    pub bits: u32,
}

impl AxisBits {
    pub fn new(axis: usize, bits: u32) -> Self {
        Self { axis, bits }
    }

    /// Number of cells this axis contributes at this level
    pub fn extent(&self) -> usize {
        1usize << self.bits
    }
}

/// One level of the sparse hierarchy schema
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SNode {
    pub id: SNodeId,
    pub name: String,
    pub kind: SNodeKind,
    /// Per-axis bit layout of the packed index word at this level
    pub bit_layout: Vec<AxisBits>,
    pub children: Vec<SNodeId>,
    /// Element type, set for `Place` leaves
    pub dt: Option<DataType>,
}

impl SNode {
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Total bits of the packed index word at this level
    pub fn total_bits(&self) -> u32 {
        self.bit_layout.iter().map(|a| a.bits).sum()
    }

    /// Cells per element of this level (product of axis extents)
    pub fn cell_count(&self) -> usize {
        1usize << self.total_bits()
    }

    /// Bits this level owns of `axis`, 0 if the axis is not indexed here
    pub fn bits_on_axis(&self, axis: usize) -> u32 {
        self.bit_layout
            .iter()
            .find(|a| a.axis == axis)
            .map(|a| a.bits)
            .unwrap_or(0)
    }
}

/// Arena owning the whole schema tree
///
/// Node ids are dense indices into the arena, so lookups are O(1) and ids
/// stay valid for the life of the tree.
#[derive(Debug, Default)]
pub struct SNodeTree {
    nodes: Vec<SNode>,
    by_name: FxHashMap<String, SNodeId>,
}

impl SNodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; the first node added becomes the root.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        kind: SNodeKind,
        bit_layout: Vec<AxisBits>,
        dt: Option<DataType>,
    ) -> SNodeId {
        let id = SNodeId(self.nodes.len() as u32);
        let name = name.into();
        self.by_name.insert(name.clone(), id);
        self.nodes.push(SNode {
            id,
            name,
            kind,
            bit_layout,
            children: Vec::new(),
            dt,
        });
        id
    }

    /// Attach `child` under `parent`, returning the child slot index.
    pub fn add_child(&mut self, parent: SNodeId, child: SNodeId) -> usize {
        let node = &mut self.nodes[parent.0 as usize];
        node.children.push(child);
        node.children.len() - 1
    }

    pub fn root(&self) -> Option<&SNode> {
        self.nodes.first()
    }

    pub fn get(&self, id: SNodeId) -> Option<&SNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&SNode> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    /// Child of `parent` at slot `chid`
    pub fn child(&self, parent: SNodeId, chid: usize) -> Option<&SNode> {
        let parent = self.get(parent)?;
        let id = *parent.children.get(chid)?;
        self.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
