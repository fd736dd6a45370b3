//! Path-tree reconstruction
//!
//! Walks the path bitmask grid back from `(n, m)` and records every tied
//! optimal alignment as a branch. Coordinates reached through different ties
//! are expanded separately under each parent: nothing is shared, so the
//! tree's branching mirrors the ties exactly.
//!
//! Nodes live in an arena and each parent owns its children by index. The
//! walk uses an explicit stack, and a node budget bounds the combinatorial
//! worst case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::AlignmentGrids;
use crate::error::{AlignError, Result};
use crate::types::{AlignedPair, Operation, Sequence, GAP};

pub const DEFAULT_MAX_NODES: usize = 1_000_000;

pub type NodeId = usize;

/// What to do at row 0 / column 0, where the bitmask is never set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Keep consuming the remaining residues against gaps until `(0, 0)`.
    #[default]
    Exhaust,
    /// Emit one gap step and stop; the branch ends early.
    SingleStep,
}

impl FromStr for BoundaryPolicy {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exhaust" => Ok(BoundaryPolicy::Exhaust),
            "single-step" => Ok(BoundaryPolicy::SingleStep),
            other => Err(AlignError::InvalidParams(format!(
                "unknown boundary policy '{}' (expected exhaust or single-step)",
                other
            ))),
        }
    }
}

/// One step of an alignment, owning up to three children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    /// `None` only for the root placeholder
    pub pair: Option<AlignedPair>,
    pub operation: Option<Operation>,
    /// Indexed by [`Operation::slot`]: match, insert, delete
    pub children: [Option<NodeId>; 3],
}

impl PathNode {
    fn root() -> Self {
        Self {
            pair: None,
            operation: None,
            children: [None; 3],
        }
    }

    pub fn child(&self, operation: Operation) -> Option<NodeId> {
        self.children[operation.slot()]
    }

    pub fn child_count(&self) -> usize {
        self.children.iter().flatten().count()
    }

    pub fn is_leaf(&self) -> bool {
        self.child_count() == 0
    }
}

/// Tree of every score-optimal alignment; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTree {
    nodes: Vec<PathNode>,
}

impl PathTree {
    pub const ROOT: NodeId = 0;

    pub fn root(&self) -> &PathNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id]
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Every root-to-leaf path as a left-to-right alignment, in
    /// match/insert/delete branch order.
    pub fn alignments(&self) -> Vec<Alignment> {
        let mut alignments = Vec::new();
        let mut steps: Vec<(AlignedPair, Operation)> = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = vec![(Self::ROOT, 0)];

        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            steps.truncate(depth);
            if let (Some(pair), Some(operation)) = (node.pair, node.operation) {
                steps.push((pair, operation));
            }

            if node.is_leaf() {
                alignments.push(Alignment::from_steps(steps.iter().rev()));
                continue;
            }
            for child in node.children.iter().rev().flatten() {
                stack.push((*child, steps.len()));
            }
        }
        alignments
    }
}

/// One complete alignment read left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub aligned_a: String,
    pub aligned_b: String,
    pub operations: Vec<Operation>,
}

impl Alignment {
    fn from_steps<'a, I>(steps: I) -> Self
    where
        I: Iterator<Item = &'a (AlignedPair, Operation)>,
    {
        let mut alignment = Alignment {
            aligned_a: String::new(),
            aligned_b: String::new(),
            operations: Vec::new(),
        };
        for (pair, operation) in steps {
            alignment.aligned_a.push(pair.a as char);
            alignment.aligned_b.push(pair.b as char);
            alignment.operations.push(*operation);
        }
        alignment
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Residues of A with gap markers removed
    pub fn ungapped_a(&self) -> String {
        self.aligned_a.chars().filter(|&c| c != GAP as char).collect()
    }

    pub fn ungapped_b(&self) -> String {
        self.aligned_b.chars().filter(|&c| c != GAP as char).collect()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.aligned_a)?;
        write!(f, "{}", self.aligned_b)
    }
}

/// Builds a [`PathTree`] from completed alignment grids.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    pub boundary: BoundaryPolicy,
    pub max_nodes: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            boundary: BoundaryPolicy::Exhaust,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl TreeBuilder {
    pub fn new(boundary: BoundaryPolicy, max_nodes: usize) -> Self {
        Self { boundary, max_nodes }
    }

    pub fn build(&self, grids: &AlignmentGrids, a: &Sequence, b: &Sequence) -> Result<PathTree> {
        let (n, m) = grids.dims();
        let mut tree = PathTree {
            nodes: vec![PathNode::root()],
        };
        let mut stack: Vec<(NodeId, usize, usize)> = vec![(PathTree::ROOT, n, m)];

        while let Some((parent, x, y)) = stack.pop() {
            let mask = grids.path(x, y);
            let boundary = mask.is_empty();
            let expand = !boundary || self.boundary == BoundaryPolicy::Exhaust;

            for operation in Operation::ALL {
                let boundary_default = boundary
                    && match operation {
                        Operation::Match => false,
                        Operation::Insert => y > 0,
                        Operation::Delete => x > 0,
                    };
                if !mask.contains(operation.flag()) && !boundary_default {
                    continue;
                }

                let (pair, next) = match operation {
                    Operation::Match => (AlignedPair::new(a.symbol(x), b.symbol(y)), (x - 1, y - 1)),
                    Operation::Insert => (AlignedPair::new(GAP, b.symbol(y)), (x, y - 1)),
                    Operation::Delete => (AlignedPair::new(a.symbol(x), GAP), (x - 1, y)),
                };
                let child = self.attach(&mut tree, parent, operation, pair)?;
                if expand {
                    stack.push((child, next.0, next.1));
                }
            }
        }

        log::debug!("Built path tree with {} nodes and {} leaves", tree.len(), tree.leaf_count());
        Ok(tree)
    }

    fn attach(&self, tree: &mut PathTree, parent: NodeId, operation: Operation, pair: AlignedPair) -> Result<NodeId> {
        if tree.nodes.len() >= self.max_nodes {
            return Err(AlignError::TreeLimitExceeded { limit: self.max_nodes });
        }
        let id = tree.nodes.len();
        tree.nodes.push(PathNode {
            pair: Some(pair),
            operation: Some(operation),
            children: [None; 3],
        });
        tree.nodes[parent].children[operation.slot()] = Some(id);
        Ok(id)
    }
}
