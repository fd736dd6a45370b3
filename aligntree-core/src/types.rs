use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::error::{AlignError, Result};

/// One character of the sequence alphabet
pub type Symbol = u8;

/// Marker paired with a residue when the other sequence has a gap
pub const GAP: Symbol = b'-';

/// Placeholder occupying index 0 of every sequence
pub const SENTINEL: Symbol = b'0';

/// An immutable residue sequence, indexed from 1 like a grid row or column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    symbols: Vec<Symbol>,
}

impl Sequence {
    /// Build a sequence, rejecting the reserved gap and sentinel symbols.
    pub fn new(id: impl Into<String>, residues: &[Symbol]) -> Result<Self> {
        let id = id.into();
        if let Some(position) = residues.iter().position(|&s| s == GAP || s == SENTINEL) {
            return Err(AlignError::ReservedSymbol {
                id,
                symbol: residues[position],
                position: position + 1,
            });
        }

        let mut symbols = Vec::with_capacity(residues.len() + 1);
        symbols.push(SENTINEL);
        symbols.extend_from_slice(residues);
        Ok(Self { id, symbols })
    }

    /// Number of residues, excluding the sentinel
    pub fn len(&self) -> usize {
        self.symbols.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbol at grid coordinate `i`; index 0 is the sentinel.
    pub fn symbol(&self, i: usize) -> Symbol {
        self.symbols[i]
    }

    pub fn residues(&self) -> &[Symbol] {
        &self.symbols[1..]
    }
}

/// Alignment step kinds, in the fixed order children are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Match,
    Insert,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Match, Operation::Insert, Operation::Delete];

    /// Child slot of this operation in a path-tree node
    pub fn slot(self) -> usize {
        match self {
            Operation::Match => 0,
            Operation::Insert => 1,
            Operation::Delete => 2,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Operation::Match => '=',
            Operation::Insert => '+',
            Operation::Delete => '-',
        }
    }

    pub fn flag(self) -> PathFlags {
        match self {
            Operation::Match => PathFlags::MATCH,
            Operation::Insert => PathFlags::INSERT,
            Operation::Delete => PathFlags::DELETE,
        }
    }
}

/// Set of operations attaining a cell's best score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PathFlags(u8);

impl PathFlags {
    pub const NONE: PathFlags = PathFlags(0);
    pub const MATCH: PathFlags = PathFlags(2);
    pub const INSERT: PathFlags = PathFlags(4);
    pub const DELETE: PathFlags = PathFlags(8);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: PathFlags) -> bool {
        self.0 & other.0 == other.0 && !other.is_empty()
    }

}

impl BitOr for PathFlags {
    type Output = PathFlags;

    fn bitor(self, rhs: PathFlags) -> PathFlags {
        PathFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for PathFlags {
    fn bitor_assign(&mut self, rhs: PathFlags) {
        self.0 |= rhs.0;
    }
}

/// The two symbols placed side by side by one alignment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlignedPair {
    pub a: Symbol,
    pub b: Symbol,
}

impl AlignedPair {
    pub fn new(a: Symbol, b: Symbol) -> Self {
        Self { a, b }
    }
}

impl fmt::Display for AlignedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.a as char, self.b as char)
    }
}
