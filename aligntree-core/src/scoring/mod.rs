//! Substitution scores and gap models
//!
//! A [`ScoreTable`] prices one aligned symbol pair; a [`GapModel`] prices
//! gaps. Tables can be built in code or loaded with the parsers in
//! [`matrix`].

pub mod matrix;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::{AlignError, Result};
use crate::types::Symbol;

pub const DEFAULT_GAP_OPEN: i32 = -3;
pub const DEFAULT_GAP_EXTEND: i32 = -1;
pub const DEFAULT_LINEAR_GAP: i32 = -3;

/// Mapping from a symbol pair to its substitution score.
///
/// Pairs are stored as given; lookups try both orderings, so a half matrix
/// is enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    scores: HashMap<(Symbol, Symbol), i32>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table scoring `match_score` for equal symbols and `mismatch_score`
    /// for every other pair drawn from `alphabet`.
    pub fn identity(alphabet: &[Symbol], match_score: i32, mismatch_score: i32) -> Self {
        let mut table = Self::new();
        for &a in alphabet {
            for &b in alphabet {
                let score = if a == b { match_score } else { mismatch_score };
                table.insert(a, b, score);
            }
        }
        table
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = ((Symbol, Symbol), i32)>,
    {
        Self {
            scores: pairs.into_iter().collect(),
        }
    }

    /// Load a table file, choosing the parser from its first meaningful
    /// character: `{` selects the dictionary literal, anything else the
    /// NCBI matrix layout.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loading score table from {}", path.as_ref().display());
        matrix::parse_table(&content)
    }

    pub fn insert(&mut self, a: Symbol, b: Symbol, score: i32) -> Option<i32> {
        self.scores.insert((a, b), score)
    }

    pub fn get(&self, a: Symbol, b: Symbol) -> Option<i32> {
        self.scores
            .get(&(a, b))
            .or_else(|| self.scores.get(&(b, a)))
            .copied()
    }

    /// Score of aligning `a` against `b`, trying both orderings.
    pub fn score(&self, a: Symbol, b: Symbol) -> Result<i32> {
        self.get(a, b).ok_or(AlignError::MissingScore { a, b })
    }

    /// First pair from `a_symbols × b_symbols` with no score, if any.
    pub fn first_missing(&self, a_symbols: &[Symbol], b_symbols: &[Symbol]) -> Option<(Symbol, Symbol)> {
        let a_set: BTreeSet<Symbol> = a_symbols.iter().copied().collect();
        let b_set: BTreeSet<Symbol> = b_symbols.iter().copied().collect();
        a_set
            .iter()
            .flat_map(|&a| b_set.iter().map(move |&b| (a, b)))
            .find(|&(a, b)| self.get(a, b).is_none())
    }

    /// Every symbol mentioned by the table, sorted.
    pub fn symbols(&self) -> Vec<Symbol> {
        let set: BTreeSet<Symbol> = self.scores.keys().flat_map(|&(a, b)| [a, b]).collect();
        set.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// How gaps are priced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum GapModel {
    /// Opening cost plus one extension per unset cell found by the
    /// backward scan.
    Affine { open: i32, extend: i32 },
    /// One flat penalty per gap position.
    Linear { penalty: i32 },
}

impl Default for GapModel {
    fn default() -> Self {
        GapModel::Affine {
            open: DEFAULT_GAP_OPEN,
            extend: DEFAULT_GAP_EXTEND,
        }
    }
}

impl GapModel {
    pub fn affine(open: i32, extend: i32) -> Result<Self> {
        let model = GapModel::Affine { open, extend };
        model.validate()?;
        Ok(model)
    }

    pub fn linear(penalty: i32) -> Result<Self> {
        let model = GapModel::Linear { penalty };
        model.validate()?;
        Ok(model)
    }

    /// Penalties must not be positive, otherwise row 0 and column 0 would
    /// stop being non-increasing.
    pub fn validate(&self) -> Result<()> {
        match *self {
            GapModel::Affine { open, extend } => {
                if open > 0 || extend > 0 {
                    return Err(AlignError::InvalidParams(format!(
                        "gap penalties must be <= 0, got open={} extend={}",
                        open, extend
                    )));
                }
            }
            GapModel::Linear { penalty } => {
                if penalty > 0 {
                    return Err(AlignError::InvalidParams(format!(
                        "gap penalty must be <= 0, got {}",
                        penalty
                    )));
                }
            }
        }
        Ok(())
    }
}
