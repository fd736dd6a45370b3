//! Alignment engine
//!
//! Fills the score grid, the path bitmask grid and the two affine gap grids
//! for a pair of sequences. Every operation that attains a cell's best score
//! is recorded, so tied optima survive into the path tree.
//!
//! Affine gap costs come from a backward scan rather than a closed-form
//! recurrence: to price a gap ending at a reference cell, walk back along
//! the gap direction while the affine grid cell is unset, charging one
//! extension per cell, then add one opening cost. Row 0 and column 0 stop
//! the scan. A single scan is O(run length), so a fill is worse than
//! O(nm) in the worst case.

use crate::error::{AlignError, Result};
use crate::grid::{Grid, ScoreCell};
use crate::scoring::{GapModel, ScoreTable};
use crate::tree::Alignment;
use crate::types::{Operation, PathFlags, Sequence};

/// Axis a gap runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Consumes sequence A only (row index decreases on the way back)
    Vertical,
    /// Consumes sequence B only (column index decreases on the way back)
    Horizontal,
}

/// The three candidate scores of one interior cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidates {
    pub matched: f64,
    pub deleted: f64,
    pub inserted: f64,
}

impl Candidates {
    pub fn best(&self) -> f64 {
        self.matched.max(self.deleted).max(self.inserted)
    }

    /// Flags for every candidate exactly equal to the best score.
    pub fn flags(&self) -> PathFlags {
        let best = self.best();
        let mut flags = PathFlags::NONE;
        if self.matched == best {
            flags |= PathFlags::MATCH;
        }
        if self.inserted == best {
            flags |= PathFlags::INSERT;
        }
        if self.deleted == best {
            flags |= PathFlags::DELETE;
        }
        flags
    }
}

/// Output of one alignment run. Immutable once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentGrids {
    /// Best score for each prefix pair
    pub scores: Grid<ScoreCell>,
    /// Operations attaining each interior cell's best score
    pub paths: Grid<PathFlags>,
    /// Set where the optimum ends in a vertical gap ("X")
    pub deletions: Grid<ScoreCell>,
    /// Set where the optimum ends in a horizontal gap ("Y")
    pub insertions: Grid<ScoreCell>,
}

impl AlignmentGrids {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            scores: Grid::new(rows, cols),
            paths: Grid::new(rows, cols),
            deletions: Grid::new(rows, cols),
            insertions: Grid::new(rows, cols),
        }
    }

    /// Sequence lengths `(n, m)` the grids were built for
    pub fn dims(&self) -> (usize, usize) {
        (self.scores.rows() - 1, self.scores.cols() - 1)
    }

    /// Score at `(i, j)`; every cell is set once the fill has passed it.
    pub fn score(&self, i: usize, j: usize) -> f64 {
        self.scores.get(i, j).unwrap_or(f64::NEG_INFINITY)
    }

    /// Final optimal score, `Score[n][m]`
    pub fn best_score(&self) -> f64 {
        let (n, m) = self.dims();
        self.score(n, m)
    }

    /// Bitmask at `(i, j)`, empty outside the grid.
    pub fn path(&self, i: usize, j: usize) -> PathFlags {
        self.paths.try_get(i, j).copied().unwrap_or_default()
    }
}

/// Global aligner over a substitution table and a gap model.
#[derive(Debug, Clone)]
pub struct Aligner {
    table: ScoreTable,
    gaps: GapModel,
}

impl Aligner {
    pub fn new(table: ScoreTable, gaps: GapModel) -> Self {
        Self { table, gaps }
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn gap_model(&self) -> GapModel {
        self.gaps
    }

    /// Fill all grids for `a` (rows) against `b` (columns).
    pub fn align(&self, a: &Sequence, b: &Sequence) -> Result<AlignmentGrids> {
        self.gaps.validate()?;
        if a.is_empty() || b.is_empty() {
            return Err(AlignError::EmptyInput(format!(
                "cannot align zero-length sequence ('{}' has {} residues, '{}' has {})",
                a.id,
                a.len(),
                b.id,
                b.len()
            )));
        }

        let (n, m) = (a.len(), b.len());
        log::debug!("Filling {}x{} alignment grids for '{}' vs '{}'", n + 1, m + 1, a.id, b.id);

        let mut grids = AlignmentGrids::new(n + 1, m + 1);
        self.init_boundaries(&mut grids, n, m);

        for i in 1..=n {
            for j in 1..=m {
                let candidates = self.candidates(&grids, a, b, i, j)?;
                let best = candidates.best();
                let flags = candidates.flags();

                if flags.contains(PathFlags::DELETE) {
                    grids.deletions.set(i, j, Some(best));
                }
                if flags.contains(PathFlags::INSERT) {
                    grids.insertions.set(i, j, Some(best));
                }
                grids.scores.set(i, j, Some(best));
                grids.paths.set(i, j, flags);

                log::trace!("cell ({}, {}) = {} {:?}", i, j, best, candidates);
            }
        }

        log::debug!("Best score: {}", grids.best_score());
        Ok(grids)
    }

    /// Candidate scores for interior cell `(i, j)`, reading only cells the
    /// fill has already completed.
    pub fn candidates(
        &self,
        grids: &AlignmentGrids,
        a: &Sequence,
        b: &Sequence,
        i: usize,
        j: usize,
    ) -> Result<Candidates> {
        let substitution = self.table.score(a.symbol(i), b.symbol(j))?;
        Ok(Candidates {
            matched: grids.score(i - 1, j - 1) + f64::from(substitution),
            deleted: grids.score(i - 1, j) + self.gap_cost(&grids.deletions, i - 1, j, Direction::Vertical),
            inserted: grids.score(i, j - 1) + self.gap_cost(&grids.insertions, i, j - 1, Direction::Horizontal),
        })
    }

    /// Cost of a gap of `direction` ending at `(row, col)`, priced against
    /// the matching affine grid.
    pub fn gap_cost(&self, affine: &Grid<ScoreCell>, row: usize, col: usize, direction: Direction) -> f64 {
        match self.gaps {
            GapModel::Affine { open, extend } => {
                let run = unset_run(affine, row, col, direction);
                f64::from(open) + f64::from(extend) * run as f64
            }
            GapModel::Linear { penalty } => f64::from(penalty),
        }
    }

    /// Row 0 and column 0 hold pure-gap costs. Affine runs are priced against
    /// the still-pristine gap grids, then written in one pass.
    fn init_boundaries(&self, grids: &mut AlignmentGrids, n: usize, m: usize) {
        grids.scores.set(0, 0, Some(0.0));

        let column: Vec<f64> = (1..=n)
            .map(|i| self.boundary_cost(&grids.deletions, i, 0, i, Direction::Vertical))
            .collect();
        let row: Vec<f64> = (1..=m)
            .map(|j| self.boundary_cost(&grids.insertions, 0, j, j, Direction::Horizontal))
            .collect();

        for (i, cost) in (1..=n).zip(column) {
            grids.scores.set(i, 0, Some(cost));
            grids.deletions.set(i, 0, Some(cost));
        }
        for (j, cost) in (1..=m).zip(row) {
            grids.scores.set(0, j, Some(cost));
            grids.insertions.set(0, j, Some(cost));
        }
    }

    fn boundary_cost(&self, affine: &Grid<ScoreCell>, row: usize, col: usize, length: usize, direction: Direction) -> f64 {
        match self.gaps {
            GapModel::Affine { .. } => {
                let (r, c) = match direction {
                    Direction::Vertical => (row - 1, col),
                    Direction::Horizontal => (row, col - 1),
                };
                self.gap_cost(affine, r, c, direction)
            }
            GapModel::Linear { penalty } => f64::from(penalty) * length as f64,
        }
    }

    /// Contribution of the final `operation` of a path ending at `(x, y)`.
    pub fn step_score(&self, grids: &AlignmentGrids, a: &Sequence, b: &Sequence, operation: Operation, x: usize, y: usize) -> Result<f64> {
        let score = match operation {
            Operation::Match => f64::from(self.table.score(a.symbol(x), b.symbol(y))?),
            Operation::Delete if y == 0 => grids.score(x, 0) - grids.score(x - 1, 0),
            Operation::Delete => self.gap_cost(&grids.deletions, x - 1, y, Direction::Vertical),
            Operation::Insert if x == 0 => grids.score(0, y) - grids.score(0, y - 1),
            Operation::Insert => self.gap_cost(&grids.insertions, x, y - 1, Direction::Horizontal),
        };
        Ok(score)
    }

    /// Re-score an alignment step by step, walking back from `(n, m)`.
    pub fn score_alignment(&self, grids: &AlignmentGrids, a: &Sequence, b: &Sequence, alignment: &Alignment) -> Result<f64> {
        let (mut x, mut y) = grids.dims();
        let mut total = 0.0;
        for &operation in alignment.operations.iter().rev() {
            total += self.step_score(grids, a, b, operation, x, y)?;
            match operation {
                Operation::Match => {
                    x -= 1;
                    y -= 1;
                }
                Operation::Insert => y -= 1,
                Operation::Delete => x -= 1,
            }
        }
        Ok(total)
    }
}

/// Count consecutive unset cells from `(row, col)` back towards the
/// boundary along `direction`.
fn unset_run(affine: &Grid<ScoreCell>, row: usize, col: usize, direction: Direction) -> usize {
    let (mut r, mut c) = (row, col);
    let mut run = 0;
    loop {
        let index = match direction {
            Direction::Vertical => r,
            Direction::Horizontal => c,
        };
        if index == 0 || affine.is_set(r, c) {
            return run;
        }
        run += 1;
        match direction {
            Direction::Vertical => r -= 1,
            Direction::Horizontal => c -= 1,
        }
    }
}
