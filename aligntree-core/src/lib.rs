//! aligntree core library
//!
//! Pairwise global alignment with a backward-scan affine gap cost, a tree of
//! every tied-optimal alignment, and text renderers for both.

pub mod error;
pub mod types;
pub mod grid;
pub mod scoring;
pub mod engine;
pub mod tree;
pub mod render;
pub mod io;

// Re-export commonly used types and functions
pub use engine::{Aligner, AlignmentGrids, Candidates, Direction};
pub use error::{AlignError, Result};
pub use io::FastaParser;
pub use render::{format_score, render_path_grid, render_score_grid, render_tree, write_tree};
pub use scoring::{GapModel, ScoreTable};
pub use tree::{Alignment, BoundaryPolicy, PathTree, TreeBuilder};
pub use types::{AlignedPair, Operation, PathFlags, Sequence};

/// Version information for the aligntree core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
