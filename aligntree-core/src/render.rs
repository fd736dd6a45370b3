//! Text renderers for the path tree and the diagnostic grids.

use std::fmt::{self, Write};

use crate::grid::{Grid, ScoreCell};
use crate::tree::{NodeId, PathTree};
use crate::types::{Operation, PathFlags};

/// Marker printed on the root line in place of an operation
const ROOT_MARKER: &str = "  *";
const CONTINUATION: &str = "   |";
const PADDING: &str = "    ";

/// Display adapter writing a tree through [`write_tree`].
pub struct DisplayTree<'a>(pub &'a PathTree);

impl fmt::Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(self.0, f)
    }
}

/// Render the tree, one line per node.
pub fn render_tree(tree: &PathTree) -> String {
    DisplayTree(tree).to_string()
}

/// Write the tree as `<prefix> <op> <a>/<b>` lines.
///
/// Children are visited match, insert, delete. A child's prefix gains a
/// continuation bar when its slot number (1, 2, 3) is below the number of
/// populated slots of its parent, and blank padding otherwise.
pub fn write_tree<W: Write>(tree: &PathTree, out: &mut W) -> fmt::Result {
    writeln!(out, "{} {} {}", "", ROOT_MARKER, "")?;

    let mut stack: Vec<(NodeId, String)> = Vec::new();
    push_children(tree, PathTree::ROOT, "", &mut stack);

    while let Some((id, prefix)) = stack.pop() {
        let node = tree.node(id);
        if let (Some(pair), Some(operation)) = (node.pair, node.operation) {
            writeln!(out, "{} {} {}", prefix, operation.glyph(), pair)?;
        }
        push_children(tree, id, &prefix, &mut stack);
    }
    Ok(())
}

fn push_children(tree: &PathTree, id: NodeId, prefix: &str, stack: &mut Vec<(NodeId, String)>) {
    let node = tree.node(id);
    let populated = node.child_count();
    for operation in Operation::ALL.iter().rev() {
        if let Some(child) = node.child(*operation) {
            let index = operation.slot() + 1;
            let segment = if index >= populated { PADDING } else { CONTINUATION };
            stack.push((child, format!("{}{}", prefix, segment)));
        }
    }
}

struct DisplayGrid<'a, T, F> {
    grid: &'a Grid<T>,
    value: F,
}

impl<T, F> fmt::Display for DisplayGrid<'_, T, F>
where
    F: Fn(usize, usize, &T) -> Option<f64>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(self.grid, &self.value, f)
    }
}

/// Render a score grid; unset cells print as `nan`.
pub fn render_score_grid(grid: &Grid<ScoreCell>) -> String {
    DisplayGrid {
        grid,
        value: |_: usize, _: usize, cell: &ScoreCell| *cell,
    }
    .to_string()
}

/// Render a path grid; row 0 and column 0 are never assigned and print as `nan`.
pub fn render_path_grid(grid: &Grid<PathFlags>) -> String {
    DisplayGrid {
        grid,
        value: |i: usize, j: usize, flags: &PathFlags| {
            if i > 0 && j > 0 {
                Some(f64::from(flags.bits()))
            } else {
                None
            }
        },
    }
    .to_string()
}

/// Write a grid as bracketed, right-aligned rows.
fn write_grid<T, F, W>(grid: &Grid<T>, value: F, out: &mut W) -> fmt::Result
where
    F: Fn(usize, usize, &T) -> Option<f64>,
    W: Write,
{
    let cells: Vec<Vec<String>> = grid
        .iter_rows()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, cell)| format_cell(value(i, j, cell)))
                .collect()
        })
        .collect();
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(0);

    for (i, row) in cells.iter().enumerate() {
        let opener = if i == 0 { "[[" } else { " [" };
        let closer = if i + 1 == cells.len() { "]]" } else { "]" };
        let body: Vec<String> = row.iter().map(|c| format!("{:>width$}", c, width = width)).collect();
        writeln!(out, "{}{}{}", opener, body.join(" "), closer)?;
    }
    Ok(())
}

fn format_cell(value: Option<f64>) -> String {
    match value {
        None => "nan".to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
    }
}

/// Format a score the way the driver reports it: integral values without a
/// fractional part.
pub fn format_score(score: f64) -> String {
    format_cell(Some(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Aligner;
    use crate::scoring::{GapModel, ScoreTable};
    use crate::tree::TreeBuilder;
    use crate::types::Sequence;

    fn tree_for(a: &[u8], b: &[u8], gaps: GapModel) -> PathTree {
        let a = Sequence::new("a", a).unwrap();
        let b = Sequence::new("b", b).unwrap();
        let grids = Aligner::new(ScoreTable::identity(b"ACGT", 1, -1), gaps)
            .align(&a, &b)
            .unwrap();
        TreeBuilder::default().build(&grids, &a, &b).unwrap()
    }

    #[test]
    fn test_render_single_path() {
        let tree = tree_for(b"AC", b"AC", GapModel::default());
        let expected = "   * \n     = C/C\n         = A/A\n";
        assert_eq!(render_tree(&tree), expected);
    }

    #[test]
    fn test_render_branching_padding() {
        // Root has match and insert children: the match slot (1) is below
        // the two populated slots and gets a bar, the insert slot (2) does not.
        let tree = tree_for(b"A", b"AA", GapModel::Linear { penalty: -3 });
        let expected = concat!(
            "   * \n",
            "   | = A/A\n",
            "   |     + -/A\n",
            "     + -/A\n",
            "         = A/A\n",
        );
        assert_eq!(render_tree(&tree), expected);
    }

    #[test]
    fn test_render_match_and_delete_children() {
        // Delete sits in slot 3, which is never below the populated count.
        let tree = tree_for(b"AA", b"A", GapModel::Linear { penalty: -3 });
        let expected = concat!(
            "   * \n",
            "   | = A/A\n",
            "   |     - A/-\n",
            "     - A/-\n",
            "         = A/A\n",
        );
        assert_eq!(render_tree(&tree), expected);
    }

    #[test]
    fn test_render_insert_and_delete_without_match() {
        // The insert child is slot 2 of two populated slots: padded, not barred,
        // even though the delete sibling follows it.
        let tree = tree_for(b"AC", b"CA", GapModel::Linear { penalty: -1 });
        assert!(tree.root().child(Operation::Match).is_none());
        let expected = concat!(
            "   * \n",
            "     + -/A\n",
            "         = C/C\n",
            "             - A/-\n",
            "     - C/-\n",
            "         = A/A\n",
            "             + -/C\n",
        );
        assert_eq!(render_tree(&tree), expected);
    }

    #[test]
    fn test_render_expands_shared_cell_under_each_parent() {
        // Both branches reach (1, 1); each gets its own copy of the A/A step.
        let tree = tree_for(b"AA", b"ACC", GapModel::Linear { penalty: -3 });
        let expected = concat!(
            "   * \n",
            "   | = A/C\n",
            "   |     + -/C\n",
            "   |         = A/A\n",
            "     + -/C\n",
            "         = A/C\n",
            "             = A/A\n",
        );
        assert_eq!(render_tree(&tree), expected);
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn test_display_tree_matches_render() {
        let tree = tree_for(b"AC", b"AC", GapModel::default());
        assert_eq!(format!("{}", DisplayTree(&tree)), render_tree(&tree));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render_tree(&tree_for(b"ACGT", b"AGT", GapModel::default()));
        let second = render_tree(&tree_for(b"ACGT", b"AGT", GapModel::default()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_score_grid() {
        let mut grid: Grid<ScoreCell> = Grid::new(2, 2);
        grid.set(0, 0, Some(0.0));
        grid.set(0, 1, Some(-3.0));
        grid.set(1, 1, Some(1.5));
        assert_eq!(render_score_grid(&grid), "[[  0  -3]\n [nan 1.5]]\n");
    }

    #[test]
    fn test_render_path_grid_masks_boundary() {
        let mut grid: Grid<PathFlags> = Grid::new(2, 2);
        grid.set(1, 1, PathFlags::MATCH | PathFlags::INSERT);
        assert_eq!(render_path_grid(&grid), "[[nan nan]\n [nan   6]]\n");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(-4.0), "-4");
        assert_eq!(format_score(2.5), "2.5");
    }
}
