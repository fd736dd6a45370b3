//! Dense row-major grids shaped (n+1)×(m+1).

/// A score cell: `None` until the engine assigns it.
pub type ScoreCell = Option<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::default(); rows * cols],
            rows,
            cols,
        }
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.cols + col]
    }

    /// Like [`Grid::get`] but `None` outside the grid.
    pub fn try_get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            Some(self.get(row, col))
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.cols.max(1))
    }
}

impl Grid<ScoreCell> {
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_defaults_unset() {
        let grid: Grid<ScoreCell> = Grid::new(3, 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert!(!grid.is_set(2, 3));
    }

    #[test]
    fn test_grid_set_and_rows() {
        let mut grid: Grid<ScoreCell> = Grid::new(2, 2);
        grid.set(1, 0, Some(-3.0));
        assert_eq!(*grid.get(1, 0), Some(-3.0));
        let rows: Vec<&[ScoreCell]> = grid.iter_rows().collect();
        assert_eq!(rows, vec![&[None, None][..], &[Some(-3.0), None][..]]);
        assert!(grid.try_get(2, 0).is_none());
    }
}
