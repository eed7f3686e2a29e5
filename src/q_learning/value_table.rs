//! Square value table indexed by grid position.
//!
//! One score per cell, shared by every move that lands on it. The persisted
//! form is a JSON array of rows, `table[x][y]`, rows ordered by `x` and
//! columns by `y`.

use crate::{
    Result,
    error::Error,
    types::{Action, Position},
};

/// Grid of real-valued scores, `grid_size × grid_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    grid_size: usize,
    /// Row-major storage: `cells[x * grid_size + y]`
    cells: Vec<f64>,
}

impl ValueTable {
    /// Create a zero-filled table.
    pub fn zeros(grid_size: usize) -> Self {
        Self {
            grid_size,
            cells: vec![0.0; grid_size * grid_size],
        }
    }

    /// Build a table from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTable`] if there are no rows or the rows do
    /// not form a square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let grid_size = rows.len();
        if grid_size == 0 {
            return Err(Error::MalformedTable {
                message: "table has no rows".to_string(),
            });
        }

        let mut cells = Vec::with_capacity(grid_size * grid_size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != grid_size {
                return Err(Error::MalformedTable {
                    message: format!(
                        "row {i} has {} columns, expected {grid_size}",
                        row.len()
                    ),
                });
            }
            cells.extend(row);
        }

        Ok(Self { grid_size, cells })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Read the score stored at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfBounds`] if `pos` is off the grid.
    pub fn get(&self, pos: Position) -> Result<f64> {
        let index = self.index(pos)?;
        Ok(self.cells[index])
    }

    /// Overwrite the score stored at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfBounds`] if `pos` is off the grid.
    pub fn set(&mut self, pos: Position, value: f64) -> Result<()> {
        let index = self.index(pos)?;
        self.cells[index] = value;
        Ok(())
    }

    /// Best-scoring neighbour of `pos` that lies on the grid.
    ///
    /// Neighbours are visited in [`Action::ALL`] order starting from a best
    /// of [`f64::MIN`]; only a strictly greater score replaces the current
    /// best, so ties go to the earliest action. `None` when nothing beat the
    /// starting sentinel, which includes having no neighbour on the grid.
    pub fn best_neighbor(&self, pos: Position) -> Option<(Action, f64)> {
        let mut best_value = f64::MIN;
        let mut best_action = None;
        for action in Action::ALL {
            let Some(Ok(value)) = pos.checked_step(action).map(|next| self.get(next)) else {
                continue;
            };
            if value > best_value {
                best_value = value;
                best_action = Some(action);
            }
        }
        best_action.map(|action| (action, best_value))
    }

    /// Iterate over rows (`x`), each a slice of columns (`y`).
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.grid_size.max(1))
    }

    /// All scores in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    /// Encode as pretty-printed JSON rows.
    ///
    /// # Errors
    ///
    /// Fails if any score is NaN or infinite, which JSON cannot carry.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        if let Some(value) = self.cells.iter().find(|value| !value.is_finite()) {
            return Err(Error::SerializationContext {
                operation: "encode value table".to_string(),
                message: format!("non-finite score {value}"),
            });
        }

        let rows: Vec<&[f64]> = self.rows().collect();
        Ok(serde_json::to_vec_pretty(&rows)?)
    }

    /// Decode JSON rows produced by [`ValueTable::to_json`].
    ///
    /// The grid size is taken from the payload.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let rows: Vec<Vec<f64>> = serde_json::from_slice(bytes)?;
        Self::from_rows(rows)
    }

    fn index(&self, pos: Position) -> Result<usize> {
        if !pos.is_within(self.grid_size) {
            return Err(Error::PositionOutOfBounds {
                x: pos.x,
                y: pos.y,
                grid_size: self.grid_size,
            });
        }
        // Both coordinates are non-negative here.
        Ok(pos.x as usize * self.grid_size + pos.y as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let table = ValueTable::zeros(3);
        assert_eq!(table.grid_size(), 3);
        assert_eq!(table.values().len(), 9);
        assert!(table.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_set_get() {
        let mut table = ValueTable::zeros(4);
        table.set(Position::new(1, 3), 2.5).unwrap();
        assert_eq!(table.get(Position::new(1, 3)).unwrap(), 2.5);
        assert_eq!(table.get(Position::new(3, 1)).unwrap(), 0.0);
        // x selects the row
        assert_eq!(table.rows().nth(1).unwrap()[3], 2.5);
    }

    #[test]
    fn test_out_of_range_access_is_an_error() {
        let mut table = ValueTable::zeros(4);
        assert!(matches!(
            table.get(Position::new(4, 0)),
            Err(Error::PositionOutOfBounds { x: 4, y: 0, grid_size: 4 })
        ));
        assert!(table.set(Position::new(0, -1), 1.0).is_err());
        assert!(table.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_best_neighbor_prefers_highest() {
        let mut table = ValueTable::zeros(5);
        table.set(Position::new(3, 2), 4.0).unwrap();
        table.set(Position::new(2, 1), 1.0).unwrap();
        assert_eq!(
            table.best_neighbor(Position::new(2, 2)),
            Some((Action::Right, 4.0))
        );
    }

    #[test]
    fn test_best_neighbor_ties_go_to_enumeration_order() {
        let table = ValueTable::zeros(5);
        assert_eq!(
            table.best_neighbor(Position::new(2, 2)),
            Some((Action::Up, 0.0))
        );
        // Up is off the grid at y = 0, so Down is the first candidate
        assert_eq!(
            table.best_neighbor(Position::new(2, 0)),
            Some((Action::Down, 0.0))
        );
    }

    #[test]
    fn test_best_neighbor_none_on_single_cell() {
        let table = ValueTable::zeros(1);
        assert_eq!(table.best_neighbor(Position::new(0, 0)), None);
    }

    #[test]
    fn test_best_neighbor_at_coordinate_limits() {
        let table = ValueTable::zeros(5);
        assert_eq!(table.best_neighbor(Position::new(i32::MAX, i32::MAX)), None);
        assert_eq!(table.best_neighbor(Position::new(i32::MIN, 0)), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_empty() {
        assert!(ValueTable::from_rows(Vec::new()).is_err());
        assert!(ValueTable::from_rows(vec![vec![0.0, 1.0], vec![2.0]]).is_err());
        assert!(ValueTable::from_rows(vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_json_layout_is_rows_of_columns() {
        let mut table = ValueTable::zeros(2);
        table.set(Position::new(0, 1), 1.5).unwrap();
        table.set(Position::new(1, 0), -2.0).unwrap();

        let bytes = table.to_json().unwrap();
        let rows: Vec<Vec<f64>> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(rows, vec![vec![0.0, 1.5], vec![-2.0, 0.0]]);
    }

    #[test]
    fn test_to_json_rejects_non_finite() {
        let mut table = ValueTable::zeros(2);
        table.set(Position::new(0, 0), f64::INFINITY).unwrap();
        assert!(table.to_json().is_err());
    }
}
