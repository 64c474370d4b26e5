//! Grid positions and boolean occupancy grids

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::{ForageError, Result};

/// A cell on the grid. `x` grows eastwards, `y` grows northwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell reached by applying `action`'s direction vector
    pub const fn step(self, action: Action) -> Self {
        let (dx, dy) = action.vector();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A `width x height` grid of booleans, used for both food and walls.
///
/// Reads outside the grid return `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Create a grid from cells stored column by column (`x * height + y`)
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        if cells.len() != width * height {
            return Err(ForageError::Grid(format!(
                "expected {} cells for a {width}x{height} grid, got {}",
                width * height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Create a grid with the given positions set
    pub fn from_positions<I>(width: usize, height: usize, positions: I) -> Result<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut grid = Self::new(width, height);
        for pos in positions {
            grid.set(pos, true)?;
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.x as usize * self.height + pos.y as usize)
    }

    pub fn get(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|idx| self.cells[idx])
    }

    pub fn set(&mut self, pos: Position, value: bool) -> Result<()> {
        let idx = self.index(pos).ok_or_else(|| {
            ForageError::Grid(format!(
                "position {pos} outside {}x{} grid",
                self.width, self.height
            ))
        })?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Number of set cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate over set cells, column by column
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(move |(idx, _)| {
                Position::new((idx / self.height) as i32, (idx % self.height) as i32)
            })
    }

    /// Cells reachable from `pos` in one move when `self` is the wall grid.
    ///
    /// Includes `pos` itself (the Stop move) and follows `Action::ALL` order.
    pub fn legal_neighbors(&self, pos: Position) -> Vec<Position> {
        Action::ALL
            .iter()
            .map(|&action| pos.step(action))
            .filter(|&next| self.contains(next) && !self.get(next))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_get_set() {
        let mut grid = Grid::new(3, 2);
        assert!(!grid.get(Position::new(1, 1)));
        grid.set(Position::new(1, 1), true).unwrap();
        assert!(grid.get(Position::new(1, 1)));
        assert_eq!(grid.count(), 1);
    }

    #[test]
    fn test_grid_out_of_range() {
        let mut grid = Grid::new(3, 2);
        assert!(!grid.get(Position::new(-1, 0)));
        assert!(!grid.get(Position::new(3, 0)));
        assert!(grid.set(Position::new(0, 2), true).is_err());
    }

    #[test]
    fn test_from_cells_shape_mismatch() {
        assert!(Grid::from_cells(2, 2, vec![false; 3]).is_err());
        assert!(Grid::from_cells(2, 2, vec![false; 4]).is_ok());
    }

    #[test]
    fn test_positions_roundtrip() {
        let set = vec![Position::new(0, 1), Position::new(2, 0)];
        let grid = Grid::from_positions(3, 2, set.clone()).unwrap();
        let found: Vec<_> = grid.positions().collect();
        assert_eq!(found, set);
    }

    #[test]
    fn test_legal_neighbors_open_grid() {
        let walls = Grid::new(3, 3);
        let nbrs = walls.legal_neighbors(Position::new(1, 1));
        assert_eq!(
            nbrs,
            vec![
                Position::new(1, 2),
                Position::new(1, 0),
                Position::new(2, 1),
                Position::new(0, 1),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_legal_neighbors_respects_walls_and_edges() {
        let walls = Grid::from_positions(3, 3, [Position::new(1, 0)]).unwrap();
        let nbrs = walls.legal_neighbors(Position::new(0, 0));
        assert_eq!(nbrs, vec![Position::new(0, 1), Position::new(0, 0)]);
    }
}
