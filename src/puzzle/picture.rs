//! A decoded solution of either puzzle kind

use super::cube::VoxelCube;
use super::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Picture {
    Grid(Grid),
    Cube(VoxelCube),
}

impl Picture {
    pub fn filled_count(&self) -> usize {
        match self {
            Picture::Grid(grid) => grid.filled_count(),
            Picture::Cube(cube) => cube.filled_count(),
        }
    }

    pub fn cell_count(&self) -> usize {
        match self {
            Picture::Grid(grid) => grid.cells.len(),
            Picture::Cube(cube) => cube.cells.len(),
        }
    }

    /// Fraction of filled cells, 0 for an empty picture
    pub fn density(&self) -> f64 {
        match self.cell_count() {
            0 => 0.0,
            total => self.filled_count() as f64 / total as f64,
        }
    }

    pub fn as_grid(&self) -> Option<&Grid> {
        match self {
            Picture::Grid(grid) => Some(grid),
            Picture::Cube(_) => None,
        }
    }

    pub fn as_cube(&self) -> Option<&VoxelCube> {
        match self {
            Picture::Cube(cube) => Some(cube),
            Picture::Grid(_) => None,
        }
    }
}

impl fmt::Display for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Picture::Grid(grid) => grid.fmt(f),
            Picture::Cube(cube) => cube.fmt(f),
        }
    }
}
