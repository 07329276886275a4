//! Solved 2D picture

use super::lines::render_line;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A filled/empty picture of `height` rows and `width` columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<bool>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Create a grid from rows of cells
    pub fn from_cells(cells: Vec<Vec<bool>>) -> Result<Self> {
        if cells.is_empty() {
            anyhow::bail!("Grid cannot be empty");
        }

        let height = cells.len();
        let width = cells[0].len();

        for (i, row) in cells.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), width);
            }
        }

        Ok(Self {
            width,
            height,
            cells: cells.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Get cell value at coordinates; out of bounds cells are empty
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row < self.height && col < self.width {
            self.cells[self.index(row, col)]
        } else {
            false
        }
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: bool) -> Result<()> {
        if row >= self.height || col >= self.width {
            anyhow::bail!("Coordinates ({}, {}) out of bounds for {}x{} grid", row, col, self.height, self.width);
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Vec<bool> {
        (0..self.width).map(|col| self.get(row, col)).collect()
    }

    pub fn column(&self, col: usize) -> Vec<bool> {
        (0..self.height).map(|row| self.get(row, col)).collect()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            writeln!(f, "{}", render_line(&self.row(row)))?;
        }
        Ok(())
    }
}
