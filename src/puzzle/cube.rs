//! Solved 3D voxel cube

use super::hints::StackClue;
use super::lines::render_line;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filled/empty voxels, stored x-major then y then z
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelCube {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub cells: Vec<bool>,
}

impl VoxelCube {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            cells: vec![false; width * height * depth],
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.height + y) * self.depth + z
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> bool {
        if x < self.width && y < self.height && z < self.depth {
            self.cells[self.index(x, y, z)]
        } else {
            false
        }
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: bool) {
        let idx = self.index(x, y, z);
        self.cells[idx] = value;
    }

    /// Values along a clued stack, in stack order
    pub fn stack(&self, clue: &StackClue) -> Vec<bool> {
        clue.cells.iter().map(|&(x, y, z)| self.get(x, y, z)).collect()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}

/// One layer per x: `height` lines of `depth` characters, layers separated by a blank line
impl fmt::Display for VoxelCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.width {
            if x > 0 {
                writeln!(f)?;
            }
            for y in 0..self.height {
                let line: Vec<bool> = (0..self.depth).map(|z| self.get(x, y, z)).collect();
                writeln!(f, "{}", render_line(&line))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::hints::{Face, Marker};

    #[test]
    fn test_index_matches_cell_variable_order() {
        let cube = VoxelCube::new(2, 3, 4);
        assert_eq!(cube.index(0, 0, 0), 0);
        assert_eq!(cube.index(0, 0, 3), 3);
        assert_eq!(cube.index(0, 1, 0), 4);
        assert_eq!(cube.index(1, 0, 0), 12);
        assert_eq!(cube.index(1, 2, 3), 23);
    }

    #[test]
    fn test_stack_values() {
        let mut cube = VoxelCube::new(3, 1, 1);
        cube.set(1, 0, 0, true);
        let clue = StackClue {
            face: Face::Front,
            row: 0,
            col: 0,
            marker: Marker::Plain(1),
            cells: vec![(0, 0, 0), (1, 0, 0), (2, 0, 0)],
        };
        assert_eq!(cube.stack(&clue), vec![false, true, false]);
        assert_eq!(cube.filled_count(), 1);
    }

    #[test]
    fn test_display_layers() {
        let mut cube = VoxelCube::new(2, 1, 2);
        cube.set(0, 0, 1, true);
        cube.set(1, 0, 0, true);
        assert_eq!(cube.to_string(), ".X\n\nX.\n");
    }
}
