//! Variable management for SAT encoding

use crate::puzzle::Puzzle;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

/// Coordinates of a puzzle cell that owns a SAT variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellCoord {
    Grid { row: usize, col: usize },
    Voxel { x: usize, y: usize, z: usize },
}

/// Dimensions of the picture the cell variables describe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureShape {
    Grid { rows: usize, cols: usize },
    Cube { width: usize, height: usize, depth: usize },
}

/// Hands out auxiliary variable ids after the last cell id.
///
/// A single atomic sequence, so lines encoded on different threads never
/// share an id. Which line receives which range is irrelevant to the formula.
#[derive(Debug)]
pub struct AuxAllocator {
    first: i32,
    next: AtomicI32,
}

impl AuxAllocator {
    fn starting_at(first: i32) -> Self {
        Self {
            first,
            next: AtomicI32::new(first),
        }
    }

    /// Allocate a fresh auxiliary variable
    pub fn next_auxiliary(&self) -> i32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of auxiliary variables handed out so far
    pub fn allocated(&self) -> usize {
        (self.next.load(Ordering::Relaxed) - self.first) as usize
    }

    /// Highest id handed out so far, cells included
    pub fn high_water_mark(&self) -> usize {
        (self.next.load(Ordering::Relaxed) - 1) as usize
    }
}

/// Manages the bijection between cells and SAT variables, plus auxiliary ids
#[derive(Debug)]
pub struct VariableManager {
    /// Cell coordinate of variable `i + 1`
    coords: Vec<CellCoord>,
    variable_map: HashMap<CellCoord, i32>,
    shape: PictureShape,
    aux: AuxAllocator,
}

impl VariableManager {
    /// Allocate cell variables for a row-major grid: id(r, c) = r * cols + c + 1
    pub fn for_grid(rows: usize, cols: usize) -> Result<Self> {
        let mut vm = Self::empty(PictureShape::Grid { rows, cols });
        for row in 0..rows {
            for col in 0..cols {
                vm.new_cell_variable(CellCoord::Grid { row, col })?;
            }
        }
        Ok(vm)
    }

    /// Allocate cell variables x-major: id(x, y, z) = x * h * d + y * d + z + 1
    pub fn for_cube(width: usize, height: usize, depth: usize) -> Result<Self> {
        let mut vm = Self::empty(PictureShape::Cube { width, height, depth });
        for x in 0..width {
            for y in 0..height {
                for z in 0..depth {
                    vm.new_cell_variable(CellCoord::Voxel { x, y, z })?;
                }
            }
        }
        Ok(vm)
    }

    pub fn for_puzzle(puzzle: &Puzzle) -> Result<Self> {
        match puzzle {
            Puzzle::TwoD(p) => Self::for_grid(p.rows, p.cols),
            Puzzle::ThreeD(p) => Self::for_cube(p.width, p.height, p.depth),
        }
    }

    fn empty(shape: PictureShape) -> Self {
        Self {
            coords: Vec::new(),
            variable_map: HashMap::new(),
            shape,
            aux: AuxAllocator::starting_at(1),
        }
    }

    /// Assign the next id to a cell. Cells come first; once an auxiliary
    /// variable exists no more cells can be added.
    pub fn new_cell_variable(&mut self, coord: CellCoord) -> Result<i32> {
        if self.aux.allocated() > 0 {
            anyhow::bail!("Cell {:?} allocated after auxiliary variables", coord);
        }
        if self.variable_map.contains_key(&coord) {
            anyhow::bail!("Cell {:?} already has a variable", coord);
        }
        self.validate_coord(&coord)?;

        let id = self.coords.len() as i32 + 1;
        self.coords.push(coord);
        self.variable_map.insert(coord, id);
        self.aux = AuxAllocator::starting_at(id + 1);
        Ok(id)
    }

    fn validate_coord(&self, coord: &CellCoord) -> Result<()> {
        match (*coord, self.shape) {
            (CellCoord::Grid { row, col }, PictureShape::Grid { rows, cols }) => {
                if row >= rows || col >= cols {
                    anyhow::bail!("Cell ({}, {}) out of bounds for {}x{} grid", row, col, rows, cols);
                }
            }
            (CellCoord::Voxel { x, y, z }, PictureShape::Cube { width, height, depth }) => {
                if x >= width || y >= height || z >= depth {
                    anyhow::bail!(
                        "Voxel ({}, {}, {}) out of bounds for {}x{}x{} cube",
                        x, y, z, width, height, depth
                    );
                }
            }
            _ => anyhow::bail!("Cell {:?} does not match picture shape {:?}", coord, self.shape),
        }
        Ok(())
    }

    pub fn cell_variable(&self, coord: CellCoord) -> Option<i32> {
        self.variable_map.get(&coord).copied()
    }

    pub fn grid_variable(&self, row: usize, col: usize) -> Option<i32> {
        self.cell_variable(CellCoord::Grid { row, col })
    }

    pub fn voxel_variable(&self, x: usize, y: usize, z: usize) -> Option<i32> {
        self.cell_variable(CellCoord::Voxel { x, y, z })
    }

    /// Cell owning a variable id; `None` for auxiliary ids
    pub fn coordinate(&self, id: i32) -> Option<CellCoord> {
        if id < 1 {
            return None;
        }
        self.coords.get(id as usize - 1).copied()
    }

    pub fn shape(&self) -> PictureShape {
        self.shape
    }

    /// Number of cell variables (ids 1..=N)
    pub fn cell_count(&self) -> usize {
        self.coords.len()
    }

    pub fn aux(&self) -> &AuxAllocator {
        &self.aux
    }

    pub fn next_auxiliary(&self) -> i32 {
        self.aux.next_auxiliary()
    }

    /// Total number of variables created, cells and auxiliaries
    pub fn variable_count(&self) -> usize {
        self.aux.high_water_mark()
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        VariableStatistics {
            total_variables: self.variable_count(),
            cell_variables: self.cell_count(),
            auxiliary_variables: self.aux.allocated(),
        }
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub cell_variables: usize,
    pub auxiliary_variables: usize,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Cell variables: {}", self.cell_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.auxiliary_variables)?;
        Ok(())
    }
}
