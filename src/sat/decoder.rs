//! Turning a satisfying assignment back into a picture

use super::solver::SolverSolution;
use super::variables::{CellCoord, PictureShape, VariableManager};
use crate::error::{PicrossError, PicrossResult};
use crate::puzzle::{Grid, Picture, VoxelCube};

/// Build the picture described by the cell variables of a model.
///
/// Every cell variable must have a value; auxiliary ids are ignored.
pub fn decode_solution(solution: &SolverSolution, variables: &VariableManager) -> PicrossResult<Picture> {
    let expected = variables.cell_count();
    let found = (1..=expected as i32)
        .filter(|var| solution.assignment.contains_key(var))
        .count();
    if found < expected {
        return Err(PicrossError::TruncatedSolution { expected, found });
    }

    let mut picture = match variables.shape() {
        PictureShape::Grid { rows, cols } => Picture::Grid(Grid::new(cols, rows)),
        PictureShape::Cube { width, height, depth } => Picture::Cube(VoxelCube::new(width, height, depth)),
    };

    for var in solution.true_variables() {
        match (variables.coordinate(var), &mut picture) {
            (Some(CellCoord::Grid { row, col }), Picture::Grid(grid)) => {
                let idx = grid.index(row, col);
                grid.cells[idx] = true;
            }
            (Some(CellCoord::Voxel { x, y, z }), Picture::Cube(cube)) => cube.set(x, y, z, true),
            _ => {}
        }
    }

    Ok(picture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn solution(pairs: &[(i32, bool)]) -> SolverSolution {
        SolverSolution {
            assignment: pairs.iter().copied().collect::<HashMap<_, _>>(),
            solve_time: Duration::ZERO,
        }
    }

    #[test]
    fn test_decode_grid_ignores_selectors() {
        let vm = VariableManager::for_grid(1, 3).unwrap();
        let model = solution(&[(1, true), (2, true), (3, false), (4, true), (5, false)]);

        let picture = decode_solution(&model, &vm).unwrap();
        assert_eq!(picture.to_string(), "XX.\n");
    }

    #[test]
    fn test_decode_cube() {
        let vm = VariableManager::for_cube(2, 1, 2).unwrap();
        // x-major: (0,0,0)=1 (0,0,1)=2 (1,0,0)=3 (1,0,1)=4
        let model = solution(&[(1, false), (2, true), (3, true), (4, false)]);

        let picture = decode_solution(&model, &vm).unwrap();
        let cube = picture.as_cube().unwrap();
        assert!(cube.get(0, 0, 1));
        assert!(cube.get(1, 0, 0));
        assert_eq!(cube.filled_count(), 2);
        assert_eq!(picture.to_string(), ".X\n\nX.\n");
    }

    #[test]
    fn test_truncated_model() {
        let vm = VariableManager::for_grid(2, 2).unwrap();
        let model = solution(&[(1, true), (2, false), (9, true)]);

        match decode_solution(&model, &vm) {
            Err(PicrossError::TruncatedSolution { expected, found }) => {
                assert_eq!(expected, 4);
                assert_eq!(found, 2);
            }
            other => panic!("expected truncation error, got {:?}", other),
        }
    }
}
