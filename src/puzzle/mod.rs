//! Puzzle model: clues, solved pictures and hint file I/O

pub mod hints;
pub mod lines;
pub mod grid;
pub mod cube;
pub mod picture;
pub mod io;

pub use hints::{Face, Hint, Marker, Puzzle, Puzzle2D, Puzzle3D, StackClue};
pub use grid::Grid;
pub use cube::VoxelCube;
pub use picture::Picture;
pub use io::{load_puzzle, load_grid_from_file, save_picture, create_example_puzzles, NO_SOLUTION_SENTINEL};
