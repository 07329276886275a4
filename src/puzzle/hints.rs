//! Clue types for 2D nonograms and 3D picross puzzles

use super::lines::line_runs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Block lengths for one 2D row or column, in reading order.
/// An empty hint describes a line with no filled cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    blocks: Vec<usize>,
}

impl Hint {
    /// Create a hint; every block length must be positive
    pub fn new(blocks: Vec<usize>) -> Result<Self, String> {
        if blocks.iter().any(|&b| b == 0) {
            return Err("block lengths must be positive".to_string());
        }
        Ok(Self { blocks })
    }

    /// The hint of a line without filled cells
    pub fn empty() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn blocks(&self) -> &[usize] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Shortest line the hint fits in: blocks plus one separator between each pair
    pub fn min_length(&self) -> usize {
        if self.blocks.is_empty() {
            0
        } else {
            self.blocks.iter().sum::<usize>() + self.blocks.len() - 1
        }
    }

    /// Free cells left once the blocks are packed to the left, or `None` if the hint does not fit
    pub fn slack(&self, line_length: usize) -> Option<usize> {
        line_length.checked_sub(self.min_length())
    }

    /// Check a concrete line against this hint
    pub fn is_satisfied_by(&self, cells: &[bool]) -> bool {
        line_runs(cells) == self.blocks
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.blocks.is_empty() {
            return write!(f, "0");
        }
        let parts: Vec<String> = self.blocks.iter().map(|b| b.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Clue attached to one stack of a 3D puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// Exactly one run of `n` filled cells
    Plain(usize),
    /// Exactly two runs of `n` filled cells
    Circle(usize),
    /// Three or more runs of `n` filled cells, bounded by the configured maximum
    Square(usize),
}

impl Marker {
    pub fn count(&self) -> usize {
        match *self {
            Marker::Plain(n) | Marker::Circle(n) | Marker::Square(n) => n,
        }
    }

    /// Allowed numbers of runs for a non-degenerate line
    pub fn group_range(&self, square_max_groups: usize) -> std::ops::RangeInclusive<usize> {
        match self {
            Marker::Plain(_) => 1..=1,
            Marker::Circle(_) => 2..=2,
            Marker::Square(_) => 3..=square_max_groups,
        }
    }

    /// Alternative block sequences a stack of `length` cells may take.
    ///
    /// `n = 0` and `n = length` collapse to the all-empty and all-filled
    /// line for every marker kind. The result can contain sequences that do
    /// not fit the line; the run encoder skips those.
    pub fn run_patterns(&self, length: usize, square_max_groups: usize) -> Vec<Vec<usize>> {
        let n = self.count();
        if n == 0 {
            return vec![Vec::new()];
        }
        if n == length {
            return vec![vec![length]];
        }
        self.group_range(square_max_groups)
            .map(|groups| vec![n; groups])
            .collect()
    }

    /// Reference check of a concrete stack against this marker
    pub fn is_satisfied_by(&self, cells: &[bool], square_max_groups: usize) -> bool {
        let n = self.count();
        if n == 0 {
            return cells.iter().all(|&c| !c);
        }
        if n == cells.len() {
            return cells.iter().all(|&c| c);
        }
        let runs = line_runs(cells);
        self.group_range(square_max_groups).contains(&runs.len()) && runs.iter().all(|&r| r == n)
    }
}

impl FromStr for Marker {
    type Err = String;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let parse_count = |digits: &str| {
            digits
                .parse::<usize>()
                .map_err(|_| format!("`{}` is not a non-negative integer", token))
        };

        if let Some(rest) = token.strip_prefix('(') {
            let inner = rest
                .strip_suffix(')')
                .ok_or_else(|| format!("unmatched parenthesis in `{}`", token))?;
            return parse_count(inner).map(Marker::Circle);
        }
        if let Some(rest) = token.strip_prefix('[') {
            let inner = rest
                .strip_suffix(']')
                .ok_or_else(|| format!("unmatched bracket in `{}`", token))?;
            return parse_count(inner).map(Marker::Square);
        }
        if token.ends_with(')') || token.ends_with(']') {
            return Err(format!("unmatched closing bracket in `{}`", token));
        }
        parse_count(token).map(Marker::Plain)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Plain(n) => write!(f, "{}", n),
            Marker::Circle(n) => write!(f, "({})", n),
            Marker::Square(n) => write!(f, "[{}]", n),
        }
    }
}

/// A row/column nonogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle2D {
    pub rows: usize,
    pub cols: usize,
    pub row_hints: Vec<Hint>,
    pub col_hints: Vec<Hint>,
}

impl Puzzle2D {
    pub fn new(row_hints: Vec<Hint>, col_hints: Vec<Hint>) -> Self {
        Self {
            rows: row_hints.len(),
            cols: col_hints.len(),
            row_hints,
            col_hints,
        }
    }
}

/// The three clue faces of a 3D puzzle, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// Rows are y, columns are z, stacks run along x
    Front,
    /// Rows are mirrored x, columns are z, stacks run along y
    Top,
    /// Rows are y, columns are mirrored x, stacks run along z
    Side,
}

impl Face {
    pub const ALL: [Face; 3] = [Face::Front, Face::Top, Face::Side];

    pub fn index(self) -> usize {
        match self {
            Face::Front => 0,
            Face::Top => 1,
            Face::Side => 2,
        }
    }

    /// (rows, columns) of this face for a cube of the given dimensions
    pub fn shape(self, width: usize, height: usize, depth: usize) -> (usize, usize) {
        match self {
            Face::Front => (height, depth),
            Face::Top => (width, depth),
            Face::Side => (height, width),
        }
    }
}

/// One clue together with the coordinates of the stack it constrains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackClue {
    pub face: Face,
    pub row: usize,
    pub col: usize,
    pub marker: Marker,
    /// (x, y, z) coordinates in stack order
    pub cells: Vec<(usize, usize, usize)>,
}

/// A picross 3D puzzle: clue faces over a width x height x depth cube
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle3D {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    /// One clue grid per face, indexed by `Face::index`; `None` means no clue
    pub faces: [Vec<Vec<Option<Marker>>>; 3],
}

impl Puzzle3D {
    pub fn face(&self, face: Face) -> &[Vec<Option<Marker>>] {
        &self.faces[face.index()]
    }

    /// Coordinates of the stack behind a face position
    pub fn stack_cells(&self, face: Face, row: usize, col: usize) -> Vec<(usize, usize, usize)> {
        match face {
            Face::Front => (0..self.width).map(|x| (x, row, col)).collect(),
            Face::Top => {
                let x = self.width - row - 1;
                (0..self.height).map(|y| (x, y, col)).collect()
            }
            Face::Side => {
                let x = self.width - col - 1;
                (0..self.depth).map(|z| (x, row, z)).collect()
            }
        }
    }

    /// Every clued stack, face by face in row-major order
    pub fn stacks(&self) -> Vec<StackClue> {
        let mut stacks = Vec::new();
        for face in Face::ALL {
            for (row, clues) in self.face(face).iter().enumerate() {
                for (col, clue) in clues.iter().enumerate() {
                    if let Some(marker) = clue {
                        stacks.push(StackClue {
                            face,
                            row,
                            col,
                            marker: *marker,
                            cells: self.stack_cells(face, row, col),
                        });
                    }
                }
            }
        }
        stacks
    }
}

/// A loaded puzzle of either kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Puzzle {
    TwoD(Puzzle2D),
    ThreeD(Puzzle3D),
}

impl Puzzle {
    pub fn cell_count(&self) -> usize {
        match self {
            Puzzle::TwoD(p) => p.rows * p.cols,
            Puzzle::ThreeD(p) => p.width * p.height * p.depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::lines::{all_lines, parse_line};

    #[test]
    fn test_hint_slack() {
        let hint = Hint::new(vec![2, 1]).unwrap();
        assert_eq!(hint.min_length(), 4);
        assert_eq!(hint.slack(5), Some(1));
        assert_eq!(hint.slack(3), None);
        assert_eq!(Hint::empty().slack(3), Some(3));
        assert!(Hint::new(vec![2, 0]).is_err());
    }

    #[test]
    fn test_hint_check() {
        let hint = Hint::new(vec![2, 1]).unwrap();
        assert!(hint.is_satisfied_by(&parse_line("XX.X.").unwrap()));
        assert!(!hint.is_satisfied_by(&parse_line("XXX..").unwrap()));
        assert!(Hint::empty().is_satisfied_by(&parse_line("...").unwrap()));
    }

    #[test]
    fn test_marker_parsing() {
        assert_eq!("3".parse::<Marker>(), Ok(Marker::Plain(3)));
        assert_eq!("(2)".parse::<Marker>(), Ok(Marker::Circle(2)));
        assert_eq!("[12]".parse::<Marker>(), Ok(Marker::Square(12)));
        assert!("(2".parse::<Marker>().unwrap_err().contains("unmatched"));
        assert!("[2".parse::<Marker>().unwrap_err().contains("unmatched"));
        assert!("2)".parse::<Marker>().is_err());
        assert!("x".parse::<Marker>().is_err());
        assert!("(a)".parse::<Marker>().is_err());
    }

    #[test]
    fn test_marker_display_round_trip() {
        for marker in [Marker::Plain(4), Marker::Circle(1), Marker::Square(2)] {
            assert_eq!(marker.to_string().parse::<Marker>(), Ok(marker));
        }
    }

    #[test]
    fn test_circle_checker() {
        let circle = Marker::Circle(1);
        assert!(circle.is_satisfied_by(&parse_line("X.X.").unwrap(), 4));
        assert!(circle.is_satisfied_by(&parse_line("X..X").unwrap(), 4));
        assert!(!circle.is_satisfied_by(&parse_line("XX..").unwrap(), 4));
        assert!(!circle.is_satisfied_by(&parse_line("X.X.X").unwrap(), 4));
    }

    #[test]
    fn test_square_checker_respects_group_bound() {
        let square = Marker::Square(1);
        let five_groups = parse_line("X.X.X.X.X").unwrap();
        assert!(!square.is_satisfied_by(&five_groups, 4));
        assert!(square.is_satisfied_by(&five_groups, 5));
        assert!(square.is_satisfied_by(&parse_line("X.X.X").unwrap(), 4));
        assert!(!square.is_satisfied_by(&parse_line("X.X..").unwrap(), 4));
    }

    #[test]
    fn test_degenerate_markers() {
        for marker in [Marker::Plain(0), Marker::Circle(0), Marker::Square(0)] {
            let accepted: Vec<_> = all_lines(3).filter(|l| marker.is_satisfied_by(l, 4)).collect();
            assert_eq!(accepted, vec![vec![false; 3]]);
        }
        for marker in [Marker::Plain(3), Marker::Circle(3), Marker::Square(3)] {
            let accepted: Vec<_> = all_lines(3).filter(|l| marker.is_satisfied_by(l, 4)).collect();
            assert_eq!(accepted, vec![vec![true; 3]]);
            assert_eq!(marker.run_patterns(3, 4), vec![vec![3]]);
        }
    }

    #[test]
    fn test_run_patterns() {
        assert_eq!(Marker::Plain(2).run_patterns(5, 4), vec![vec![2]]);
        assert_eq!(Marker::Circle(2).run_patterns(5, 4), vec![vec![2, 2]]);
        assert_eq!(
            Marker::Square(1).run_patterns(7, 4),
            vec![vec![1, 1, 1], vec![1, 1, 1, 1]]
        );
    }

    #[test]
    fn test_stack_projection() {
        let puzzle = Puzzle3D {
            width: 2,
            height: 3,
            depth: 4,
            faces: [
                vec![vec![None; 4]; 3],
                vec![vec![None; 4]; 2],
                vec![vec![None; 2]; 3],
            ],
        };

        assert_eq!(Face::Top.shape(2, 3, 4), (2, 4));
        assert_eq!(Face::Side.shape(2, 3, 4), (3, 2));
        assert_eq!(puzzle.stack_cells(Face::Front, 1, 2), vec![(0, 1, 2), (1, 1, 2)]);
        assert_eq!(
            puzzle.stack_cells(Face::Top, 0, 3),
            vec![(1, 0, 3), (1, 1, 3), (1, 2, 3)]
        );
        assert_eq!(puzzle.stack_cells(Face::Side, 2, 0).len(), 4);
        assert!(puzzle.stack_cells(Face::Side, 2, 0).iter().all(|&(x, y, _)| x == 1 && y == 2));
        assert!(puzzle.stacks().is_empty());
    }

    #[test]
    fn test_asymmetric_cube_projection() {
        let puzzle = Puzzle3D {
            width: 2,
            height: 2,
            depth: 2,
            faces: [vec![vec![None; 2]; 2], vec![vec![None; 2]; 2], vec![vec![None; 2]; 2]],
        };

        // top row 0 is the far x slice, its columns walk z
        assert_eq!(puzzle.stack_cells(Face::Top, 0, 1), vec![(1, 0, 1), (1, 1, 1)]);
        // side rows walk y, column 1 is the near x slice
        assert_eq!(puzzle.stack_cells(Face::Side, 0, 1), vec![(0, 0, 0), (0, 0, 1)]);
    }
}
