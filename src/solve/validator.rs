//! Re-checking decoded pictures against the clues

use crate::config::Settings;
use crate::puzzle::lines::render_line;
use crate::puzzle::{Grid, Hint, Marker, Picture, Puzzle, Puzzle2D, Puzzle3D, VoxelCube};
use crate::sat::intervals::slack_for;
use crate::sat::LineLabel;
use std::time::Instant;

/// Validates pictures against the clues of a puzzle
pub struct SolutionValidator {
    square_max_groups: usize,
}

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Every clue that fits its line is met
    pub is_valid: bool,
    pub violations: Vec<ClueViolation>,
    pub error_message: Option<String>,
    pub lines_checked: usize,
    pub validation_time_ms: u64,
}

/// A line whose cells disagree with its clue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueViolation {
    pub label: LineLabel,
    pub clue: String,
    pub actual: String,
    /// The clue cannot be met by any filling of the line
    pub infeasible: bool,
}

impl SolutionValidator {
    /// Create a new solution validator
    pub fn new(settings: &Settings) -> Self {
        Self::with_square_max_groups(settings.encoding.square_max_groups)
    }

    pub fn with_square_max_groups(square_max_groups: usize) -> Self {
        Self { square_max_groups }
    }

    /// Check every row, column or stack of `picture` against `puzzle`
    pub fn validate(&self, puzzle: &Puzzle, picture: &Picture) -> ValidationResult {
        let start_time = Instant::now();

        let checked = match (puzzle, picture) {
            (Puzzle::TwoD(p), Picture::Grid(grid)) => {
                if grid.height != p.rows || grid.width != p.cols {
                    Err(format!(
                        "Picture is {}x{}, puzzle is {}x{}",
                        grid.height, grid.width, p.rows, p.cols
                    ))
                } else {
                    Ok(self.check_grid(p, grid))
                }
            }
            (Puzzle::ThreeD(p), Picture::Cube(cube)) => {
                if (cube.width, cube.height, cube.depth) != (p.width, p.height, p.depth) {
                    Err(format!(
                        "Cube is {}x{}x{}, puzzle is {}x{}x{}",
                        cube.width, cube.height, cube.depth, p.width, p.height, p.depth
                    ))
                } else {
                    Ok(self.check_cube(p, cube))
                }
            }
            _ => Err("Picture kind does not match puzzle kind".to_string()),
        };

        let validation_time_ms = start_time.elapsed().as_millis() as u64;
        match checked {
            Ok((lines_checked, violations)) => {
                let is_valid = violations.iter().all(|v| v.infeasible);
                let error_message = (!is_valid).then(|| Self::generate_error_message(&violations));
                ValidationResult {
                    is_valid,
                    violations,
                    error_message,
                    lines_checked,
                    validation_time_ms,
                }
            }
            Err(message) => ValidationResult {
                is_valid: false,
                violations: Vec::new(),
                error_message: Some(message),
                lines_checked: 0,
                validation_time_ms,
            },
        }
    }

    fn check_grid(&self, puzzle: &Puzzle2D, grid: &Grid) -> (usize, Vec<ClueViolation>) {
        let mut violations = Vec::new();
        let rows = puzzle.row_hints.iter().enumerate().map(|(r, h)| (LineLabel::Row(r), h, grid.row(r)));
        let cols = puzzle.col_hints.iter().enumerate().map(|(c, h)| (LineLabel::Column(c), h, grid.column(c)));

        let mut lines_checked = 0;
        for (label, hint, line) in rows.chain(cols) {
            lines_checked += 1;
            if !hint.is_satisfied_by(&line) {
                violations.push(ClueViolation {
                    label,
                    clue: hint.to_string(),
                    actual: render_line(&line),
                    infeasible: !hint_fits(hint, line.len()),
                });
            }
        }
        (lines_checked, violations)
    }

    fn check_cube(&self, puzzle: &Puzzle3D, cube: &VoxelCube) -> (usize, Vec<ClueViolation>) {
        let stacks = puzzle.stacks();
        let mut violations = Vec::new();

        for stack in &stacks {
            let line = cube.stack(stack);
            if !stack.marker.is_satisfied_by(&line, self.square_max_groups) {
                violations.push(ClueViolation {
                    label: LineLabel::Stack {
                        face: stack.face,
                        row: stack.row,
                        col: stack.col,
                    },
                    clue: stack.marker.to_string(),
                    actual: render_line(&line),
                    infeasible: !self.marker_fits(stack.marker, line.len()),
                });
            }
        }
        (stacks.len(), violations)
    }

    fn marker_fits(&self, marker: Marker, length: usize) -> bool {
        let n = marker.count();
        if n > length {
            return false;
        }
        n == 0
            || n == length
            || marker
                .run_patterns(length, self.square_max_groups)
                .iter()
                .any(|blocks| slack_for(length, blocks).is_some())
    }

    fn generate_error_message(violations: &[ClueViolation]) -> String {
        let broken: Vec<String> = violations
            .iter()
            .filter(|v| !v.infeasible)
            .take(5)
            .map(|v| format!("{} wants {} but holds {}", v.label, v.clue, v.actual))
            .collect();
        let total = violations.iter().filter(|v| !v.infeasible).count();
        if total > broken.len() {
            format!("{} (and {} more)", broken.join("; "), total - broken.len())
        } else {
            broken.join("; ")
        }
    }
}

fn hint_fits(hint: &Hint, length: usize) -> bool {
    hint.slack(length).is_some()
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;

        if let Some(ref error) = self.error_message {
            writeln!(f, "Error: {}", error)?;
        }

        writeln!(f, "Lines checked: {}", self.lines_checked)?;
        writeln!(f, "Clue violations: {}", self.violations.len())?;
        for violation in self.violations.iter().filter(|v| v.infeasible) {
            writeln!(f, "  {} ({}) cannot fit, ignored", violation.label, violation.clue)?;
        }
        writeln!(f, "Validation time: {}ms", self.validation_time_ms)?;

        Ok(())
    }
}
