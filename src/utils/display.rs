//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::puzzle::{save_picture, Grid, Picture, VoxelCube};
use crate::sat::{LineReport, LineStatus};
use crate::solve::{Solution, SolutionMetadata, SolveOutcome};
use anyhow::{Context, Result};
use std::path::Path;

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a single solution for console output
    pub fn format_solution(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ({}) ===\n", solution.metadata.index, solution.metadata.id));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!(
            "Filled Cells: {}/{} ({:.1}%)\n",
            solution.metadata.filled_cells,
            solution.metadata.total_cells,
            solution.metadata.density * 100.0
        ));
        let uniqueness = match solution.metadata.unique {
            Some(true) => "unique",
            Some(false) => "other pictures exist",
            None => "not checked",
        };
        output.push_str(&format!("Uniqueness: {}\n\n", uniqueness));
        output.push_str(&Self::format_picture_compact(&solution.picture));

        output
    }

    /// Format multiple solutions as a summary table
    pub fn format_solution_summary(solutions: &[Solution]) -> String {
        let mut output = String::new();

        output.push_str("Solutions Summary:\n");
        output.push_str("#   | ID       | Time(ms) | Filled | Density\n");
        output.push_str("----|----------|----------|--------|--------\n");

        for solution in solutions {
            let id = solution.metadata.id.trim_start_matches("sol_");
            output.push_str(&format!(
                "{:3} | {:8} | {:8} | {:6} | {:5.1}%\n",
                solution.metadata.index,
                &id[..8.min(id.len())],
                solution.solve_time.as_millis(),
                solution.metadata.filled_cells,
                solution.metadata.density * 100.0
            ));
        }

        output
    }

    /// Block-character rendering of a grid or of each cube layer
    pub fn format_picture_compact(picture: &Picture) -> String {
        match picture {
            Picture::Grid(grid) => Self::format_grid_compact(grid),
            Picture::Cube(cube) => Self::format_cube_compact(cube),
        }
    }

    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::new();
        for r in 0..grid.height {
            for c in 0..grid.width {
                output.push(if grid.get(r, c) { '█' } else { '·' });
            }
            output.push('\n');
        }
        output
    }

    fn format_cube_compact(cube: &VoxelCube) -> String {
        let mut output = String::new();
        for x in 0..cube.width {
            output.push_str(&format!("Layer x={}:\n", x));
            for y in 0..cube.height {
                for z in 0..cube.depth {
                    output.push(if cube.get(x, y, z) { '█' } else { '·' });
                }
                output.push('\n');
            }
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for c in 0..grid.width {
            output.push_str(&format!("{:2}", c % 10));
        }
        output.push('\n');

        for r in 0..grid.height {
            output.push_str(&format!("{:2} ", r));
            for c in 0..grid.width {
                output.push_str(if grid.get(r, c) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// Per-line table for `analyze`
    pub fn format_line_reports(reports: &[LineReport]) -> String {
        let mut output = String::new();

        output.push_str("Line             | Clue       | Len | Encoding       | Clauses\n");
        output.push_str("-----------------|------------|-----|----------------|--------\n");
        for report in reports {
            let status = match report.status {
                LineStatus::Encoded { placements } => format!("{} placements", placements),
                LineStatus::Direct => "direct".to_string(),
                LineStatus::Forced => "forced".to_string(),
                LineStatus::Skipped => "SKIPPED".to_string(),
            };
            output.push_str(&format!(
                "{:16} | {:10} | {:3} | {:14} | {}\n",
                report.label.to_string(),
                report.clue,
                report.length,
                status,
                report.clause_count
            ));
        }

        output
    }

    /// Save the outcome of a solve based on output format.
    ///
    /// Text output writes `solution_NNN.txt` in the `X`/`.` picture format, or a
    /// single `solution_001.txt` holding the no-solution line.
    pub fn save_solutions<P: AsRef<Path>>(outcome: &SolveOutcome, output_dir: P, format: &OutputFormat) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory {}", output_dir.display()))?;

        match format {
            OutputFormat::Text => {
                if outcome.solutions().is_empty() {
                    save_picture::<Picture, _>(None, output_dir.join("solution_001.txt"))?;
                }
                for solution in outcome.solutions() {
                    let filename = format!("solution_{:03}.txt", solution.metadata.index);
                    save_picture(Some(&solution.picture), output_dir.join(filename))?;
                }
            }
            OutputFormat::Json => {
                for solution in outcome.solutions() {
                    let filename = format!("solution_{:03}.json", solution.metadata.index);
                    solution.save_to_file(output_dir.join(filename))?;
                }

                // Also save a summary file
                let summaries: Vec<&SolutionMetadata> = outcome.solutions().iter().map(|s| &s.metadata).collect();
                let summary = serde_json::json!({
                    "satisfiable": !outcome.is_unsatisfiable(),
                    "solutions": summaries,
                });
                let summary_json = serde_json::to_string_pretty(&summary)?;
                std::fs::write(output_dir.join("solutions_summary.json"), summary_json)
                    .context("Failed to write solution summary")?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::NO_SOLUTION_SENTINEL;
    use crate::sat::LineLabel;
    use std::time::Duration;
    use tempfile::tempdir;

    fn bar_outcome() -> SolveOutcome {
        let grid = Grid::from_cells(vec![vec![true, true, false]]).unwrap();
        let solution = Solution::new(Picture::Grid(grid), 1, Some(true), Duration::from_millis(3));
        SolveOutcome::Solved {
            solutions: vec![solution],
            exhausted: true,
        }
    }

    #[test]
    fn test_grid_formatting() {
        let grid = Grid::from_cells(vec![vec![true, false, true], vec![false, true, false]]).unwrap();

        let compact = SolutionFormatter::format_grid_compact(&grid);
        assert_eq!(compact, "█·█\n·█·\n");

        let with_coords = SolutionFormatter::format_grid_with_coords(&grid);
        assert!(with_coords.contains(" 0 1 2"));
    }

    #[test]
    fn test_cube_layers() {
        let mut cube = VoxelCube::new(2, 1, 2);
        cube.set(1, 0, 1, true);
        let text = SolutionFormatter::format_picture_compact(&Picture::Cube(cube));
        assert_eq!(text, "Layer x=0:\n··\nLayer x=1:\n·█\n");
    }

    #[test]
    fn test_summary_and_details() {
        let outcome = bar_outcome();
        let summary = SolutionFormatter::format_solution_summary(outcome.solutions());
        assert_eq!(summary.lines().count(), 4);

        let details = SolutionFormatter::format_solution(&outcome.solutions()[0]);
        assert!(details.contains("Uniqueness: unique"));
        assert!(details.ends_with("██·\n"));
    }

    #[test]
    fn test_line_report_table() {
        let reports = vec![
            LineReport {
                label: LineLabel::Row(0),
                clue: "2".to_string(),
                length: 3,
                status: LineStatus::Encoded { placements: 2 },
                clause_count: 7,
            },
            LineReport {
                label: LineLabel::Column(2),
                clue: "5".to_string(),
                length: 1,
                status: LineStatus::Skipped,
                clause_count: 0,
            },
        ];
        let table = SolutionFormatter::format_line_reports(&reports);
        assert!(table.contains("2 placements"));
        assert!(table.contains("column 3"));
        assert!(table.contains("SKIPPED"));
    }

    #[test]
    fn test_save_text_and_sentinel() {
        let dir = tempdir().unwrap();
        SolutionFormatter::save_solutions(&bar_outcome(), dir.path(), &OutputFormat::Text).unwrap();
        let saved = std::fs::read_to_string(dir.path().join("solution_001.txt")).unwrap();
        assert_eq!(saved, "XX.\n");

        let unsat_dir = dir.path().join("unsat");
        SolutionFormatter::save_solutions(&SolveOutcome::Unsatisfiable, &unsat_dir, &OutputFormat::Text).unwrap();
        let saved = std::fs::read_to_string(unsat_dir.join("solution_001.txt")).unwrap();
        assert_eq!(saved.trim_end(), NO_SOLUTION_SENTINEL);
    }

    #[test]
    fn test_save_json() {
        let dir = tempdir().unwrap();
        SolutionFormatter::save_solutions(&bar_outcome(), dir.path(), &OutputFormat::Json).unwrap();
        let loaded = Solution::load_from_file(dir.path().join("solution_001.json")).unwrap();
        assert_eq!(loaded.picture.to_string(), "XX.\n");

        let summary = std::fs::read_to_string(dir.path().join("solutions_summary.json")).unwrap();
        assert!(summary.contains("\"satisfiable\": true"));
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));
        assert!(ColorOutput::success("OK").contains("OK"));
    }
}
