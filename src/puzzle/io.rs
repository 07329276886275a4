//! Reading hint files and writing solved pictures

use super::hints::{Face, Hint, Marker, Puzzle, Puzzle2D, Puzzle3D};
use super::lines::parse_line;
use super::Grid;
use crate::config::PuzzleKind;
use crate::error::{PicrossError, PicrossResult};
use anyhow::{Context, Result};
use std::fmt::Display;
use std::path::Path;

/// Written in place of a picture when the formula is unsatisfiable
pub const NO_SOLUTION_SENTINEL: &str = "No solution found.";

/// Load a puzzle of the given kind from a hint file
pub fn load_puzzle<P: AsRef<Path>>(path: P, kind: PuzzleKind) -> Result<Puzzle> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read hint file: {}", path.as_ref().display()))?;

    let puzzle = match kind {
        PuzzleKind::TwoD => parse_puzzle_2d(&content).map(Puzzle::TwoD),
        PuzzleKind::ThreeD => parse_puzzle_3d(&content).map(Puzzle::ThreeD),
    };
    puzzle.with_context(|| format!("Failed to parse hint file: {}", path.as_ref().display()))
}

/// Parse one whitespace-separated 2D hint line. A blank line or a lone `0` is an empty line.
pub fn parse_hint_line(text: &str, line_no: usize) -> PicrossResult<Hint> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() || tokens == ["0"] {
        return Ok(Hint::empty());
    }

    let mut blocks = Vec::with_capacity(tokens.len());
    for token in tokens {
        let length = token
            .parse::<usize>()
            .map_err(|_| PicrossError::parse(line_no, format!("`{}` is not a block length", token)))?;
        if length == 0 {
            return Err(PicrossError::parse(line_no, "0 cannot be combined with other block lengths"));
        }
        blocks.push(length);
    }

    Hint::new(blocks).map_err(|e| PicrossError::parse(line_no, e))
}

fn parse_count(text: &str, line_no: usize, what: &str) -> PicrossResult<usize> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| PicrossError::parse(line_no, format!("expected {} but found `{}`", what, text.trim())))
}

/// Parse a 2D hint file: row count, column count, row hints, column hints
pub fn parse_puzzle_2d(content: &str) -> PicrossResult<Puzzle2D> {
    let lines: Vec<&str> = content.lines().collect();
    let line = |idx: usize, what: &str| {
        lines
            .get(idx)
            .copied()
            .ok_or_else(|| PicrossError::parse(idx + 1, format!("unexpected end of file, expected {}", what)))
    };

    let rows = parse_count(line(0, "the row count")?, 1, "the row count")?;
    let cols = parse_count(line(1, "the column count")?, 2, "the column count")?;

    let mut row_hints = Vec::with_capacity(rows);
    for r in 0..rows {
        let idx = 2 + r;
        row_hints.push(parse_hint_line(line(idx, &format!("hint for row {}", r + 1))?, idx + 1)?);
    }

    let mut col_hints = Vec::with_capacity(cols);
    for c in 0..cols {
        let idx = 2 + rows + c;
        col_hints.push(parse_hint_line(line(idx, &format!("hint for column {}", c + 1))?, idx + 1)?);
    }

    if let Some(extra) = lines
        .iter()
        .enumerate()
        .skip(2 + rows + cols)
        .find(|(_, l)| !l.trim().is_empty())
    {
        return Err(PicrossError::parse(extra.0 + 1, "unexpected content after the last column hint"));
    }

    Ok(Puzzle2D::new(row_hints, col_hints))
}

/// Parse a 3D hint file: `width height depth`, then three blank-line separated clue faces
pub fn parse_puzzle_3d(content: &str) -> PicrossResult<Puzzle3D> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .collect();
    let mut cursor = 0;

    let skip_blank = |cursor: &mut usize| {
        while *cursor < lines.len() && lines[*cursor].1.is_empty() {
            *cursor += 1;
        }
    };

    skip_blank(&mut cursor);
    let (header_no, header) = *lines
        .get(cursor)
        .ok_or_else(|| PicrossError::parse(1, "missing `width height depth` header"))?;
    let dims: Vec<&str> = header.split_whitespace().collect();
    if dims.len() != 3 {
        return Err(PicrossError::parse(header_no, "expected `width height depth`"));
    }
    let width = parse_count(dims[0], header_no, "the width")?;
    let height = parse_count(dims[1], header_no, "the height")?;
    let depth = parse_count(dims[2], header_no, "the depth")?;
    cursor += 1;

    let mut faces: [Vec<Vec<Option<Marker>>>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for face in Face::ALL {
        let (rows, cols) = face.shape(width, height, depth);
        skip_blank(&mut cursor);

        let mut clues = Vec::with_capacity(rows);
        for r in 0..rows {
            let (line_no, text) = match lines.get(cursor) {
                Some(&(no, text)) if !text.is_empty() => (no, text),
                Some(&(no, _)) => {
                    return Err(PicrossError::parse(
                        no,
                        format!("{:?} face ended after {} of {} rows", face, r, rows),
                    ))
                }
                None => {
                    return Err(PicrossError::parse(
                        lines.len() + 1,
                        format!("unexpected end of file in {:?} face, expected {} rows", face, rows),
                    ))
                }
            };

            let tokens: Vec<&str> = text.split_whitespace().collect();
            if tokens.len() != cols {
                return Err(PicrossError::parse(
                    line_no,
                    format!("expected {} clues, found {}", cols, tokens.len()),
                ));
            }

            let row = tokens
                .into_iter()
                .map(|token| match token {
                    "-" => Ok(None),
                    _ => token
                        .parse::<Marker>()
                        .map(Some)
                        .map_err(|e| PicrossError::parse(line_no, e)),
                })
                .collect::<PicrossResult<Vec<_>>>()?;
            clues.push(row);
            cursor += 1;
        }
        faces[face.index()] = clues;
    }

    skip_blank(&mut cursor);
    if let Some(&(line_no, _)) = lines.get(cursor) {
        return Err(PicrossError::parse(line_no, "unexpected content after the last face"));
    }

    Ok(Puzzle3D {
        width,
        height,
        depth,
        faces,
    })
}

/// Parse a solved 2D picture written with `X` and `.`
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Grid file is empty or contains no valid rows");
    }
    if lines == [NO_SOLUTION_SENTINEL] {
        anyhow::bail!("Grid file records that no solution was found");
    }

    let mut cells = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let row = parse_line(line).with_context(|| {
            format!("Invalid character in row {}. Only 'X' and '.' are allowed", row_idx + 1)
        })?;
        cells.push(row);
    }

    Grid::from_cells(cells)
}

pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Write a solved picture, or the sentinel line when there is none
pub fn save_picture<T: Display, P: AsRef<Path>>(picture: Option<&T>, path: P) -> Result<()> {
    let content = match picture {
        Some(picture) => picture.to_string(),
        None => format!("{}\n", NO_SOLUTION_SENTINEL),
    };

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write picture to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Create example hint files for both puzzle kinds
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // A small face
    let face = "5\n5\n1 1\n1 1\n0\n1 1\n3\n1\n2 1\n1\n2 1\n1\n";
    std::fs::write(dir.join("face.txt"), face).context("Failed to write face.txt")?;

    // The single row from the README walkthrough
    let bar = "1\n3\n2\n1\n1\n0\n";
    std::fs::write(dir.join("bar.txt"), bar).context("Failed to write bar.txt")?;

    // Two voxels split by a gap
    let split = "3 1 1\n\n(1)\n\n1\n0\n1\n\n1 0 1\n";
    std::fs::write(dir.join("split_3d.txt"), split).context("Failed to write split_3d.txt")?;

    // Solid 2x2x2 block with a few missing clues
    let block = "2 2 2\n\n2 2\n2 -\n\n2 2\n- 2\n\n2 2\n2 2\n";
    std::fs::write(dir.join("block_3d.txt"), block).context("Failed to write block_3d.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse_line_no(err: PicrossError) -> usize {
        match err {
            PicrossError::Parse { line, .. } => line,
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_puzzle_2d() {
        let puzzle = parse_puzzle_2d("1\n3\n2\n1\n1\n0\n").unwrap();
        assert_eq!(puzzle.rows, 1);
        assert_eq!(puzzle.cols, 3);
        assert_eq!(puzzle.row_hints[0].blocks(), &[2]);
        assert!(puzzle.col_hints[2].is_empty());
    }

    #[test]
    fn test_blank_hint_line_is_empty_line() {
        let puzzle = parse_puzzle_2d("2\n1\n1\n\n1\n").unwrap();
        assert!(puzzle.row_hints[1].is_empty());
        assert_eq!(puzzle.col_hints[0].blocks(), &[1]);
    }

    #[test]
    fn test_malformed_2d_tokens_name_the_line() {
        let err = parse_puzzle_2d("1\n2\n1 x\n1\n0\n").unwrap_err();
        assert_eq!(parse_line_no(err), 3);

        let err = parse_puzzle_2d("1\n2\n1 0\n1\n0\n").unwrap_err();
        assert_eq!(parse_line_no(err), 3);

        let err = parse_puzzle_2d("two\n2\n").unwrap_err();
        assert_eq!(parse_line_no(err), 1);

        let err = parse_puzzle_2d("1\n2\n1\n1\n").unwrap_err();
        assert_eq!(parse_line_no(err), 5);
    }

    #[test]
    fn test_parse_puzzle_3d() {
        let puzzle = parse_puzzle_3d("3 1 1\n\n(1)\n\n1\n0\n1\n\n1 0 1\n").unwrap();
        assert_eq!((puzzle.width, puzzle.height, puzzle.depth), (3, 1, 1));
        assert_eq!(puzzle.face(Face::Front)[0][0], Some(Marker::Circle(1)));
        assert_eq!(puzzle.face(Face::Top).len(), 3);
        assert_eq!(puzzle.face(Face::Side)[0].len(), 3);
        assert_eq!(puzzle.stacks().len(), 7);
    }

    #[test]
    fn test_parse_3d_missing_clues() {
        let puzzle = parse_puzzle_3d("2 2 2\n\n2 2\n2 -\n\n2 2\n- 2\n\n2 2\n2 2\n").unwrap();
        assert_eq!(puzzle.face(Face::Front)[1][1], None);
        assert_eq!(puzzle.face(Face::Side)[1][0], Some(Marker::Plain(2)));
        assert_eq!(puzzle.stacks().len(), 10);
    }

    #[test]
    fn test_malformed_3d_tokens_name_the_line() {
        let err = parse_puzzle_3d("1 1 2\n\n(1 2\n\n1 1\n\n1\n").unwrap_err();
        assert_eq!(parse_line_no(err), 3);

        let err = parse_puzzle_3d("1 1 2\n\n1 [2\n\n1\n1\n\n1\n").unwrap_err();
        assert_eq!(parse_line_no(err), 3);

        // wrong number of clues on the top face
        let err = parse_puzzle_3d("1 1 2\n\n1 1\n\n1\n\n1\n").unwrap_err();
        assert_eq!(parse_line_no(err), 5);

        let err = parse_puzzle_3d("1 1\n").unwrap_err();
        assert_eq!(parse_line_no(err), 1);
    }

    #[test]
    fn test_grid_round_trip_through_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("out/grid.txt");
        let grid = parse_grid_from_string("XX.\n.X.\n").unwrap();

        save_picture(Some(&grid), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "XX.\n.X.\n");
        assert_eq!(load_grid_from_file(&path).unwrap(), grid);
    }

    #[test]
    fn test_no_solution_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("none.txt");
        save_picture::<Grid, _>(None, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "No solution found.\n");
        assert!(load_grid_from_file(&path).is_err());
    }

    #[test]
    fn test_create_example_puzzles() {
        let temp_dir = tempdir().unwrap();
        create_example_puzzles(temp_dir.path()).unwrap();

        let face = load_puzzle(temp_dir.path().join("face.txt"), PuzzleKind::TwoD).unwrap();
        assert_eq!(face.cell_count(), 25);
        let split = load_puzzle(temp_dir.path().join("split_3d.txt"), PuzzleKind::ThreeD).unwrap();
        assert_eq!(split.cell_count(), 3);
        assert!(load_puzzle(temp_dir.path().join("block_3d.txt"), PuzzleKind::ThreeD).is_ok());
    }
}
