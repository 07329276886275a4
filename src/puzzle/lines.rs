//! Helpers for looking at a single line of cells

/// Lengths of the maximal runs of filled cells, in order
pub fn line_runs(cells: &[bool]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut current = 0;

    for &filled in cells {
        if filled {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }

    runs
}

/// Render a line using `X` for filled and `.` for empty cells
pub fn render_line(cells: &[bool]) -> String {
    cells.iter().map(|&c| if c { 'X' } else { '.' }).collect()
}

/// Parse a line of `X` / `.` characters; `None` on any other character
pub fn parse_line(text: &str) -> Option<Vec<bool>> {
    text.chars()
        .map(|ch| match ch {
            'X' | 'x' | '#' => Some(true),
            '.' => Some(false),
            _ => None,
        })
        .collect()
}

/// Iterate over every boolean line of the given length (bit `i` of the counter is cell `i`)
pub fn all_lines(length: usize) -> impl Iterator<Item = Vec<bool>> {
    (0u64..(1u64 << length)).map(move |bits| (0..length).map(|i| bits & (1 << i) != 0).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_runs() {
        assert_eq!(line_runs(&parse_line("XX.X.").unwrap()), vec![2, 1]);
        assert_eq!(line_runs(&parse_line(".....").unwrap()), Vec::<usize>::new());
        assert_eq!(line_runs(&parse_line("XXXXX").unwrap()), vec![5]);
        assert_eq!(line_runs(&parse_line(".X..XXX").unwrap()), vec![1, 3]);
    }

    #[test]
    fn test_render_and_parse() {
        let cells = vec![true, false, true, true];
        assert_eq!(render_line(&cells), "X.XX");
        assert_eq!(parse_line("X.XX"), Some(cells));
        assert_eq!(parse_line("X?X"), None);
    }

    #[test]
    fn test_all_lines_count() {
        let lines: Vec<_> = all_lines(4).collect();
        assert_eq!(lines.len(), 16);
        assert!(lines.iter().all(|l| l.len() == 4));
    }
}
