//! Encoding of 3D stack clues

use super::constraints::Clause;
use super::line_encoder::{encode_runs, LineEncoding};
use super::variables::AuxAllocator;
use crate::config::{EncodingConfig, PlainStrategy};
use crate::puzzle::Marker;
use itertools::Itertools;

/// Clauses produced for one stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEncoding {
    /// `n = 0` or `n = len`: every cell fixed by a unit clause
    Forced(Vec<Clause>),
    /// Plain clue encoded straight on the cell variables
    Direct(Vec<Clause>),
    /// Selector encoding over the marker's run patterns
    Runs(LineEncoding),
}

impl StackEncoding {
    pub fn clauses(&self) -> &[Clause] {
        match self {
            StackEncoding::Forced(clauses) | StackEncoding::Direct(clauses) => clauses,
            StackEncoding::Runs(encoding) => &encoding.clauses,
        }
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        match self {
            StackEncoding::Forced(clauses) | StackEncoding::Direct(clauses) => clauses,
            StackEncoding::Runs(encoding) => encoding.clauses,
        }
    }

    /// Number of selector placements, zero for selector-free encodings
    pub fn placements(&self) -> usize {
        match self {
            StackEncoding::Runs(encoding) => encoding.placements(),
            _ => 0,
        }
    }
}

/// Turns marker clues into clauses
#[derive(Debug, Clone, Copy)]
pub struct StackEncoder {
    plain_strategy: PlainStrategy,
    square_max_groups: usize,
}

impl StackEncoder {
    pub fn new(plain_strategy: PlainStrategy, square_max_groups: usize) -> Self {
        Self {
            plain_strategy,
            square_max_groups,
        }
    }

    pub fn from_config(config: &EncodingConfig) -> Self {
        Self::new(config.plain_strategy, config.square_max_groups)
    }

    pub fn square_max_groups(&self) -> usize {
        self.square_max_groups
    }

    /// Encode one stack. `None` when the clue cannot fit the stack at all.
    pub fn encode(&self, cells: &[i32], marker: Marker, aux: &AuxAllocator) -> Option<StackEncoding> {
        let len = cells.len();
        let n = marker.count();

        if n > len {
            return None;
        }
        if n == 0 {
            return Some(StackEncoding::Forced(cells.iter().map(|&c| Clause::unit(-c)).collect()));
        }
        if n == len {
            return Some(StackEncoding::Forced(cells.iter().map(|&c| Clause::unit(c)).collect()));
        }

        match (marker, self.plain_strategy) {
            (Marker::Plain(n), PlainStrategy::Direct) => Some(StackEncoding::Direct(direct_single_run(cells, n))),
            _ => encode_runs(cells, &marker.run_patterns(len, self.square_max_groups), aux)
                .map(StackEncoding::Runs),
        }
    }
}

/// Exactly one run of `n` cells, for `0 < n < cells.len()`, without auxiliaries
pub fn direct_single_run(cells: &[i32], n: usize) -> Vec<Clause> {
    let len = cells.len();
    let mut clauses = Vec::new();

    // at least n filled: every choice of len - n + 1 cells holds a filled one
    for window in cells.iter().copied().combinations(len - n + 1) {
        clauses.push(Clause::new(window));
    }

    // at most n filled: no n + 1 cells are all filled
    for window in cells.iter().copied().combinations(n + 1) {
        clauses.push(Clause::new(window.into_iter().map(|c| -c).collect()));
    }

    // contiguous: two filled cells are less than n apart
    for (i, j) in (0..len).tuple_combinations() {
        if j - i >= n {
            clauses.push(Clause::binary(-cells[i], -cells[j]));
        }
    }

    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::lines::{all_lines, line_runs};
    use crate::sat::line_encoder::tests::count_extensions;
    use crate::sat::VariableManager;

    fn stack(len: usize) -> (VariableManager, Vec<i32>) {
        let vm = VariableManager::for_cube(len, 1, 1).unwrap();
        (vm, (1..=len as i32).collect())
    }

    /// Cell lines accepted by an encoding, selectors quantified existentially
    fn accepted(len: usize, encoding: &StackEncoding) -> Vec<Vec<bool>> {
        let selectors = match encoding {
            StackEncoding::Runs(runs) => runs.selectors.clone(),
            _ => Vec::new(),
        };
        let mut lines: Vec<Vec<bool>> = count_extensions(len, &selectors, encoding.clauses())
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(line, _)| line)
            .collect();
        lines.sort();
        lines
    }

    fn expected(len: usize, marker: Marker, max_groups: usize) -> Vec<Vec<bool>> {
        let mut lines: Vec<Vec<bool>> = all_lines(len).filter(|l| marker.is_satisfied_by(l, max_groups)).collect();
        lines.sort();
        lines
    }

    #[test]
    fn test_plain_two_in_four_both_strategies() {
        for strategy in [PlainStrategy::Selector, PlainStrategy::Direct] {
            let (vm, cells) = stack(4);
            let encoder = StackEncoder::new(strategy, 4);
            let encoding = encoder.encode(&cells, Marker::Plain(2), vm.aux()).unwrap();

            let lines = accepted(4, &encoding);
            assert_eq!(lines.len(), 3, "{:?}", strategy);
            assert!(lines.iter().all(|l| line_runs(l) == vec![2]));
        }
    }

    #[test]
    fn test_direct_plain_allocates_nothing() {
        let (vm, cells) = stack(5);
        let encoder = StackEncoder::new(PlainStrategy::Direct, 4);
        let encoding = encoder.encode(&cells, Marker::Plain(3), vm.aux()).unwrap();
        assert!(matches!(encoding, StackEncoding::Direct(_)));
        assert_eq!(vm.aux().allocated(), 0);
        assert_eq!(encoding.placements(), 0);
    }

    #[test]
    fn test_degenerate_counts_force_cells() {
        let (vm, cells) = stack(4);
        let encoder = StackEncoder::new(PlainStrategy::Selector, 4);
        for marker in [Marker::Plain(0), Marker::Circle(0), Marker::Square(0)] {
            let encoding = encoder.encode(&cells, marker, vm.aux()).unwrap();
            assert_eq!(encoding.clauses(), &[Clause::unit(-1), Clause::unit(-2), Clause::unit(-3), Clause::unit(-4)]);
        }
        for marker in [Marker::Plain(4), Marker::Circle(4), Marker::Square(4)] {
            let encoding = encoder.encode(&cells, marker, vm.aux()).unwrap();
            assert_eq!(accepted(4, &encoding), vec![vec![true; 4]]);
        }
        assert_eq!(vm.aux().allocated(), 0);
    }

    #[test]
    fn test_oversized_clue_is_skipped() {
        let (vm, cells) = stack(3);
        let encoder = StackEncoder::new(PlainStrategy::Selector, 4);
        assert!(encoder.encode(&cells, Marker::Plain(4), vm.aux()).is_none());
        // two runs of 2 need 5 cells
        assert!(encoder.encode(&cells, Marker::Circle(2), vm.aux()).is_none());
    }

    #[test]
    fn test_markers_match_brute_force() {
        for strategy in [PlainStrategy::Selector, PlainStrategy::Direct] {
            let encoder = StackEncoder::new(strategy, 4);
            for len in 1..=6 {
                for n in 1..len {
                    for marker in [Marker::Plain(n), Marker::Circle(n), Marker::Square(n)] {
                        let (vm, cells) = stack(len);
                        let want = expected(len, marker, 4);
                        match encoder.encode(&cells, marker, vm.aux()) {
                            Some(encoding) => assert_eq!(accepted(len, &encoding), want, "{} in {}", marker, len),
                            None => assert!(want.is_empty(), "{} in {} skipped", marker, len),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_circle_rejects_touching_runs() {
        let (vm, cells) = stack(5);
        let encoder = StackEncoder::new(PlainStrategy::Selector, 4);
        let encoding = encoder.encode(&cells, Marker::Circle(1), vm.aux()).unwrap();
        let lines = accepted(5, &encoding);
        // C(4, 2) placements of two singles in five cells
        assert_eq!(lines.len(), 6);
        assert!(!lines.contains(&vec![true, true, false, false, false]));
    }

    #[test]
    fn test_square_group_bound_is_configurable() {
        let (vm, cells) = stack(9);
        let five_singles = vec![true, false, true, false, true, false, true, false, true];

        let narrow = StackEncoder::new(PlainStrategy::Selector, 4)
            .encode(&cells, Marker::Square(1), vm.aux())
            .unwrap();
        assert!(!narrow.clauses().is_empty());
        let wide = StackEncoder::new(PlainStrategy::Selector, 5)
            .encode(&cells, Marker::Square(1), vm.aux())
            .unwrap();

        // the last placement of the wide encoding is the five-group line
        let StackEncoding::Runs(runs) = wide else { panic!("expected selector encoding") };
        assert_eq!(runs.placements(), narrow.placements() + 1);
        let last = *runs.selectors.last().unwrap();
        let implied: Vec<bool> = runs
            .clauses
            .iter()
            .filter(|c| c.literals.len() == 2 && c.literals[0] == -last)
            .map(|c| c.literals[1] > 0)
            .collect();
        assert_eq!(implied, five_singles);
    }
}
