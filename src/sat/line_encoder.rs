//! Selector encoding of "this line holds one of these run sequences"
//!
//! Every feasible placement of a run sequence gets a selector variable `S`
//! and, for each cell `p` of the line, the clause `(-S | lit_p)` where
//! `lit_p` is the cell literal the placement requires. A final clause over
//! all selectors demands that some placement holds. Two placements differ
//! in at least one cell, so at most one selector can be true at a time.

use super::constraints::Clause;
use super::intervals::line_placements;
use super::variables::AuxAllocator;
use crate::puzzle::Hint;

/// Clauses produced for one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEncoding {
    pub clauses: Vec<Clause>,
    /// Selector per placement, empty when the line was encoded without selectors
    pub selectors: Vec<i32>,
}

impl LineEncoding {
    pub fn placements(&self) -> usize {
        self.selectors.len()
    }
}

/// Encode a line that must match one of several alternative run sequences.
///
/// `cells` holds the cell variables in line order. Alternatives that do not
/// fit are ignored; `None` means no alternative fits and the line is left
/// unconstrained.
pub fn encode_runs(cells: &[i32], alternatives: &[Vec<usize>], aux: &AuxAllocator) -> Option<LineEncoding> {
    let patterns: Vec<Vec<bool>> = alternatives
        .iter()
        .filter_map(|blocks| line_placements(cells.len(), blocks))
        .flatten()
        .collect();

    if patterns.is_empty() {
        return None;
    }

    let mut encoding = LineEncoding {
        clauses: Vec::with_capacity(patterns.len() * cells.len() + 1),
        selectors: Vec::with_capacity(patterns.len()),
    };

    for pattern in patterns {
        let selector = aux.next_auxiliary();
        for (&cell, &filled) in cells.iter().zip(&pattern) {
            let literal = if filled { cell } else { -cell };
            encoding.clauses.push(Clause::binary(-selector, literal));
        }
        encoding.selectors.push(selector);
    }

    encoding.clauses.push(Clause::new(encoding.selectors.clone()));
    Some(encoding)
}

/// Encode a 2D row or column hint
pub fn encode_line(cells: &[i32], hint: &Hint, aux: &AuxAllocator) -> Option<LineEncoding> {
    encode_runs(cells, &[hint.blocks().to_vec()], aux)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::puzzle::lines::{all_lines, line_runs};
    use crate::sat::VariableManager;
    use std::collections::HashMap;

    /// Models of `clauses` restricted to the line cells `1..=len`, by brute force
    /// over cells and auxiliaries. Returns, per cell assignment, how many
    /// auxiliary assignments complete it to a model.
    pub(crate) fn count_extensions(len: usize, aux: &[i32], clauses: &[Clause]) -> HashMap<Vec<bool>, usize> {
        let mut extensions = HashMap::new();
        for line in all_lines(len) {
            let mut count = 0;
            for bits in 0u64..(1u64 << aux.len()) {
                let value = |var: i32| {
                    if (var as usize) <= len {
                        line[var as usize - 1]
                    } else {
                        let idx = aux.iter().position(|&a| a == var).expect("unknown variable");
                        bits & (1 << idx) != 0
                    }
                };
                if clauses.iter().all(|c| c.evaluate(value)) {
                    count += 1;
                }
            }
            extensions.insert(line, count);
        }
        extensions
    }

    fn encode_hint(len: usize, blocks: Vec<usize>) -> Option<LineEncoding> {
        let vm = VariableManager::for_grid(1, len).unwrap();
        let cells: Vec<i32> = (1..=len as i32).collect();
        encode_line(&cells, &Hint::new(blocks).unwrap(), vm.aux())
    }

    #[test]
    fn test_two_one_in_five_selectors() {
        let encoding = encode_hint(5, vec![2, 1]).unwrap();
        assert_eq!(encoding.selectors, vec![6, 7, 8]);
        // 5 implications per placement plus the at-least-one clause
        assert_eq!(encoding.clauses.len(), 3 * 5 + 1);
        assert_eq!(encoding.clauses.last().unwrap().literals, vec![6, 7, 8]);
    }

    #[test]
    fn test_exactly_one_selector_per_model() {
        let encoding = encode_hint(5, vec![2, 1]).unwrap();
        let extensions = count_extensions(5, &encoding.selectors, &encoding.clauses);

        for (line, count) in extensions {
            if line_runs(&line) == vec![2, 1] {
                assert_eq!(count, 1, "line {:?}", line);
            } else {
                assert_eq!(count, 0, "line {:?}", line);
            }
        }
    }

    #[test]
    fn test_sound_and_complete_for_small_hints() {
        let hints: [&[usize]; 6] = [&[1], &[2], &[1, 1], &[1, 2], &[3], &[1, 1, 1]];
        for blocks in hints {
            let encoding = encode_hint(5, blocks.to_vec()).unwrap();
            let extensions = count_extensions(5, &encoding.selectors, &encoding.clauses);
            for (line, count) in extensions {
                let expected = usize::from(line_runs(&line) == blocks.to_vec());
                assert_eq!(count, expected, "hint {:?}, line {:?}", blocks, line);
            }
        }
    }

    #[test]
    fn test_empty_hint_forces_empty_line() {
        let encoding = encode_hint(3, vec![]).unwrap();
        assert_eq!(encoding.placements(), 1);
        let extensions = count_extensions(3, &encoding.selectors, &encoding.clauses);
        assert_eq!(extensions[&vec![false, false, false]], 1);
        assert_eq!(extensions.values().sum::<usize>(), 1);
    }

    #[test]
    fn test_infeasible_hint_is_skipped() {
        let vm = VariableManager::for_grid(1, 3).unwrap();
        let hint = Hint::new(vec![5]).unwrap();
        assert!(encode_line(&[1, 2, 3], &hint, vm.aux()).is_none());
        assert_eq!(vm.aux().allocated(), 0);
    }

    #[test]
    fn test_alternatives_share_one_choice() {
        let vm = VariableManager::for_grid(1, 5).unwrap();
        let cells: Vec<i32> = (1..=5).collect();
        let encoding = encode_runs(&cells, &[vec![1, 1], vec![1, 1, 1]], vm.aux()).unwrap();

        // 6 placements of two singles plus 1 of three singles
        assert_eq!(encoding.placements(), 7);
        let extensions = count_extensions(5, &encoding.selectors, &encoding.clauses);
        for (line, count) in extensions {
            let runs = line_runs(&line);
            let expected = usize::from(runs == vec![1, 1] || runs == vec![1, 1, 1]);
            assert_eq!(count, expected, "line {:?}", line);
        }
    }
}
