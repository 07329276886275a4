//! Enumeration of gap layouts for a run of blocks in a line
//!
//! A line of length `L` holding blocks `b1..bk` has slack
//! `L - sum(b) - (k - 1)`. Every placement of the blocks is described by the
//! `k + 1` gaps around them: the outer gaps may be empty, the interior ones
//! hold at least one cell, and together they cover the `L - sum(b)` empty
//! cells. Distributing the slack over `k + 1` gaps is a composition
//! problem with exactly `C(slack + k, k)` answers.

/// All gap tuples `(g0..gk)` for `block_count >= 1` blocks and the given slack.
///
/// Tuples come out in lexicographic order. Returns nothing when
/// `block_count` is zero; an empty line has a single gap and needs no
/// enumeration.
pub fn gap_layouts(block_count: usize, slack: usize) -> Vec<Vec<usize>> {
    let mut layouts = Vec::new();
    if block_count == 0 {
        return layouts;
    }

    let mut current = Vec::with_capacity(block_count + 1);
    distribute(0, block_count + 1, slack, &mut current, &mut layouts);
    layouts
}

/// Share `remaining` extra cells over gaps `slot..slots`
fn distribute(
    slot: usize,
    slots: usize,
    remaining: usize,
    current: &mut Vec<usize>,
    layouts: &mut Vec<Vec<usize>>,
) {
    let minimum = if slot == 0 || slot == slots - 1 { 0 } else { 1 };

    if slot == slots - 1 {
        current.push(minimum + remaining);
        layouts.push(current.clone());
        current.pop();
        return;
    }

    for extra in 0..=remaining {
        current.push(minimum + extra);
        distribute(slot + 1, slots, remaining - extra, current, layouts);
        current.pop();
    }
}

/// Slack of `blocks` in a line, or `None` when they do not fit
pub fn slack_for(line_length: usize, blocks: &[usize]) -> Option<usize> {
    if blocks.is_empty() {
        return Some(line_length);
    }
    let needed = blocks.iter().sum::<usize>() + blocks.len() - 1;
    line_length.checked_sub(needed)
}

/// Number of layouts `gap_layouts` would produce, without building them
pub fn layout_count(block_count: usize, slack: usize) -> u128 {
    if block_count == 0 {
        return 1;
    }
    binomial((slack + block_count) as u128, block_count as u128)
}

fn binomial(n: u128, k: u128) -> u128 {
    let k = k.min(n - k);
    (0..k).fold(1u128, |acc, i| acc.saturating_mul(n - i) / (i + 1))
}

/// Fill pattern of one placement: gap, block, gap, block, ..., gap
pub fn placement_pattern(blocks: &[usize], gaps: &[usize]) -> Vec<bool> {
    let mut pattern = Vec::with_capacity(blocks.iter().sum::<usize>() + gaps.iter().sum::<usize>());
    for (i, &gap) in gaps.iter().enumerate() {
        pattern.extend(std::iter::repeat(false).take(gap));
        if let Some(&block) = blocks.get(i) {
            pattern.extend(std::iter::repeat(true).take(block));
        }
    }
    pattern
}

/// Every fill pattern of `blocks` in a line, or `None` if the blocks do not fit
pub fn line_placements(line_length: usize, blocks: &[usize]) -> Option<Vec<Vec<bool>>> {
    let slack = slack_for(line_length, blocks)?;
    if blocks.is_empty() {
        return Some(vec![vec![false; line_length]]);
    }
    Some(
        gap_layouts(blocks.len(), slack)
            .iter()
            .map(|gaps| placement_pattern(blocks, gaps))
            .collect(),
    )
}
