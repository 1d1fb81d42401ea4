//! Post-run analysis helpers.
//!
//! Nothing here runs inside the tick loop; hosts call these on exported
//! histories after (or between) runs.

use crate::core_types::position::GridPos;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Group firebreak cells into connected lines.
///
/// Two cells belong to the same line when they are Moore-adjacent
/// (Chebyshev distance 1). Groups come out in first-seen order of the input
/// and each group preserves BFS discovery order, so output is deterministic
/// for a given history.
#[must_use]
pub fn group_firebreak_lines(cells: &[GridPos]) -> Vec<Vec<GridPos>> {
    let mut visited: FxHashMap<GridPos, bool> = cells.iter().map(|&c| (c, false)).collect();
    let mut groups = Vec::new();

    for &seed in cells {
        if visited.get(&seed).copied().unwrap_or(true) {
            continue;
        }
        let mut group = Vec::new();
        let mut queue = VecDeque::new();
        visited.insert(seed, true);
        queue.push_back(seed);

        while let Some(cell) = queue.pop_front() {
            group.push(cell);
            for &candidate in cells {
                if cell.chebyshev(candidate) != 1 {
                    continue;
                }
                if let Some(seen) = visited.get_mut(&candidate) {
                    if !*seen {
                        *seen = true;
                        queue.push_back(candidate);
                    }
                }
            }
        }
        groups.push(group);
    }
    groups
}
