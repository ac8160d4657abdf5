//! Line-level diff between two historical text states.
//!
//! Produces separate addition and deletion lists rather than a unified
//! diff: the frontend renders removed lines against the source state and
//! inserted lines against the destination state independently.

use serde::{Deserialize, Serialize};

/// One changed line in a diff result.
///
/// `start`/`end` are half-open line positions within the side the entry
/// belongs to (source lines for deletions, destination lines for
/// additions), not byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Compute a line-level diff between two texts.
///
/// Runs a longest-common-subsequence opcode walk over the line sequences:
/// lines missing from the destination become deletions, lines missing from
/// the source become additions, and a changed line contributes one of each.
/// Identical inputs yield two empty lists.
pub fn diff_lines(from_text: &str, to_text: &str) -> (Vec<DiffEntry>, Vec<DiffEntry>) {
    if from_text == to_text {
        return (Vec::new(), Vec::new());
    }

    let from_lines: Vec<&str> = from_text.lines().collect();
    let to_lines: Vec<&str> = to_text.lines().collect();
    let m = from_lines.len();
    let n = to_lines.len();

    // Build LCS table.
    let mut lcs = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            if from_lines[i - 1] == to_lines[j - 1] {
                lcs[i][j] = lcs[i - 1][j - 1] + 1;
            } else {
                lcs[i][j] = lcs[i - 1][j].max(lcs[i][j - 1]);
            }
        }
    }

    // Backtrack, recording the source/destination index of every changed line.
    enum Op {
        Equal,
        Added(usize),
        Removed(usize),
    }

    let mut ops = Vec::new();
    let mut i = m;
    let mut j = n;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && from_lines[i - 1] == to_lines[j - 1] {
            ops.push(Op::Equal);
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            ops.push(Op::Added(j - 1));
            j -= 1;
        } else {
            ops.push(Op::Removed(i - 1));
            i -= 1;
        }
    }
    ops.reverse();

    let mut additions = Vec::new();
    let mut deletions = Vec::new();
    for op in ops {
        match op {
            Op::Equal => {}
            Op::Added(idx) => additions.push(DiffEntry {
                start: idx,
                end: idx + 1,
                text: to_lines[idx].to_string(),
            }),
            Op::Removed(idx) => deletions.push(DiffEntry {
                start: idx,
                end: idx + 1,
                text: from_lines[idx].to_string(),
            }),
        }
    }

    (additions, deletions)
}
