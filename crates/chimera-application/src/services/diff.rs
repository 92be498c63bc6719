//! Line diff rendered in unified format.

use async_trait::async_trait;
use chimera_core::services::DiffGenerator;
use chimera_core::Result;
use std::collections::HashMap;

/// Unchanged lines shown around each change.
pub const CONTEXT_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Keep,
    Remove,
    Add,
}

/// One line of the edit script; `old`/`new` count the lines of each side
/// consumed before this one.
#[derive(Debug, Clone, Copy)]
struct DiffLine<'a> {
    edit: Edit,
    text: &'a str,
    old: usize,
    new: usize,
}

/// Maps each distinct line to a small id so the LCS passes compare integers.
fn intern<'a>(a: &[&'a str], b: &[&'a str]) -> (Vec<u32>, Vec<u32>) {
    let mut ids: HashMap<&'a str, u32> = HashMap::new();
    let mut id_of = |line: &'a str| -> u32 {
        let next = ids.len() as u32;
        *ids.entry(line).or_insert(next)
    };
    let a = a.iter().map(|&line| id_of(line)).collect();
    let b = b.iter().map(|&line| id_of(line)).collect();
    (a, b)
}

/// Last row of the LCS length table: `row[j]` is the LCS length of `a` and `b[..j]`.
fn lcs_row<'x>(a: impl Iterator<Item = &'x u32>, b: &[u32]) -> Vec<usize> {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for j in 1..=b.len() {
            cur[j] = if *x == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(cur[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Hirschberg's divide and conquer: appends the matched `(old, new)` index
/// pairs of one longest common subsequence, in order, using linear memory.
fn lcs_pairs(a: &[u32], b: &[u32], a_off: usize, b_off: usize, out: &mut Vec<(usize, usize)>) {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    out.extend((0..prefix).map(|i| (a_off + i, b_off + i)));
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let (a_off, b_off) = (a_off + prefix, b_off + prefix);

    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    if a.len() == 1 {
        if let Some(j) = b.iter().position(|y| *y == a[0]) {
            out.push((a_off, b_off + j));
        }
    } else if !a.is_empty() && !b.is_empty() {
        let mid = a.len() / 2;
        let forward = lcs_row(a[..mid].iter(), b);
        let b_rev: Vec<u32> = b.iter().rev().copied().collect();
        let backward = lcs_row(a[mid..].iter().rev(), &b_rev);
        let split = (0..=b.len())
            .max_by_key(|&k| (forward[k] + backward[b.len() - k], std::cmp::Reverse(k)))
            .unwrap_or(0);

        lcs_pairs(&a[..mid], &b[..split], a_off, b_off, out);
        lcs_pairs(&a[mid..], &b[split..], a_off + mid, b_off + split, out);
    }

    let (a_end, b_end) = (a_off + a.len(), b_off + b.len());
    out.extend((0..suffix).map(|i| (a_end + i, b_end + i)));
}

/// Longest-common-subsequence edit script. Within each changed region the
/// removals are emitted before the additions.
fn edit_script<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<DiffLine<'a>> {
    let (ids_a, ids_b) = intern(a, b);
    let mut matches = Vec::new();
    lcs_pairs(&ids_a, &ids_b, 0, 0, &mut matches);

    let mut script = Vec::with_capacity(a.len() + b.len() - matches.len());
    let (mut i, mut j) = (0, 0);
    let push = |script: &mut Vec<DiffLine<'a>>, edit, text, old, new| {
        script.push(DiffLine {
            edit,
            text,
            old,
            new,
        })
    };
    for (mi, mj) in matches.into_iter().chain(std::iter::once((a.len(), b.len()))) {
        while i < mi {
            push(&mut script, Edit::Remove, a[i], i, j);
            i += 1;
        }
        while j < mj {
            push(&mut script, Edit::Add, b[j], i, j);
            j += 1;
        }
        if mi < a.len() {
            push(&mut script, Edit::Keep, a[i], i, j);
            i += 1;
            j += 1;
        }
    }
    script
}

/// Groups changes into `[start, end)` ranges of the script, merging changes
/// whose surrounding context would overlap.
fn hunk_ranges(script: &[DiffLine<'_>]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for (index, line) in script.iter().enumerate() {
        if line.edit == Edit::Keep {
            continue;
        }
        let start = index.saturating_sub(CONTEXT_LINES);
        let end = (index + CONTEXT_LINES + 1).min(script.len());
        match ranges.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => ranges.push((start, end)),
        }
    }
    ranges
}

fn range_header(start: usize, len: usize) -> String {
    // An empty side points at the line before the insertion.
    let first = if len == 0 { start } else { start + 1 };
    format!("{first},{len}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LcsDiffGenerator;

impl LcsDiffGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn unified_diff(&self, original: &str, modified: &str) -> String {
        let a: Vec<&str> = original.lines().collect();
        let b: Vec<&str> = modified.lines().collect();
        let script = edit_script(&a, &b);

        let mut out = vec!["--- Original".to_string(), "+++ Modified".to_string()];
        for (start, end) in hunk_ranges(&script) {
            let hunk = &script[start..end];
            let old_len = hunk.iter().filter(|l| l.edit != Edit::Add).count();
            let new_len = hunk.iter().filter(|l| l.edit != Edit::Remove).count();
            out.push(format!(
                "@@ -{} +{} @@",
                range_header(hunk[0].old, old_len),
                range_header(hunk[0].new, new_len)
            ));
            out.extend(hunk.iter().map(|line| {
                let marker = match line.edit {
                    Edit::Keep => ' ',
                    Edit::Remove => '-',
                    Edit::Add => '+',
                };
                format!("{marker}{}", line.text)
            }));
        }
        out.join("\n")
    }
}

#[async_trait]
impl DiffGenerator for LcsDiffGenerator {
    async fn generate_unified_diff(&self, original: &str, modified: &str) -> Result<String> {
        Ok(self.unified_diff(original, modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_change() {
        let diff = LcsDiffGenerator::new().unified_diff("a\nb\nc", "a\nx\nc");
        assert_eq!(
            diff,
            "--- Original\n+++ Modified\n@@ -1,3 +1,3 @@\n a\n-b\n+x\n c"
        );
    }

    #[test]
    fn test_identical_inputs_have_no_hunks() {
        let diff = LcsDiffGenerator::new().unified_diff("same\ntext", "same\ntext");
        assert_eq!(diff, "--- Original\n+++ Modified");
    }

    #[test]
    fn test_distant_changes_form_separate_hunks() {
        let original: Vec<String> = (1..=20).map(|n| format!("l{n}")).collect();
        let mut modified = original.clone();
        modified[1] = "X".to_string();
        modified[17] = "Y".to_string();

        let diff = LcsDiffGenerator::new().unified_diff(&original.join("\n"), &modified.join("\n"));

        assert_eq!(diff.matches("\n@@ ").count(), 2);
        assert!(diff.contains("@@ -1,5 +1,5 @@\n l1\n-l2\n+X\n l3"));
        assert!(diff.contains("@@ -15,6 +15,6 @@"));
    }

    #[test]
    fn test_inserted_line_keeps_surrounding_context() {
        let diff = LcsDiffGenerator::new().unified_diff("a\nb\nc\nd", "a\nb\nnew\nc\nd");
        assert_eq!(
            diff,
            "--- Original\n+++ Modified\n@@ -1,4 +1,5 @@\n a\n b\n+new\n c\n d"
        );
    }

    #[test]
    fn test_moved_block_is_a_minimal_edit() {
        let diff = LcsDiffGenerator::new().unified_diff("x\na\nb\nc", "a\nb\nc\nx");
        assert_eq!(
            diff,
            "--- Original\n+++ Modified\n@@ -1,4 +1,4 @@\n-x\n a\n b\n c\n+x"
        );
    }

    #[test]
    fn test_large_disjoint_inputs_form_one_hunk() {
        let original: Vec<String> = (0..3000).map(|n| format!("old {n}")).collect();
        let modified: Vec<String> = (0..3000).map(|n| format!("new {n}")).collect();

        let diff = LcsDiffGenerator::new().unified_diff(&original.join("\n"), &modified.join("\n"));
        let lines: Vec<&str> = diff.lines().collect();

        assert_eq!(lines[2], "@@ -1,3000 +1,3000 @@");
        assert_eq!(lines.len(), 3 + 6000);
        assert_eq!(lines[3], "-old 0");
        assert_eq!(lines[3002], "-old 2999");
        assert_eq!(lines[3003], "+new 0");
    }

    #[test]
    fn test_insertion_into_empty_original() {
        let diff = LcsDiffGenerator::new().unified_diff("", "x = 1");
        assert_eq!(diff, "--- Original\n+++ Modified\n@@ -0,0 +1,1 @@\n+x = 1");
    }
}
