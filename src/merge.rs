use tracing::debug;

use crate::conflict::{self, Line};
use crate::emit;
use crate::error::PatchMergeError;
use crate::hunk::{self, Hunk, PatchFile};

// ---------------------------------------------------------------------------
// Resolution capability
// ---------------------------------------------------------------------------

/// Decision for a pair of overlapping hunks that differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Keep the hunk that sorts first, drop the other.
    PreferFirst,
    /// Keep the hunk that sorts second, drop the other.
    PreferSecond,
    /// Give up on the whole file.
    Abort,
}

/// A genuine conflict handed to a [`ConflictResolver`].
#[derive(Debug)]
pub struct HunkConflict<'a> {
    /// 1-based position of this conflict within the file.
    pub index: usize,
    pub first: &'a Hunk,
    pub second: &'a Hunk,
}

/// Decides which of two conflicting hunks survives.
pub trait ConflictResolver {
    fn resolve(&mut self, conflict: &HunkConflict<'_>) -> Result<Choice, PatchMergeError>;
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// The merged hunk list, before renumbering.
#[derive(Debug, Clone)]
pub struct MergedPatch {
    pub header: Vec<Line>,
    /// Surviving hunks, sorted by source start.
    pub hunks: Vec<Hunk>,
    pub conflicts: usize,
    pub duplicates: usize,
}

impl MergedPatch {
    /// Renumber target ranges and serialize.
    pub fn into_text(mut self) -> String {
        emit::emit(&self.header, &mut self.hunks)
    }
}

/// Merge the hunks of both sides of a conflicted patch.
///
/// Only neighbours in source order are compared: each hunk is checked against
/// the last hunk that is still kept. Identical overlapping hunks collapse
/// silently; differing ones go to `resolver`.
pub fn merge_patches(
    file_a: PatchFile,
    file_b: PatchFile,
    resolver: &mut dyn ConflictResolver,
) -> Result<MergedPatch, PatchMergeError> {
    let header_a = file_a.header.ok_or(PatchMergeError::NotAPatch { side: 'A' })?;
    let header_b = file_b.header.ok_or(PatchMergeError::NotAPatch { side: 'B' })?;
    if header_a != header_b {
        return Err(PatchMergeError::HeaderMismatch);
    }

    let mut sorted = file_a.hunks;
    sorted.extend(file_b.hunks);
    // Stable: side A stays ahead of side B at equal starts.
    sorted.sort_by_key(|h| h.start_a);

    let mut dropped = vec![false; sorted.len()];
    let mut last: Option<usize> = None;
    let mut conflicts = 0;
    let mut duplicates = 0;

    for current in 0..sorted.len() {
        let Some(prev) = last else {
            last = Some(current);
            continue;
        };

        let (kept, hunk) = (&sorted[prev], &sorted[current]);
        if !kept.overlaps(hunk) {
            last = Some(current);
            continue;
        }

        if kept.same_edit(hunk) {
            debug!(start = hunk.start_a, "collapsing duplicate hunk");
            dropped[current] = true;
            duplicates += 1;
            continue;
        }

        conflicts += 1;
        let choice = resolver.resolve(&HunkConflict {
            index: conflicts,
            first: kept,
            second: hunk,
        })?;
        debug!(index = conflicts, ?choice, "conflict resolved");

        match choice {
            Choice::PreferFirst => dropped[current] = true,
            Choice::PreferSecond => {
                dropped[prev] = true;
                last = Some(current);
            }
            Choice::Abort => return Err(PatchMergeError::ResolutionAborted(conflicts)),
        }
    }

    let hunks = sorted
        .into_iter()
        .zip(dropped)
        .filter(|(_, gone)| !gone)
        .map(|(h, _)| h)
        .collect();

    Ok(MergedPatch {
        header: header_a,
        hunks,
        conflicts,
        duplicates,
    })
}

/// Outcome of resolving one conflicted patch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub hunks: usize,
    pub conflicts: usize,
    pub duplicates: usize,
}

/// Resolve the full text of a conflicted patch file.
pub fn resolve_patch_text(
    content: &str,
    resolver: &mut dyn ConflictResolver,
) -> Result<Resolved, PatchMergeError> {
    let (lines_a, lines_b) = conflict::split_conflicts(content);
    let file_a = hunk::parse_patch(lines_a);
    let file_b = hunk::parse_patch(lines_b);

    let merged = merge_patches(file_a, file_b, resolver)?;
    let (hunks, conflicts, duplicates) = (merged.hunks.len(), merged.conflicts, merged.duplicates);

    Ok(Resolved {
        text: merged.into_text(),
        hunks,
        conflicts,
        duplicates,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers from a fixed script and records what it was asked.
    struct Scripted {
        answers: Vec<Choice>,
        seen: Vec<(usize, usize, usize)>,
    }

    impl Scripted {
        fn new(answers: &[Choice]) -> Self {
            Self {
                answers: answers.to_vec(),
                seen: Vec::new(),
            }
        }
    }

    impl ConflictResolver for Scripted {
        fn resolve(&mut self, c: &HunkConflict<'_>) -> Result<Choice, PatchMergeError> {
            self.seen.push((c.index, c.first.start_a, c.second.start_a));
            Ok(self.answers.remove(0))
        }
    }

    fn hunk(start_a: usize, len_a: usize, len_b: usize, body: &[&str]) -> Hunk {
        Hunk {
            start_a,
            len_a,
            start_b: start_a,
            len_b,
            suffix: "\n".into(),
            lines: body.iter().map(|l| Line::added(*l)).collect(),
        }
    }

    fn patch(hunks: Vec<Hunk>) -> PatchFile {
        PatchFile {
            header: Some(vec![Line::common("--- a/f\n"), Line::common("+++ b/f\n")]),
            hunks,
        }
    }

    fn starts(merged: &MergedPatch) -> Vec<usize> {
        merged.hunks.iter().map(|h| h.start_a).collect()
    }

    #[test]
    fn test_disjoint_hunks_union_without_prompt() {
        let a = patch(vec![hunk(1, 2, 2, &["-a\n"]), hunk(40, 1, 1, &["-c\n"])]);
        let b = patch(vec![hunk(10, 3, 3, &["-b\n"])]);
        let mut r = Scripted::new(&[]);
        let merged = merge_patches(a, b, &mut r).unwrap();
        assert_eq!(starts(&merged), vec![1, 10, 40]);
        assert!(r.seen.is_empty());
        assert_eq!(merged.conflicts, 0);
    }

    #[test]
    fn test_adjacent_hunks_do_not_overlap() {
        let a = patch(vec![hunk(1, 3, 3, &["-a\n"])]);
        let b = patch(vec![hunk(4, 1, 1, &["-b\n"])]);
        let merged = merge_patches(a, b, &mut Scripted::new(&[])).unwrap();
        assert_eq!(starts(&merged), vec![1, 4]);
    }

    #[test]
    fn test_identical_hunks_collapse() {
        let a = patch(vec![hunk(5, 2, 3, &["-x\n", "+y\n"])]);
        let b = patch(vec![hunk(5, 2, 3, &["-x\n", "+y\n"])]);
        let mut r = Scripted::new(&[]);
        let merged = merge_patches(a, b, &mut r).unwrap();
        assert_eq!(merged.hunks.len(), 1);
        assert_eq!(merged.duplicates, 1);
        assert!(r.seen.is_empty());
    }

    #[test]
    fn test_prefer_first_keeps_side_a_at_equal_start() {
        let a = patch(vec![hunk(5, 2, 2, &["+from a\n"])]);
        let b = patch(vec![hunk(5, 2, 2, &["+from b\n"])]);
        let mut r = Scripted::new(&[Choice::PreferFirst]);
        let merged = merge_patches(a, b, &mut r).unwrap();
        assert_eq!(merged.hunks.len(), 1);
        assert_eq!(merged.hunks[0].lines[0].content, "+from a\n");
        assert_eq!(r.seen, vec![(1, 5, 5)]);
    }

    #[test]
    fn test_prefer_second_keeps_side_b_at_equal_start() {
        let a = patch(vec![hunk(5, 2, 2, &["+from a\n"])]);
        let b = patch(vec![hunk(5, 2, 2, &["+from b\n"])]);
        let mut r = Scripted::new(&[Choice::PreferSecond]);
        let merged = merge_patches(a, b, &mut r).unwrap();
        assert_eq!(merged.hunks.len(), 1);
        assert_eq!(merged.hunks[0].lines[0].content, "+from b\n");
        assert_eq!(merged.conflicts, 1);
    }

    #[test]
    fn test_abort_returns_error() {
        let a = patch(vec![hunk(5, 2, 2, &["+a\n"])]);
        let b = patch(vec![hunk(6, 2, 2, &["+b\n"])]);
        let err = merge_patches(a, b, &mut Scripted::new(&[Choice::Abort])).unwrap_err();
        assert!(matches!(err, PatchMergeError::ResolutionAborted(1)));
    }

    #[test]
    fn test_header_mismatch() {
        let a = patch(vec![hunk(1, 1, 1, &[])]);
        let mut b = patch(vec![hunk(1, 1, 1, &[])]);
        b.header = Some(vec![Line::common("--- a/g\n"), Line::common("+++ b/g\n")]);
        let err = merge_patches(a, b, &mut Scripted::new(&[])).unwrap_err();
        assert!(matches!(err, PatchMergeError::HeaderMismatch));
    }

    #[test]
    fn test_side_without_hunks_is_not_a_patch() {
        let a = patch(vec![hunk(1, 1, 1, &[])]);
        let b = PatchFile::default();
        let err = merge_patches(a, b, &mut Scripted::new(&[])).unwrap_err();
        assert!(matches!(err, PatchMergeError::NotAPatch { side: 'B' }));
    }

    #[test]
    fn test_prefer_second_advances_comparison_to_winner() {
        // 1..6 conflicts with 4..6; the winner 4..6 no longer overlaps 6..7.
        let a = patch(vec![hunk(1, 5, 5, &["+a\n"]), hunk(6, 1, 1, &["+c\n"])]);
        let b = patch(vec![hunk(4, 2, 2, &["+b\n"])]);
        let mut r = Scripted::new(&[Choice::PreferSecond]);
        let merged = merge_patches(a, b, &mut r).unwrap();
        assert_eq!(starts(&merged), vec![4, 6]);
        assert_eq!(r.seen, vec![(1, 1, 4)]);
    }

    #[test]
    fn test_prefer_first_keeps_comparing_against_kept_hunk() {
        // The loser at 4 is dropped; 5 still overlaps the kept 1..11.
        let a = patch(vec![hunk(1, 10, 10, &["+a\n"])]);
        let b = patch(vec![hunk(4, 1, 1, &["+b\n"]), hunk(5, 1, 1, &["+c\n"])]);
        let mut r = Scripted::new(&[Choice::PreferFirst, Choice::PreferFirst]);
        let merged = merge_patches(a, b, &mut r).unwrap();
        assert_eq!(starts(&merged), vec![1]);
        assert_eq!(r.seen, vec![(1, 1, 4), (2, 1, 5)]);
    }

    #[test]
    fn test_resolve_patch_text_end_to_end() {
        let text = "--- a/f\n+++ b/f\n@@ -1,1 +1,1 @@\n-x\n+y\n";
        let resolved = resolve_patch_text(text, &mut Scripted::new(&[])).unwrap();
        assert_eq!(resolved.text, text);
        assert_eq!(resolved.hunks, 1);
        assert_eq!(resolved.conflicts, 0);
    }

    #[test]
    fn test_resolve_patch_text_reorders_and_renumbers() {
        let text = "\
--- a/f
+++ b/f
<<<<<<< ours
@@ -20,1 +20,2 @@
 k
+ours
=======
@@ -2,2 +2,1 @@
-gone
 keep
>>>>>>> theirs
";
        let resolved = resolve_patch_text(text, &mut Scripted::new(&[])).unwrap();
        assert_eq!(
            resolved.text,
            "\
--- a/f
+++ b/f
@@ -2,2 +2,1 @@
-gone
 keep
@@ -20,1 +19,2 @@
 k
+ours
"
        );
    }
}
