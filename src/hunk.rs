use crate::conflict::Line;

// ---------------------------------------------------------------------------
// Patch types
// ---------------------------------------------------------------------------

/// A single hunk from a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// Starting line in the source file (1-based).
    pub start_a: usize,
    pub len_a: usize,
    /// Starting line in the target file. Recomputed when the patch is emitted.
    pub start_b: usize,
    pub len_b: usize,
    /// Everything after the closing `@@`, terminator included.
    pub suffix: String,
    pub lines: Vec<Line>,
}

impl Hunk {
    /// First source line past this hunk.
    pub fn end_a(&self) -> usize {
        self.start_a.saturating_add(self.len_a)
    }

    /// Whether `later` (sorted at or after `self`) starts inside this hunk's
    /// source range.
    pub fn overlaps(&self, later: &Hunk) -> bool {
        later.start_a < self.end_a()
    }

    /// Whether both hunks describe the same edit. The suffix is a display hint
    /// and is not compared.
    pub fn same_edit(&self, other: &Hunk) -> bool {
        self.start_a == other.start_a
            && self.len_a == other.len_a
            && self.len_b == other.len_b
            && self.lines == other.lines
    }

    pub fn header_line(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@{}",
            self.start_a, self.len_a, self.start_b, self.len_b, self.suffix
        )
    }
}

/// One side of a conflicted patch file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchFile {
    /// Lines before the first hunk. `None` if no hunk header was found.
    pub header: Option<Vec<Line>>,
    pub hunks: Vec<Hunk>,
}

/// Fields captured from a `@@ -A,B +C,D @@suffix` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkHeader {
    pub start_a: usize,
    pub len_a: usize,
    pub start_b: usize,
    pub len_b: usize,
    pub suffix: String,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse "@@ -start_a,len_a +start_b,len_b @@suffix".
///
/// All four numbers are required, and the ranges must fit the offset
/// arithmetic done on emit. Anything else returns `None` and the line is
/// treated as hunk body by the caller.
pub fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let rest = line.strip_prefix("@@ -")?;
    let (start_a, rest) = take_number(rest)?;
    let rest = rest.strip_prefix(',')?;
    let (len_a, rest) = take_number(rest)?;
    let rest = rest.strip_prefix(" +")?;
    let (start_b, rest) = take_number(rest)?;
    let rest = rest.strip_prefix(',')?;
    let (len_b, rest) = take_number(rest)?;
    let suffix = rest.strip_prefix(" @@")?;

    start_a.checked_add(len_a)?;
    if len_a > isize::MAX as usize || len_b > isize::MAX as usize {
        return None;
    }

    Some(HunkHeader {
        start_a,
        len_a,
        start_b,
        len_b,
        suffix: suffix.to_string(),
    })
}

/// Split a leading run of ASCII digits off `s` and parse it.
fn take_number(s: &str) -> Option<(usize, &str)> {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let n = s[..end].parse().ok()?;
    Some((n, &s[end..]))
}

/// Group a tagged line sequence into a header block and its hunks.
pub fn parse_patch(lines: Vec<Line>) -> PatchFile {
    let mut patch = PatchFile::default();
    let mut body: Vec<Line> = Vec::new();

    for line in lines {
        let Some(h) = parse_hunk_header(&line.content) else {
            body.push(line);
            continue;
        };

        let finished = std::mem::take(&mut body);
        match patch.hunks.last_mut() {
            None => patch.header = Some(finished),
            Some(prev) => prev.lines = finished,
        }

        patch.hunks.push(Hunk {
            start_a: h.start_a,
            len_a: h.len_a,
            start_b: h.start_b,
            len_b: h.len_b,
            suffix: h.suffix,
            lines: Vec::new(),
        });
    }

    if let Some(last) = patch.hunks.last_mut() {
        last.lines = body;
    }

    patch
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
