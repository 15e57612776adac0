// ---------------------------------------------------------------------------
// Conflict marker splitting
// ---------------------------------------------------------------------------

pub const MARKER_OURS: &str = "<<<<<<<";
pub const MARKER_BASE: &str = "|||||||";
pub const MARKER_SEPARATOR: &str = "=======";
pub const MARKER_THEIRS: &str = ">>>>>>>";

/// One line of a patch file, terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub content: String,
    /// True if the line only exists inside one side of a conflict region.
    pub added: bool,
}

impl Line {
    pub fn common(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            added: false,
        }
    }

    pub fn added(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            added: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Outside,
    Ours,
    /// diff3-style common ancestor section; dropped.
    Base,
    Theirs,
}

/// Split conflict-marked text into the two versions that were being merged.
///
/// Lines outside conflict regions go to both sides tagged as common; lines
/// inside a region go only to their own side tagged as added. Marker lines
/// themselves are consumed.
pub fn split_conflicts(content: &str) -> (Vec<Line>, Vec<Line>) {
    let mut side_a = Vec::new();
    let mut side_b = Vec::new();
    let mut region = Region::Outside;

    for line in content.split_inclusive('\n') {
        match region {
            Region::Outside => {
                if line.starts_with(MARKER_OURS) {
                    region = Region::Ours;
                } else {
                    side_a.push(Line::common(line));
                    side_b.push(Line::common(line));
                }
            }
            Region::Ours => {
                if line.starts_with(MARKER_SEPARATOR) {
                    region = Region::Theirs;
                } else if line.starts_with(MARKER_BASE) {
                    region = Region::Base;
                } else {
                    side_a.push(Line::added(line));
                }
            }
            Region::Base => {
                if line.starts_with(MARKER_SEPARATOR) {
                    region = Region::Theirs;
                }
            }
            Region::Theirs => {
                if line.starts_with(MARKER_THEIRS) {
                    region = Region::Outside;
                } else {
                    side_b.push(Line::added(line));
                }
            }
        }
    }

    (side_a, side_b)
}

/// Number of conflict regions (opening markers) in the text.
pub fn count_conflict_regions(content: &str) -> usize {
    content
        .split_inclusive('\n')
        .filter(|l| l.starts_with(MARKER_OURS))
        .count()
}

pub fn has_conflict_markers(content: &str) -> bool {
    count_conflict_regions(content) > 0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
