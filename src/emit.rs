use crate::conflict::Line;
use crate::hunk::Hunk;

/// Recompute every hunk's target start from the net line changes of the hunks
/// before it. Source ranges are left untouched.
pub fn renumber(hunks: &mut [Hunk]) {
    let mut offset: isize = 0;
    for hunk in hunks {
        hunk.start_b = hunk.start_a.saturating_add_signed(offset);
        let delta = hunk.len_b as isize - hunk.len_a as isize;
        offset = offset.saturating_add(delta);
    }
}

/// Serialize a header block and hunks back into patch text.
pub fn render(header: &[Line], hunks: &[Hunk]) -> String {
    let mut out = String::new();
    for line in header {
        out.push_str(&line.content);
    }
    for hunk in hunks {
        out.push_str(&hunk.header_line());
        for line in &hunk.lines {
            out.push_str(&line.content);
        }
    }
    out
}

/// Renumber `hunks` and render them after `header`.
pub fn emit(header: &[Line], hunks: &mut [Hunk]) -> String {
    renumber(hunks);
    render(header, hunks)
}
