use inquire::InquireError;

use crate::config::Strategy;
use crate::error::PatchMergeError;
use crate::hunk::Hunk;
use crate::merge::{Choice, ConflictResolver, HunkConflict};

const PROMPT: &str = "Which hunk should be preferred (A/B)? Or press enter to abort the merge:";

/// Asks on the terminal which hunk to keep.
#[derive(Debug, Default)]
pub struct PromptResolver;

impl ConflictResolver for PromptResolver {
    fn resolve(&mut self, conflict: &HunkConflict<'_>) -> Result<Choice, PatchMergeError> {
        eprint!("{}", render_conflict(conflict));

        match inquire::Text::new(PROMPT).prompt() {
            Ok(answer) => Ok(parse_answer(&answer)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(Choice::Abort)
            }
            Err(e) => Err(PatchMergeError::Prompt(e.to_string())),
        }
    }
}

/// Gives the same answer to every conflict.
#[derive(Debug, Clone, Copy)]
pub struct FixedResolver(pub Choice);

impl ConflictResolver for FixedResolver {
    fn resolve(&mut self, _conflict: &HunkConflict<'_>) -> Result<Choice, PatchMergeError> {
        Ok(self.0)
    }
}

pub fn for_strategy(strategy: Strategy) -> Box<dyn ConflictResolver> {
    match strategy {
        Strategy::Prompt => Box::new(PromptResolver),
        Strategy::A => Box::new(FixedResolver(Choice::PreferFirst)),
        Strategy::B => Box::new(FixedResolver(Choice::PreferSecond)),
    }
}

/// `a...` keeps the first hunk, `b...` the second; anything else aborts.
pub fn parse_answer(answer: &str) -> Choice {
    match answer.chars().next() {
        Some('a' | 'A') => Choice::PreferFirst,
        Some('b' | 'B') => Choice::PreferSecond,
        _ => Choice::Abort,
    }
}

/// Text shown before asking about a conflict.
pub fn render_conflict(conflict: &HunkConflict<'_>) -> String {
    let mut out = format!("Conflict #{}:\n", conflict.index);
    render_hunk(&mut out, "Hunk A", conflict.first);
    render_hunk(&mut out, "Hunk B", conflict.second);
    out
}

fn render_hunk(out: &mut String, label: &str, hunk: &Hunk) {
    out.push_str(&format!("  {label}:\n"));
    for line in &hunk.lines {
        out.push_str("    ");
        out.push_str(line.content.trim_end_matches(['\n', '\r']));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::Line;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("a"), Choice::PreferFirst);
        assert_eq!(parse_answer("A"), Choice::PreferFirst);
        assert_eq!(parse_answer("apple"), Choice::PreferFirst);
        assert_eq!(parse_answer("B"), Choice::PreferSecond);
        assert_eq!(parse_answer("b please"), Choice::PreferSecond);
        assert_eq!(parse_answer(""), Choice::Abort);
        assert_eq!(parse_answer("c"), Choice::Abort);
        assert_eq!(parse_answer("no"), Choice::Abort);
    }

    #[test]
    fn test_render_conflict() {
        let first = Hunk {
            start_a: 1,
            len_a: 1,
            start_b: 1,
            len_b: 1,
            suffix: "\n".into(),
            lines: vec![Line::added("-x\n"), Line::added("+y\n")],
        };
        let mut second = first.clone();
        second.lines = vec![Line::added("+z\r\n")];

        let text = render_conflict(&HunkConflict {
            index: 2,
            first: &first,
            second: &second,
        });
        assert_eq!(
            text,
            "Conflict #2:\n  Hunk A:\n    -x\n    +y\n  Hunk B:\n    +z\n"
        );
    }

    #[test]
    fn test_fixed_resolver() {
        let h = Hunk {
            start_a: 1,
            len_a: 1,
            start_b: 1,
            len_b: 1,
            suffix: "\n".into(),
            lines: Vec::new(),
        };
        let c = HunkConflict {
            index: 1,
            first: &h,
            second: &h,
        };
        let mut r = for_strategy(Strategy::B);
        assert_eq!(r.resolve(&c).unwrap(), Choice::PreferSecond);
        let mut r = for_strategy(Strategy::A);
        assert_eq!(r.resolve(&c).unwrap(), Choice::PreferFirst);
    }
}
