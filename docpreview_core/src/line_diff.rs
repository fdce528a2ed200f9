//! Line-level diffing shared by the comment and README comparisons.
//!
//! Lines are compared together with their terminating newline, so a final
//! line with and without a trailing `\n` counts as changed, while emitted
//! [`DiffLine`] text never includes the terminator.

use similar::{ChangeTag, TextDiff};

use crate::api::DiffLine;

/// Classify every line of `old` and `new` as context, removed or added.
///
/// Returns `None` when the texts are identical line-for-line, so callers can
/// use absence as the "nothing changed" signal. Within a changed region,
/// removed lines precede added lines.
#[must_use]
pub fn compute_line_diff(old: &str, new: &str) -> Option<Vec<DiffLine>> {
    let diff = TextDiff::from_lines(old, new);

    let mut lines = Vec::new();
    let mut added = Vec::new();
    let mut changed = false;
    for change in diff.iter_all_changes() {
        let text = strip_terminator(change.value());
        match change.tag() {
            ChangeTag::Equal => {
                lines.append(&mut added);
                lines.push(DiffLine::context(text));
            }
            ChangeTag::Delete => {
                changed = true;
                lines.push(DiffLine::removed(text));
            }
            ChangeTag::Insert => {
                changed = true;
                added.push(DiffLine::added(text));
            }
        }
    }
    lines.append(&mut added);

    changed.then_some(lines)
}

fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |rest| rest.strip_suffix('\r').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::api::DiffLineKind;

    fn render(lines: &[DiffLine]) -> Vec<(i8, &str)> {
        lines
            .iter()
            .map(|line| (line.kind.status(), line.text.as_str()))
            .collect()
    }

    #[test]
    fn identical_texts_have_no_diff() {
        assert!(compute_line_diff("", "").is_none());
        assert!(compute_line_diff("a\nb\n", "a\nb\n").is_none());
    }

    #[test]
    fn substitution_removes_before_adding() {
        let diff = compute_line_diff("keep\nold\ntail\n", "keep\nnew\ntail\n").expect("diff");
        assert_eq!(
            render(&diff),
            [(0, "keep"), (-1, "old"), (1, "new"), (0, "tail")]
        );
    }

    #[test]
    fn trailing_newline_adds_no_empty_line() {
        let diff = compute_line_diff("one\n", "one\ntwo\n").expect("diff");
        assert_eq!(render(&diff), [(0, "one"), (1, "two")]);
    }

    #[test]
    fn missing_final_newline_is_a_change() {
        let diff = compute_line_diff("a\nb", "a\nb\n").expect("diff");
        assert_eq!(render(&diff), [(0, "a"), (-1, "b"), (1, "b")]);
    }

    #[test]
    fn empty_side_is_all_added_or_removed() {
        let added = compute_line_diff("", "x\ny").expect("diff");
        assert_eq!(render(&added), [(1, "x"), (1, "y")]);

        let removed = compute_line_diff("x\n", "").expect("diff");
        assert_eq!(render(&removed), [(-1, "x")]);
    }

    #[test]
    fn interior_blank_lines_are_kept() {
        let diff = compute_line_diff("a\n\nb\n", "a\n\nc\n").expect("diff");
        assert_eq!(render(&diff), [(0, "a"), (0, ""), (-1, "b"), (1, "c")]);
    }

    #[test]
    fn crlf_terminators_are_stripped_from_text() {
        let diff = compute_line_diff("a\r\n", "b\r\n").expect("diff");
        assert_eq!(render(&diff), [(-1, "a"), (1, "b")]);
    }

    #[test]
    fn edits_at_both_ends_of_a_long_text_stay_local() {
        let body: String = (0..20_000).map(|i| format!("line {i}\n")).collect();
        let old = format!("# Old title\n{body}old footer\n");
        let new = format!("# New title\n{body}new footer\n");

        let diff = compute_line_diff(&old, &new).expect("diff");
        assert_eq!(diff.len(), 20_004);
        let changes: Vec<_> = diff
            .iter()
            .filter(|line| line.kind != DiffLineKind::Context)
            .map(|line| (line.kind.status(), line.text.as_str()))
            .collect();
        assert_eq!(
            changes,
            [
                (-1, "# Old title"),
                (1, "# New title"),
                (-1, "old footer"),
                (1, "new footer")
            ]
        );
    }

    #[test]
    fn moved_block_stays_context() {
        let diff = compute_line_diff("a\nb\nc\nd\n", "b\nc\nd\na\n").expect("diff");
        assert_eq!(
            render(&diff),
            [(-1, "a"), (0, "b"), (0, "c"), (0, "d"), (1, "a")]
        );
    }
}
