use docpreview_core::{compute_line_diff, DiffLine, DiffLineKind};
use proptest::prelude::*;

fn join(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn side(diff: &[DiffLine], skip: DiffLineKind) -> Vec<String> {
    diff.iter()
        .filter(|line| line.kind != skip)
        .map(|line| line.text.clone())
        .collect()
}

fn lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]{0,2}", 0..12)
}

proptest! {
    #[test]
    fn identical_texts_never_diff(text in lines()) {
        let text = join(&text);
        prop_assert!(compute_line_diff(&text, &text).is_none());
    }

    #[test]
    fn diff_reconstructs_both_sides(old in lines(), new in lines()) {
        let diff = compute_line_diff(&join(&old), &join(&new));
        match diff {
            None => prop_assert_eq!(&old, &new),
            Some(diff) => {
                prop_assert_ne!(&old, &new);
                prop_assert_eq!(side(&diff, DiffLineKind::Added), old);
                prop_assert_eq!(side(&diff, DiffLineKind::Removed), new);
            }
        }
    }

    #[test]
    fn removals_precede_additions_within_a_hunk(old in lines(), new in lines()) {
        let Some(diff) = compute_line_diff(&join(&old), &join(&new)) else {
            return Ok(());
        };
        for hunk in diff.split(|line| line.kind == DiffLineKind::Context) {
            let first_added = hunk
                .iter()
                .position(|line| line.kind == DiffLineKind::Added)
                .unwrap_or(hunk.len());
            prop_assert!(hunk[first_added..]
                .iter()
                .all(|line| line.kind == DiffLineKind::Added));
        }
    }

    #[test]
    fn disjoint_texts_have_both_additions_and_removals(
        old in prop::collection::vec("[ab]{1,3}", 1..8),
        new in prop::collection::vec("[xy]{1,3}", 1..8),
    ) {
        let diff = compute_line_diff(&join(&old), &join(&new)).expect("texts differ");
        prop_assert!(diff.iter().any(|line| line.kind == DiffLineKind::Removed));
        prop_assert!(diff.iter().any(|line| line.kind == DiffLineKind::Added));
        prop_assert!(diff.iter().all(|line| line.kind != DiffLineKind::Context));
    }
}
