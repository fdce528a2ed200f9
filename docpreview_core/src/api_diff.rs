//! Parser for the report printed by the compiler's `diff` command.
//!
//! The report is semi-structured text:
//!
//! ```text
//! This is a MAJOR change.
//!
//! ---- ADDED MODULES - MINOR ----
//!
//!     FilePath
//!
//! ---- Json.Decode - MAJOR ----
//!
//!     Changed:
//!       - field : String -> Decoder a -> Decoder a
//!       + field : String -> Decoder a -> Decoder (Maybe a)
//! ```
//!
//! Sections end only at the next dash banner or at end of input; blank lines
//! inside a section are padding, never terminators.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::{ApiDiff, Magnitude, ModuleChanges};

#[allow(clippy::expect_used)]
static MAGNITUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^This is a (MAJOR|MINOR|PATCH) change").expect("valid magnitude regex")
});

#[allow(clippy::expect_used)]
static BANNER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-{4,}").expect("valid banner regex"));

#[allow(clippy::expect_used)]
static MODULE_BANNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-{4,} (\S+) - (?:MAJOR|MINOR|PATCH) -{4,}$").expect("valid module banner regex")
});

#[allow(clippy::expect_used)]
static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9_]*) :").expect("valid item regex"));

/// Section of the report the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    AddedModules,
    RemovedModules,
    Module {
        index: usize,
        list: Option<ChangeList>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeList {
    Added,
    Changed,
    Removed,
}

impl ChangeList {
    fn from_header(line: &str) -> Option<Self> {
        match line {
            "Added:" => Some(Self::Added),
            "Changed:" => Some(Self::Changed),
            "Removed:" => Some(Self::Removed),
            _ => None,
        }
    }

    fn select(self, module: &mut ModuleChanges) -> &mut Vec<String> {
        match self {
            Self::Added => &mut module.added,
            Self::Changed => &mut module.changed,
            Self::Removed => &mut module.removed,
        }
    }
}

/// Parse the compiler's diff report into an [`ApiDiff`].
///
/// Returns `None` when `raw` is empty or its first line is not the
/// `This is a <MAGNITUDE> change` announcement. Unrecognised lines are skipped,
/// so malformed input degrades to a partially populated report rather than an
/// error.
#[must_use]
pub fn parse_diff_output(raw: &str) -> Option<ApiDiff> {
    let lines: Vec<&str> = raw.lines().collect();
    let first = lines.first()?;
    let captures = MAGNITUDE_RE.captures(first.trim())?;
    let magnitude: Magnitude = captures[1].parse().ok()?;

    let mut diff = ApiDiff::new(magnitude);
    let mut section = Section::None;
    let mut index = 1;

    while index < lines.len() {
        let line = lines[index];
        index += 1;

        let trimmed = line.trim();
        if BANNER_RE.is_match(trimmed) {
            section = open_section(trimmed, &mut diff);
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }

        match section {
            Section::None => {}
            Section::AddedModules => {
                if is_indented(line) {
                    push_unique(&mut diff.added_modules, trimmed);
                }
            }
            Section::RemovedModules => {
                if is_indented(line) {
                    push_unique(&mut diff.removed_modules, trimmed);
                }
            }
            Section::Module { index: module, list } => {
                if let Some(header) = ChangeList::from_header(trimmed) {
                    section = Section::Module {
                        index: module,
                        list: Some(header),
                    };
                    continue;
                }
                let (Some(list), Some(name)) = (list, item_name(trimmed)) else {
                    continue;
                };
                let changes = &mut diff.changed_modules[module];
                if !changes.contains(name) {
                    list.select(changes).push(name.to_string());
                }
            }
        }
    }

    Some(diff)
}

/// Decide which section a dash banner opens; unknown banners close the current one.
fn open_section(banner: &str, diff: &mut ApiDiff) -> Section {
    if banner.contains("ADDED MODULES") {
        return Section::AddedModules;
    }
    if banner.contains("REMOVED MODULES") {
        return Section::RemovedModules;
    }
    let Some(captures) = MODULE_BANNER_RE.captures(banner) else {
        return Section::None;
    };

    let name = &captures[1];
    let index = diff
        .changed_modules
        .iter()
        .position(|module| module.name == name)
        .unwrap_or_else(|| {
            diff.changed_modules.push(ModuleChanges::new(name));
            diff.changed_modules.len() - 1
        });
    Section::Module { index, list: None }
}

/// Symbol name of an item line, after dropping one optional `+`/`-` marker.
fn item_name(line: &str) -> Option<&str> {
    let unmarked = line
        .strip_prefix(['+', '-'])
        .map_or(line, str::trim_start);
    ITEM_RE
        .captures(unmarked)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

fn is_indented(line: &str) -> bool {
    line.starts_with(char::is_whitespace)
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|existing| existing == name) {
        list.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_unrelated_input_yield_none() {
        assert!(parse_diff_output("").is_none());
        assert!(parse_diff_output("some random text").is_none());
        assert!(parse_diff_output("\nThis is a MAJOR change.").is_none());
        assert!(parse_diff_output("This is a HUGE change.").is_none());
    }

    #[test]
    fn magnitude_only_report() {
        let diff = parse_diff_output("This is a PATCH change.\n").expect("diff");
        assert_eq!(diff, ApiDiff::new(Magnitude::Patch));
    }

    #[test]
    fn added_modules_survive_blank_padding() {
        let report = "This is a MINOR change.\n\n---- ADDED MODULES - MINOR ----\n\n    FilePath\n    NewModule\n\n";
        let diff = parse_diff_output(report).expect("diff");
        assert_eq!(diff.magnitude, Magnitude::Minor);
        assert_eq!(diff.added_modules, ["FilePath", "NewModule"]);
        assert!(diff.removed_modules.is_empty());
    }

    #[test]
    fn module_lists_continue_across_blank_lines() {
        let report = "This is a MAJOR change.\n\n---- REMOVED MODULES - MAJOR ----\n\n    Old.One\n\n\n    Old.Two\n";
        let diff = parse_diff_output(report).expect("diff");
        assert_eq!(diff.removed_modules, ["Old.One", "Old.Two"]);
    }

    #[test]
    fn module_body_collects_each_subsection() {
        let report = "\
This is a MAJOR change.

---- SomeModule - MAJOR ----

    Added:
        newFunc : String -> Int

    Changed:
      - oldFunc : Int -> String
      + oldFunc : Int -> Int -> String

    Removed:
      - removedFunc : String
";
        let diff = parse_diff_output(report).expect("diff");
        let module = diff.module("SomeModule").expect("module changes");
        assert_eq!(module.added, ["newFunc"]);
        assert_eq!(module.changed, ["oldFunc"]);
        assert_eq!(module.removed, ["removedFunc"]);
    }

    #[test]
    fn non_identifier_lines_are_ignored() {
        let report = "\
This is a MAJOR change.

---- Parser - MAJOR ----

    Added:
        type Problem
        (|=) : Parser (a -> b) -> Parser a -> Parser b
        keep :
            Parser a
            -> Parser a
";
        let diff = parse_diff_output(report).expect("diff");
        let module = diff.module("Parser").expect("module changes");
        assert_eq!(module.added, ["keep"]);
    }

    #[test]
    fn items_before_a_subsection_header_are_skipped() {
        let report = "This is a MINOR change.\n---- A - MINOR ----\n    stray : Int\n    Added:\n        kept : Int\n";
        let diff = parse_diff_output(report).expect("diff");
        assert_eq!(diff.module("A").expect("module").added, ["kept"]);
    }

    #[test]
    fn names_appear_in_at_most_one_list() {
        let report = "This is a MAJOR change.\n---- A - MAJOR ----\n    Added:\n        x : Int\n    Removed:\n        x : Int\n";
        let diff = parse_diff_output(report).expect("diff");
        let module = diff.module("A").expect("module");
        assert_eq!(module.added, ["x"]);
        assert!(module.removed.is_empty());
    }

    #[test]
    fn item_name_strips_one_marker() {
        assert_eq!(item_name("- foo : Int"), Some("foo"));
        assert_eq!(item_name("+foo : Int"), Some("foo"));
        assert_eq!(item_name("foo_2 : Int"), Some("foo_2"));
        assert_eq!(item_name("- - foo : Int"), None);
        assert_eq!(item_name("2foo : Int"), None);
        assert_eq!(item_name("foo: Int"), None);
    }
}
