//! Doc-comment, signature and README diffing between a published and a current snapshot.
//!
//! Only entities present on both sides are compared; additions and removals
//! are the API diff's concern.

use std::collections::{BTreeMap, HashMap};

use crate::api::{
    Alias, Binop, ContentDiff, DocumentedModule, ItemContentDiff, ModuleContentDiff, Union, Value,
};
use crate::line_diff::compute_line_diff;

/// A documented entity that can be compared across snapshots.
trait Documented {
    fn name(&self) -> &str;

    fn comment(&self) -> &str;

    /// Whether the declared signature is unchanged between `self` and `other`.
    fn same_signature(&self, other: &Self) -> bool;

    /// Canonical one-line rendering of the declaration.
    fn annotation(&self) -> String;
}

impl Documented for Value {
    fn name(&self) -> &str {
        &self.name
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn same_signature(&self, other: &Self) -> bool {
        self.tipe == other.tipe
    }

    fn annotation(&self) -> String {
        format!("{} : {}", self.name, self.tipe)
    }
}

impl Documented for Binop {
    fn name(&self) -> &str {
        &self.name
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn same_signature(&self, other: &Self) -> bool {
        self.tipe == other.tipe
    }

    fn annotation(&self) -> String {
        format!("{} : {}", self.name, self.tipe)
    }
}

impl Documented for Alias {
    fn name(&self) -> &str {
        &self.name
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn same_signature(&self, other: &Self) -> bool {
        self.tipe == other.tipe && self.args == other.args
    }

    fn annotation(&self) -> String {
        format!(
            "type alias {}{} = {}",
            self.name,
            render_args(&self.args),
            self.tipe
        )
    }
}

impl Documented for Union {
    fn name(&self) -> &str {
        &self.name
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn same_signature(&self, other: &Self) -> bool {
        self.cases == other.cases && self.args == other.args
    }

    fn annotation(&self) -> String {
        let head = format!("type {}{}", self.name, render_args(&self.args));
        if self.cases.is_empty() {
            return head;
        }
        let cases = self
            .cases
            .iter()
            .map(|(constructor, args)| {
                std::iter::once(constructor.as_str())
                    .chain(args.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(" | ");
        format!("{head} = {cases}")
    }
}

/// Type parameters rendered with a leading space, or nothing when there are none.
fn render_args(args: &[String]) -> String {
    args.iter().map(|arg| format!(" {arg}")).collect()
}

/// Compare two documentation snapshots and README texts.
///
/// Returns `None` when either snapshot is missing, or when no shared entity
/// and no README line changed. README comparison is skipped when either
/// README is missing.
#[must_use]
pub fn compute_content_diff(
    published: Option<&[DocumentedModule]>,
    current: Option<&[DocumentedModule]>,
    published_readme: Option<&str>,
    current_readme: Option<&str>,
) -> Option<ContentDiff> {
    let (published, current) = (published?, current?);

    let published_by_name: HashMap<&str, &DocumentedModule> = published
        .iter()
        .map(|module| (module.name.as_str(), module))
        .collect();

    let mut modules = BTreeMap::new();
    for module in current {
        let Some(old) = published_by_name.get(module.name.as_str()) else {
            continue;
        };
        let items = diff_module(old, module);
        if !items.is_empty() {
            modules.insert(module.name.clone(), ModuleContentDiff { items });
        }
    }

    let readme_diff = match (published_readme, current_readme) {
        (Some(old), Some(new)) if old != new => compute_line_diff(old, new),
        _ => None,
    };

    let diff = ContentDiff {
        modules,
        readme_diff,
    };
    (!diff.is_empty()).then_some(diff)
}

fn diff_module(
    published: &DocumentedModule,
    current: &DocumentedModule,
) -> BTreeMap<String, ItemContentDiff> {
    let mut items = BTreeMap::new();
    diff_entities(&published.values, &current.values, &mut items);
    diff_entities(&published.binops, &current.binops, &mut items);
    diff_entities(&published.aliases, &current.aliases, &mut items);
    diff_entities(&published.unions, &current.unions, &mut items);
    items
}

fn diff_entities<T: Documented>(
    published: &[T],
    current: &[T],
    items: &mut BTreeMap<String, ItemContentDiff>,
) {
    let published_by_name: HashMap<&str, &T> =
        published.iter().map(|entity| (entity.name(), entity)).collect();

    for entity in current {
        let Some(old) = published_by_name.get(entity.name()) else {
            continue;
        };
        let item = diff_entity(*old, entity);
        if !item.is_empty() {
            items.insert(entity.name().to_string(), item);
        }
    }
}

fn diff_entity<T: Documented>(published: &T, current: &T) -> ItemContentDiff {
    let comment_diff = if published.comment() == current.comment() {
        None
    } else {
        compute_line_diff(published.comment(), current.comment())
    };
    let old_annotation =
        (!published.same_signature(current)).then(|| published.annotation());

    ItemContentDiff {
        comment_diff,
        old_annotation,
    }
}
